use std::collections::VecDeque;

use chrono::{DateTime, Duration, Local};
use rand::Rng;

use crate::resources::SystemResources;
use crate::round1;

/// How many backfill points the buffer is pre-seeded with at startup,
/// and how far apart they are stamped.
const BACKFILL_POINTS: i64 = 21;
const BACKFILL_SPACING_SECS: i64 = 5;

/// One point in the rolling chart history, derived from a resource
/// snapshot at sample time. Owns plain values; it never references into
/// the snapshot it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct HistorySample {
    pub time: DateTime<Local>,
    /// Total CPU usage in percent.
    pub cpu: f64,
    /// Memory usage as a percentage of total.
    pub memory: f64,
    /// Mean of disk read and write throughput, MB/s.
    pub disk: f64,
}

impl HistorySample {
    /// Derive a sample from a snapshot at the given instant.
    pub fn derive(res: &SystemResources, time: DateTime<Local>) -> Self {
        Self {
            time,
            cpu: res.cpu.total,
            memory: res.memory_pct(),
            disk: (res.disk.read + res.disk.write) / 2.0,
        }
    }
}

/// Fixed-capacity FIFO of history samples, oldest first. Pushing past
/// capacity drops the oldest sample.
#[derive(Clone, Debug)]
pub struct HistoryBuffer {
    samples: VecDeque<HistorySample>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pre-seed a buffer so charts have content before the first real
    /// sample arrives. Points are spaced five seconds apart ending at
    /// `now`, with each channel drawn in the band the original data
    /// settles into. Capacity still applies.
    pub fn prefilled(capacity: usize, now: DateTime<Local>, rng: &mut impl Rng) -> Self {
        let mut buf = Self::new(capacity);
        for i in (0..BACKFILL_POINTS).rev() {
            buf.push(HistorySample {
                time: now - Duration::seconds(i * BACKFILL_SPACING_SECS),
                cpu: round1(rng.gen_range(0.0..100.0)),
                memory: round1(rng.gen_range(0.0..80.0)),
                disk: round1(rng.gen_range(0.0..50.0)),
            });
        }
        buf
    }

    /// Push a sample. At capacity, the oldest sample is dropped first.
    pub fn push(&mut self, sample: HistorySample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Samples in time order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
