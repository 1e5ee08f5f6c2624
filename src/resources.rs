use rand::Rng;

use crate::round1;

/// Core count of the simulated host.
pub const CORE_COUNT: usize = 8;

/// Total memory of the simulated host, in MB.
pub const MEMORY_TOTAL_MB: f64 = 16384.0;

/// Aggregate and per-core CPU usage in percent.
#[derive(Clone, Debug, PartialEq)]
pub struct CpuStats {
    pub total: f64,
    pub cores: [f64; CORE_COUNT],
}

/// Memory figures in MB. `free` is always derived from `used`, so
/// `used + free == total` holds for every snapshot ever produced.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryStats {
    pub total: f64,
    pub used: f64,
    pub free: f64,
}

/// Disk throughput in MB/s.
#[derive(Clone, Debug, PartialEq)]
pub struct DiskStats {
    pub read: f64,
    pub write: f64,
}

/// Network throughput in MB/s.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkStats {
    pub received: f64,
    pub sent: f64,
}

/// A full resource snapshot. Each sampler tick derives a new snapshot
/// from the previous one and swaps it in wholesale; nothing is edited
/// in place.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemResources {
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub disk: DiskStats,
    /// Absent when the simulated host reports no network activity.
    pub network: Option<NetworkStats>,
}

/// One random-walk step: move by a uniform draw in ±`spread`, saturate
/// into [lo, hi], keep one-decimal precision.
fn walk(value: f64, spread: f64, lo: f64, hi: f64, rng: &mut impl Rng) -> f64 {
    round1((value + rng.gen_range(-spread..spread)).clamp(lo, hi))
}

impl SystemResources {
    /// Draw a fresh snapshot with every field at a uniformly random
    /// starting point.
    pub fn initial(rng: &mut impl Rng) -> Self {
        let mut cores = [0.0; CORE_COUNT];
        for c in &mut cores {
            *c = round1(rng.gen_range(0.0..100.0));
        }
        let used = round1(rng.gen_range(0.0..MEMORY_TOTAL_MB));
        Self {
            cpu: CpuStats {
                total: round1(rng.gen_range(0.0..100.0)),
                cores,
            },
            memory: MemoryStats {
                total: MEMORY_TOTAL_MB,
                used,
                free: MEMORY_TOTAL_MB - used,
            },
            disk: DiskStats {
                read: round1(rng.gen_range(0.0..100.0)),
                write: round1(rng.gen_range(0.0..100.0)),
            },
            network: Some(NetworkStats {
                received: round1(rng.gen_range(0.0..10.0)),
                sent: round1(rng.gen_range(0.0..5.0)),
            }),
        }
    }

    /// Derive the next snapshot via independent bounded random walks on
    /// every field. `free` is recomputed from the walked `used`, so the
    /// memory sum invariant cannot drift.
    pub fn step(&self, rng: &mut impl Rng) -> Self {
        let mut cores = self.cpu.cores;
        for c in &mut cores {
            *c = walk(*c, 7.5, 0.1, 100.0, rng);
        }
        let used = walk(self.memory.used, 250.0, 0.1, self.memory.total, rng);
        Self {
            cpu: CpuStats {
                total: walk(self.cpu.total, 5.0, 0.1, 100.0, rng),
                cores,
            },
            memory: MemoryStats {
                total: self.memory.total,
                used,
                free: self.memory.total - used,
            },
            disk: DiskStats {
                read: walk(self.disk.read, 7.5, 0.1, 200.0, rng),
                write: walk(self.disk.write, 7.5, 0.1, 200.0, rng),
            },
            network: self.network.as_ref().map(|n| NetworkStats {
                received: walk(n.received, 1.0, 0.1, 20.0, rng),
                sent: walk(n.sent, 0.5, 0.1, 10.0, rng),
            }),
        }
    }

    /// Memory usage as a percentage of total.
    pub fn memory_pct(&self) -> f64 {
        self.memory.used / self.memory.total * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initial_snapshot_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let res = SystemResources::initial(&mut rng);
        assert!((0.0..=100.0).contains(&res.cpu.total));
        for c in &res.cpu.cores {
            assert!((0.0..=100.0).contains(c));
        }
        assert_eq!(res.memory.total, MEMORY_TOTAL_MB);
        assert!((0.0..=MEMORY_TOTAL_MB).contains(&res.memory.used));
        assert_eq!(res.memory.used + res.memory.free, res.memory.total);
        assert!((0.0..=100.0).contains(&res.disk.read));
        assert!((0.0..=100.0).contains(&res.disk.write));
        let net = res.network.as_ref().unwrap();
        assert!((0.0..=10.0).contains(&net.received));
        assert!((0.0..=5.0).contains(&net.sent));
    }

    #[test]
    fn test_step_keeps_every_field_in_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut res = SystemResources::initial(&mut rng);
        for _ in 0..200 {
            res = res.step(&mut rng);
            assert!((0.1..=100.0).contains(&res.cpu.total));
            for c in &res.cpu.cores {
                assert!((0.1..=100.0).contains(c));
            }
            assert!((0.1..=MEMORY_TOTAL_MB).contains(&res.memory.used));
            assert!((0.1..=200.0).contains(&res.disk.read));
            assert!((0.1..=200.0).contains(&res.disk.write));
            let net = res.network.as_ref().unwrap();
            assert!((0.1..=20.0).contains(&net.received));
            assert!((0.1..=10.0).contains(&net.sent));
        }
    }

    #[test]
    fn test_memory_sum_invariant_is_exact() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut res = SystemResources::initial(&mut rng);
        for _ in 0..500 {
            res = res.step(&mut rng);
            assert_eq!(res.memory.used + res.memory.free, res.memory.total);
        }
    }

    #[test]
    fn test_step_does_not_mutate_previous_snapshot() {
        let mut rng = StdRng::seed_from_u64(4);
        let res = SystemResources::initial(&mut rng);
        let before = res.clone();
        let _next = res.step(&mut rng);
        assert_eq!(res, before);
    }

    #[test]
    fn test_step_without_network_stays_without() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut res = SystemResources::initial(&mut rng);
        res.network = None;
        let next = res.step(&mut rng);
        assert!(next.network.is_none());
    }

    #[test]
    fn test_memory_pct() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut res = SystemResources::initial(&mut rng);
        res.memory.used = 8192.0;
        res.memory.free = res.memory.total - res.memory.used;
        assert!((res.memory_pct() - 50.0).abs() < f64::EPSILON);
    }
}
