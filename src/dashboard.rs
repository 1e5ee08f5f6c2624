use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use rand::Rng;

use crate::config::Config;
use crate::history::{HistoryBuffer, HistorySample};
use crate::processes::{Process, ProcessRegistry};
use crate::resources::SystemResources;
use crate::scheduler::Ticker;
use crate::view::{ProcessView, SortColumn};

/// Sampler-owned state: the current snapshot plus its rolling history.
/// Kept under one lock so a reader never sees a snapshot without its
/// matching history point.
struct SamplerState {
    resources: SystemResources,
    history: HistoryBuffer,
}

impl SamplerState {
    /// One sampler tick: derive the next snapshot, record its history
    /// sample, swap the snapshot in.
    fn advance(&mut self, rng: &mut impl Rng) {
        let next = self.resources.step(rng);
        self.history.push(HistorySample::derive(&next, Local::now()));
        self.resources = next;
    }
}

/// The monitor core. Owns all mutable state, runs the two tick timers,
/// and exposes the command/projection surface the presentation layer
/// talks to. Commands run synchronously on the caller's thread and may
/// interleave arbitrarily with a pending tick; last write wins.
pub struct Dashboard {
    config: Config,
    registry: Arc<Mutex<ProcessRegistry>>,
    sampler: Arc<Mutex<SamplerState>>,
    view: Mutex<ProcessView>,
    tickers: Vec<Ticker>,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    /// Build with a caller-supplied generator so seeded runs are
    /// reproducible. Timers do not run until `start`.
    pub fn with_rng(config: Config, rng: &mut impl Rng) -> Self {
        let registry = ProcessRegistry::seed(config.process_count, rng);
        let resources = SystemResources::initial(rng);
        let history = HistoryBuffer::prefilled(config.history_capacity, Local::now(), rng);
        Self {
            config,
            registry: Arc::new(Mutex::new(registry)),
            sampler: Arc::new(Mutex::new(SamplerState { resources, history })),
            view: Mutex::new(ProcessView::default()),
            tickers: Vec::new(),
        }
    }

    /// Start the two periodic timers. The tick workers take the same
    /// locks the command surface does, one whole mutation per lock hold.
    pub fn start(&mut self) {
        if !self.tickers.is_empty() {
            return;
        }
        let registry = Arc::clone(&self.registry);
        self.tickers.push(Ticker::spawn(
            "process-tick",
            self.config.process_interval(),
            move || {
                let mut rng = rand::thread_rng();
                registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .tick(&mut rng);
            },
        ));
        let sampler = Arc::clone(&self.sampler);
        self.tickers.push(Ticker::spawn(
            "resource-tick",
            self.config.resource_interval(),
            move || {
                let mut rng = rand::thread_rng();
                sampler
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .advance(&mut rng);
            },
        ));
    }

    /// Stop both timers and join their workers. Also happens on drop.
    pub fn stop(&mut self) {
        self.tickers.clear();
    }

    // ─── Inbound commands ──────────────────────────────────────────

    pub fn kill(&self, pid: u32) {
        log::debug!("kill pid {pid}");
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .kill(pid);
    }

    pub fn suspend(&self, pid: u32) {
        log::debug!("suspend pid {pid}");
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .suspend(pid);
    }

    pub fn resume(&self, pid: u32) {
        log::debug!("resume pid {pid}");
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resume(pid);
    }

    pub fn set_priority(&self, pid: u32, priority: i32) {
        log::debug!("set priority of pid {pid} to {priority}");
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_priority(pid, priority);
    }

    /// Update the view query. Matching is case-insensitive against name,
    /// user, and the decimal pid.
    pub fn search(&self, query: impl Into<String>) {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_query(query);
    }

    /// Select a sort column; reselecting the active one flips direction.
    pub fn set_sort(&self, column: SortColumn) {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .select_column(column);
    }

    /// Advisory refresh request from the presentation layer. Data updates
    /// are timer-driven, so this does not force an extra sample.
    pub fn refresh(&self) {
        log::debug!("refresh requested");
    }

    // ─── Outbound projections (read-only clones) ───────────────────

    /// The full process table, unfiltered, in registry order.
    pub fn processes(&self) -> Vec<Process> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .processes()
            .to_vec()
    }

    /// The filtered/sorted projection the process pane renders.
    pub fn visible(&self) -> Vec<Process> {
        let view = self
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        view.apply(registry.processes())
    }

    /// The current resource snapshot.
    pub fn resources(&self) -> SystemResources {
        self.sampler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resources
            .clone()
    }

    /// The rolling history, oldest first.
    pub fn history(&self) -> Vec<HistorySample> {
        self.sampler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .iter()
            .cloned()
            .collect()
    }

    /// Current query/sort state, for rendering header indicators.
    pub fn view(&self) -> ProcessView {
        self.view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// One process-table tick, exactly as the process timer performs it.
    pub fn tick_processes(&self, rng: &mut impl Rng) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick(rng);
    }

    /// One sampler tick, exactly as the resource timer performs it.
    pub fn tick_resources(&self, rng: &mut impl Rng) {
        self.sampler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .advance(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processes::ProcessStatus;
    use crate::view::SortDirection;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::thread;
    use std::time::Duration;

    fn dashboard(seed: u64) -> Dashboard {
        let mut rng = StdRng::seed_from_u64(seed);
        Dashboard::with_rng(Config::default(), &mut rng)
    }

    #[test]
    fn test_seeded_construction_is_reproducible() {
        let a = dashboard(42);
        let b = dashboard(42);
        assert_eq!(a.processes(), b.processes());
        assert_eq!(a.resources(), b.resources());
    }

    #[test]
    fn test_initial_state_shape() {
        let dash = dashboard(1);
        assert_eq!(dash.processes().len(), 25);
        // Charts start pre-seeded, not empty.
        assert_eq!(dash.history().len(), 21);
        let res = dash.resources();
        assert_eq!(res.memory.used + res.memory.free, res.memory.total);
    }

    #[test]
    fn test_commands_through_the_surface() {
        let dash = dashboard(2);
        let pid = dash.processes()[0].pid;
        dash.suspend(pid);
        assert!(dash
            .processes()
            .iter()
            .filter(|p| p.pid == pid)
            .all(|p| p.status == ProcessStatus::Stopped));
        dash.resume(pid);
        assert!(dash
            .processes()
            .iter()
            .filter(|p| p.pid == pid)
            .all(|p| p.status == ProcessStatus::Running));
        dash.set_priority(pid, 7);
        assert!(dash
            .processes()
            .iter()
            .filter(|p| p.pid == pid)
            .all(|p| p.priority == 7));
    }

    #[test]
    fn test_kill_is_idempotent_through_the_surface() {
        let dash = dashboard(3);
        let pid = dash.processes()[0].pid;
        dash.kill(pid);
        let after_first = dash.processes();
        assert!(after_first.iter().all(|p| p.pid != pid));
        dash.kill(pid);
        assert_eq!(dash.processes(), after_first);
    }

    #[test]
    fn test_search_narrows_the_visible_projection() {
        let dash = dashboard(4);
        let name = dash.processes()[0].name.clone();
        dash.search(name.clone());
        let visible = dash.visible();
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|p| {
            p.name.contains(&name) || p.user.contains(&name) || p.pid.to_string().contains(&name)
        }));
        dash.search("");
        assert_eq!(dash.visible().len(), dash.processes().len());
    }

    #[test]
    fn test_default_sort_is_cpu_descending() {
        let dash = dashboard(5);
        let visible = dash.visible();
        assert!(visible.windows(2).all(|w| w[0].cpu >= w[1].cpu));
    }

    #[test]
    fn test_set_sort_toggles_on_reselect() {
        let dash = dashboard(6);
        dash.set_sort(SortColumn::Cpu);
        assert_eq!(dash.view().direction, SortDirection::Ascending);
        let visible = dash.visible();
        assert!(visible.windows(2).all(|w| w[0].cpu <= w[1].cpu));
        dash.set_sort(SortColumn::Pid);
        assert_eq!(dash.view().column, SortColumn::Pid);
        assert_eq!(dash.view().direction, SortDirection::Descending);
    }

    #[test]
    fn test_manual_ticks_advance_state() {
        let dash = dashboard(7);
        let mut rng = StdRng::seed_from_u64(70);
        let history_before = dash.history().len();
        let res_before = dash.resources();
        dash.tick_resources(&mut rng);
        assert_eq!(dash.history().len(), history_before + 1);
        assert_ne!(dash.resources(), res_before);
        dash.tick_processes(&mut rng);
        for p in dash.processes() {
            assert!((0.1..=100.0).contains(&p.cpu));
            assert!((0.1..=1000.0).contains(&p.memory));
        }
    }

    #[test]
    fn test_refresh_is_advisory() {
        let dash = dashboard(8);
        let history = dash.history();
        let resources = dash.resources();
        dash.refresh();
        assert_eq!(dash.history(), history);
        assert_eq!(dash.resources(), resources);
    }

    #[test]
    fn test_timers_drive_both_stores() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = Config {
            process_interval_ms: 100,
            resource_interval_ms: 100,
            ..Config::default()
        };
        let mut dash = Dashboard::with_rng(config, &mut rng);
        let history_before = dash.history().len();
        dash.start();
        thread::sleep(Duration::from_millis(450));
        dash.stop();
        assert!(dash.history().len() > history_before);
        for p in dash.processes() {
            assert!((0.1..=100.0).contains(&p.cpu));
        }
        // Stopped timers stay stopped.
        let frozen = dash.history().len();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(dash.history().len(), frozen);
    }

    #[test]
    fn test_start_twice_does_not_double_the_timers() {
        let mut dash = dashboard(10);
        dash.start();
        dash.start();
        assert_eq!(dash.tickers.len(), 2);
    }
}
