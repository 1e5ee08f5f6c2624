//! Simtop core: a process/resource monitor driven entirely by synthetic
//! data. Two independent timers random-walk a seeded process table and a
//! resource snapshot; every resource tick also appends a derived sample
//! to a fixed-capacity rolling history for charting. A presentation layer
//! reads filtered/sorted projections and issues commands (kill, suspend,
//! resume, reprioritize, search) back into the core.

pub mod config;
pub mod dashboard;
pub mod history;
pub mod processes;
pub mod resources;
pub mod scheduler;
pub mod view;

pub use config::Config;
pub use dashboard::Dashboard;
pub use history::{HistoryBuffer, HistorySample};
pub use processes::{Process, ProcessRegistry, ProcessStatus};
pub use resources::SystemResources;
pub use scheduler::Ticker;
pub use view::{ProcessView, SortColumn, SortDirection};

/// Round to one decimal place, the precision every synthetic value carries.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
