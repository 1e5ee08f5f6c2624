use rand::Rng;

use crate::round1;

/// Scheduling state of a simulated process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Stopped,
    Zombie,
}

impl ProcessStatus {
    /// Lowercase name, as shown in a status column.
    pub fn label(self) -> &'static str {
        match self {
            ProcessStatus::Running => "running",
            ProcessStatus::Sleeping => "sleeping",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Zombie => "zombie",
        }
    }

    /// Single-letter form, R/S/T/Z as in a classic ps listing.
    pub fn letter(self) -> char {
        match self {
            ProcessStatus::Running => 'R',
            ProcessStatus::Sleeping => 'S',
            ProcessStatus::Stopped => 'T',
            ProcessStatus::Zombie => 'Z',
        }
    }
}

/// Catalog the generator draws process names from.
const PROCESS_NAMES: &[&str] = &[
    "chrome", "firefox", "safari", "terminal", "vscode",
    "node", "python", "java", "nginx", "apache",
    "mongodb", "postgres", "redis", "mysql", "docker",
    "spotify", "slack", "discord", "skype", "zoom",
    "systemd", "kernel", "init", "bash", "zsh",
    "finder", "explorer", "photoshop", "illustrator", "blender",
];

const USERS: &[&str] = &["system", "user", "admin", "service"];

const STATUSES: [ProcessStatus; 4] = [
    ProcessStatus::Running,
    ProcessStatus::Sleeping,
    ProcessStatus::Stopped,
    ProcessStatus::Zombie,
];

/// One simulated process. Pids are drawn independently per process, so
/// collisions are possible; everything that addresses a pid has to cope
/// with more than one match.
#[derive(Clone, Debug, PartialEq)]
pub struct Process {
    pub pid: u32,
    pub name: String,
    /// CPU usage in percent. Unclamped at creation, held to [0.1, 100]
    /// by the tick walk.
    pub cpu: f64,
    /// Resident memory in MB. Held to [0.1, 1000] by the tick walk.
    pub memory: f64,
    pub user: String,
    pub status: ProcessStatus,
    /// Nice-style priority. Seeded in [-10, 9]; a manual change stores
    /// the requested value verbatim.
    pub priority: i32,
    /// Display-only "M:SS" running time, not a real duration.
    pub time: String,
}

impl Process {
    fn generate(rng: &mut impl Rng) -> Self {
        Self {
            pid: rng.gen_range(1..=10_000),
            name: PROCESS_NAMES[rng.gen_range(0..PROCESS_NAMES.len())].to_string(),
            cpu: round1(rng.gen_range(0.0..15.0)),
            memory: round1(rng.gen_range(0.0..500.0)),
            user: USERS[rng.gen_range(0..USERS.len())].to_string(),
            status: STATUSES[rng.gen_range(0..STATUSES.len())],
            priority: rng.gen_range(-10..10),
            time: format!("{}:{:02}", rng.gen_range(0..60), rng.gen_range(0..60)),
        }
    }
}

/// Owns the simulated process table. The table is seeded once at startup;
/// afterwards entries are only mutated in place or removed, never added.
#[derive(Clone, Debug, Default)]
pub struct ProcessRegistry {
    procs: Vec<Process>,
}

impl ProcessRegistry {
    /// Generate `count` processes with independently randomized fields.
    pub fn seed(count: usize, rng: &mut impl Rng) -> Self {
        Self {
            procs: (0..count).map(|_| Process::generate(rng)).collect(),
        }
    }

    pub fn processes(&self) -> &[Process] {
        &self.procs
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    /// Random-walk every process's cpu and memory. Runs unconditionally
    /// on the process tick; all other fields are left untouched.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        for p in &mut self.procs {
            p.cpu = round1((p.cpu + rng.gen_range(-3.0..3.0)).clamp(0.1, 100.0));
            p.memory = round1((p.memory + rng.gen_range(-10.0..10.0)).clamp(0.1, 1000.0));
        }
    }

    /// Remove every process with this pid. Generated pids can collide, so
    /// a kill takes all matches with it. Absent pids are a no-op.
    pub fn kill(&mut self, pid: u32) {
        self.procs.retain(|p| p.pid != pid);
    }

    /// Mark every match as stopped. Absent pids are a no-op.
    pub fn suspend(&mut self, pid: u32) {
        self.set_status(pid, ProcessStatus::Stopped);
    }

    /// Mark every match as running. Absent pids are a no-op.
    pub fn resume(&mut self, pid: u32) {
        self.set_status(pid, ProcessStatus::Running);
    }

    /// Store the value verbatim; there is no clamp on manual changes.
    /// Absent pids are a no-op.
    pub fn set_priority(&mut self, pid: u32, priority: i32) {
        for p in self.procs.iter_mut().filter(|p| p.pid == pid) {
            p.priority = priority;
        }
    }

    fn set_status(&mut self, pid: u32, status: ProcessStatus) {
        for p in self.procs.iter_mut().filter(|p| p.pid == pid) {
            p.status = status;
        }
    }
}
