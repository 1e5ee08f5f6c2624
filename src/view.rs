use std::cmp::Ordering;

use crate::processes::Process;

/// Sortable columns of the process table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Pid,
    Name,
    Cpu,
    Memory,
    User,
    Status,
    Priority,
    Time,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Query plus sort state for the process pane. Purely a derived view:
/// applying it never touches the registry it reads from.
#[derive(Clone, Debug)]
pub struct ProcessView {
    pub query: String,
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for ProcessView {
    fn default() -> Self {
        Self {
            query: String::new(),
            column: SortColumn::Cpu,
            direction: SortDirection::Descending,
        }
    }
}

impl ProcessView {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Selecting the active column flips the direction; a new column
    /// starts descending.
    pub fn select_column(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.toggled();
        } else {
            self.column = column;
            self.direction = SortDirection::Descending;
        }
    }

    /// Filter then sort a snapshot of the table for display.
    pub fn apply(&self, processes: &[Process]) -> Vec<Process> {
        let mut list = filter(processes, &self.query);
        sort(&mut list, self.column, self.direction);
        list
    }
}

/// Case-insensitive substring match of the query against name, user, or
/// the decimal pid. A process matches if any one field matches; an empty
/// query matches everything. Input order is preserved.
pub fn filter(processes: &[Process], query: &str) -> Vec<Process> {
    let needle = query.to_lowercase();
    processes
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.user.to_lowercase().contains(&needle)
                || p.pid.to_string().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Stable sort by one column. String columns compare lowercase
/// lexicographically, numeric columns by value.
pub fn sort(list: &mut [Process], column: SortColumn, direction: SortDirection) {
    list.sort_by(|a, b| {
        let ord = match column {
            SortColumn::Pid => a.pid.cmp(&b.pid),
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Cpu => a.cpu.partial_cmp(&b.cpu).unwrap_or(Ordering::Equal),
            SortColumn::Memory => a.memory.partial_cmp(&b.memory).unwrap_or(Ordering::Equal),
            SortColumn::User => a.user.to_lowercase().cmp(&b.user.to_lowercase()),
            SortColumn::Status => a.status.label().cmp(b.status.label()),
            SortColumn::Priority => a.priority.cmp(&b.priority),
            SortColumn::Time => a.time.cmp(&b.time),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
