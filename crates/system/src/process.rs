use chrono::{Local, TimeZone};
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, Signal, System, Users};
use tracing::{debug, info};
use vigil_core::{
    state::{ProcessInfo, SortKey},
    Result, VigilError,
};

/// Which processes to show and in what order.
#[derive(Debug, Clone, Default)]
pub struct ProcessQuery {
    pub sort:   SortKey,
    /// Case-insensitive substring of the process name; empty matches all.
    pub filter: String,
}

/// One page of a longer listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Zero-based page index actually shown (clamped to the last page).
    pub index: usize,
    /// Total number of pages, never less than 1.
    pub count: usize,
}

/// Slice `items` into pages of `size` and return page `index`.
pub fn paginate<T>(items: &[T], index: usize, size: usize) -> Page<'_, T> {
    let size  = size.max(1);
    let count = items.len().div_ceil(size).max(1);
    let index = index.min(count - 1);
    let start = (index * size).min(items.len());
    let end   = (start + size).min(items.len());

    Page { items: &items[start..end], index, count }
}

/// Apply `query`'s filter and ordering to a process list.
pub fn filter_and_sort(mut processes: Vec<ProcessInfo>, query: &ProcessQuery) -> Vec<ProcessInfo> {
    let needle = query.filter.trim().to_lowercase();
    if !needle.is_empty() {
        processes.retain(|p| p.name.to_lowercase().contains(&needle));
    }

    match query.sort {
        SortKey::Cpu => processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent)),
        SortKey::Memory => processes.sort_by(|a, b| b.memory_bytes.cmp(&a.memory_bytes)),
        SortKey::Pid => processes.sort_by_key(|p| p.pid),
        SortKey::Name => processes.sort_by_cached_key(|p| p.name.to_lowercase()),
    }
    processes
}

/// Live view over the OS process table.
pub struct ProcessTable {
    sys:   System,
    users: Users,
}

impl ProcessTable {
    /// Build the table, refreshing twice so per-process CPU usage is populated.
    pub fn new() -> Self {
        let mut table = Self {
            sys:   System::new(),
            users: Users::new_with_refreshed_list(),
        };
        table.refresh();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        table.refresh();
        table
    }

    pub fn refresh(&mut self) {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true, // drop processes that have exited
            ProcessRefreshKind::everything(),
        );
        self.sys.refresh_memory();
    }

    /// Installed RAM in bytes, for per-process memory percentages.
    pub fn total_memory(&self) -> u64 {
        self.sys.total_memory()
    }

    /// Snapshot of every process matching `query`, in `query`'s order.
    pub fn list(&self, query: &ProcessQuery) -> Vec<ProcessInfo> {
        let processes = self
            .sys
            .processes()
            .values()
            .map(|p| self.describe(p))
            .collect();
        filter_and_sort(processes, query)
    }

    /// Ask process `pid` to terminate (SIGTERM or the platform equivalent).
    ///
    /// Returns the process name on success. Not retried on failure; the
    /// caller decides what to tell the user.
    pub fn terminate(&self, pid: u32) -> Result<String> {
        let process = self
            .sys
            .process(Pid::from_u32(pid))
            .ok_or(VigilError::ProcessNotFound(pid))?;

        let name = process.name().to_string_lossy().into_owned();
        debug!(pid, %name, "sending terminate signal");

        match process.kill_with(Signal::Term) {
            Some(true) => {
                info!(pid, %name, "process terminated");
                Ok(name)
            }
            Some(false) => Err(VigilError::Terminate {
                pid,
                reason: "signal refused (permission denied or process already gone)".into(),
            }),
            None => Err(VigilError::Terminate {
                pid,
                reason: "terminate signal not supported on this platform".into(),
            }),
        }
    }

    fn describe(&self, p: &Process) -> ProcessInfo {
        let user = p
            .user_id()
            .and_then(|uid| self.users.get_user_by_id(uid))
            .map(|u| u.name().to_string());
        let started = match p.start_time() {
            0 => None,
            secs => Local.timestamp_opt(secs as i64, 0).single(),
        };

        ProcessInfo {
            pid:          p.pid().as_u32(),
            name:         p.name().to_string_lossy().into_owned(),
            user,
            cpu_percent:  p.cpu_usage(),
            memory_bytes: p.memory(),
            status:       p.status().to_string(),
            started,
        }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
