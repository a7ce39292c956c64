use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::VigilError;

/// How loaded a resource is, derived from a usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    /// ≤ 50 %
    Normal,
    /// ≤ 80 %
    Elevated,
    /// > 80 %
    Critical,
}

impl UsageLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            UsageLevel::Critical
        } else if percent > 50.0 {
            UsageLevel::Elevated
        } else {
            UsageLevel::Normal
        }
    }
}

/// Identity of the machine being monitored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostInfo {
    pub os_name:        Option<String>,
    pub os_version:     Option<String>,
    pub kernel_version: Option<String>,
    pub host_name:      Option<String>,
    pub arch:           String,
    /// Seconds since boot.
    pub uptime:         u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CpuInfo {
    pub brand:          String,
    pub logical_cores:  usize,
    /// `None` when the OS does not report it.
    pub physical_cores: Option<usize>,
    /// Current frequency of the first core in MHz (`0` if unknown).
    pub frequency_mhz:  u64,
    /// Per-core CPU usage (0.0 – 100.0).
    pub per_core:       Vec<f32>,
}

impl CpuInfo {
    /// Average CPU usage across all cores.
    pub fn average(&self) -> f32 {
        if self.per_core.is_empty() {
            return 0.0;
        }
        self.per_core.iter().sum::<f32>() / self.per_core.len() as f32
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryInfo {
    pub ram_used:   u64,
    pub ram_total:  u64,
    pub swap_used:  u64,
    pub swap_total: u64,
}

impl MemoryInfo {
    pub fn ram_percent(&self) -> f64 {
        percent(self.ram_used, self.ram_total)
    }

    pub fn swap_percent(&self) -> f64 {
        percent(self.swap_used, self.swap_total)
    }
}

/// Usage of one mounted filesystem.
#[derive(Debug, Clone, Serialize)]
pub struct DiskInfo {
    pub name:        String,
    pub mount_point: PathBuf,
    pub file_system: String,
    pub total:       u64,
    pub used:        u64,
}

impl DiskInfo {
    pub fn percent(&self) -> f64 {
        percent(self.used, self.total)
    }
}

/// Battery state for the first battery found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryStatus {
    /// Charge level (0–100).
    pub percent:   u8,
    /// `true` = charging / full.
    pub charging:  bool,
    /// Estimated seconds until empty, `None` when unknown or on AC power.
    pub secs_left: Option<u64>,
}

/// Coarse battery health bucket used for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryLevel {
    /// > 50 %
    Good,
    /// > 20 %
    Medium,
    Low,
}

impl BatteryLevel {
    pub fn from_percent(percent: u8) -> Self {
        if percent > 50 {
            BatteryLevel::Good
        } else if percent > 20 {
            BatteryLevel::Medium
        } else {
            BatteryLevel::Low
        }
    }
}

/// One row of the process table.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessInfo {
    pub pid:          u32,
    pub name:         String,
    /// Owning user name, `None` when it cannot be resolved.
    pub user:         Option<String>,
    pub cpu_percent:  f32,
    /// Resident memory in bytes.
    pub memory_bytes: u64,
    pub status:       String,
    pub started:      Option<DateTime<Local>>,
}

/// Ordering for the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest CPU usage first.
    #[default]
    Cpu,
    /// Largest resident memory first.
    Memory,
    /// Ascending PID.
    Pid,
    /// Case-insensitive name, A → Z.
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Cpu => "cpu",
            SortKey::Memory => "memory",
            SortKey::Pid => "pid",
            SortKey::Name => "name",
        })
    }
}

impl FromStr for SortKey {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(SortKey::Cpu),
            "memory" | "mem" => Ok(SortKey::Memory),
            "pid" => Ok(SortKey::Pid),
            "name" => Ok(SortKey::Name),
            other => Err(VigilError::Config(format!("unknown sort key '{other}'"))),
        }
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}
