use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vigil_core::{state::SortKey, Metric};

/// Smallest accepted sampling interval.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Root configuration structure parsed from `vigil.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// Sampling loop and history window.
    pub sampler: SamplerConfig,
    /// Process table defaults.
    pub processes: ProcessConfig,
}

/// Settings for the periodic sampler and the history it feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Time between ticks in milliseconds.
    pub interval_ms: u64,
    /// Samples kept per metric.
    pub capacity: usize,
    /// Metrics read on every tick.
    pub metrics: Vec<Metric>,
    /// Filesystem whose usage backs the `disk` metric.
    pub disk_mount: PathBuf,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            capacity:    60, // one minute at 1 s, two at the default 2 s
            metrics:     vec![Metric::Cpu, Metric::Memory, Metric::Disk],
            disk_mount:  PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Default ordering of the process table.
    pub sort: SortKey,
    /// Rows per page.
    pub page_size: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            sort:      SortKey::Cpu,
            page_size: 20,
        }
    }
}
