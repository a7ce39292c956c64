use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sysinfo::{Networks, System};
use vigil_core::{Metric, Result, VigilError};

use crate::{battery, disk, sampler::MetricSource};

/// [`MetricSource`] backed by `sysinfo` (plus sysfs for the battery).
pub struct SysinfoSource {
    sys:          System,
    networks:     Networks,
    disk_mount:   PathBuf,
    battery_root: PathBuf,
    last_refresh: Option<Instant>,
    /// Time covered by the current network counters.
    net_window:   Option<Duration>,
    /// When CPU usage was last refreshed.
    cpu_refreshed_at: Instant,
    /// `false` when this tick came too soon after the previous CPU refresh.
    cpu_fresh:        bool,
}

impl SysinfoSource {
    /// `disk_mount` selects the filesystem reported as [`Metric::Disk`].
    pub fn new(disk_mount: impl Into<PathBuf>) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        Self {
            sys,
            networks:     Networks::new_with_refreshed_list(),
            disk_mount:   disk_mount.into(),
            battery_root: PathBuf::from(battery::SYSFS_POWER_SUPPLY),
            last_refresh: None,
            net_window:   None,
            cpu_refreshed_at: Instant::now(),
            cpu_fresh:        false,
        }
    }

    pub fn disk_mount(&self) -> &Path {
        &self.disk_mount
    }

    fn cpu(&self) -> Result<f64> {
        let cpus = self.sys.cpus();
        if !self.cpu_fresh || cpus.is_empty() {
            return Err(VigilError::Unavailable(Metric::Cpu));
        }
        let total: f64 = cpus.iter().map(|c| f64::from(c.cpu_usage())).sum();
        Ok(total / cpus.len() as f64)
    }

    fn disk(&self) -> Result<f64> {
        let disks = disk::list_disks();
        disk::find_mount(&disks, &self.disk_mount)
            .map(|d| d.percent())
            .ok_or(VigilError::Unavailable(Metric::Disk))
    }

    /// Bytes/second over the last refresh window, summed over interfaces.
    fn network(&self, metric: Metric) -> Result<f64> {
        let secs = self
            .net_window
            .map(|w| w.as_secs_f64())
            .filter(|&s| s > 0.0)
            .ok_or(VigilError::Unavailable(metric))?;

        // `received()` / `transmitted()` are deltas since the last refresh.
        let bytes: u64 = self
            .networks
            .iter()
            .map(|(_, data)| match metric {
                Metric::NetRx => data.received(),
                _ => data.transmitted(),
            })
            .sum();
        Ok(bytes as f64 / secs)
    }
}

impl MetricSource for SysinfoSource {
    fn refresh(&mut self) {
        let now = Instant::now();

        // Usage computed over a shorter window than this is meaningless, so
        // skip the CPU refresh and report the metric unavailable this tick.
        self.cpu_fresh =
            now.duration_since(self.cpu_refreshed_at) >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL;
        if self.cpu_fresh {
            self.sys.refresh_cpu_usage();
            self.cpu_refreshed_at = now;
        }

        self.sys.refresh_memory();
        self.networks.refresh(false); // false = keep existing interfaces list

        self.net_window = self.last_refresh.map(|then| now.duration_since(then));
        self.last_refresh = Some(now);
    }

    fn read(&mut self, metric: Metric) -> Result<f64> {
        match metric {
            Metric::Cpu => self.cpu(),
            Metric::Memory => ratio(self.sys.used_memory(), self.sys.total_memory(), metric),
            Metric::Swap => ratio(self.sys.used_swap(), self.sys.total_swap(), metric),
            Metric::Disk => self.disk(),
            Metric::NetRx | Metric::NetTx => self.network(metric),
            Metric::Battery => battery::read_battery_from(&self.battery_root)
                .map(|b| f64::from(b.percent))
                .ok_or(VigilError::Unavailable(metric)),
        }
    }
}

fn ratio(used: u64, total: u64, metric: Metric) -> Result<f64> {
    if total == 0 {
        return Err(VigilError::Unavailable(metric));
    }
    Ok(used as f64 / total as f64 * 100.0)
}
