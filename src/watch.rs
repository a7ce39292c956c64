//! The `watch` loop: one task that owns the sampler and the history.
//!
//! Every tick samples synchronously and records into the [`History`]; no
//! other task ever touches it.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use vigil_config::{ConfigWatcher, SamplerConfig, VigilConfig};
use vigil_core::{History, Message, Reading};
use vigil_system::{MetricSource, Sampler, SysinfoSource};

use crate::{cli::WatchArgs, render};

/// Sampler plus the history it feeds.
pub struct Dashboard<S> {
    sampler: Sampler<S>,
    history: History,
    /// Effective sampler settings (file values with CLI flags applied).
    config:  SamplerConfig,
    ticks:   u64,
}

impl<S: MetricSource> Dashboard<S> {
    pub fn new(source: S, config: &SamplerConfig) -> Self {
        Self {
            sampler: Sampler::new(source, config.metrics.iter().copied()),
            history: History::new(config.capacity),
            config:  config.clone(),
            ticks:   0,
        }
    }

    /// Take one sample and record it.
    pub fn tick(&mut self) -> Reading {
        let reading = self.sampler.sample();
        self.history.record(&reading);
        self.ticks += 1;
        reading
    }

    /// Adopt new capacity and metric set; returns `true` if anything changed.
    pub fn reconfigure(&mut self, config: &SamplerConfig) -> bool {
        let mut changed = false;
        if config.capacity != self.history.capacity() {
            info!(from = self.history.capacity(), to = config.capacity, "history capacity changed");
            self.history.set_capacity(config.capacity);
            changed = true;
        }
        if config.metrics != self.sampler.metrics() {
            info!(metrics = ?config.metrics, "tracked metrics changed");
            self.sampler.set_metrics(config.metrics.iter().copied());
            changed = true;
        }
        changed
    }

    /// Handle a re-read config file.
    ///
    /// A file that failed to load or validate is logged and ignored. CLI
    /// flags in `args` are re-applied on top of the fresh values. Returns
    /// the new tick interval when it changed, so the caller can rebuild
    /// its ticker.
    pub fn on_reload(
        &mut self,
        fresh: vigil_core::Result<VigilConfig>,
        args: &WatchArgs,
    ) -> Option<u64> {
        let mut fresh = match fresh {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!("Keeping previous config: {e}");
                return None;
            }
        };
        args.apply(&mut fresh);
        if let Err(e) = vigil_config::validate(&fresh) {
            warn!("Keeping previous config: {e}");
            return None;
        }

        let fresh = fresh.sampler;
        self.reconfigure(&fresh);
        if fresh.disk_mount != self.config.disk_mount {
            warn!("disk_mount changes take effect after restart");
        }

        let interval = (fresh.interval_ms != self.config.interval_ms).then_some(fresh.interval_ms);
        if let Some(interval_ms) = interval {
            info!(interval_ms, "sampling interval changed");
        }
        self.config = SamplerConfig {
            disk_mount: self.config.disk_mount.clone(),
            ..fresh
        };
        interval
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn sampler(&self) -> &Sampler<S> {
        &self.sampler
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn ticker(interval_ms: u64) -> Interval {
    let mut ticker = time::interval(Duration::from_millis(interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run until Ctrl-C or until `args.ticks` samples have been taken.
pub async fn run(config_path: PathBuf, mut config: VigilConfig, args: WatchArgs) -> Result<()> {
    args.apply(&mut config);
    vigil_config::validate(&config).context("invalid sampler settings")?;

    let source = SysinfoSource::new(config.sampler.disk_mount.clone());
    let mut dashboard = Dashboard::new(source, &config.sampler);
    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);
    let mut ticker = ticker(config.sampler.interval_ms);

    info!(
        interval_ms = config.sampler.interval_ms,
        capacity = config.sampler.capacity,
        metrics = ?config.sampler.metrics,
        "sampling started"
    );

    loop {
        let message = tokio::select! {
            _ = ticker.tick() => Message::Tick,
            Some(()) = reloads.recv() => Message::ConfigReloaded,
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
        };
        debug!(?message, "watch loop");

        match message {
            Message::Tick => {
                let reading = dashboard.tick();
                if args.json {
                    println!("{}", serde_json::to_string(&reading)?);
                } else {
                    print!(
                        "{}",
                        render::tick(&reading, dashboard.history(), dashboard.sampler().metrics())
                    );
                }
                if args.ticks.is_some_and(|max| dashboard.ticks() >= max) {
                    break;
                }
            }
            Message::ConfigReloaded => {
                if let Some(interval_ms) =
                    dashboard.on_reload(vigil_config::load(&config_path), &args)
                {
                    ticker = self::ticker(interval_ms);
                }
            }
            Message::Shutdown => break,
        }
    }

    info!(ticks = dashboard.ticks(), "sampling stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vigil_core::{Metric, VigilError};

    /// Yields a counter per metric; metrics listed in `failing` always error.
    #[derive(Default)]
    struct CountingSource {
        counts:  HashMap<Metric, f64>,
        failing: Vec<Metric>,
    }

    impl MetricSource for CountingSource {
        fn read(&mut self, metric: Metric) -> vigil_core::Result<f64> {
            if self.failing.contains(&metric) {
                return Err(VigilError::Unavailable(metric));
            }
            let count = self.counts.entry(metric).or_insert(0.0);
            *count += 1.0;
            Ok(*count)
        }
    }

    fn sampler_config(capacity: usize, metrics: &[Metric]) -> SamplerConfig {
        SamplerConfig {
            capacity,
            metrics: metrics.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn history_holds_last_capacity_ticks() {
        let config = sampler_config(3, &[Metric::Cpu]);
        let mut dashboard = Dashboard::new(CountingSource::default(), &config);

        for _ in 0..4 {
            dashboard.tick();
        }

        assert_eq!(dashboard.ticks(), 4);
        assert_eq!(dashboard.history().values(Metric::Cpu), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn failing_metric_does_not_disturb_others() {
        let config = sampler_config(10, &[Metric::Cpu, Metric::Disk]);
        let source = CountingSource {
            failing: vec![Metric::Disk],
            ..Default::default()
        };
        let mut dashboard = Dashboard::new(source, &config);

        let reading = dashboard.tick();
        assert_eq!(reading.get(Metric::Cpu), Some(1.0));
        assert!(dashboard.history().snapshot(Metric::Disk).is_empty());
    }

    #[test]
    fn reconfigure_shrinks_history_and_swaps_metrics() {
        let mut dashboard =
            Dashboard::new(CountingSource::default(), &sampler_config(5, &[Metric::Cpu]));
        for _ in 0..5 {
            dashboard.tick();
        }

        let next = sampler_config(2, &[Metric::Cpu, Metric::Memory]);
        assert!(dashboard.reconfigure(&next));
        assert!(!dashboard.reconfigure(&next));

        assert_eq!(dashboard.history().values(Metric::Cpu), vec![4.0, 5.0]);
        dashboard.tick();
        assert_eq!(dashboard.history().len(Metric::Memory), 1);
        assert_eq!(dashboard.history().values(Metric::Cpu), vec![5.0, 6.0]);
    }

    fn file_config(raw: &str) -> vigil_core::Result<VigilConfig> {
        vigil_config::parse(raw)
    }

    #[test]
    fn reload_ignores_invalid_file() {
        let mut dashboard =
            Dashboard::new(CountingSource::default(), &sampler_config(3, &[Metric::Cpu]));
        let args = WatchArgs::default();

        assert_eq!(dashboard.on_reload(file_config("[sampler\ncapacity ="), &args), None);
        assert_eq!(dashboard.on_reload(file_config("[sampler]\ncapacity = 0"), &args), None);

        // Also rejected when it reaches the dashboard unvalidated.
        let mut zero = VigilConfig::default();
        zero.sampler.capacity = 0;
        assert_eq!(dashboard.on_reload(Ok(zero), &args), None);

        assert_eq!(dashboard.history().capacity(), 3);
        assert_eq!(dashboard.config().capacity, 3);
        assert_eq!(dashboard.sampler().metrics(), &[Metric::Cpu]);
    }

    #[test]
    fn reload_keeps_cli_flags() {
        let args = WatchArgs {
            capacity: Some(2),
            metrics: vec![Metric::Memory],
            ..Default::default()
        };
        let mut start = VigilConfig::default();
        args.apply(&mut start);
        let mut dashboard = Dashboard::new(CountingSource::default(), &start.sampler);

        let fresh = file_config("[sampler]\ncapacity = 10\nmetrics = [\"cpu\", \"disk\"]");
        dashboard.on_reload(fresh, &args);

        assert_eq!(dashboard.history().capacity(), 2);
        assert_eq!(dashboard.sampler().metrics(), &[Metric::Memory]);
    }

    #[test]
    fn reloaded_capacity_applies_on_next_tick() {
        let mut dashboard =
            Dashboard::new(CountingSource::default(), &sampler_config(2, &[Metric::Cpu]));
        for _ in 0..3 {
            dashboard.tick();
        }
        assert_eq!(dashboard.history().values(Metric::Cpu), vec![2.0, 3.0]);

        let fresh = file_config("[sampler]\ncapacity = 4\nmetrics = [\"cpu\"]");
        assert_eq!(dashboard.on_reload(fresh, &WatchArgs::default()), None);
        assert_eq!(dashboard.config().capacity, 4);

        for _ in 0..3 {
            dashboard.tick();
        }
        assert_eq!(dashboard.history().values(Metric::Cpu), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn reload_reports_only_a_changed_interval() {
        let mut dashboard =
            Dashboard::new(CountingSource::default(), &sampler_config(3, &[Metric::Cpu]));
        let args = WatchArgs::default();
        let same = "[sampler]\ninterval_ms = 2000\ncapacity = 3\nmetrics = [\"cpu\"]";
        let faster = "[sampler]\ninterval_ms = 500\ncapacity = 3\nmetrics = [\"cpu\"]";

        assert_eq!(dashboard.on_reload(file_config(same), &args), None);
        assert_eq!(dashboard.on_reload(file_config(faster), &args), Some(500));
        assert_eq!(dashboard.config().interval_ms, 500);
        assert_eq!(dashboard.on_reload(file_config(faster), &args), None);

        // A CLI interval pins the ticker whatever the file says.
        let pinned = WatchArgs {
            interval_ms: Some(500),
            ..Default::default()
        };
        assert_eq!(dashboard.on_reload(file_config(same), &pinned), None);
    }
}
