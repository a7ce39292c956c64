use tracing::{trace, warn};
use vigil_core::{Metric, Reading, Result};

/// Something that can produce instantaneous values for [`Metric`]s.
///
/// `refresh` is called once at the start of every tick, then `read` once per
/// tracked metric. A failing `read` only affects that metric for that tick.
pub trait MetricSource {
    /// Pull fresh data from the OS. Default is a no-op.
    fn refresh(&mut self) {}

    /// Current value of `metric`.
    fn read(&mut self, metric: Metric) -> Result<f64>;
}

/// Reads a fixed set of metrics from a [`MetricSource`] once per tick.
#[derive(Debug)]
pub struct Sampler<S> {
    source:  S,
    metrics: Vec<Metric>,
}

impl<S: MetricSource> Sampler<S> {
    /// Track `metrics` (duplicates are ignored, order is kept).
    pub fn new(source: S, metrics: impl IntoIterator<Item = Metric>) -> Self {
        let mut sampler = Self { source, metrics: Vec::new() };
        sampler.set_metrics(metrics);
        sampler
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Replace the tracked set; takes effect on the next tick.
    pub fn set_metrics(&mut self, metrics: impl IntoIterator<Item = Metric>) {
        self.metrics.clear();
        for metric in metrics {
            if !self.metrics.contains(&metric) {
                self.metrics.push(metric);
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Take one sample of every tracked metric.
    ///
    /// Metrics whose read fails (or yields a non-finite number) are logged
    /// and left out of the returned reading. There are no retries; the
    /// next tick simply tries again.
    pub fn sample(&mut self) -> Reading {
        self.source.refresh();

        let mut reading = Reading::now();
        for &metric in &self.metrics {
            match self.source.read(metric) {
                Ok(value) if value.is_finite() => {
                    trace!(%metric, value, "sampled");
                    reading.insert(metric, value);
                }
                Ok(value) => warn!(%metric, value, "discarding non-finite reading"),
                Err(e) => warn!(%metric, error = %e, "metric read failed; skipping this tick"),
            }
        }
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use vigil_core::{History, VigilError};

    /// Replays a scripted sequence of results per metric.
    #[derive(Default)]
    struct ScriptedSource {
        script:    HashMap<Metric, VecDeque<Result<f64>>>,
        refreshes: usize,
    }

    impl ScriptedSource {
        fn with(mut self, metric: Metric, results: Vec<Result<f64>>) -> Self {
            self.script.insert(metric, results.into());
            self
        }
    }

    impl MetricSource for ScriptedSource {
        fn refresh(&mut self) {
            self.refreshes += 1;
        }

        fn read(&mut self, metric: Metric) -> Result<f64> {
            self.script
                .get_mut(&metric)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Err(VigilError::Unavailable(metric)))
        }
    }

    #[test]
    fn failed_metric_is_omitted_others_reported() {
        let source = ScriptedSource::default()
            .with(Metric::Cpu, vec![Ok(12.0)])
            .with(Metric::Disk, vec![Err(VigilError::Unavailable(Metric::Disk))]);
        let mut sampler = Sampler::new(source, [Metric::Cpu, Metric::Disk]);

        let reading = sampler.sample();
        assert_eq!(reading.get(Metric::Cpu), Some(12.0));
        assert_eq!(reading.get(Metric::Disk), None);
        assert_eq!(reading.len(), 1);
    }

    #[test]
    fn refreshes_once_per_tick() {
        let mut sampler = Sampler::new(ScriptedSource::default(), [Metric::Cpu, Metric::Memory]);
        sampler.sample();
        sampler.sample();
        assert_eq!(sampler.source().refreshes, 2);
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let source = ScriptedSource::default()
            .with(Metric::NetRx, vec![Ok(f64::NAN)])
            .with(Metric::NetTx, vec![Ok(f64::INFINITY)]);
        let mut sampler = Sampler::new(source, [Metric::NetRx, Metric::NetTx]);

        assert!(sampler.sample().is_empty());
    }

    #[test]
    fn duplicate_metrics_are_tracked_once() {
        let sampler = Sampler::new(
            ScriptedSource::default(),
            [Metric::Cpu, Metric::Disk, Metric::Cpu],
        );
        assert_eq!(sampler.metrics(), &[Metric::Cpu, Metric::Disk]);
    }

    #[test]
    fn failure_on_later_tick_keeps_earlier_samples() {
        let source = ScriptedSource::default()
            .with(Metric::Cpu, vec![Ok(10.0), Ok(20.0)])
            .with(
                Metric::Disk,
                vec![Ok(55.0), Err(VigilError::System("statvfs failed".into()))],
            );
        let mut sampler = Sampler::new(source, [Metric::Cpu, Metric::Disk]);
        let mut history = History::new(60);

        history.record(&sampler.sample());
        history.record(&sampler.sample());

        assert_eq!(history.len(Metric::Cpu), 2);
        assert_eq!(history.len(Metric::Disk), 1);
        assert_eq!(history.values(Metric::Cpu), vec![10.0, 20.0]);
        assert_eq!(history.values(Metric::Disk), vec![55.0]);
    }
}
