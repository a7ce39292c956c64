use crate::sample::{Metric, Reading, Sample};
use std::collections::{BTreeMap, VecDeque};

/// Rolling, per-metric history of samples, oldest first.
///
/// Every sequence holds at most `capacity` samples; recording into a full
/// sequence evicts its oldest entry. Insertion order is chronological order.
#[derive(Debug, Clone)]
pub struct History {
    series:   BTreeMap<Metric, VecDeque<Sample>>,
    capacity: usize,
}

impl History {
    /// Create an empty history. A capacity of `0` is treated as `1`.
    pub fn new(capacity: usize) -> Self {
        Self {
            series:   BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one sample per metric present in `reading`.
    ///
    /// Metrics missing from the reading keep their existing samples.
    pub fn record(&mut self, reading: &Reading) {
        for sample in reading.samples() {
            self.push(sample);
        }
    }

    /// Push a single sample, evicting the oldest if at capacity.
    pub fn push(&mut self, sample: Sample) {
        let capacity = self.capacity;
        let samples = self
            .series
            .entry(sample.metric())
            .or_insert_with(|| VecDeque::with_capacity(capacity));

        if samples.len() == capacity {
            samples.pop_front();
        }
        samples.push_back(sample);
    }

    /// Read-only copy of the samples for `metric`, oldest first.
    pub fn snapshot(&self, metric: Metric) -> Vec<Sample> {
        self.series
            .get(&metric)
            .map(|samples| samples.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Just the values for `metric`, oldest first.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.series
            .get(&metric)
            .map(|samples| samples.iter().map(Sample::value).collect())
            .unwrap_or_default()
    }

    pub fn latest(&self, metric: Metric) -> Option<&Sample> {
        self.series.get(&metric).and_then(VecDeque::back)
    }

    pub fn len(&self, metric: Metric) -> usize {
        self.series.get(&metric).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(VecDeque::is_empty)
    }

    /// Metrics that have at least one recorded sample.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.series
            .iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(&metric, _)| metric)
    }

    /// Average of all samples in the window.
    pub fn average(&self, metric: Metric) -> Option<f64> {
        let samples = self.series.get(&metric)?;
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().map(Sample::value).sum::<f64>() / samples.len() as f64)
    }

    pub fn min(&self, metric: Metric) -> Option<f64> {
        self.series
            .get(&metric)?
            .iter()
            .map(Sample::value)
            .reduce(f64::min)
    }

    pub fn max(&self, metric: Metric) -> Option<f64> {
        self.series
            .get(&metric)?
            .iter()
            .map(Sample::value)
            .reduce(f64::max)
    }

    /// Change the window size. Shrinking drops the oldest samples first.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        for samples in self.series.values_mut() {
            let excess = samples.len().saturating_sub(capacity);
            samples.drain(..excess);
        }
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }
}
