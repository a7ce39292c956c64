use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::VigilError;

/// A system metric the sampler knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Average CPU usage across all cores (%).
    Cpu,
    /// RAM in use (%).
    Memory,
    /// Swap in use (%).
    Swap,
    /// Space used on the configured mount point (%).
    Disk,
    /// Network receive rate summed over interfaces (bytes/second).
    NetRx,
    /// Network transmit rate summed over interfaces (bytes/second).
    NetTx,
    /// Battery charge (%).
    Battery,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Cpu,
        Metric::Memory,
        Metric::Swap,
        Metric::Disk,
        Metric::NetRx,
        Metric::NetTx,
        Metric::Battery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Swap => "swap",
            Metric::Disk => "disk",
            Metric::NetRx => "net_rx",
            Metric::NetTx => "net_tx",
            Metric::Battery => "battery",
        }
    }

    /// Unit suffix used when displaying a value of this metric.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::NetRx | Metric::NetTx => "B/s",
            _ => "%",
        }
    }

    /// `true` for metrics bounded to `[0, 100]`.
    pub fn is_percentage(self) -> bool {
        self.unit() == "%"
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VigilError::Config(format!("unknown metric '{s}'")))
    }
}

/// One timestamped metric reading. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    timestamp: DateTime<Local>,
    metric: Metric,
    value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Local>, metric: Metric, value: f64) -> Self {
        Self { timestamp, metric, value }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Everything one sampler tick produced.
///
/// Metrics whose read failed are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Local>,
    pub values: BTreeMap<Metric, f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// Build a reading stamped with the current local time.
    pub fn now() -> Self {
        Self::new(Local::now())
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Expand into one [`Sample`] per metric, sharing the tick timestamp.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.values
            .iter()
            .map(|(&metric, &value)| Sample::new(self.timestamp, metric, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("CPU".parse::<Metric>().unwrap(), Metric::Cpu);
        assert_eq!(" net_rx ".parse::<Metric>().unwrap(), Metric::NetRx);
        assert!("gpu".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_display_matches_serde_name() {
        for metric in Metric::ALL {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json.trim_matches('"'), metric.to_string());
        }
    }

    #[test]
    fn network_metrics_are_rates() {
        assert_eq!(Metric::NetTx.unit(), "B/s");
        assert!(!Metric::NetRx.is_percentage());
        assert!(Metric::Battery.is_percentage());
    }

    #[test]
    fn reading_samples_share_timestamp() {
        let reading = Reading::now().with(Metric::Cpu, 12.5).with(Metric::Disk, 40.0);
        let samples: Vec<Sample> = reading.samples().collect();

        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.timestamp() == reading.timestamp));
        assert_eq!(samples[0].metric(), Metric::Cpu);
        assert_eq!(samples[1].value(), 40.0);
    }
}
