use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vigil_config::VigilConfig;
use vigil_core::{state::SortKey, Metric};

/// Terminal system monitor: rolling CPU/memory/disk history, processes, battery.
#[derive(Debug, Parser)]
#[command(name = "vigil", version)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/vigil/vigil.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sample metrics on a timer and print the rolling history.
    Watch(WatchArgs),
    /// Host, CPU, memory and disk summary.
    Overview {
        #[arg(long)]
        json: bool,
    },
    /// List processes.
    Processes(ProcessArgs),
    /// Ask a process to terminate.
    Kill {
        pid: u32,
    },
    /// Battery charge and time remaining.
    Battery {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct WatchArgs {
    /// Milliseconds between samples.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Samples kept per metric.
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Comma-separated metrics to track, e.g. `cpu,memory,net_rx`.
    #[arg(long, value_delimiter = ',')]
    pub metrics: Vec<Metric>,

    /// Stop after this many ticks (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ticks: Option<u64>,

    /// Print each tick as a JSON line.
    #[arg(long)]
    pub json: bool,
}

impl WatchArgs {
    /// Flags win over the config file, including after a live reload.
    pub fn apply(&self, config: &mut VigilConfig) {
        if let Some(interval_ms) = self.interval_ms {
            config.sampler.interval_ms = interval_ms;
        }
        if let Some(capacity) = self.capacity {
            config.sampler.capacity = capacity;
        }
        if !self.metrics.is_empty() {
            config.sampler.metrics = self.metrics.clone();
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ProcessArgs {
    /// cpu, memory, pid or name.
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Only processes whose name contains this (case-insensitive).
    #[arg(long, default_value = "")]
    pub filter: String,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_flags() {
        let cli = Cli::parse_from([
            "vigil", "watch", "--capacity", "3", "--metrics", "cpu,disk", "--ticks", "4",
        ]);
        let Command::Watch(args) = cli.command else {
            panic!("expected watch");
        };

        let mut config = VigilConfig::default();
        args.apply(&mut config);
        assert_eq!(config.sampler.capacity, 3);
        assert_eq!(config.sampler.metrics, vec![Metric::Cpu, Metric::Disk]);
        assert_eq!(config.sampler.interval_ms, 2_000);
        assert_eq!(args.ticks, Some(4));
    }

    #[test]
    fn rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["vigil", "watch", "--metrics", "gpu"]).is_err());
    }

    #[test]
    fn rejects_zero_ticks() {
        assert!(Cli::try_parse_from(["vigil", "watch", "--ticks", "0"]).is_err());
        assert!(Cli::try_parse_from(["vigil", "watch", "--ticks", "1"]).is_ok());
    }

    #[test]
    fn parses_process_sort() {
        let cli = Cli::parse_from(["vigil", "--config", "/tmp/v.toml", "processes", "--sort", "name"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/v.toml")));
        match cli.command {
            Command::Processes(args) => {
                assert_eq!(args.sort, Some(SortKey::Name));
                assert_eq!(args.page, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
