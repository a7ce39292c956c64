pub mod schema;
pub mod watcher;

pub use schema::{ProcessConfig, SamplerConfig, VigilConfig, MIN_INTERVAL_MS};
pub use watcher::ConfigWatcher;

use std::path::{Path, PathBuf};
use vigil_core::{Result, VigilError};

/// Load configuration from a TOML file.  Returns `VigilConfig::default()` if
/// the file doesn't exist so the monitor always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<VigilConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(VigilConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| VigilError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<VigilConfig> {
    let config: VigilConfig =
        toml::from_str(raw).map_err(|e| VigilError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject values the sampler cannot run with.
pub fn validate(config: &VigilConfig) -> Result<()> {
    let sampler = &config.sampler;
    if sampler.capacity == 0 {
        return Err(VigilError::Config("sampler.capacity must be at least 1".into()));
    }
    if sampler.interval_ms < MIN_INTERVAL_MS {
        return Err(VigilError::Config(format!(
            "sampler.interval_ms must be at least {MIN_INTERVAL_MS}"
        )));
    }
    if sampler.metrics.is_empty() {
        return Err(VigilError::Config("sampler.metrics must not be empty".into()));
    }
    if config.processes.page_size == 0 {
        return Err(VigilError::Config("processes.page_size must be at least 1".into()));
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vigil").join("vigil.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vigil_core::{state::SortKey, Metric};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, VigilConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[sampler]
capacity = 3
metrics = ["cpu", "net_rx", "battery"]

[processes]
sort = "name"
"#
        )
        .unwrap();

        let config = load(file.path()).unwrap();
        assert_eq!(config.sampler.capacity, 3);
        assert_eq!(config.sampler.interval_ms, 2_000);
        assert_eq!(
            config.sampler.metrics,
            vec![Metric::Cpu, Metric::NetRx, Metric::Battery]
        );
        assert_eq!(config.processes.sort, SortKey::Name);
        assert_eq!(config.processes.page_size, 20);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = parse("[sampler]\ncapacity = 0\n").unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn rejects_tiny_interval() {
        assert!(parse("[sampler]\ninterval_ms = 10\n").is_err());
    }

    #[test]
    fn rejects_unknown_metric() {
        let err = parse("[sampler]\nmetrics = [\"gpu\"]\n").unwrap_err();
        assert!(matches!(err, VigilError::Config(_)));
    }

    #[test]
    fn rejects_empty_metrics() {
        assert!(parse("[sampler]\nmetrics = []\n").is_err());
    }

    #[test]
    fn default_path_ends_with_vigil_toml() {
        assert!(default_path().ends_with("vigil/vigil.toml"));
    }
}
