use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use wordfreq_core::{
    ChunkPolicy, PolicyError, DEFAULT_INITIAL_CHUNK, DEFAULT_MAX_CHUNK, DEFAULT_MIN_CHUNK,
    DEFAULT_TARGET_LATENCY,
};
use wordfreq_logging::{analytics_info, analytics_warn};

use super::cli::Cli;

pub const DEFAULT_CONFIG_FILENAME: &str = "wordfreq.ron";

/// How the host hands control back to a run after each merged chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
pub enum YieldMode {
    /// Resume once the host has drained its pending messages.
    #[default]
    Idle,
    /// Requeue the resume right away, behind whatever is already pending.
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChunkSettings {
    pub initial_chunk: usize,
    pub min_chunk: usize,
    pub max_chunk: usize,
    pub target_latency_ms: u64,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            initial_chunk: DEFAULT_INITIAL_CHUNK,
            min_chunk: DEFAULT_MIN_CHUNK,
            max_chunk: DEFAULT_MAX_CHUNK,
            target_latency_ms: DEFAULT_TARGET_LATENCY.as_millis() as u64,
        }
    }
}

impl ChunkSettings {
    pub fn to_policy(&self) -> Result<ChunkPolicy, PolicyError> {
        ChunkPolicy::new(
            self.initial_chunk,
            self.min_chunk,
            self.max_chunk,
            Duration::from_millis(self.target_latency_ms),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chunk: ChunkSettings,
    pub yield_mode: YieldMode,
}

impl AppConfig {
    /// CLI flags win over file values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(value) = cli.initial_chunk {
            self.chunk.initial_chunk = value;
        }
        if let Some(value) = cli.min_chunk {
            self.chunk.min_chunk = value;
        }
        if let Some(value) = cli.max_chunk {
            self.chunk.max_chunk = value;
        }
        if let Some(value) = cli.target_latency_ms {
            self.chunk.target_latency_ms = value;
        }
        if let Some(mode) = cli.yield_mode {
            self.yield_mode = mode;
        }
        self
    }
}

/// Loads the config named on the command line, or the default file.
///
/// An explicitly named file must load. The default file is optional and a
/// broken one only costs a warning.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    match explicit {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = ron::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            analytics_info!("Loaded config from {:?}", path);
            Ok(config)
        }
        None => Ok(load_default(Path::new(DEFAULT_CONFIG_FILENAME))),
    }
}

fn load_default(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            analytics_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            analytics_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            analytics_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "partial.ron",
            "(chunk: (min_chunk: 10, initial_chunk: 20), yield_mode: Immediate)",
        );

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.chunk.min_chunk, 10);
        assert_eq!(config.chunk.initial_chunk, 20);
        assert_eq!(config.chunk.max_chunk, DEFAULT_MAX_CHUNK);
        assert_eq!(config.yield_mode, YieldMode::Immediate);
    }

    #[test]
    fn explicit_missing_or_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load(Some(&dir.path().join("absent.ron"))).is_err());

        let broken = write(&dir, "broken.ron", "(chunk: [oops");
        assert!(load(Some(&broken)).is_err());
    }

    #[test]
    fn default_file_falls_back_quietly() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_default(&dir.path().join("absent.ron")), AppConfig::default());

        let broken = write(&dir, "wordfreq.ron", "not ron at all (");
        assert_eq!(load_default(&broken), AppConfig::default());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let cli = Cli::parse_from([
            "wordfreq",
            "--max-chunk",
            "64",
            "--target-latency-ms",
            "5",
            "--yield-mode",
            "immediate",
        ]);
        let config = AppConfig::default().with_overrides(&cli);
        assert_eq!(config.chunk.max_chunk, 64);
        assert_eq!(config.chunk.target_latency_ms, 5);
        assert_eq!(config.chunk.initial_chunk, DEFAULT_INITIAL_CHUNK);
        assert_eq!(config.yield_mode, YieldMode::Immediate);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let settings = ChunkSettings {
            initial_chunk: 5,
            min_chunk: 10,
            max_chunk: 20,
            target_latency_ms: 16,
        };
        assert!(settings.to_policy().is_err());
        assert!(ChunkSettings::default().to_policy().is_ok());
    }
}
