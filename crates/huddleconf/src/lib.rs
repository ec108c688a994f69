//! Configuration loading for the huddle session client.
//!
//! Every huddle crate reads its settings through this one, so it stays small
//! and depends on nothing else in the workspace.
//!
//! # Usage
//!
//! ```rust,no_run
//! use huddleconf::HuddleConfig;
//!
//! let config = HuddleConfig::load().expect("Failed to load config");
//! println!("session service: {}", config.client.endpoint);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/huddle/config.toml` (system)
//! 2. `~/.config/huddle/config.toml` (user)
//! 3. `./huddle.toml`, or the path given with `--config`
//! 4. Environment variables (`HUDDLE_*`, `RUST_LOG`, `OTEL_EXPORTER_OTLP_ENDPOINT`)
//!
//! # Example Config
//!
//! ```toml
//! [client]
//! endpoint = "http://sessions.local:50051"
//! connect_timeout_ms = 5000
//! lazy_connect = false
//!
//! [telemetry]
//! log_level = "info,huddle=debug"
//! otlp_endpoint = "127.0.0.1:4317"
//! ```

pub mod loader;
pub mod settings;

pub use loader::{discover_config_files_with_override, ConfigLayer, ConfigSources};
pub use settings::{ClientConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Complete huddle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HuddleConfig {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl HuddleConfig {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration with an explicit file taking the place of `./huddle.toml`.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from all sources and report where values came from.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = HuddleConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&path)?.apply_to(&mut config);
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources);

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# huddle configuration\n\n");

        output.push_str("[client]\n");
        output.push_str(&format!("endpoint = \"{}\"\n", self.client.endpoint));
        output.push_str(&format!(
            "connect_timeout_ms = {}\n",
            self.client.connect_timeout_ms
        ));
        output.push_str(&format!("lazy_connect = {}\n", self.client.lazy_connect));

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = \"{}\"\n", self.telemetry.log_level));
        output.push_str(&format!(
            "otlp_endpoint = \"{}\"\n",
            self.telemetry.otlp_endpoint
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HuddleConfig::default();
        assert_eq!(config.client.endpoint, "http://127.0.0.1:50051");
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_to_toml_round_trips_through_loader() {
        let mut config = HuddleConfig::default();
        config.client.endpoint = "http://sessions:7000".to_string();
        config.client.lazy_connect = true;
        config.telemetry.otlp_endpoint = "collector:4317".to_string();

        let rendered = config.to_toml();
        assert!(rendered.contains("[client]"));
        assert!(rendered.contains("[telemetry]"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(rendered.as_bytes()).unwrap();

        let mut reloaded = HuddleConfig::default();
        loader::load_from_file(file.path())
            .unwrap()
            .apply_to(&mut reloaded);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_explicit_file_is_listed_in_sources() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nconnect_timeout_ms = 750").unwrap();

        let (config, sources) = HuddleConfig::load_with_sources_from(Some(file.path())).unwrap();

        assert!(sources.files.iter().any(|p| p == file.path()));
        // Env may still override, but only if the variable is set
        if std::env::var("HUDDLE_CONNECT_TIMEOUT_MS").is_err() {
            assert_eq!(config.client.connect_timeout_ms, 750);
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = loader::load_from_file(Path::new("/nonexistent/huddle.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
