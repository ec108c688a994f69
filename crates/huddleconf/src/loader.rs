//! Config file discovery, layered loading, and environment variable overlay.

use crate::{ConfigError, HuddleConfig};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// One config file as written: only the keys it actually sets.
///
/// Keeping every field optional lets a later file restore a default value
/// that an earlier file changed.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    client: ClientLayer,
    #[serde(default)]
    telemetry: TelemetryLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClientLayer {
    endpoint: Option<String>,
    connect_timeout_ms: Option<u64>,
    lazy_connect: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TelemetryLayer {
    log_level: Option<String>,
    otlp_endpoint: Option<String>,
}

impl ConfigLayer {
    /// Write every key this layer sets onto `config`.
    pub fn apply_to(self, config: &mut HuddleConfig) {
        if let Some(v) = self.client.endpoint {
            config.client.endpoint = v;
        }
        if let Some(v) = self.client.connect_timeout_ms {
            config.client.connect_timeout_ms = v;
        }
        if let Some(v) = self.client.lazy_connect {
            config.client.lazy_connect = v;
        }
        if let Some(v) = self.telemetry.log_level {
            config.telemetry.log_level = v;
        }
        if let Some(v) = self.telemetry.otlp_endpoint {
            config.telemetry.otlp_endpoint = v;
        }
    }
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided and exists, it replaces the local override.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/huddle/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("huddle/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        let path = expand_path(&path.to_string_lossy());
        if path.exists() {
            files.push(path);
            return files;
        }
    }

    let local = PathBuf::from("huddle.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read and parse one config file.
pub fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_toml(&contents, path)
}

fn parse_toml(contents: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
    toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply environment variable overrides to config.
pub fn apply_env_overrides(config: &mut HuddleConfig, sources: &mut ConfigSources) {
    apply_overrides_from(config, sources, |key| env::var(key).ok());
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Later entries win, so `RUST_LOG` beats `HUDDLE_LOG_LEVEL` and
/// `OTEL_EXPORTER_OTLP_ENDPOINT` beats `HUDDLE_OTLP_ENDPOINT`.
pub fn apply_overrides_from<F>(config: &mut HuddleConfig, sources: &mut ConfigSources, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("HUDDLE_ENDPOINT") {
        config.client.endpoint = v;
        sources.env_overrides.push("HUDDLE_ENDPOINT".to_string());
    }
    if let Some(v) = lookup("HUDDLE_CONNECT_TIMEOUT_MS") {
        if let Ok(ms) = v.parse() {
            config.client.connect_timeout_ms = ms;
            sources.env_overrides.push("HUDDLE_CONNECT_TIMEOUT_MS".to_string());
        }
    }
    if let Some(v) = lookup("HUDDLE_LAZY_CONNECT") {
        if let Some(lazy) = parse_bool(&v) {
            config.client.lazy_connect = lazy;
            sources.env_overrides.push("HUDDLE_LAZY_CONNECT".to_string());
        }
    }

    if let Some(v) = lookup("HUDDLE_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("HUDDLE_LOG_LEVEL".to_string());
    }
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }
    if let Some(v) = lookup("HUDDLE_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = v;
        sources.env_overrides.push("HUDDLE_OTLP_ENDPOINT".to_string());
    }
    if let Some(v) = lookup("OTEL_EXPORTER_OTLP_ENDPOINT") {
        config.telemetry.otlp_endpoint = v;
        sources.env_overrides.push("OTEL_EXPORTER_OTLP_ENDPOINT".to_string());
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
