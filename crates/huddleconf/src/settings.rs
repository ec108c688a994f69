//! Settings sections - what the client connects to and how it reports.

use serde::{Deserialize, Serialize};

/// Connection settings for the remote session service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Session service address. Bare `host:port` gets an `http://` scheme.
    /// Default: http://127.0.0.1:50051
    #[serde(default = "ClientConfig::default_endpoint")]
    pub endpoint: String,

    /// Upper bound on establishing the transport connection.
    /// Default: 5000
    #[serde(default = "ClientConfig::default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Defer connecting until the first call instead of failing construction.
    /// Default: false
    #[serde(default)]
    pub lazy_connect: bool,
}

impl ClientConfig {
    fn default_endpoint() -> String {
        "http://127.0.0.1:50051".to_string()
    }

    fn default_connect_timeout_ms() -> u64 {
        5000
    }

    /// Settings for a specific endpoint with every other field defaulted.
    pub fn for_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Self::default()
        }
    }

    pub fn with_lazy_connect(mut self, lazy: bool) -> Self {
        self.lazy_connect = lazy;
        self
    }

    pub fn with_connect_timeout(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            connect_timeout_ms: Self::default_connect_timeout_ms(),
            lazy_connect: false,
        }
    }
}

/// Logging and OpenTelemetry export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter directive (trace, debug, info, warn, error, or an EnvFilter string).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,

    /// OTLP gRPC endpoint. Empty disables export.
    /// Default: ""
    #[serde(default)]
    pub otlp_endpoint: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }

    /// Whether spans and logs should be exported over OTLP.
    pub fn otlp_enabled(&self) -> bool {
        !self.otlp_endpoint.trim().is_empty()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            otlp_endpoint: String::new(),
        }
    }
}
