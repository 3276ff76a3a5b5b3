//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a network test node.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Root configuration for a network test node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NetworkTestConfig {
    /// Destinations and probe settings.
    pub check: CheckConfig,

    /// Echo responder settings.
    pub server: ServerConfig,

    /// Outcome consumers.
    pub observers: ObserversConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Probe scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Host names (or literal addresses) to probe.
    pub hosts: Vec<String>,

    /// Port probed on every host. The local echo responder listens here too.
    pub port: u16,

    /// Interval between ticks in milliseconds.
    pub interval_ms: u64,

    /// Hard per-probe timeout in milliseconds.
    pub timeout_ms: u64,

    /// Resolve host names to an IP address once at startup.
    pub resolve: bool,

    /// Name reported as the origin of every probe.
    pub source: Option<String>,

    /// Allow the probe client to keep idle connections between probes.
    pub reuse_connections: bool,

    /// Capacity of the bus inbox and of every observer channel.
    pub channel_capacity: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            port: 8090,
            interval_ms: 1000,
            timeout_ms: 10_000,
            resolve: false,
            source: None,
            reuse_connections: false,
            channel_capacity: 1024,
        }
    }
}

impl CheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name used to label the probe origin.
    ///
    /// Falls back to the machine's hostname, then to `"me"`.
    pub fn source_name(&self) -> String {
        pick_source(self.source.as_deref(), sysinfo::System::host_name)
    }
}

fn pick_source(configured: Option<&str>, hostname: impl FnOnce() -> Option<String>) -> String {
    configured
        .filter(|name| !name.trim().is_empty())
        .map(str::to_string)
        .or_else(|| hostname().filter(|h| !h.trim().is_empty()))
        .unwrap_or_else(|| "me".to_string())
}

/// Echo responder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Run the echo responder on `check.port`.
    pub enabled: bool,

    /// Log every request the responder handles.
    pub log_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_requests: false,
        }
    }
}

/// Observer configuration. Each observer is independently enabled.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObserversConfig {
    pub verbose: VerboseConfig,
    pub summary: SummaryConfig,
    pub file: FileConfig,
    pub metrics: MetricsConfig,
}

/// One log line per outcome.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerboseConfig {
    pub enabled: bool,
}

impl Default for VerboseConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Periodic per-destination failure counts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub enabled: bool,

    /// Minimum number of seconds between two summaries.
    pub interval_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 10,
        }
    }
}

/// Record layout used by the file observer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Fixed-width columns, one record per line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Append-only outcome file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    pub path: String,
    pub format: FileFormat,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "networktest.log".to_string(),
            format: FileFormat::Text,
        }
    }
}

/// Prometheus scrape endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,

    /// Metrics endpoint bind address.
    pub bind_address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: NetworkTestConfig = toml::from_str(
            r#"
            [check]
            hosts = ["a", "b"]
            "#,
        )
        .unwrap();

        assert_eq!(config.check.hosts, vec!["a", "b"]);
        assert_eq!(config.check.port, 8090);
        assert_eq!(config.check.interval(), Duration::from_secs(1));
        assert_eq!(config.check.timeout(), Duration::from_secs(10));
        assert!(!config.check.reuse_connections);
        assert!(config.server.enabled);
        assert!(config.observers.verbose.enabled);
        assert!(!config.observers.file.enabled);
    }

    #[test]
    fn test_file_format_parses_lowercase() {
        let config: NetworkTestConfig = toml::from_str(
            r#"
            [observers.file]
            enabled = true
            path = "/tmp/out.jsonl"
            format = "json"
            "#,
        )
        .unwrap();

        assert!(config.observers.file.enabled);
        assert_eq!(config.observers.file.format, FileFormat::Json);
    }

    #[test]
    fn test_configured_source_wins() {
        let check = CheckConfig {
            source: Some("node-1".into()),
            ..CheckConfig::default()
        };
        assert_eq!(check.source_name(), "node-1");
    }

    #[test]
    fn test_source_falls_back_to_hostname_then_me() {
        assert_eq!(pick_source(None, || Some("vm".into())), "vm");
        assert_eq!(pick_source(Some("  "), || Some("vm".into())), "vm");
        assert_eq!(pick_source(None, || None), "me");
        assert_eq!(pick_source(None, || Some(String::new())), "me");
        assert_eq!(pick_source(Some("node-1"), || Some("vm".into())), "node-1");
    }

    #[test]
    fn test_unconfigured_source_uses_system_hostname() {
        let expected = sysinfo::System::host_name()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| "me".to_string());
        assert_eq!(CheckConfig::default().source_name(), expected);
    }
}
