//! Command line interface.
//!
//! Flags override values from the optional config file; the merged result is
//! validated before anything starts.

use std::path::PathBuf;
use clap::{Parser, ValueEnum};

use crate::config::loader::read_config;
use crate::config::validation::validate_config;
use crate::config::{ConfigError, FileFormat, NetworkTestConfig};

/// Record layout for `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for FileFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => FileFormat::Text,
            OutputFormat::Json => FileFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "networktest")]
#[command(version, about = "Continuously check HTTP reachability between nodes", long_about = None)]
pub struct Cli {
    /// Hosts to probe.
    pub hosts: Vec<String>,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port probed on every host and served by the local echo responder.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Milliseconds between probe rounds.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Per-probe timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Resolve the hostnames to IPs in advance.
    #[arg(long)]
    pub resolve: bool,

    /// Name reported as the origin of every probe.
    #[arg(long)]
    pub source: Option<String>,

    /// Do not run the echo responder.
    #[arg(long)]
    pub no_server: bool,

    /// Log every request handled by the echo responder.
    #[arg(long)]
    pub log_server: bool,

    /// Do not log every outcome.
    #[arg(short, long)]
    pub quiet: bool,

    /// Log failure counts every SECS seconds.
    #[arg(long, value_name = "SECS")]
    pub summary: Option<u64>,

    /// Append one record per outcome to FILE.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Record layout for --output.
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Serve Prometheus metrics on ADDR.
    #[arg(long, value_name = "ADDR")]
    pub metrics: Option<String>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Build the validated configuration for this invocation.
    pub fn into_config(self) -> Result<NetworkTestConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => NetworkTestConfig::default(),
        };
        self.apply(&mut config);

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut NetworkTestConfig) {
        let check = &mut config.check;
        if !self.hosts.is_empty() {
            check.hosts = self.hosts;
        }
        if let Some(port) = self.port {
            check.port = port;
        }
        if let Some(interval) = self.interval_ms {
            check.interval_ms = interval;
        }
        if let Some(timeout) = self.timeout_ms {
            check.timeout_ms = timeout;
        }
        if self.resolve {
            check.resolve = true;
        }
        if self.source.is_some() {
            check.source = self.source;
        }

        if self.no_server {
            config.server.enabled = false;
        }
        if self.log_server {
            config.server.log_requests = true;
        }

        let observers = &mut config.observers;
        if self.quiet {
            observers.verbose.enabled = false;
        }
        if let Some(secs) = self.summary {
            observers.summary.enabled = true;
            observers.summary.interval_secs = secs;
        }
        if let Some(path) = self.output {
            observers.file.enabled = true;
            observers.file.path = path.display().to_string();
        }
        if let Some(format) = self.output_format {
            observers.file.format = format.into();
        }
        if let Some(addr) = self.metrics {
            observers.metrics.enabled = true;
            observers.metrics.bind_address = addr;
        }

        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}
