//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use crate::mock::Environment;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Path prefix procedures are mounted under
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3001
}

fn default_base_path() -> String {
    "/api/trpc".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_server_port(),
            base_path: default_base_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    /// Start in-process interception in clients (opt-in)
    #[serde(default = "default_mock_enabled")]
    pub enabled: bool,
    /// JSON file replacing the built-in fixtures
    #[serde(default)]
    pub fixtures_file: Option<String>,
}

fn default_mock_enabled() -> bool {
    false
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { enabled: default_mock_enabled(), fixtures_file: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_base_url")]
    pub base_url: String,
    #[serde(default = "default_client_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_client_base_url() -> String {
    "http://localhost:3001/api/trpc".to_string()
}

fn default_client_timeout_ms() -> u64 {
    5000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: default_client_base_url(), timeout_ms: default_client_timeout_ms() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Interval for the periodic metrics log line (0 to disable)
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    60
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    environment: Environment,
    bind_address: String,
    server_port: u16,
    base_path: String,
    mock_enabled: bool,
    fixtures_file: Option<String>,
    client_base_url: String,
    client_timeout_ms: u64,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            environment: toml_config.app.environment,
            bind_address: toml_config.server.bind_address,
            server_port: toml_config.server.port,
            base_path: normalize_base_path(&toml_config.server.base_path),
            mock_enabled: toml_config.mock.enabled,
            fixtures_file: toml_config.mock.fixtures_file,
            client_base_url: toml_config.client.base_url,
            client_timeout_ms: toml_config.client.timeout_ms,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file,
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        // Check for --config argument
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load(args: &[String]) -> Self {
        let config_path = Self::resolve_config_path(args);
        Self::load_from_path(&config_path)
    }

    /// Load for a binary whose `--config` flag was already parsed: an explicit
    /// path wins, otherwise `CONFIG_FILE`, otherwise `config/dev.toml`
    pub fn load_with(config_arg: Option<&str>) -> Self {
        match config_arg {
            Some(path) => Self::load_from_path(path),
            None => Self::load(&[]),
        }
    }

    /// Load from an explicit path, falling back to defaults on any error
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn mock_enabled(&self) -> bool {
        self.mock_enabled
    }

    pub fn fixtures_file(&self) -> Option<&str> {
        self.fixtures_file.as_deref()
    }

    pub fn client_base_url(&self) -> &str {
        &self.client_base_url
    }

    pub fn client_timeout_ms(&self) -> u64 {
        self.client_timeout_ms
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    // Setters used by binaries to apply command line overrides

    pub fn set_server_port(&mut self, port: u16) {
        self.server_port = port;
    }

    pub fn set_client_base_url(&mut self, base_url: String) {
        self.client_base_url = base_url;
    }

    pub fn set_mock_enabled(&mut self, enabled: bool) {
        self.mock_enabled = enabled;
    }
}

/// Leading slash, no trailing slash. An empty prefix stays empty.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
