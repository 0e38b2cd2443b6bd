//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::telemetry::AggregateStats;
use crate::websocket::HubConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub websocket: WebSocketConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Feed simulation settings
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Random-walk cadence
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Display smoothing cadence
    #[serde(default = "default_smoothing_interval")]
    pub smoothing_interval_ms: u64,

    /// Seed for reproducible snapshots and walks; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_total_volume")]
    pub initial_total_volume: f64,

    #[serde(default = "default_active_convergences")]
    pub initial_active_convergences: i64,

    #[serde(default = "default_avg_spread")]
    pub initial_avg_spread: f64,
}

fn default_tick_interval() -> u64 {
    3000
}

fn default_smoothing_interval() -> u64 {
    50
}

fn default_total_volume() -> f64 {
    847.3
}

fn default_active_convergences() -> i64 {
    156
}

fn default_avg_spread() -> f64 {
    12.4
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            smoothing_interval_ms: default_smoothing_interval(),
            seed: None,
            initial_total_volume: default_total_volume(),
            initial_active_convergences: default_active_convergences(),
            initial_avg_spread: default_avg_spread(),
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn smoothing_interval(&self) -> Duration {
        Duration::from_millis(self.smoothing_interval_ms)
    }

    /// Starting statistics, floors applied
    pub fn initial_stats(&self) -> AggregateStats {
        AggregateStats::new(
            self.initial_total_volume,
            self.initial_active_convergences,
            self.initial_avg_spread,
        )
    }
}

/// WebSocket hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_max_connections() -> usize {
    1000
}

fn default_broadcast_capacity() -> usize {
    1024
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl WebSocketConfig {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            max_connections: self.max_connections,
            broadcast_capacity: self.broadcast_capacity,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("clairon={level},tower_http={level}", level = self.level)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Nothing is logged here since this runs before tracing is set up;
    /// call [`LoadedConfig::report`] once the subscriber is installed.
    pub fn load_default() -> LoadedConfig {
        let mut loaded = Self::load_first(&Self::search_paths());
        loaded.config.apply_env_overrides();
        loaded
    }

    /// Standard config locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("clairon").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/clairon/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// Load the first existing file in `paths` that parses
    ///
    /// Files that exist but fail to load are recorded in `skipped`.
    /// Falls back to defaults when no file loads.
    pub fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        skipped,
                    };
                }
                Err(e) => skipped.push(e),
            }
        }

        LoadedConfig {
            config: Config::default(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("CLAIRON_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("CLAIRON_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        if let Some(seed) = lookup("CLAIRON_SEED").and_then(|s| s.parse().ok()) {
            self.simulation.seed = Some(seed);
        }
        if let Some(ms) = lookup("CLAIRON_TICK_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            self.simulation.tick_interval_ms = ms;
        }
        if let Some(ms) = lookup("CLAIRON_SMOOTHING_INTERVAL_MS").and_then(|s| s.parse().ok()) {
            self.simulation.smoothing_interval_ms = ms;
        }

        if let Some(level) = lookup("CLAIRON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CLAIRON_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// A config together with where it was found
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from; `None` when defaults were used
    pub source: Option<PathBuf>,
    /// Files on the search path that exist but could not be loaded
    pub skipped: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Config read from an explicit path, with no search involved
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            config: Config::load_with_env(path)?,
            source: Some(path.to_path_buf()),
            skipped: Vec::new(),
        })
    }

    /// Log the outcome of config discovery
    pub fn report(&self) {
        for error in &self.skipped {
            tracing::warn!("Skipped config file: {}", error);
        }

        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# CLAIRON Configuration
#
# Environment variables override these settings:
# - CLAIRON_API_HOST
# - CLAIRON_API_PORT
# - CLAIRON_SEED
# - CLAIRON_TICK_INTERVAL_MS
# - CLAIRON_SMOOTHING_INTERVAL_MS
# - CLAIRON_LOG_LEVEL
# - CLAIRON_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins (empty = any origin)
cors_origins = []

[simulation]
# Random-walk cadence of the headline statistics (ms)
tick_interval_ms = 3000

# Smoothing step cadence of displayed values (ms)
smoothing_interval_ms = 50

# Seed for reproducible snapshots (omit for a fresh session each start)
# seed = 42

# Starting headline statistics
initial_total_volume = 847.3
initial_active_convergences = 156
initial_avg_spread = 12.4

[websocket]
# Maximum concurrent dashboard connections
max_connections = 1000

# Capacity of the in-process event channel
broadcast_capacity = 1024

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.simulation.tick_interval(), Duration::from_millis(3000));
        assert_eq!(config.simulation.smoothing_interval(), Duration::from_millis(50));
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.simulation.initial_stats(), AggregateStats::default());
        assert_eq!(config.websocket.max_connections, 1000);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.api.addr(), defaults.api.addr());
        assert_eq!(config.simulation.tick_interval_ms, defaults.simulation.tick_interval_ms);
        assert_eq!(config.simulation.initial_stats(), defaults.simulation.initial_stats());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [simulation]
            seed = 7
            tick_interval_ms = 500

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.tick_interval_ms, 500);
        assert_eq!(config.simulation.smoothing_interval_ms, 50);
        assert_eq!(config.api.port, 8082);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_initial_stats_respect_floors() {
        let config = Config::parse(
            r#"
            [simulation]
            initial_active_convergences = 20
            initial_avg_spread = 1.0
            "#,
        )
        .unwrap();

        let stats = config.simulation.initial_stats();
        assert_eq!(stats.active_convergences, 100);
        assert_eq!(stats.avg_spread, 5.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 9090").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9090);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_skips_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[simulation\nseed = ").unwrap();
        std::fs::write(&good, "[api]\nport = 9191").unwrap();

        let loaded = Config::load_first(&[absent, broken.clone(), good.clone()]);
        assert_eq!(loaded.source, Some(good));
        assert_eq!(loaded.config.api.port, 9191);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(matches!(
            &loaded.skipped[0],
            ConfigError::Parse { path, .. } if *path == broken
        ));
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "not = [valid").unwrap();

        let loaded = Config::load_first(&[broken]);
        assert!(loaded.source.is_none());
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.config.api.port, 8082);

        let loaded = Config::load_first(&[]);
        assert!(loaded.source.is_none());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_loaded_config_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulation]\nseed = 11").unwrap();

        let loaded = LoadedConfig::from_path(file.path()).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
        assert!(loaded.skipped.is_empty());

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            LoadedConfig::from_path(&missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CLAIRON_API_PORT", "9000"),
            ("CLAIRON_SEED", "123"),
            ("CLAIRON_TICK_INTERVAL_MS", "not-a-number"),
            ("CLAIRON_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.simulation.seed, Some(123));
        assert_eq!(config.simulation.tick_interval_ms, 3000);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_filter_directive() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };
        assert_eq!(logging.filter_directive(), "clairon=debug,tower_http=debug");
    }
}
