//! Configuration management for handlescout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Defaults are tuned for a single
//! outbound IP probing one upstream host.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/handlescout/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upstream validation endpoint settings
    pub endpoint: EndpointConfig,
    /// Probe pacing and retry settings
    pub probe: ProbeConfig,
    /// Input/output file locations
    pub files: FilesConfig,
    /// Notification settings
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here: the
    /// caller asked for this file specifically.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `HANDLESCOUT_WORKERS`: Override worker count
    /// - `HANDLESCOUT_CANDIDATES_FILE`: Override candidate list path
    /// - `HANDLESCOUT_NOTIFY`: Override notifications enabled (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides to an already-loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("HANDLESCOUT_WORKERS") {
            if let Ok(workers) = val.parse() {
                self.probe.workers = workers;
                tracing::debug!("Override probe.workers from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("HANDLESCOUT_CANDIDATES_FILE") {
            self.files.candidates = PathBuf::from(&val);
            tracing::debug!("Override files.candidates from env: {}", val);
        }

        if let Ok(val) = std::env::var("HANDLESCOUT_NOTIFY") {
            if let Ok(enabled) = val.parse() {
                self.notifications.enabled = enabled;
                tracing::debug!("Override notifications.enabled from env: {}", enabled);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/handlescout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("io", "handlescout", "handlescout")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Check cross-field constraints the type system cannot express.
    ///
    /// # Errors
    /// Returns the first violated constraint as `ConfigError::InvalidValue`.
    pub fn validate(&self) -> ConfigResult<()> {
        let probe = &self.probe;

        if probe.workers == 0 {
            return Err(invalid("probe.workers", "must be greater than zero"));
        }
        if probe.min_rate <= 0.0 {
            return Err(invalid("probe.min_rate", "must be positive"));
        }
        if probe.min_rate > probe.start_rate || probe.start_rate > probe.max_rate {
            return Err(invalid(
                "probe.start_rate",
                "rates must satisfy min_rate <= start_rate <= max_rate",
            ));
        }
        if probe.recovery_step <= 0.0 {
            return Err(invalid("probe.recovery_step", "must be positive"));
        }
        if probe.jitter_min_ms > probe.jitter_max_ms {
            return Err(invalid("probe.jitter_min_ms", "must not exceed jitter_max_ms"));
        }
        if probe.rate_limit_pause_min_ms > probe.rate_limit_pause_max_ms {
            return Err(invalid(
                "probe.rate_limit_pause_min_ms",
                "must not exceed rate_limit_pause_max_ms",
            ));
        }
        if probe.transport_backoff_floor_ms > probe.transport_backoff_ceiling_ms {
            return Err(invalid(
                "probe.transport_backoff_floor_ms",
                "must not exceed transport_backoff_ceiling_ms",
            ));
        }
        if probe.backoff_growth < 1.0 {
            return Err(invalid("probe.backoff_growth", "must be at least 1.0"));
        }
        if self.endpoint.url.is_empty() {
            return Err(invalid("endpoint.url", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Upstream validation endpoint settings.
///
/// The header values default to ordinary browser mimicry for the original
/// upstream; they are configuration, not engine logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Validation endpoint URL (POST target)
    pub url: String,
    /// Signup context sent in the request body
    pub context: String,
    /// Fixed birthday sent in the request body (ISO-8601)
    pub birthday: String,
    /// `Origin` header value
    pub origin: String,
    /// `Referer` header value
    pub referer: String,
    /// `Accept` header value
    pub accept: String,
    /// `Content-Type` header value
    pub content_type: String,
    /// `Accept-Language` header value
    pub accept_language: String,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Header carrying the evolving CSRF-style token
    pub token_header: String,
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "https://auth.roblox.com/v1/usernames/validate".to_string(),
            context: "Signup".to_string(),
            birthday: "1991-01-04T00:00:00.000Z".to_string(),
            origin: "https://www.roblox.com".to_string(),
            referer: "https://www.roblox.com/".to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            content_type: "application/json;charset=UTF-8".to_string(),
            accept_language: "en-GB,en;q=0.9".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            token_header: "X-CSRF-Token".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 3,
        }
    }
}

/// Probe pacing and retry settings.
///
/// The rate window and recovery step drive the shared AIMD limiter; the
/// remaining fields shape per-task retry delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Number of concurrent workers
    pub workers: usize,
    /// Initial aggregate request rate (requests/second)
    pub start_rate: f64,
    /// Lower bound the limiter never drops below
    pub min_rate: f64,
    /// Upper bound the limiter never exceeds
    pub max_rate: f64,
    /// Additive rate increase per successful response
    pub recovery_step: f64,
    /// Minimum pre-request jitter in milliseconds
    pub jitter_min_ms: u64,
    /// Maximum pre-request jitter in milliseconds
    pub jitter_max_ms: u64,
    /// Minimum extra pause after a 429 in milliseconds
    pub rate_limit_pause_min_ms: u64,
    /// Maximum extra pause after a 429 in milliseconds
    pub rate_limit_pause_max_ms: u64,
    /// First transport-error retry delay in milliseconds
    pub transport_backoff_floor_ms: u64,
    /// Transport-error retry delay ceiling in milliseconds
    pub transport_backoff_ceiling_ms: u64,
    /// Multiplier applied to the transport backoff after each failure
    pub backoff_growth: f64,
    /// Upper bound of the random additive backoff jitter in milliseconds
    pub backoff_jitter_ms: u64,
    /// Limiter penalty hint for transport errors in milliseconds
    pub transport_penalty_ms: u64,
    /// Limiter penalty hint for undecodable responses in milliseconds
    pub bad_response_penalty_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            workers: 20,
            start_rate: 8.0,
            min_rate: 2.0,
            max_rate: 15.0,
            recovery_step: 0.5,
            jitter_min_ms: 20,
            jitter_max_ms: 100,
            rate_limit_pause_min_ms: 800,
            rate_limit_pause_max_ms: 1600,
            transport_backoff_floor_ms: 1000,
            transport_backoff_ceiling_ms: 5000,
            backoff_growth: 1.5,
            backoff_jitter_ms: 300,
            transport_penalty_ms: 200,
            bad_response_penalty_ms: 500,
        }
    }
}

/// Input/output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Candidate list, one identifier per line
    pub candidates: PathBuf,
    /// Sink for identifiers confirmed unavailable
    pub taken: PathBuf,
    /// Sink for the winning identifier, if any
    pub available: PathBuf,
    /// Raw response log
    pub response_log: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            candidates: PathBuf::from("candidates.txt"),
            taken: PathBuf::from("taken.txt"),
            available: PathBuf::from("available.txt"),
            response_log: PathBuf::from("responses.log"),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Enable notifications on a confirmed-available identifier
    pub enabled: bool,
    /// Open a browser window when one is found
    pub open_browser: bool,
    /// Ring the terminal bell when one is found
    pub terminal_bell: bool,
    /// URL to open in the browser
    pub open_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            open_browser: true,
            terminal_bell: true,
            open_url: "https://www.roblox.com/".to_string(),
        }
    }
}
