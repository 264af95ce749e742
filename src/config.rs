//! Configuration management for the student registry
//!
//! Separates startup configuration (requires restart) from runtime configuration
//! (shared with the accept loop and readable while the server is running).

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Smallest bcrypt cost accepted by the hasher.
pub const MIN_BCRYPT_COST: u32 = 4;
/// Largest bcrypt cost accepted by the hasher.
pub const MAX_BCRYPT_COST: u32 = 31;
/// HS256 secrets shorter than this are rejected.
pub const MIN_JWT_SECRET_LENGTH: usize = 16;
/// Longest token lifetime accepted (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

const ENV_PREFIX: &str = "STUDENT_REGISTRY";

/// Complete server configuration with startup/runtime separation
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

/// Configuration that requires server restart to take effect
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address to bind the command listener
    pub bind_address: String,

    /// Port for the command listener
    pub port: u16,

    // ═══ LIMITS ═══
    /// Maximum length of a single command line, in bytes
    pub max_command_length: usize,

    /// Maximum accepted email length
    pub max_email_length: usize,

    // ═══ CREDENTIALS ═══
    /// Work factor for newly produced bcrypt hashes
    pub bcrypt_cost: u32,

    /// HMAC secret for issued bearer tokens
    pub jwt_secret: String,

    /// Lifetime of issued bearer tokens
    pub token_ttl_secs: u64,

    /// JSON file of legacy student records imported at startup
    #[serde(default)]
    pub seed_file: Option<String>,
}

/// Configuration that can be read while the server is running
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Maximum concurrent clients
    /// Environment: STUDENT_REGISTRY__MAX_CLIENTS
    pub max_clients: usize,
}

/// Thread-safe runtime configuration wrapper
pub type SharedRuntimeConfig = Arc<RwLock<RuntimeConfig>>;

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Packaged layout first, then the working directory
        let config_paths = ["student-registry/config", "config"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("__")
                        .try_parsing(true),
                )
                .build()
            {
                Ok(settings) => {
                    let config: ServerConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(config::ConfigError::Message(format!(
            "Failed to load config.toml from any location. Tried: {config_paths:?}. Last error: {last_error:?}"
        )))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        let config: ServerConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into startup (immutable) and runtime (shared) parts
    pub fn split(self) -> (StartupConfig, SharedRuntimeConfig) {
        let runtime = Arc::new(RwLock::new(self.runtime));
        (self.startup, runtime)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.startup.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.startup.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.startup.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.startup.max_email_length < 3 {
            return Err(config::ConfigError::Message(
                "max_email_length must be at least 3".into(),
            ));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.startup.bcrypt_cost) {
            return Err(config::ConfigError::Message(format!(
                "bcrypt_cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            )));
        }

        if self.startup.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(config::ConfigError::Message(format!(
                "jwt_secret must be at least {MIN_JWT_SECRET_LENGTH} bytes"
            )));
        }

        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.startup.token_ttl_secs) {
            return Err(config::ConfigError::Message(format!(
                "token_ttl_secs must be between 1 and {MAX_TOKEN_TTL_SECS}"
            )));
        }

        if self.runtime.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Get bind address and port as socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get token lifetime as Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Get the seed file path, ignoring an empty setting
    pub fn seed_path(&self) -> Option<PathBuf> {
        self.seed_file
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
