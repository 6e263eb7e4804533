//! Configuration management for libertypack
//!
//! Settings are resolved from environment variables once, at construction
//! time, into plain structs with defaults applied. Nothing reads the
//! environment during detection or linking, which keeps both paths pure
//! given their inputs.
//!
//! # Environment Variables
//!
//! - `BP_OPENLIBERTY_SERVER_NAME`: name of the Liberty server to look for in
//!   a packaged distribution - default: "defaultServer"
//!
//! The linker's variables (`BPI_OL_DROPIN_DIR`, `BPI_OL_RUNTIME_ROOT`) are
//! documented in [`crate::linker`].

use std::env;
use thiserror::Error;
use tracing::debug;

/// Server name assumed when `BP_OPENLIBERTY_SERVER_NAME` is unset.
pub const DEFAULT_SERVER_NAME: &str = "defaultServer";

/// Environment variable selecting the packaged server name.
pub const ENV_SERVER_NAME: &str = "BP_OPENLIBERTY_SERVER_NAME";

/// Configuration errors, surfaced before any probing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but not valid unicode.
    #[error("environment variable {key} is not valid unicode")]
    InvalidValue { key: String },
}

/// Inputs to the detection engine.
#[derive(Debug, Clone)]
pub struct DetectConfig {
    /// Name of the server directory expected under `wlp/usr/servers`.
    pub server_name: String,
}

impl DetectConfig {
    /// Resolves detection configuration from the process environment,
    /// falling back to [`DEFAULT_SERVER_NAME`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_name = env_or_default(ENV_SERVER_NAME, DEFAULT_SERVER_NAME)?;
        debug!(server_name, "resolved detection configuration");
        Ok(Self { server_name })
    }

    pub fn with_server_name(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
        }
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}

/// Reads `key` from the environment, returning `default` when unset and an
/// error when set to a non-unicode value.
pub fn env_or_default(key: &str, default: &str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) | Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
        }),
    }
}
