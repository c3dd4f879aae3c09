//! Configuration system (layered: code > env > config file).

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::Scopes;
use crate::error::{Error, Result};

pub const ENV_SCOPES: &str = "TOKEN_SUPPLIER_SCOPES";
pub const ENV_SILENT_TIMEOUT_MS: &str = "TOKEN_SUPPLIER_SILENT_TIMEOUT_MS";
pub const ENV_INTERACTIVE_TIMEOUT_MS: &str = "TOKEN_SUPPLIER_INTERACTIVE_TIMEOUT_MS";

/// Settings for a [`crate::auth::TokenSupplier`].
///
/// # Example
/// ```
/// use token_supplier::config::SupplierConfig;
///
/// let config: SupplierConfig = toml::from_str(r#"
///     scopes = ["User.Read"]
///     silent_timeout_ms = 5000
/// "#).unwrap();
/// assert_eq!(config.scopes.as_slice(), ["User.Read"]);
/// assert!(config.interactive_timeout().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierConfig {
    pub scopes: Scopes,
    pub silent_timeout_ms: Option<u64>,
    pub interactive_timeout_ms: Option<u64>,
}

impl SupplierConfig {
    pub fn new(scopes: impl Into<Scopes>) -> Self {
        Self {
            scopes: scopes.into(),
            ..Self::default()
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load the TOML file at `path`, then apply environment overrides
    /// (reading `.env` first if present).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::load_from_path(path)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file.
    ///
    /// Returns defaults if the file does not exist.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(Error::Io(err)),
        };
        toml::from_str(&raw).map_err(|err| {
            Error::Configuration(format!("Invalid config at {}: {err}", path.display()))
        })
    }

    /// Override fields with any of the `TOKEN_SUPPLIER_*` variables that are set.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(ENV_SCOPES) {
            // Scopes parsing is infallible.
            self.scopes = raw.parse().unwrap_or_default();
        }
        if let Some(ms) = env_millis(ENV_SILENT_TIMEOUT_MS)? {
            self.silent_timeout_ms = Some(ms);
        }
        if let Some(ms) = env_millis(ENV_INTERACTIVE_TIMEOUT_MS)? {
            self.interactive_timeout_ms = Some(ms);
        }
        Ok(())
    }

    pub fn silent_timeout(&self) -> Option<Duration> {
        self.silent_timeout_ms.map(Duration::from_millis)
    }

    pub fn interactive_timeout(&self) -> Option<Duration> {
        self.interactive_timeout_ms.map(Duration::from_millis)
    }
}

fn env_millis(var: &str) -> Result<Option<u64>> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            Error::Configuration(format!("{var} must be a whole number of milliseconds, got {raw:?}"))
        }),
        Err(_) => Ok(None),
    }
}
