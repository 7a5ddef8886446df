//! # Cart Configuration
//!
//! Where the cart is stored and how hard the writer retries.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GOMARKET_NAMESPACE=Staging                                         │
//! │     GOMARKET_DB_PATH=/tmp/cart.db                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gomarketplace/cart.toml (Linux)                          │
//! │     ~/Library/Application Support/dev.gomarketplace.app/cart.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     namespace "GoMarketplace", platform data dir                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! namespace = "GoMarketplace"
//! database_path = "/data/gomarket.db"   # optional
//!
//! [persistence]
//! initial_backoff_ms = 200
//! max_backoff_secs = 5
//! max_elapsed_secs = 30   # 0 = retry forever
//! ```

use directories::ProjectDirs;
use gomarket_core::{storage_key, DEFAULT_NAMESPACE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult};
use crate::persist::RetryPolicy;

const DATABASE_FILE: &str = "gomarket.db";
const CONFIG_FILE: &str = "cart.toml";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "gomarketplace", "app")
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the snapshot lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key namespace; the snapshot key is `@<namespace>:products`.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            namespace: default_namespace(),
            database_path: None,
        }
    }
}

// =============================================================================
// Persistence Settings
// =============================================================================

/// Retry behavior of the persistence writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceSettings {
    /// First retry delay (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Largest retry delay (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,

    /// Give up on a write after this many seconds. 0 retries forever.
    #[serde(default = "default_max_elapsed")]
    pub max_elapsed_secs: u64,
}

fn default_initial_backoff() -> u64 {
    200
}
fn default_max_backoff() -> u64 {
    5
}
fn default_max_elapsed() -> u64 {
    30
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        PersistenceSettings {
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
            max_elapsed_secs: default_max_elapsed(),
        }
    }
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub persistence: PersistenceSettings,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CartResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CartError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CartError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CartError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        let namespace = self.storage.namespace.trim();
        if namespace.is_empty() {
            return Err(CartError::InvalidConfig("namespace must not be empty".into()));
        }
        if namespace.contains(':') {
            return Err(CartError::InvalidConfig(format!(
                "namespace must not contain ':', got: {}",
                namespace
            )));
        }

        if self.persistence.initial_backoff_ms == 0 {
            return Err(CartError::InvalidConfig(
                "initial_backoff_ms must be greater than 0".into(),
            ));
        }

        if self.persistence.max_backoff_secs.saturating_mul(1000) < self.persistence.initial_backoff_ms {
            return Err(CartError::InvalidConfig(
                "max_backoff_secs must not be shorter than initial_backoff_ms".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the environment in `load`).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(namespace) = lookup("GOMARKET_NAMESPACE") {
            debug!(namespace = %namespace, "Overriding namespace from environment");
            self.storage.namespace = namespace;
        }

        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        let numeric = |name: &str| {
            lookup(name).and_then(|value| match value.parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(variable = %name, value = %value, "Ignoring non-numeric override");
                    None
                }
            })
        };

        if let Some(ms) = numeric("GOMARKET_INITIAL_BACKOFF_MS") {
            self.persistence.initial_backoff_ms = ms;
        }
        if let Some(secs) = numeric("GOMARKET_MAX_BACKOFF_SECS") {
            self.persistence.max_backoff_secs = secs;
        }
        if let Some(secs) = numeric("GOMARKET_MAX_ELAPSED_SECS") {
            self.persistence.max_elapsed_secs = secs;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Key the cart snapshot is stored under.
    pub fn storage_key(&self) -> String {
        storage_key(self.storage.namespace.trim())
    }

    /// Resolves the SQLite file, creating the data directory when needed.
    pub fn database_path(&self) -> CartResult<PathBuf> {
        if let Some(ref path) = self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or_else(|| {
            CartError::InvalidConfig("Could not determine app data directory".into())
        })?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| CartError::InvalidConfig(e.to_string()))?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Retry policy for the persistence writer.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_backoff: Duration::from_millis(self.persistence.initial_backoff_ms),
            max_backoff: Duration::from_secs(self.persistence.max_backoff_secs),
            max_elapsed: match self.persistence.max_elapsed_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key(), "@GoMarketplace:products");
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();

        config.storage.namespace = "  ".into();
        assert!(config.validate().is_err());

        config.storage.namespace = "Go:Market".into();
        assert!(config.validate().is_err());

        config.storage.namespace = "Staging".into();
        config.persistence.initial_backoff_ms = 0;
        assert!(config.validate().is_err());

        config.persistence.initial_backoff_ms = 10_000;
        config.persistence.max_backoff_secs = 5;
        assert!(config.validate().is_err());

        config.persistence.max_backoff_secs = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GOMARKET_NAMESPACE", "Staging"),
            ("GOMARKET_DB_PATH", "/tmp/cart.db"),
            ("GOMARKET_INITIAL_BACKOFF_MS", "50"),
            ("GOMARKET_MAX_ELAPSED_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage_key(), "@Staging:products");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/cart.db"));
        assert_eq!(config.persistence.initial_backoff_ms, 50);
        assert_eq!(config.persistence.max_elapsed_secs, default_max_elapsed());
    }

    #[test]
    fn test_zero_max_elapsed_retries_forever() {
        let mut config = CartConfig::default();
        config.persistence.max_elapsed_secs = 0;
        assert_eq!(config.retry_policy().max_elapsed, None);
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.toml");

        let mut config = CartConfig::default();
        config.storage.namespace = "Staging".into();
        config.persistence.max_backoff_secs = 9;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[storage]"));
        assert!(contents.contains("[persistence]"));

        let loaded: CartConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: CartConfig = toml::from_str("[storage]\nnamespace = \"Demo\"\n").unwrap();
        assert_eq!(config.storage.namespace, "Demo");
        assert_eq!(config.persistence, PersistenceSettings::default());
    }

    #[test]
    fn test_invalid_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[storage\nnamespace = ").unwrap();

        assert!(matches!(
            CartConfig::load(Some(path.clone())),
            Err(CartError::ConfigLoadFailed(_))
        ));
        // load_or_default still hands back something usable
        let _ = CartConfig::load_or_default(Some(path));
    }
}
