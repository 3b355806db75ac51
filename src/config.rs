// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::client::core::{DEFAULT_BASE_URL, DEFAULT_RANDOM_COUNT};
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_featured_count() -> usize {
    6
}

fn default_random_count() -> usize {
    DEFAULT_RANDOM_COUNT
}

fn default_max_concurrent_lookups() -> usize {
    16
}

fn default_user_agent() -> String {
    format!("recipebox/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Recipes shown on the home screen.
    #[serde(default = "default_featured_count")]
    pub featured_count: usize,
    /// Used by `recipebox random` when no count is given.
    #[serde(default = "default_random_count")]
    pub random_count: usize,
    /// Upper bound on parallel detail lookups when listing a category.
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// One of off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        // Match the serde defaults
        Self {
            base_url: default_base_url(),
            featured_count: default_featured_count(),
            random_count: default_random_count(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
            user_agent: default_user_agent(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads the config. On first run (no file yet) the defaults are written
    /// out so there is a file to edit, and returned. A failed write is logged
    /// and does not stop startup.
    pub fn load_or_init(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                let config = Self::default();
                match config.save(ctx) {
                    Ok(()) => log::info!("Wrote default config"),
                    Err(e) => log::warn!("Could not write default config: {:#}", e),
                }
                Ok(config)
            }
            Err(e) => Err(e),
        }
    }

    /// Detects whether an error means the config file was missing, either via
    /// our explicit message or an io NotFound anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file_uses_defaults() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));

        let config = Config::load_or_init(&ctx).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "https://www.themealdb.com/api/json/v1/1");
        assert_eq!(config.featured_count, 6);
        assert_eq!(config.random_count, 12);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        assert!(!path.exists());

        Config::load_or_init(&ctx).unwrap();

        assert!(path.exists());
        assert_eq!(Config::load(&ctx).unwrap(), Config::default());
    }

    #[test]
    fn test_existing_file_is_not_rewritten() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        let contents = "featured_count = 2\n";
        fs::write(&path, contents).unwrap();

        let config = Config::load_or_init(&ctx).unwrap();

        assert_eq!(config.featured_count, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "featured_count = 3\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load_or_init(&ctx).unwrap();
        assert_eq!(config.featured_count, 3);
        assert_eq!(config.random_count, 12);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "featured_count = \"many\"").unwrap();

        let err = Config::load_or_init(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_and_reload() {
        let ctx = TestContext::new();
        let config = Config {
            base_url: "http://localhost:9999/api".to_string(),
            ..Config::default()
        };
        config.save(&ctx).unwrap();
        assert_eq!(Config::load(&ctx).unwrap(), config);
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_warn() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.log_level_filter(), log::LevelFilter::Warn);
    }
}
