//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use meridian_core::MeridianError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration loader.
#[derive(Clone)]
pub struct ConfigLoader {
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader for the given directory.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `MERIDIAN_` prefix
    #[must_use]
    pub fn new(config_dir: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, MeridianError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("MERIDIAN_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", self.config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", self.config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", self.config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (MERIDIAN_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("MERIDIAN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_error)?;

        let app_config: AppConfig = config.try_deserialize().map_err(config_error_to_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), MeridianError> {
        if config.database.url.is_empty() {
            return Err(MeridianError::Configuration(
                "Database URL is required".to_string(),
            ));
        }

        if config.cache.capacity <= 0 {
            return Err(MeridianError::Configuration(
                "Cache capacity must be positive".to_string(),
            ));
        }

        if config.photos.upload_concurrency == 0 {
            return Err(MeridianError::Configuration(
                "Photo upload concurrency must be positive".to_string(),
            ));
        }

        if config.object_storage.public_base_url.is_empty() {
            return Err(MeridianError::Configuration(
                "Object storage public base URL is required".to_string(),
            ));
        }

        if config.app.environment == "production" && config.object_storage.allow_http {
            warn!("Object storage allows plain HTTP in production");
        }

        Ok(())
    }
}

fn config_error_to_error(err: ConfigError) -> MeridianError {
    MeridianError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_dir_yields_defaults() {
        let loader = ConfigLoader::new("./does-not-exist");
        let config = loader.load().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.photos.max_per_user, 6);
    }

    #[test]
    fn test_load_reads_default_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nhost = \"127.0.0.1\"\nport = 9999\nrequest_timeout_secs = 10\nmax_body_size = 1024\ncors_enabled = false\n\n[cache]\ncapacity = 3\nttl_secs = 60"
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_str().unwrap());
        let config = loader.load().unwrap();
        assert_eq!(config.server.addr(), "127.0.0.1:9999");
        assert_eq!(config.cache.capacity, 3);
        // Sections absent from the file fall back to defaults.
        assert_eq!(config.photos.upload_concurrency, 10);
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[cache]\ncapacity = 0\nttl_secs = 60").unwrap();

        let loader = ConfigLoader::new(dir.path().to_str().unwrap());
        let err = loader.load().unwrap_err();
        match err {
            MeridianError::Configuration(msg) => assert!(msg.contains("capacity")),
            other => panic!("expected Configuration, got {:?}", other),
        }
    }
}
