//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ML_FRONTEND` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ml_frontend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Model API at {}", config.backend.base_url);
//! ```

mod backend;
mod error;
mod server;
mod session;
mod upload;

pub use backend::{BackendConfig, BackendContract, PredictEncoding};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;
pub use upload::UploadConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Model API client configuration
    pub backend: BackendConfig,

    /// Session cookie and store configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Upload limits
    #[serde(default)]
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ML_FRONTEND` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ML_FRONTEND__SERVER__PORT=10000` -> `server.port = 10000`
    /// - `ML_FRONTEND__BACKEND__BASE_URL=...` -> `backend.base_url = ...`
    /// - `ML_FRONTEND__BACKEND__CONTRACT__REGISTER_STATUS=200`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ML_FRONTEND")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.backend.validate()?;
        self.session.validate()?;
        self.upload.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("ML_FRONTEND__BACKEND__BASE_URL", "http://localhost:8000");
    }

    fn clear_env() {
        for key in [
            "ML_FRONTEND__BACKEND__BASE_URL",
            "ML_FRONTEND__BACKEND__CONTRACT__REGISTER_STATUS",
            "ML_FRONTEND__BACKEND__CONTRACT__UPLOAD_PATH",
            "ML_FRONTEND__BACKEND__PREDICT_ENCODING",
            "ML_FRONTEND__BACKEND__REQUIRE_HTTPS",
            "ML_FRONTEND__SERVER__PORT",
            "ML_FRONTEND__SERVER__ENVIRONMENT",
            "ML_FRONTEND__UPLOAD__MAX_FILE_BYTES",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_backend_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.backend.contract, BackendContract::default());
        assert_eq!(config.backend.predict_encoding, PredictEncoding::TypedFields);
        assert_eq!(config.session.cookie_name, "ml_session");
        assert_eq!(config.upload.max_file_bytes, 10 << 20);
    }

    #[test]
    fn test_contract_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ML_FRONTEND__BACKEND__CONTRACT__REGISTER_STATUS", "200");
        env::set_var("ML_FRONTEND__BACKEND__CONTRACT__UPLOAD_PATH", "/upload");
        env::set_var("ML_FRONTEND__BACKEND__PREDICT_ENCODING", "raw_json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.backend.contract.register_status, 200);
        assert_eq!(config.backend.contract.upload_path, "/upload");
        assert_eq!(config.backend.predict_encoding, PredictEncoding::RawJson);
    }

    #[test]
    fn test_production_accepts_internal_http_backend() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ML_FRONTEND__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_require_https_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ML_FRONTEND__BACKEND__REQUIRE_HTTPS", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.backend.require_https);
        assert_eq!(config.validate(), Err(ValidationError::BackendMustBeHttps));
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ML_FRONTEND__SERVER__PORT", "10000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 10000);
    }
}
