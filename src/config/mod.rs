//! Environment-driven configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use es_http::config::Config;
//!
//! # fn main() -> Result<(), es_http::config::ConfigError> {
//! let config = Config::from_env()?;
//! let options = config.upload.to_options();
//! println!("Upload options: {}", options.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;
mod overrides;
mod parse;
mod upload;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use overrides::overrides_from_env;
pub use upload::UploadConfig;

use crate::factory::UriOverrides;

/// Serializes tests that mutate process environment.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Complete configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Upload pipeline configuration.
    pub upload: UploadConfig,
    /// Forced URI components.
    pub overrides: UriOverrides,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            upload: UploadConfig::from_env()?,
            overrides: overrides_from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        match &self.upload.target_directory {
            Some(dir) => info!("  Upload directory: {}", dir.display()),
            None => info!("  Upload directory: not set"),
        }
        info!("  Directory mode: {:o}", self.upload.dir_permissions);
        info!("  File mode: {:o}", self.upload.file_permissions);

        if let Some(scheme) = &self.overrides.scheme {
            info!("  Forced scheme: {}", scheme);
        }
        if let Some(host) = &self.overrides.host {
            info!("  Forced host: {}", host);
        }
        if let Some(port) = self.overrides.port {
            info!("  Forced port: {}", port);
        }

        info!("  Log filter: {}", self.logging.filter);
    }
}
