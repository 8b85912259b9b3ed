//! Upload pipeline configuration.

use std::path::PathBuf;

use super::parse::{env_octal, env_opt};
use super::ConfigError;
use crate::uploading::{validate_dir_permissions, validate_file_permissions, UploadOptions};

/// Upload configuration loaded from environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    /// Directory uploaded files are relocated to (UPLOAD_DIR).
    pub target_directory: Option<PathBuf>,
    /// Mode of created directories (UPLOAD_DIR_MODE, octal).
    pub dir_permissions: u32,
    /// Mode of relocated files (UPLOAD_FILE_MODE, octal).
    pub file_permissions: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            target_directory: None,
            dir_permissions: 0o700,
            file_permissions: 0o600,
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            target_directory: env_opt("UPLOAD_DIR").map(PathBuf::from),
            dir_permissions: env_octal("UPLOAD_DIR_MODE", defaults.dir_permissions)?,
            file_permissions: env_octal("UPLOAD_FILE_MODE", defaults.file_permissions)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_dir_permissions(self.dir_permissions).map_err(|e| ConfigError::Invalid {
            key: "UPLOAD_DIR_MODE".into(),
            message: e.to_string(),
        })?;
        validate_file_permissions(self.file_permissions).map_err(|e| ConfigError::Invalid {
            key: "UPLOAD_FILE_MODE".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Options bag for the default upload strategy.
    pub fn to_options(&self) -> UploadOptions {
        let mut options = UploadOptions::new();
        if let Some(dir) = &self.target_directory {
            options.set(
                UploadOptions::TARGET_DIRECTORY,
                dir.to_string_lossy().into_owned(),
            );
        }
        options.set(UploadOptions::DIR_PERMISSIONS, self.dir_permissions);
        options.set(UploadOptions::FILE_PERMISSIONS, self.file_permissions);
        options
    }
}
