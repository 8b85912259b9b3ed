//! Strategy ensuring the target directory exists and is accessible.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::fs::{Filesystem, OsFilesystem};
use super::options::{expect_mode, expect_non_empty_str, UploadOptions};
use super::permissions::validate_dir_permissions;
use super::state::{ErrorCode, ErrorTable, OperationOutcome};
use super::target::UploadTarget;
use super::UploadStrategy;
use crate::core::{Error, Result, UploadedFile, UPLOAD_ERR_OK};

const ERRORS: ErrorTable = &[
    (
        ErrorCode::UPLOADED_FILE_CONTAINS_ERROR,
        "The uploaded file contains errors.",
    ),
    (
        ErrorCode::TARGET_DIR_NOT_SPECIFIED,
        "The target directory to upload is not specified.",
    ),
    (
        ErrorCode::CREATE_DIRECTORY_FAILED,
        "Failed to create directory.",
    ),
    (
        ErrorCode::DIRECTORY_NOT_READABLE,
        "The target directory is not readable.",
    ),
    (
        ErrorCode::DIRECTORY_NOT_WRITABLE,
        "The target directory is not writable.",
    ),
];

/// Checks the target directory, creating it when missing.
#[derive(Debug)]
pub struct DirectoryStrategy {
    fs: Arc<dyn Filesystem>,
    options: Option<UploadOptions>,
    outcome: OperationOutcome,
    target_directory: Option<PathBuf>,
    dir_permissions: u32,
}

impl DirectoryStrategy {
    /// Owner `rwx`.
    pub const DEFAULT_PERMISSIONS: u32 = 0o700;

    pub fn new() -> Self {
        Self::with_filesystem(Arc::new(OsFilesystem))
    }

    pub fn with_filesystem(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            options: None,
            outcome: OperationOutcome::new(ERRORS),
            target_directory: None,
            dir_permissions: Self::DEFAULT_PERMISSIONS,
        }
    }

    pub fn set_target_directory(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(Error::InvalidOption {
                name: UploadOptions::TARGET_DIRECTORY.into(),
                message: "must be a non-empty string".into(),
            });
        }
        self.target_directory = Some(dir);
        Ok(())
    }

    pub fn target_directory(&self) -> Option<&Path> {
        self.target_directory.as_deref()
    }

    /// Mode used when the directory has to be created.
    pub fn set_dir_permissions(&mut self, mode: u32) -> Result<()> {
        self.dir_permissions = validate_dir_permissions(mode)?;
        Ok(())
    }

    #[inline]
    pub fn dir_permissions(&self) -> u32 {
        self.dir_permissions
    }

    fn check(&mut self, file: &UploadedFile) -> Result<()> {
        if file.error() != UPLOAD_ERR_OK {
            return self
                .outcome
                .decide_on_failure(ErrorCode::UPLOADED_FILE_CONTAINS_ERROR);
        }

        let Some(dir) = self.target_directory.as_deref() else {
            return self
                .outcome
                .decide_on_failure(ErrorCode::TARGET_DIR_NOT_SPECIFIED);
        };

        if !self.fs.exists(dir) {
            tracing::debug!(dir = %dir.display(), mode = self.dir_permissions, "creating upload directory");
            if let Err(err) = self.fs.create_dir_all(dir, self.dir_permissions) {
                return self
                    .outcome
                    .decide_on_failure_with(ErrorCode::CREATE_DIRECTORY_FAILED, err.to_string());
            }
        } else if !self.fs.is_dir(dir) {
            let description = format!("{} exists and is not a directory.", dir.display());
            return self
                .outcome
                .decide_on_failure_with(ErrorCode::CREATE_DIRECTORY_FAILED, description);
        }

        if !self.fs.is_readable(dir) {
            return self
                .outcome
                .decide_on_failure(ErrorCode::DIRECTORY_NOT_READABLE);
        }
        if !self.fs.is_writable(dir) {
            return self
                .outcome
                .decide_on_failure(ErrorCode::DIRECTORY_NOT_WRITABLE);
        }

        self.outcome.decide_on_success();
        Ok(())
    }
}

impl Default for DirectoryStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStrategy for DirectoryStrategy {
    fn set_options(&mut self, options: UploadOptions) -> Result<()> {
        if let Some(value) = options.get(UploadOptions::TARGET_DIRECTORY) {
            let dir = expect_non_empty_str(UploadOptions::TARGET_DIRECTORY, value)?;
            self.set_target_directory(dir)?;
        }
        if let Some(value) = options.get(UploadOptions::DIR_PERMISSIONS) {
            self.set_dir_permissions(expect_mode(UploadOptions::DIR_PERMISSIONS, value)?)?;
        }
        self.options = Some(options);
        Ok(())
    }

    fn options(&self) -> Option<&UploadOptions> {
        self.options.as_ref()
    }

    fn invoke(&mut self, file: &UploadedFile, _target: &UploadTarget) -> Result<()> {
        self.check(file)
    }

    fn outcome(&self) -> Option<&OperationOutcome> {
        Some(&self.outcome)
    }
}
