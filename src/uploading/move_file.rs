//! Strategy relocating the temporary file into the target directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::fs::{Filesystem, OsFilesystem};
use super::options::{expect_mode, expect_non_empty_str, UploadOptions};
use super::permissions::validate_file_permissions;
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
        ErrorCode::UPLOADED_FILE_MISSING_TEMPNAME,
        "Missing tempname of uploaded file.",
    ),
    (
        ErrorCode::MISSING_TEMPORARY_FILE,
        "The temporary file not exists or is not readable.",
    ),
    (
        ErrorCode::TARGET_DIR_NOT_SPECIFIED,
        "The target directory to upload is not specified.",
    ),
    (
        ErrorCode::MOVEMENT_FAILED,
        "Move the uploaded file failed.",
    ),
];

/// Moves the temporary file to `<target_directory>/<target>` and applies
/// the file permissions.
#[derive(Debug)]
pub struct MoveStrategy {
    fs: Arc<dyn Filesystem>,
    options: Option<UploadOptions>,
    outcome: OperationOutcome,
    target_directory: Option<PathBuf>,
    file_permissions: u32,
}

impl MoveStrategy {
    /// Owner `rw-`.
    pub const DEFAULT_PERMISSIONS: u32 = 0o600;

    pub fn new() -> Self {
        Self::with_filesystem(Arc::new(OsFilesystem))
    }

    pub fn with_filesystem(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            options: None,
            outcome: OperationOutcome::new(ERRORS),
            target_directory: None,
            file_permissions: Self::DEFAULT_PERMISSIONS,
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

    pub fn set_file_permissions(&mut self, mode: u32) -> Result<()> {
        self.file_permissions = validate_file_permissions(mode)?;
        Ok(())
    }

    #[inline]
    pub fn file_permissions(&self) -> u32 {
        self.file_permissions
    }

    fn relocate(&mut self, file: &UploadedFile, target: &UploadTarget) -> Result<()> {
        if file.error() != UPLOAD_ERR_OK {
            return self
                .outcome
                .decide_on_failure(ErrorCode::UPLOADED_FILE_CONTAINS_ERROR);
        }

        let Some(temp_name) = file.temp_name() else {
            return self
                .outcome
                .decide_on_failure(ErrorCode::UPLOADED_FILE_MISSING_TEMPNAME);
        };
        if !self.fs.is_readable(temp_name) {
            return self
                .outcome
                .decide_on_failure(ErrorCode::MISSING_TEMPORARY_FILE);
        }

        let Some(dir) = self.target_directory.as_deref() else {
            return self
                .outcome
                .decide_on_failure(ErrorCode::TARGET_DIR_NOT_SPECIFIED);
        };

        // Targets are relative without `..`, so this stays under `dir`.
        let destination = dir.join(target.as_str());
        let moved = self
            .fs
            .move_file(temp_name, &destination)
            .and_then(|()| self.fs.set_permissions(&destination, self.file_permissions));
        if let Err(err) = moved {
            return self
                .outcome
                .decide_on_failure_with(ErrorCode::MOVEMENT_FAILED, err.to_string());
        }

        tracing::debug!(
            from = %temp_name.display(),
            to = %destination.display(),
            mode = self.file_permissions,
            "uploaded file moved"
        );
        self.outcome.decide_on_success();
        Ok(())
    }
}

impl Default for MoveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStrategy for MoveStrategy {
    fn set_options(&mut self, options: UploadOptions) -> Result<()> {
        if let Some(value) = options.get(UploadOptions::TARGET_DIRECTORY) {
            let dir = expect_non_empty_str(UploadOptions::TARGET_DIRECTORY, value)?;
            self.set_target_directory(dir)?;
        }
        if let Some(value) = options.get(UploadOptions::FILE_PERMISSIONS) {
            self.set_file_permissions(expect_mode(UploadOptions::FILE_PERMISSIONS, value)?)?;
        }
        self.options = Some(options);
        Ok(())
    }

    fn options(&self) -> Option<&UploadOptions> {
        self.options.as_ref()
    }

    fn invoke(&mut self, file: &UploadedFile, target: &UploadTarget) -> Result<()> {
        self.relocate(file, target)
    }

    fn outcome(&self) -> Option<&OperationOutcome> {
        Some(&self.outcome)
    }
}
