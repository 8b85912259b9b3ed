//! Test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};

use es_http::core::UploadedFile;
use es_http::uploading::{UploadOptions, UploadStrategy};
use tempfile::TempDir;

/// Scratch area holding temporary uploads and the upload directory.
pub struct UploadSandbox {
    pub root: TempDir,
}

#[allow(dead_code)]
impl UploadSandbox {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Directory uploads are relocated to; not created up front.
    pub fn upload_dir(&self) -> PathBuf {
        self.root.path().join("uploads")
    }

    /// Write a temporary upload and return its path.
    pub fn temp_upload(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).expect("Failed to write temp upload");
        path
    }

    /// Uploaded file backed by a fresh temporary upload.
    pub fn uploaded_file(&self, name: &str, contents: &[u8]) -> UploadedFile {
        UploadedFile::builder()
            .client_filename(name)
            .temp_name(self.temp_upload(&format!("php-{}", name), contents))
            .size(contents.len() as u64)
            .build()
            .expect("Failed to build uploaded file")
    }

    /// Options pointing the default pipeline at the upload directory.
    pub fn options(&self) -> UploadOptions {
        [(
            UploadOptions::TARGET_DIRECTORY,
            self.upload_dir().to_string_lossy().into_owned(),
        )]
        .into_iter()
        .collect()
    }
}

/// Assert the strategy finished without an operation error.
pub fn assert_succeeded(strategy: &dyn UploadStrategy) {
    assert!(
        !strategy.has_operation_error(),
        "Expected success, got {:?}: {:?}",
        strategy.operation_error(),
        strategy.operation_error_description()
    );
}

/// Assert a file has the given contents.
pub fn assert_contents(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    assert_eq!(actual, expected, "Unexpected contents of {:?}", path);
}

/// Permission bits of a path.
#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .expect("Failed to stat path")
        .permissions()
        .mode()
        & 0o777
}
