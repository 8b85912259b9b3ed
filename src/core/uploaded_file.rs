//! File received through a multipart upload.

use std::path::{Path, PathBuf};

use super::error::{Error, Result};
use super::stream::{FileStream, Stream};
use crate::uploading::{default_upload_strategy, UploadOptions, UploadStrategy, UploadTarget};

pub const UPLOAD_ERR_OK: u8 = 0;
pub const UPLOAD_ERR_INI_SIZE: u8 = 1;
pub const UPLOAD_ERR_FORM_SIZE: u8 = 2;
pub const UPLOAD_ERR_PARTIAL: u8 = 3;
pub const UPLOAD_ERR_NO_FILE: u8 = 4;
pub const UPLOAD_ERR_NO_TMP_DIR: u8 = 6;
pub const UPLOAD_ERR_CANT_WRITE: u8 = 7;
pub const UPLOAD_ERR_EXTENSION: u8 = 8;

/// Largest accepted upload error status.
const UPLOAD_ERR_MAX: u8 = 8;

/// Uploaded file with its client metadata and relocation strategy.
///
/// The file can be relocated once. After [`move_to`](Self::move_to) returns `Ok`,
/// it is considered consumed whatever the strategy outcome was, and both
/// `move_to` and [`stream`](Self::stream) fail from then on.
#[derive(Debug, Default)]
pub struct UploadedFile {
    client_filename: Option<String>,
    client_media_type: Option<String>,
    temp_name: Option<PathBuf>,
    size: Option<u64>,
    error: u8,
    stream: Option<Box<dyn Stream>>,
    strategy: Option<Box<dyn UploadStrategy>>,
    moved: bool,
}

impl UploadedFile {
    #[inline]
    pub fn builder() -> UploadedFileBuilder {
        UploadedFileBuilder::default()
    }

    #[inline]
    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    #[inline]
    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    #[inline]
    pub fn temp_name(&self) -> Option<&Path> {
        self.temp_name.as_deref()
    }

    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// One of the `UPLOAD_ERR_*` statuses.
    #[inline]
    pub fn error(&self) -> u8 {
        self.error
    }

    #[inline]
    pub fn is_moved(&self) -> bool {
        self.moved
    }

    /// Stream used when the file has no temporary name.
    pub fn set_stream(&mut self, stream: impl Stream + 'static) {
        self.stream = Some(Box::new(stream));
    }

    /// Stream over the file content.
    ///
    /// With a temporary name, a fresh read-only stream on that file is opened
    /// on every call.
    pub fn stream(&mut self) -> Result<&mut (dyn Stream + 'static)> {
        if self.moved {
            return Err(Error::AlreadyMoved);
        }
        if let Some(temp_name) = &self.temp_name {
            self.stream = Some(Box::new(FileStream::open(temp_name, "rb")?));
        }
        self.stream
            .as_deref_mut()
            .ok_or(Error::StreamUnavailable)
    }

    pub fn set_upload_strategy(&mut self, strategy: impl UploadStrategy + 'static) {
        self.strategy = Some(Box::new(strategy));
    }

    /// Strategy used by [`move_to`](Self::move_to), the default pipeline
    /// unless another one was set.
    pub fn upload_strategy(&mut self) -> &mut (dyn UploadStrategy + 'static) {
        self.strategy
            .get_or_insert_with(|| Box::new(default_upload_strategy()))
            .as_mut()
    }

    /// Relocate the file to `target` through the upload strategy.
    ///
    /// `options`, when given, are set on the strategy first. Operational
    /// failures do not produce `Err`: inspect the returned strategy.
    pub fn move_to<T>(
        &mut self,
        target: T,
        options: Option<UploadOptions>,
    ) -> Result<&dyn UploadStrategy>
    where
        T: TryInto<UploadTarget>,
        Error: From<T::Error>,
    {
        if self.moved {
            return Err(Error::AlreadyMoved);
        }
        let target = target.try_into()?;

        let mut strategy = self
            .strategy
            .take()
            .unwrap_or_else(|| Box::new(default_upload_strategy()));
        let invoked = match options {
            Some(options) => strategy.set_options(options),
            None => Ok(()),
        }
        .and_then(|()| strategy.invoke(self, &target));

        if let Err(err) = invoked {
            self.strategy = Some(strategy);
            return Err(err);
        }
        self.moved = true;

        if strategy.has_operation_error() {
            tracing::warn!(
                target_name = %target,
                error = strategy.operation_error().map(|code| code.as_str()),
                description = strategy.operation_error_description(),
                "uploaded file relocation failed"
            );
        } else {
            tracing::info!(
                target_name = %target,
                client_filename = self.client_filename.as_deref(),
                size = self.size,
                "uploaded file relocated"
            );
        }

        Ok(&**self.strategy.insert(strategy))
    }
}

/// Builder for [`UploadedFile`].
#[derive(Debug, Default)]
pub struct UploadedFileBuilder {
    client_filename: Option<String>,
    client_media_type: Option<String>,
    temp_name: Option<PathBuf>,
    size: Option<u64>,
    error: u8,
}

impl UploadedFileBuilder {
    pub fn client_filename(mut self, name: impl Into<String>) -> Self {
        self.client_filename = Some(name.into());
        self
    }

    pub fn client_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.client_media_type = Some(media_type.into());
        self
    }

    pub fn temp_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_name = Some(path.into());
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn error(mut self, error: u8) -> Self {
        self.error = error;
        self
    }

    /// Build the file; empty strings count as unset.
    pub fn build(self) -> Result<UploadedFile> {
        if self.error > UPLOAD_ERR_MAX {
            return Err(Error::InvalidArgument(format!(
                "invalid error status {}; must be an upload error constant",
                self.error
            )));
        }
        Ok(UploadedFile {
            client_filename: self.client_filename.filter(|name| !name.is_empty()),
            client_media_type: self.client_media_type.filter(|media| !media.is_empty()),
            temp_name: self.temp_name.filter(|path| !path.as_os_str().is_empty()),
            size: self.size,
            error: self.error,
            ..UploadedFile::default()
        })
    }
}
