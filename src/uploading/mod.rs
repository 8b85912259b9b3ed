//! Upload strategies: the pipeline that relocates an uploaded file.
//!
//! A strategy is invoked with an [`UploadedFile`] and an [`UploadTarget`].
//! Operational failures (missing directory, permissions, failed move) are
//! never returned as `Err`; they are recorded in the strategy's
//! [`OperationOutcome`] and inspected afterwards:
//!
//! ```rust,no_run
//! use es_http::core::UploadedFile;
//! use es_http::uploading::UploadOptions;
//!
//! # fn main() -> es_http::core::Result<()> {
//! let mut file = UploadedFile::builder().temp_name("/tmp/php4Ab3").size(12).build()?;
//! let options: UploadOptions = [("target_directory", "/var/uploads")].into_iter().collect();
//!
//! let strategy = file.move_to("avatar.png", Some(options))?;
//! if strategy.has_operation_error() {
//!     eprintln!("{:?}", strategy.operation_error_description());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Strategies are combined into a [`StrategiesQueue`], executed by
//! descending priority until one of them sets [`StrategyState::BREAK`].
//! [`default_upload_strategy`] builds the usual directory-then-move queue.

mod default;
mod directory;
mod fs;
mod move_file;
mod options;
mod permissions;
mod queue;
mod state;
mod target;

use std::fmt;

use crate::core::{Result, UploadedFile};

pub use default::{default_upload_strategy, DIRECTORY_PRIORITY, MOVE_PRIORITY};
pub use directory::DirectoryStrategy;
pub use fs::{Filesystem, OsFilesystem};
pub use move_file::MoveStrategy;
pub use options::{OptionKey, UploadOptions};
pub use permissions::{
    validate_dir_permissions, validate_file_permissions, OWNER_EXEC, OWNER_READ, OWNER_WRITE,
};
pub use queue::StrategiesQueue;
pub use state::{ErrorCode, ErrorTable, OperationOutcome, StrategyState};
pub use target::UploadTarget;

/// A step of the upload pipeline.
pub trait UploadStrategy: Send + fmt::Debug {
    /// Store `options` and apply the keys this strategy recognizes.
    fn set_options(&mut self, options: UploadOptions) -> Result<()>;

    /// Options last set on the strategy, if any.
    fn options(&self) -> Option<&UploadOptions>;

    /// Run the strategy.
    ///
    /// Returns `Err` only for contract violations; operational failures are
    /// recorded in [`outcome`](Self::outcome).
    fn invoke(&mut self, file: &UploadedFile, target: &UploadTarget) -> Result<()>;

    /// Outcome of the last run, `None` when there is nothing to report.
    fn outcome(&self) -> Option<&OperationOutcome>;

    fn state(&self) -> Option<StrategyState> {
        self.outcome().and_then(OperationOutcome::state)
    }

    fn operation_error(&self) -> Option<ErrorCode> {
        self.outcome().and_then(OperationOutcome::error)
    }

    fn operation_error_description(&self) -> Option<&str> {
        self.outcome().and_then(OperationOutcome::description)
    }

    fn has_operation_error(&self) -> bool {
        self.outcome().is_some_and(OperationOutcome::has_error)
    }
}

impl<S: UploadStrategy + ?Sized> UploadStrategy for Box<S> {
    fn set_options(&mut self, options: UploadOptions) -> Result<()> {
        (**self).set_options(options)
    }

    fn options(&self) -> Option<&UploadOptions> {
        (**self).options()
    }

    fn invoke(&mut self, file: &UploadedFile, target: &UploadTarget) -> Result<()> {
        (**self).invoke(file, target)
    }

    fn outcome(&self) -> Option<&OperationOutcome> {
        (**self).outcome()
    }
}
