//! es_http - HTTP message value objects and an upload relocation pipeline.
//!
//! # Features
//!
//! - **URI**: RFC 3986 value object with immutable `with_*` updates and
//!   component-wise percent-encoding
//! - **Messages**: immutable `Request` / `Response` with validated headers
//! - **Uploads**: pluggable relocation strategies run by a priority queue;
//!   the default pipeline prepares the target directory and moves the file
//! - **Factories**: request URI from server parameters, `$_FILES`-shaped
//!   data normalized into a tree of uploaded files
//! - **Logging**: structured JSON lines through `tracing`
//!
//! # Architecture
//!
//! Operational failures of an upload never become `Err`. Each strategy
//! records them in an `OperationOutcome` (state, error code, description)
//! that the caller inspects after `UploadedFile::move_to` returns; `Err` is
//! reserved for contract violations at the call site.
//!
//! # Example
//!
//! ```rust,no_run
//! use es_http::core::UploadedFile;
//! use es_http::uploading::UploadOptions;
//!
//! # fn main() -> es_http::core::Result<()> {
//! let mut file = UploadedFile::builder()
//!     .client_filename("avatar.png")
//!     .temp_name("/tmp/phpA1b2C3")
//!     .build()?;
//!
//! let options: UploadOptions = [("target_directory", "/var/uploads")].into_iter().collect();
//! let strategy = file.move_to("avatar.png", Some(options))?;
//! if strategy.has_operation_error() {
//!     eprintln!("upload failed: {:?}", strategy.operation_error_description());
//! }
//! # Ok(())
//! # }
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod emitter;
pub mod factory;
pub mod logging;
pub mod uploading;
pub mod uri;

// Re-exports for convenience
pub use config::Config;
pub use core::{Error, Request, Response, Result, UploadedFile};
pub use uri::Uri;
