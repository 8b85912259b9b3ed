//! Core error types.

use std::convert::Infallible;

/// Structural errors raised at the call site.
///
/// Operational failures of upload strategies are never reported through this
/// type; they are recorded in an [`OperationOutcome`](crate::uploading::OperationOutcome)
/// and inspected after invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The URI string could not be split into components.
    #[error("invalid URI: {0}")]
    InvalidUri(String),

    /// Port outside of the accepted range.
    #[error("invalid port {0} provided")]
    InvalidPort(u32),

    /// A path, query or fragment carries a delimiter of another component.
    #[error("invalid {component} provided; {message}")]
    InvalidComponent {
        component: &'static str,
        message: &'static str,
    },

    /// Generic contract violation by the caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Recognized upload option with a value of the wrong shape.
    #[error("invalid option \"{name}\": {message}")]
    InvalidOption { name: String, message: String },

    /// Permission bits rejected by a strategy.
    #[error("invalid permissions {mode:o}: {reason}")]
    InvalidPermissions { mode: u32, reason: &'static str },

    /// A strategy decided on an error code missing from its own error table.
    #[error("unexpected error \"{0}\" received; all errors must be listed in the error table of the strategy")]
    UnexpectedErrorCode(&'static str),

    /// A strategy with this priority is already attached.
    #[error("the strategy with priority {0} already exists")]
    DuplicatePriority(i64),

    /// The uploaded file was already relocated.
    #[error("the file is already moved")]
    AlreadyMoved,

    /// No stream and no temporary file backs the uploaded file.
    #[error("the stream was not set")]
    StreamUnavailable,

    /// The stream was closed and holds no resource.
    #[error("no resource available; the stream is detached")]
    StreamDetached,

    /// The stream mode does not allow the operation.
    #[error("the stream is not {0}")]
    StreamNotCapable(&'static str),

    /// Invalid header name or value.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Invalid response status.
    #[error("invalid status code {0}; must be between 100 and 599")]
    InvalidStatus(u16),

    /// HTTP protocol version outside of 1.0 and 1.1.
    #[error("the protocol {0} is not supported")]
    UnsupportedProtocol(String),

    /// The emitter already wrote a response.
    #[error("unable to emit response; headers already sent")]
    HeadersAlreadySent,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(e: http::header::InvalidHeaderName) -> Self {
        Error::InvalidHeader(e.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(e: http::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeader(e.to_string())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
