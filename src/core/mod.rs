//! Core HTTP message types.
//!
//! - [`Request`] / [`Response`] - HTTP messages with validated headers
//! - [`Stream`] - byte stream capability ([`FileStream`], [`MemoryStream`])
//! - [`UploadedFile`] - uploaded file relocated through an upload strategy
//! - [`Error`] - structural errors raised at the call site
//!
//! # Example
//!
//! ```rust
//! use es_http::core::{Request, Response};
//!
//! # fn main() -> es_http::core::Result<()> {
//! let req = Request::parse("http://example.com:8080/users?page=2")?
//!     .with_method("post")?
//!     .with_header("Accept", ["application/json"])?;
//! assert_eq!(req.request_target(), "/users?page=2");
//! assert_eq!(req.header_line("host"), "example.com:8080");
//!
//! let res = Response::ok("Created").with_status(201, "")?;
//! assert_eq!(res.reason_phrase(), "Created");
//! # Ok(())
//! # }
//! ```

mod error;
mod message;
mod request;
mod response;
mod stream;
mod uploaded_file;

pub use error::{Error, Result};
pub use message::DEFAULT_PROTOCOL;
pub use request::Request;
pub use response::{Response, ResponseBuilder};
pub use stream::{FileStream, MemoryStream, Stream, StreamMetadata};
pub use uploaded_file::{
    UploadedFile, UploadedFileBuilder, UPLOAD_ERR_CANT_WRITE, UPLOAD_ERR_EXTENSION,
    UPLOAD_ERR_FORM_SIZE, UPLOAD_ERR_INI_SIZE, UPLOAD_ERR_NO_FILE, UPLOAD_ERR_NO_TMP_DIR,
    UPLOAD_ERR_OK, UPLOAD_ERR_PARTIAL,
};
