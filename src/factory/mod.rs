//! Construction of message parts from server-provided data.
//!
//! - [`uri_from_server`] rebuilds the request URI from CGI-style server
//!   parameters, with explicit [`UriOverrides`]
//! - [`normalize_files`] turns a `$_FILES`-shaped JSON document into a tree
//!   of [`UploadNode`]s

mod uploaded_files;
mod uri;

pub use uploaded_files::{normalize_files, UploadNode};
pub use uri::{uri_from_server, ServerParams, UriOverrides};
