//! Outgoing or incoming HTTP request message.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method};

use super::error::{Error, Result};
use super::message::{self, DEFAULT_PROTOCOL};
use crate::uri::Uri;

/// Methods normalized to upper case; any other token is kept as given.
const KNOWN_METHODS: [&str; 9] = [
    "CONNECT", "DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT", "TRACE",
];

static HOST: HeaderName = header::HOST;

/// HTTP request.
///
/// `with_*` methods consume the request and return the modified one; clone
/// first to keep the original.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    target: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    protocol: String,
}

impl Request {
    /// Create a `GET` request for `uri`; the `Host` header follows the URI.
    pub fn new(uri: Uri) -> Self {
        let mut request = Self {
            method: Method::GET,
            uri: Uri::new(),
            target: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            protocol: DEFAULT_PROTOCOL.to_string(),
        };
        request.set_uri(uri, false);
        request
    }

    /// Create a request from an URI string.
    pub fn parse(uri: &str) -> Result<Self> {
        Ok(Self::new(Uri::parse(uri)?))
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Set the method; known methods are matched case-insensitively.
    pub fn with_method(mut self, method: &str) -> Result<Self> {
        let upper = method.to_ascii_uppercase();
        let method = if KNOWN_METHODS.contains(&upper.as_str()) {
            upper.as_str()
        } else {
            method
        };
        self.method = Method::from_bytes(method.as_bytes())
            .map_err(|_| Error::InvalidArgument(format!("invalid HTTP method \"{}\"", method)))?;
        Ok(self)
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Replace the URI.
    ///
    /// Unless `preserve_host` is set and a `Host` header exists, the header is
    /// updated from the URI host (with its port, when not standard).
    pub fn with_uri(mut self, uri: Uri, preserve_host: bool) -> Self {
        self.set_uri(uri, preserve_host);
        self
    }

    /// Origin-form target: the path (`/` when empty) and the query.
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.target {
            return target.clone();
        }
        let mut target = match self.uri.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if !self.uri.query().is_empty() {
            target.push('?');
            target.push_str(self.uri.query());
        }
        target
    }

    /// Override the request target with `*` or a URI without its fragment.
    pub fn with_request_target(mut self, target: &str) -> Result<Self> {
        self.target = Some(if target == "*" {
            target.to_string()
        } else {
            Uri::parse(target)?.with_fragment("").to_string()
        });
        Ok(self)
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn has_header(&self, name: &str) -> bool {
        !message::header_values(&self.headers, name).is_empty()
    }

    /// All values of a header.
    pub fn header(&self, name: &str) -> Vec<&str> {
        message::header_values(&self.headers, name)
    }

    /// All values of a header joined with `,`.
    pub fn header_line(&self, name: &str) -> String {
        message::header_line(&self.headers, name)
    }

    pub fn with_header<I, V>(mut self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        message::set_header(&mut self.headers, name, values)?;
        Ok(self)
    }

    pub fn with_added_header<I, V>(mut self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        message::add_header(&mut self.headers, name, values)?;
        Ok(self)
    }

    pub fn without_header(mut self, name: &str) -> Self {
        message::remove_header(&mut self.headers, name);
        self
    }

    #[inline]
    pub fn protocol_version(&self) -> &str {
        &self.protocol
    }

    pub fn with_protocol_version(mut self, version: &str) -> Result<Self> {
        self.protocol = message::validate_protocol(version)?;
        Ok(self)
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[inline]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    fn set_uri(&mut self, uri: Uri, preserve_host: bool) {
        self.uri = uri;
        if preserve_host && self.headers.contains_key(&HOST) {
            return;
        }
        let host = self.uri.host();
        if host.is_empty() {
            return;
        }
        let host = match self.uri.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        match message::header_value(&host) {
            Ok(value) => {
                self.headers.insert(HOST.clone(), value);
            }
            Err(err) => tracing::debug!(host = %host, error = %err, "host header not updated"),
        }
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new(Uri::new())
    }
}
