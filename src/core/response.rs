//! HTTP response message.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use super::error::{Error, Result};
use super::message::{self, DEFAULT_PROTOCOL};

/// HTTP response.
///
/// `with_*` methods consume the response and return the modified one.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    protocol: String,
}

impl Response {
    /// Create an empty `200 OK` response.
    #[inline]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            protocol: DEFAULT_PROTOCOL.to_string(),
        }
    }

    /// Create a `200 OK` response with body.
    #[inline]
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new().with_body(body)
    }

    /// Create a response builder.
    #[inline]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Explicit reason phrase, else the canonical one, else empty.
    pub fn reason_phrase(&self) -> &str {
        match &self.reason {
            Some(reason) => reason,
            None => self.status.canonical_reason().unwrap_or(""),
        }
    }

    /// Set the status; an empty `reason` falls back to the canonical phrase.
    pub fn with_status(mut self, code: u16, reason: &str) -> Result<Self> {
        if !(100..=599).contains(&code) {
            return Err(Error::InvalidStatus(code));
        }
        self.status = StatusCode::from_u16(code).map_err(|_| Error::InvalidStatus(code))?;
        self.reason = (!reason.is_empty()).then(|| reason.to_string());
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
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for responses, collecting the first error.
pub struct ResponseBuilder {
    response: Result<Response>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            response: Ok(Response::new()),
        }
    }

    pub fn status(self, code: u16) -> Self {
        self.and_then(|res| res.with_status(code, ""))
    }

    pub fn reason(self, code: u16, reason: &str) -> Self {
        self.and_then(|res| res.with_status(code, reason))
    }

    /// Append a header value.
    pub fn header(self, name: &str, value: &str) -> Self {
        self.and_then(|res| res.with_added_header(name, [value]))
    }

    pub fn protocol(self, version: &str) -> Self {
        self.and_then(|res| res.with_protocol_version(version))
    }

    pub fn body(self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.and_then(|res| Ok(res.with_body(body)))
    }

    pub fn build(self) -> Result<Response> {
        self.response
    }

    fn and_then(self, f: impl FnOnce(Response) -> Result<Response>) -> Self {
        Self {
            response: self.response.and_then(f),
        }
    }
}
