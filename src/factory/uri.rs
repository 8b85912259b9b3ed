//! Request URI reconstruction from server parameters.

use std::collections::HashMap;

use crate::core::Result;
use crate::uri::{parser, Uri};

/// CGI-style server parameters (`HTTPS`, `SERVER_NAME`, `REQUEST_URI`, ...).
pub type ServerParams = HashMap<String, String>;

const DEFAULT_PORT: u32 = 80;

/// Values that take precedence over the server parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UriOverrides {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl UriOverrides {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none() && self.host.is_none() && self.port.is_none()
    }
}

/// Build the URI of the current request.
///
/// Scheme comes from `HTTPS`, host from `SERVER_NAME` or the server address,
/// port from `SERVER_PORT`, path and query from `REQUEST_URI`. Non-empty
/// overrides replace the retrieved scheme, host and port.
pub fn uri_from_server(server: &ServerParams, overrides: &UriOverrides) -> Result<Uri> {
    let scheme = non_empty(overrides.scheme.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| scheme(server).to_string());
    let host = non_empty(overrides.host.as_deref())
        .map(str::to_string)
        .or_else(|| host(server));
    let port = overrides
        .port
        .filter(|&port| port != 0)
        .map(u32::from)
        .unwrap_or_else(|| port(server));

    let (path, query) = match server.get("REQUEST_URI") {
        Some(request_uri) => {
            let parts = parser::split(request_uri)?;
            (parts.path.to_string(), parts.query.unwrap_or("").to_string())
        }
        None => (String::new(), String::new()),
    };

    let mut url = String::new();
    if let Some(host) = &host {
        url.push_str(&scheme);
        url.push_str("://");
        url.push_str(host);
        if port != 0 {
            url.push(':');
            url.push_str(&port.to_string());
        }
        url.push('/');
        url.push_str(path.trim_start_matches('/'));
    } else {
        url.push_str(&path);
    }
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    let uri = Uri::parse(&url)?;
    tracing::debug!(uri = %uri, host = host.as_deref(), port, "request URI built");

    if host.is_some() {
        return Ok(uri);
    }
    uri.with_scheme(&scheme)
        .with_port(Some(port).filter(|&port| port != 0))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn scheme(server: &ServerParams) -> &'static str {
    match server.get("HTTPS") {
        Some(https) if https != "off" => "https",
        _ => "http",
    }
}

/// `SERVER_NAME`, else the server address; `LOCAL_ADDR` wins over
/// `SERVER_ADDR`. IPv6 addresses are bracketed.
fn host(server: &ServerParams) -> Option<String> {
    if let Some(name) = server.get("SERVER_NAME") {
        return Some(name.clone());
    }

    let address = server
        .get("LOCAL_ADDR")
        .or_else(|| server.get("SERVER_ADDR"))
        .map(String::as_str)
        .filter(|address| !address.is_empty())?;

    if address.contains(':') && !address.starts_with('[') {
        Some(format!("[{}]", address))
    } else {
        Some(address.to_string())
    }
}

/// `SERVER_PORT`, 80 when absent; 0 when not numeric.
fn port(server: &ServerParams) -> u32 {
    server
        .get("SERVER_PORT")
        .map_or(DEFAULT_PORT, |port| port.trim().parse().unwrap_or(0))
}
