//! Splitting of URI strings into raw components.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Error, Result};

/// RFC 3986, appendix B.
static URI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?s)(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("URI regex is valid")
});

/// Raw, not yet encoded, components of a URI string.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RawParts<'a> {
    pub scheme: Option<&'a str>,
    pub user: Option<&'a str>,
    pub password: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<u32>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

/// Split `input` into its components.
///
/// A port of `0` or an empty port is reported as absent.
pub(crate) fn split(input: &str) -> Result<RawParts<'_>> {
    let caps = URI_REGEX
        .captures(input)
        .ok_or_else(|| Error::InvalidUri(input.to_string()))?;

    let mut parts = RawParts {
        scheme: caps.get(1).map(|m| m.as_str()),
        path: caps.get(3).map_or("", |m| m.as_str()),
        query: caps.get(4).map(|m| m.as_str()),
        fragment: caps.get(5).map(|m| m.as_str()),
        ..Default::default()
    };

    if let Some(authority) = caps.get(2).map(|m| m.as_str()) {
        split_authority(input, authority, &mut parts)?;
    }

    Ok(parts)
}

fn split_authority<'a>(input: &str, authority: &'a str, parts: &mut RawParts<'a>) -> Result<()> {
    let host_port = match authority.rfind('@') {
        Some(at) => {
            let user_info = &authority[..at];
            match user_info.split_once(':') {
                Some((user, password)) => {
                    parts.user = Some(user);
                    parts.password = Some(password);
                }
                None => parts.user = Some(user_info),
            }
            &authority[at + 1..]
        }
        None => authority,
    };

    // IPv6 literal, see RFC 2732
    let (host, port) = if host_port.starts_with('[') {
        let close = host_port
            .find(']')
            .ok_or_else(|| Error::InvalidUri(input.to_string()))?;
        let rest = &host_port[close + 1..];
        let port = match rest.strip_prefix(':') {
            Some(port) => Some(port),
            None if rest.is_empty() => None,
            None => return Err(Error::InvalidUri(input.to_string())),
        };
        (&host_port[..=close], port)
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    parts.host = Some(host);
    parts.port = match port {
        None | Some("") => None,
        Some(port) => {
            if !port.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidUri(input.to_string()));
            }
            let port: u32 = port
                .parse()
                .map_err(|_| Error::InvalidUri(input.to_string()))?;
            (port != 0).then_some(port)
        }
    };

    Ok(())
}
