//! Header and protocol rules shared by requests and responses.

use std::borrow::Cow;

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;

use super::error::{Error, Result};

/// Default protocol version of new messages.
pub const DEFAULT_PROTOCOL: &str = "1.1";

/// Accept versions from 1.0 up to, but excluding, 2.0.
pub(crate) fn validate_protocol(version: &str) -> Result<String> {
    let version = version.trim();
    if version.is_empty() {
        return Err(Error::InvalidArgument(
            "the version of HTTP protocol can not be empty".into(),
        ));
    }

    let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
    let is_number = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !is_number(major) || !is_number(minor) {
        return Err(Error::UnsupportedProtocol(version.to_string()));
    }
    match major.trim_start_matches('0') {
        "1" => Ok(version.to_string()),
        _ => Err(Error::UnsupportedProtocol(version.to_string())),
    }
}

pub(crate) fn header_name(name: &str) -> Result<HeaderName> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidHeader("header name is empty".into()));
    }
    Ok(HeaderName::from_bytes(name.as_bytes())?)
}

/// Trim, reject empty values and collapse inner whitespace runs.
pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidHeader("empty header value provided".into()));
    }
    let value: Cow<'_, str> = if value.contains(char::is_whitespace) {
        Cow::Owned(value.split_whitespace().collect::<Vec<_>>().join(" "))
    } else {
        Cow::Borrowed(value)
    };
    Ok(HeaderValue::from_str(&value)?)
}

/// Replace every value of `name`.
pub(crate) fn set_header<I, V>(headers: &mut HeaderMap, name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    let name = header_name(name)?;
    let values = prepare_values(values)?;
    headers.remove(&name);
    for value in values {
        headers.append(name.clone(), value);
    }
    Ok(())
}

/// Append values to `name`, keeping the existing ones.
pub(crate) fn add_header<I, V>(headers: &mut HeaderMap, name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    let name = header_name(name)?;
    for value in prepare_values(values)? {
        headers.append(name.clone(), value);
    }
    Ok(())
}

pub(crate) fn remove_header(headers: &mut HeaderMap, name: &str) {
    if let Ok(name) = HeaderName::from_bytes(name.trim().as_bytes()) {
        headers.remove(name);
    }
}

/// Values of `name`; values that are not visible ASCII are skipped.
pub(crate) fn header_values<'a>(headers: &'a HeaderMap, name: &str) -> Vec<&'a str> {
    match HeaderName::from_bytes(name.trim().as_bytes()) {
        Ok(name) => headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Values of `name` joined with `,`, empty when absent.
pub(crate) fn header_line(headers: &HeaderMap, name: &str) -> String {
    header_values(headers, name).join(",")
}

fn prepare_values<I, V>(values: I) -> Result<Vec<HeaderValue>>
where
    I: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| header_value(value.as_ref()))
        .collect()
}
