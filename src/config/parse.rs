//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse optional environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|v| {
            v.trim().parse().map_err(|e: T::Err| ConfigError::Parse {
                key: key.into(),
                value: v.clone(),
                error: e.to_string(),
            })
        })
        .transpose()
}

/// Parse environment variable as octal permission bits ("0700", "700", "0o700").
pub fn env_octal(key: &str, default: u32) -> Result<u32, ConfigError> {
    match env_opt(key) {
        Some(v) => parse_octal(&v).map_err(|error| ConfigError::Parse {
            key: key.into(),
            value: v,
            error,
        }),
        None => Ok(default),
    }
}

/// Parse an octal mode, with or without a `0`/`0o` prefix.
pub fn parse_octal(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u32::from_str_radix(digits, 8).map_err(|e| e.to_string())?;
    if mode > 0o7777 {
        return Err(format!("mode {:o} exceeds 7777", mode));
    }
    Ok(mode)
}
