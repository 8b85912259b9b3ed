//! Forced URI components.

use super::parse::{env_opt, env_parse};
use super::ConfigError;
use crate::factory::UriOverrides;

/// Load [`UriOverrides`] from FORCE_SCHEME, FORCE_HOST and FORCE_PORT.
pub fn overrides_from_env() -> Result<UriOverrides, ConfigError> {
    let port = match env_parse::<u32>("FORCE_PORT")? {
        Some(port) => Some(validate_port(port)?),
        None => None,
    };
    Ok(UriOverrides {
        scheme: env_opt("FORCE_SCHEME"),
        host: env_opt("FORCE_HOST"),
        port,
    })
}

fn validate_port(port: u32) -> Result<u16, ConfigError> {
    u16::try_from(port)
        .ok()
        .filter(|&port| port >= 1)
        .ok_or_else(|| ConfigError::Invalid {
            key: "FORCE_PORT".into(),
            message: format!("must be between 1 and 65535, {} received", port),
        })
}
