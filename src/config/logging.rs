//! Logging configuration.

use super::parse::{env_opt, env_or};
use super::ConfigError;

/// Levels accepted by LOG_LEVEL.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

const DEFAULT_FILTER: &str = "es_http=info";
const DEFAULT_SERVICE_NAME: &str = "es_http";

/// Logging configuration loaded from environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives.
    pub filter: String,
    /// Reported as `ctx.service` in every log line.
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// LOG_LEVEL takes a bare level (`debug`) applied to this crate; RUST_LOG
    /// takes full filter syntax (`es_http=debug,other=warn`). LOG_LEVEL wins
    /// when valid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            filter: Self::resolve_log_filter(),
            service_name: env_or("SERVICE_NAME", DEFAULT_SERVICE_NAME),
        })
    }

    fn resolve_log_filter() -> String {
        let level = env_opt("LOG_LEVEL")
            .map(|level| level.to_lowercase())
            .filter(|level| LOG_LEVELS.contains(&level.as_str()));

        match level {
            Some(level) => format!("es_http={}", level),
            None => env_opt("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use std::env;

    #[test]
    fn test_log_level_priority() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("LOG_LEVEL");
        env::remove_var("RUST_LOG");

        assert_eq!(LoggingConfig::resolve_log_filter(), "es_http=info");

        env::set_var("RUST_LOG", "es_http=warn,tracing=debug");
        assert_eq!(
            LoggingConfig::resolve_log_filter(),
            "es_http=warn,tracing=debug"
        );

        env::set_var("LOG_LEVEL", "DEBUG");
        assert_eq!(LoggingConfig::resolve_log_filter(), "es_http=debug");

        // Unknown level falls back to RUST_LOG
        env::set_var("LOG_LEVEL", "verbose");
        assert_eq!(
            LoggingConfig::resolve_log_filter(),
            "es_http=warn,tracing=debug"
        );

        env::remove_var("LOG_LEVEL");
        env::remove_var("RUST_LOG");
    }

    #[test]
    fn test_service_name() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("SERVICE_NAME");
        assert_eq!(LoggingConfig::from_env().unwrap().service_name, "es_http");

        env::set_var("SERVICE_NAME", "uploads");
        assert_eq!(LoggingConfig::from_env().unwrap().service_name, "uploads");
        env::remove_var("SERVICE_NAME");
    }
}
