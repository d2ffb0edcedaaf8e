//! Environment configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Get environment from ENV variable
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| String::from("development"))
            .parse()
            .unwrap_or(Environment::Development)
    }

    /// Get the .env file name for this environment
    pub fn env_file(&self) -> &str {
        match self {
            Environment::Development => ".env.development",
            Environment::Staging => ".env.staging",
            Environment::Production => ".env.production",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Create logging config for environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
            },
            Environment::Production => Self {
                level: String::from("warn"),
                format: LogFormat::Json,
            },
        }
    }

    /// Filter directive honoring `RUST_LOG` when set
    pub fn filter_directive(&self) -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone())
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("invalid".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_properties() {
        assert_eq!(Environment::Production.env_file(), ".env.production");
        assert_eq!(Environment::Staging.to_string(), "staging");
    }

    #[test]
    fn test_logging_config_for_environment() {
        let dev_log = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev_log.level, "debug");
        assert_eq!(dev_log.format, LogFormat::Pretty);

        let prod_log = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod_log.level, "warn");
        assert_eq!(prod_log.format, LogFormat::Json);
    }
}
