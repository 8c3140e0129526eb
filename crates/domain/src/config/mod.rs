mod holidays;
mod hours;
mod logging;
mod store;

pub use holidays::*;
pub use hours::*;
pub use logging::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub defaults: DefaultHoursConfig,
    #[serde(default)]
    pub holidays: HolidaysConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.store.state_path.as_os_str().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "store.state_path".into(),
                message: "state_path must not be empty".into(),
            });
        }

        let open = self.defaults.open();
        let close = self.defaults.close();
        if open.is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "defaults.open_time".into(),
                message: format!(
                    "'{}' is not a valid time (expected HH:MM)",
                    self.defaults.open_time
                ),
            });
        }
        if close.is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "defaults.close_time".into(),
                message: format!(
                    "'{}' is not a valid time (expected HH:MM)",
                    self.defaults.close_time
                ),
            });
        }
        if let (Some(open), Some(close)) = (open, close) {
            if close <= open {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "defaults.close_time".into(),
                    message: "close_time must be after open_time".into(),
                });
            }
        }

        if !self.holidays.mark_closed {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "holidays.mark_closed".into(),
                message: "generated holidays will be open with the regular weekly hours".into(),
            });
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "logging.filter".into(),
                message: "empty filter; falling back to \"warn\"".into(),
            });
        }

        errors
    }
}
