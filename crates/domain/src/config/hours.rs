use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Default weekly hours
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Hours seeded into the seven weekly entries of a new schedule.
///
/// Times are kept as `HH:MM` strings so the TOML stays readable; use
/// [`DefaultHoursConfig::open`] / [`DefaultHoursConfig::close`] to get
/// parsed values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultHoursConfig {
    #[serde(default = "d_open")]
    pub open_time: String,
    #[serde(default = "d_close")]
    pub close_time: String,
}

impl Default for DefaultHoursConfig {
    fn default() -> Self {
        Self {
            open_time: d_open(),
            close_time: d_close(),
        }
    }
}

impl DefaultHoursConfig {
    pub fn open(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.open_time)
    }

    pub fn close(&self) -> Option<NaiveTime> {
        parse_clock_time(&self.close_time)
    }

    /// Parsed `(open, close)` pair for seeding, or [`Error::Config`] when
    /// either time is malformed or close is not after open.
    pub fn seed_hours(&self) -> Result<(NaiveTime, NaiveTime)> {
        let open = self.open().ok_or_else(|| {
            Error::Config(format!("defaults.open_time '{}' is not HH:MM", self.open_time))
        })?;
        let close = self.close().ok_or_else(|| {
            Error::Config(format!("defaults.close_time '{}' is not HH:MM", self.close_time))
        })?;
        if close <= open {
            return Err(Error::Config(format!(
                "defaults.close_time {} must be after open_time {}",
                self.close_time, self.open_time
            )));
        }
        Ok((open, close))
    }
}

/// Parse a 24-hour clock time written as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn d_open() -> String {
    "08:00".into()
}
fn d_close() -> String {
    "17:00".into()
}
