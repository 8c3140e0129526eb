//! Store-hours data model: weekly entries, date overrides, schedules,
//! and the resolved [`EffectiveHours`] value.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::format::nice_time;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Day-of-week helpers (ISO: 1 = Monday .. 7 = Sunday)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// ISO day number for a weekday.
pub fn iso_day(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

/// Human name for an ISO day number, or `None` outside `1..=7`.
pub fn day_name(day_of_week: u8) -> Option<&'static str> {
    match day_of_week {
        1..=7 => Some(DAY_NAMES[usize::from(day_of_week) - 1]),
        _ => None,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Weekly entries
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default open/close rule for one day of the week.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyHourEntry {
    /// ISO day number, fixed once seeded.
    pub day_of_week: u8,
    /// Display label, e.g. "Monday" or "Sales Hours".
    pub label: String,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl WeeklyHourEntry {
    /// Open entry labeled with the weekday name.
    pub fn open(day_of_week: u8, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            day_of_week,
            label: day_name(day_of_week).unwrap_or_default().to_string(),
            open_time: Some(open),
            close_time: Some(close),
            is_closed: false,
        }
    }

    pub fn day_name(&self) -> &'static str {
        day_name(self.day_of_week).unwrap_or("?")
    }

    pub fn open_time_nice(&self) -> Option<String> {
        self.open_time.map(nice_time)
    }

    pub fn close_time_nice(&self) -> Option<String> {
        self.close_time.map(nice_time)
    }
}

/// Editor input for updating a weekly entry in place.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WeeklyEntryInput {
    /// Leave `None` to keep the current label; an empty string resets it
    /// to the weekday name.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub open_time: Option<NaiveTime>,
    #[serde(default)]
    pub close_time: Option<NaiveTime>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Date overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A per-date exception to the weekly pattern (holiday or special hours).
///
/// Either closed with both times `None`, or open with both times set and
/// `close_time > open_time`. The store enforces this before persisting.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateOverrideEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Repeats every year on the same month-day.
    #[serde(default)]
    pub is_recurring: bool,
    pub is_closed: bool,
    #[serde(default)]
    pub open_time: Option<NaiveTime>,
    #[serde(default)]
    pub close_time: Option<NaiveTime>,
    /// Free-text label, e.g. "Independence Day (Observed)".
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DateOverrideEntry {
    /// Friendly name for listings: the note, or a generic label.
    pub fn holiday_name(&self) -> &str {
        match self.note.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => "Holiday",
        }
    }

    /// True when this entry applies to `date` by month-day alone.
    pub fn matches_month_day(&self, date: NaiveDate) -> bool {
        self.date.month() == date.month() && self.date.day() == date.day()
    }

    pub fn open_time_nice(&self) -> Option<String> {
        self.open_time.map(nice_time)
    }

    pub fn close_time_nice(&self) -> Option<String> {
        self.close_time.map(nice_time)
    }
}

/// Fields for creating a [`DateOverrideEntry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverrideInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub open_time: Option<NaiveTime>,
    #[serde(default)]
    pub close_time: Option<NaiveTime>,
    #[serde(default)]
    pub note: Option<String>,
}

impl OverrideInput {
    pub fn closed(date: NaiveDate, note: impl Into<String>) -> Self {
        Self {
            date,
            is_recurring: false,
            is_closed: true,
            open_time: None,
            close_time: None,
            note: Some(note.into()),
        }
    }

    pub fn open(date: NaiveDate, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            date,
            is_recurring: false,
            is_closed: false,
            open_time: Some(open),
            close_time: Some(close),
            note: None,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Schedule
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Seven weekly entries plus any number of date overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Sorted Monday..Sunday. Empty only for schedules that were never seeded.
    #[serde(default)]
    pub hours: Vec<WeeklyHourEntry>,
    #[serde(default)]
    pub overrides: Vec<DateOverrideEntry>,
}

impl Schedule {
    /// New schedule with all seven days open `open..close`.
    pub fn seeded(title: impl Into<String>, open: NaiveTime, close: NaiveTime) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            notes: None,
            created_at: now,
            updated_at: now,
            hours: (1..=7).map(|d| WeeklyHourEntry::open(d, open, close)).collect(),
            overrides: Vec::new(),
        }
    }

    pub fn weekly_entry(&self, day_of_week: u8) -> Option<&WeeklyHourEntry> {
        self.hours.iter().find(|h| h.day_of_week == day_of_week)
    }

    /// Overrides sorted by date, for listings.
    pub fn overrides_by_date(&self) -> Vec<&DateOverrideEntry> {
        let mut out: Vec<&DateOverrideEntry> = self.overrides.iter().collect();
        out.sort_by_key(|o| (o.date, o.created_at));
        out
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resolution result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Which rule produced an [`EffectiveHours`] value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HoursSource {
    Override,
    Weekly,
    None,
}

impl fmt::Display for HoursSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Override => "override",
            Self::Weekly => "weekly",
            Self::None => "none",
        })
    }
}

/// Effective hours for one date. Computed per query, never stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveHours {
    pub source: HoursSource,
    pub is_closed: bool,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub note: Option<String>,
}

impl EffectiveHours {
    /// Closed with no rule behind it (schedule never seeded or not linked).
    pub fn none() -> Self {
        Self {
            source: HoursSource::None,
            is_closed: true,
            open_time: None,
            close_time: None,
            note: None,
        }
    }

    pub fn open_time_nice(&self) -> Option<String> {
        self.open_time.map(nice_time)
    }

    pub fn close_time_nice(&self) -> Option<String> {
        self.close_time.map(nice_time)
    }
}

impl From<&DateOverrideEntry> for EffectiveHours {
    fn from(o: &DateOverrideEntry) -> Self {
        Self {
            source: HoursSource::Override,
            is_closed: o.is_closed,
            open_time: o.open_time,
            close_time: o.close_time,
            note: o.note.clone(),
        }
    }
}

impl From<&WeeklyHourEntry> for EffectiveHours {
    fn from(w: &WeeklyHourEntry) -> Self {
        Self {
            source: HoursSource::Weekly,
            is_closed: w.is_closed,
            open_time: w.open_time,
            close_time: w.close_time,
            note: None,
        }
    }
}

impl fmt::Display for EffectiveHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_closed, self.open_time, self.close_time) {
            (false, Some(open), Some(close)) => {
                write!(f, "{} - {}", nice_time(open), nice_time(close))?
            }
            _ => f.write_str("closed")?,
        }
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}
