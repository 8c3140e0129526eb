//! Write-time validation for weekly and override entries.
//!
//! Both entry kinds share one policy: an open day needs both times with
//! close after open, and a closed day carries no times at all. Whole
//! schedules coming from imports or the state file go through
//! [`normalize_schedule`], which applies the same policy plus the
//! uniqueness rules the store enforces on single writes.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime};

use sl_domain::error::{Error, Result};

use crate::model::Schedule;

/// Normalized `(open, close)` pair ready to persist.
pub type HoursPair = (Option<NaiveTime>, Option<NaiveTime>);

/// Check the closed/open-time invariant and return the times to store.
///
/// Closed entries always come back as `(None, None)`.
pub fn validate_hours(
    is_closed: bool,
    open_time: Option<NaiveTime>,
    close_time: Option<NaiveTime>,
) -> Result<HoursPair> {
    if is_closed {
        return Ok((None, None));
    }
    let (Some(open), Some(close)) = (open_time, close_time) else {
        return Err(Error::validation(
            "provide both open and close times, or mark the day closed",
        ));
    };
    if close <= open {
        return Err(Error::validation(format!(
            "close time {} must be after open time {}",
            close.format("%H:%M"),
            open.format("%H:%M")
        )));
    }
    Ok((Some(open), Some(close)))
}

/// ISO day-of-week must be `1..=7`.
pub fn validate_day_of_week(day_of_week: u8) -> Result<()> {
    if (1..=7).contains(&day_of_week) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "day of week {day_of_week} out of range 1..=7 (Monday..Sunday)"
        )))
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("invalid date '{s}': expected YYYY-MM-DD")))
}

/// Check every entry of a schedule and clear the times of closed ones.
///
/// Rejects bad day numbers, repeated weekdays, repeated exact dates, and
/// two recurring overrides on the same month-day. A schedule with no
/// weekly entries is accepted.
pub fn normalize_schedule(schedule: &mut Schedule) -> Result<()> {
    let label = format!("{} ({})", schedule.id, schedule.title);
    let context = |e: Error| match e {
        Error::Validation(msg) => Error::Validation(format!("schedule {label}: {msg}")),
        other => other,
    };
    if schedule.title.trim().is_empty() {
        return Err(context(Error::validation("title must not be empty")));
    }

    let mut days = HashSet::new();
    for entry in &mut schedule.hours {
        validate_day_of_week(entry.day_of_week).map_err(context)?;
        if !days.insert(entry.day_of_week) {
            return Err(context(Error::validation(format!(
                "day of week {} listed twice",
                entry.day_of_week
            ))));
        }
        let (open, close) = validate_hours(entry.is_closed, entry.open_time, entry.close_time)
            .map_err(|e| context(prefix(e, entry.day_name())))?;
        entry.open_time = open;
        entry.close_time = close;
    }
    schedule.hours.sort_by_key(|h| h.day_of_week);

    let mut dates = HashSet::new();
    let mut month_days = HashSet::new();
    for o in &mut schedule.overrides {
        if !dates.insert(o.date) {
            return Err(context(Error::validation(format!("override {} listed twice", o.date))));
        }
        if o.is_recurring && !month_days.insert((o.date.month(), o.date.day())) {
            return Err(context(Error::validation(format!(
                "recurring override {} listed twice",
                o.date.format("%m-%d")
            ))));
        }
        let (open, close) = validate_hours(o.is_closed, o.open_time, o.close_time)
            .map_err(|e| context(prefix(e, &o.date.to_string())))?;
        o.open_time = open;
        o.close_time = close;
    }
    Ok(())
}

fn prefix(e: Error, what: &str) -> Error {
    match e {
        Error::Validation(msg) => Error::Validation(format!("{what}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DateOverrideEntry;
    use chrono::Utc;
    use uuid::Uuid;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn closed_clears_times() {
        assert_eq!(validate_hours(true, t(8, 0), t(17, 0)).unwrap(), (None, None));
        assert_eq!(validate_hours(true, None, None).unwrap(), (None, None));
    }

    #[test]
    fn open_requires_both_times() {
        assert!(matches!(
            validate_hours(false, t(8, 0), None),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            validate_hours(false, None, t(17, 0)),
            Err(Error::Validation(_))
        ));
        assert!(validate_hours(false, None, None).is_err());
    }

    #[test]
    fn close_must_follow_open() {
        assert!(validate_hours(false, t(17, 0), t(8, 0)).is_err());
        assert!(validate_hours(false, t(9, 0), t(9, 0)).is_err());
        assert_eq!(
            validate_hours(false, t(9, 0), t(9, 1)).unwrap(),
            (t(9, 0), t(9, 1))
        );
    }

    #[test]
    fn day_of_week_bounds() {
        assert!(validate_day_of_week(1).is_ok());
        assert!(validate_day_of_week(7).is_ok());
        assert!(validate_day_of_week(0).is_err());
        assert!(validate_day_of_week(8).is_err());
    }

    #[test]
    fn parse_date_accepts_iso_only() {
        assert_eq!(
            parse_date("2025-12-25").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()
        );
        assert!(parse_date("12/25/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    fn schedule() -> Schedule {
        Schedule::seeded("Main", t(8, 0).unwrap(), t(17, 0).unwrap())
    }

    fn entry(y: i32, m: u32, d: u32, recurring: bool) -> DateOverrideEntry {
        DateOverrideEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            is_recurring: recurring,
            is_closed: true,
            open_time: None,
            close_time: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalize_accepts_seeded_and_unseeded() {
        let mut s = schedule();
        normalize_schedule(&mut s).unwrap();
        s.hours.clear();
        normalize_schedule(&mut s).unwrap();
    }

    #[test]
    fn normalize_rejects_inverted_weekly_hours() {
        let mut s = schedule();
        s.hours[0].open_time = t(17, 0);
        s.hours[0].close_time = t(8, 0);
        let err = normalize_schedule(&mut s).unwrap_err();
        assert!(matches!(&err, Error::Validation(msg) if msg.contains("Monday")));
    }

    #[test]
    fn normalize_rejects_open_override_without_times() {
        let mut s = schedule();
        let mut o = entry(2025, 12, 25, false);
        o.is_closed = false;
        s.overrides.push(o);
        let err = normalize_schedule(&mut s).unwrap_err();
        assert!(matches!(&err, Error::Validation(msg) if msg.contains("2025-12-25")));
    }

    #[test]
    fn normalize_rejects_bad_and_repeated_days() {
        let mut s = schedule();
        s.hours[6].day_of_week = 9;
        assert!(normalize_schedule(&mut s).is_err());

        let mut s = schedule();
        s.hours[6].day_of_week = 1;
        assert!(normalize_schedule(&mut s).is_err());
    }

    #[test]
    fn normalize_rejects_duplicate_dates() {
        let mut s = schedule();
        s.overrides = vec![entry(2025, 7, 4, false), entry(2025, 7, 4, false)];
        assert!(normalize_schedule(&mut s).is_err());

        let mut s = schedule();
        s.overrides = vec![entry(2020, 12, 25, true), entry(2021, 12, 25, true)];
        assert!(normalize_schedule(&mut s).is_err());

        // One recurring plus one dated entry on the same month-day is fine.
        let mut s = schedule();
        s.overrides = vec![entry(2020, 12, 25, true), entry(2021, 12, 25, false)];
        normalize_schedule(&mut s).unwrap();
    }

    #[test]
    fn normalize_clears_times_on_closed_entries() {
        let mut s = schedule();
        s.hours[6].is_closed = true;
        let mut o = entry(2025, 1, 1, false);
        o.open_time = t(9, 0);
        s.overrides.push(o);
        normalize_schedule(&mut s).unwrap();
        assert_eq!(s.hours[6].open_time, None);
        assert_eq!(s.overrides[0].open_time, None);
    }
}
