//! U.S. federal holiday calendar and bulk materialization into a schedule.
//!
//! Fixed-date holidays can be shifted to an observed weekday (Saturday →
//! Friday, Sunday → Monday). Weekday-rule holidays are already anchored to
//! a weekday and never shift.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use uuid::Uuid;

use sl_domain::error::Result;

use crate::model::{iso_day, OverrideInput, WeeklyHourEntry};
use crate::store::HoursStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Holiday table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const FIXED_HOLIDAYS: [(u32, u32, &str); 5] = [
    (1, 1, "New Year's Day"),
    (6, 19, "Juneteenth National Independence Day"),
    (7, 4, "Independence Day"),
    (11, 11, "Veterans Day"),
    (12, 25, "Christmas Day"),
];

#[derive(Clone, Copy, Debug)]
enum Occurrence {
    Nth(u32),
    Last,
}

const WEEKDAY_HOLIDAYS: [(u32, Weekday, Occurrence, &str); 6] = [
    (1, Weekday::Mon, Occurrence::Nth(3), "Birthday of Martin Luther King, Jr."),
    (2, Weekday::Mon, Occurrence::Nth(3), "Washington's Birthday"),
    (5, Weekday::Mon, Occurrence::Last, "Memorial Day"),
    (9, Weekday::Mon, Occurrence::Nth(1), "Labor Day"),
    (10, Weekday::Mon, Occurrence::Nth(2), "Columbus Day"),
    (11, Weekday::Thu, Occurrence::Nth(4), "Thanksgiving Day"),
];

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Date arithmetic
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The `n`-th (1-based) `weekday` of a month: first occurrence, then
/// `n - 1` weeks later. `None` if that lands outside the month.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let shift =
        (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let date = first.checked_add_days(Days::new(u64::from(shift + 7 * (n - 1))))?;
    (date.month() == month).then_some(date)
}

/// The last `weekday` of a month: last calendar day, stepped back to the
/// most recent matching weekday.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month.pred_opt()?;
    let back =
        (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last.checked_sub_days(Days::new(u64::from(back)))
}

/// Observed weekday for a fixed-date holiday. Weekdays map to themselves.
pub fn observed_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.pred_opt().unwrap_or(date),
        Weekday::Sun => date.succ_opt().unwrap_or(date),
        _ => date,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Federal holidays for `year`, keyed and ordered by date.
///
/// With `include_observed`, weekend fixed-date holidays gain an extra
/// `"<Name> (Observed)"` entry on the adjacent Friday or Monday. Entries are
/// keyed by date, so a later insert on the same date replaces an earlier one.
pub fn generate_federal_holidays(year: i32, include_observed: bool) -> BTreeMap<NaiveDate, String> {
    let mut out = BTreeMap::new();

    for (month, day, name) in FIXED_HOLIDAYS {
        let Some(actual) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        out.insert(actual, name.to_string());

        if include_observed {
            let observed = observed_date(actual);
            if observed != actual {
                out.insert(observed, format!("{name} (Observed)"));
            }
        }
    }

    for (month, weekday, occurrence, name) in WEEKDAY_HOLIDAYS {
        let date = match occurrence {
            Occurrence::Nth(n) => nth_weekday_of_month(year, month, weekday, n),
            Occurrence::Last => last_weekday_of_month(year, month, weekday),
        };
        if let Some(date) = date {
            out.insert(date, name.to_string());
        }
    }

    out
}

/// Insert the federal holidays for `year` into a schedule as non-recurring
/// overrides. Dates that already carry an override are skipped.
///
/// Returns the number of entries created. Closed entries carry no times;
/// with `mark_closed = false` each entry copies the weekly hours for its
/// weekday, and stays closed when that weekday is closed.
pub fn materialize_federal_holidays<S: HoursStore + ?Sized>(
    store: &S,
    schedule_id: &Uuid,
    year: i32,
    include_observed: bool,
    mark_closed: bool,
) -> Result<usize> {
    let holidays = generate_federal_holidays(year, include_observed);
    let weekly = if mark_closed {
        Vec::new()
    } else {
        store.list_weekly_entries(schedule_id)?
    };

    let mut created = 0;
    for (date, name) in holidays {
        let input = if mark_closed {
            OverrideInput::closed(date, name)
        } else {
            open_holiday(&weekly, date, name)
        };
        match store.insert_override_if_absent(schedule_id, input)? {
            Some(_) => created += 1,
            None => tracing::debug!(%schedule_id, %date, "override already present; skipped"),
        }
    }

    tracing::info!(
        %schedule_id,
        year,
        include_observed,
        mark_closed,
        created,
        "materialized federal holidays"
    );
    Ok(created)
}

fn open_holiday(weekly: &[WeeklyHourEntry], date: NaiveDate, name: String) -> OverrideInput {
    let day = iso_day(date.weekday());
    match weekly.iter().find(|w| w.day_of_week == day) {
        Some(WeeklyHourEntry {
            is_closed: false,
            open_time: Some(open),
            close_time: Some(close),
            ..
        }) => OverrideInput::open(date, *open, *close).with_note(name),
        _ => OverrideInput::closed(date, name),
    }
}
