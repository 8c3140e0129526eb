//! Effective-hours resolution for a single date.
//!
//! First match wins: exact-date override, recurring month-day override,
//! weekly entry for the ISO weekday. A schedule with no weekly entries
//! resolves to closed with source `none`.

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use sl_domain::error::{Error, Result};

use crate::model::{iso_day, EffectiveHours};
use crate::store::HoursStore;
use crate::validation::parse_date;

pub fn hours_for_date<S: HoursStore + ?Sized>(
    store: &S,
    schedule_id: &Uuid,
    date: NaiveDate,
) -> Result<EffectiveHours> {
    if let Some(exact) = store.find_override_by_exact_date(schedule_id, date)? {
        return Ok(EffectiveHours::from(&exact));
    }

    // Oldest recurring entry wins if several share a month-day.
    if let Some(recurring) = store
        .list_recurring_overrides(schedule_id)?
        .iter()
        .filter(|o| o.matches_month_day(date))
        .min_by_key(|o| o.created_at)
    {
        return Ok(EffectiveHours::from(recurring));
    }

    let day = iso_day(date.weekday());
    let weekly = store.list_weekly_entries(schedule_id)?;
    match weekly.iter().find(|w| w.day_of_week == day) {
        Some(entry) => Ok(EffectiveHours::from(entry)),
        None => {
            tracing::debug!(%schedule_id, %date, "no weekly entry; resolving as closed");
            Ok(EffectiveHours::none())
        }
    }
}

/// [`hours_for_date`] for a `YYYY-MM-DD` string.
pub fn hours_for_date_str<S: HoursStore + ?Sized>(
    store: &S,
    schedule_id: &Uuid,
    ymd: &str,
) -> Result<EffectiveHours> {
    hours_for_date(store, schedule_id, parse_date(ymd)?)
}

/// Longest run [`week_from`] will resolve.
pub const MAX_RANGE_DAYS: u32 = 366;

/// Resolve `days` consecutive dates starting at `start`.
///
/// Runs longer than [`MAX_RANGE_DAYS`] are a validation error.
pub fn week_from<S: HoursStore + ?Sized>(
    store: &S,
    schedule_id: &Uuid,
    start: NaiveDate,
    days: u32,
) -> Result<Vec<(NaiveDate, EffectiveHours)>> {
    if days > MAX_RANGE_DAYS {
        return Err(Error::validation(format!(
            "cannot resolve {days} days at once (limit {MAX_RANGE_DAYS})"
        )));
    }
    let mut out = Vec::new();
    for offset in 0..days {
        let Some(date) = start.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        out.push((date, hours_for_date(store, schedule_id, date)?));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateOverrideEntry, HoursSource, OverrideInput, Schedule, WeeklyEntryInput};
    use crate::store::ScheduleStore;
    use chrono::{NaiveTime, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn exact_override_beats_weekly() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .create_override_entry(&s.id, OverrideInput::closed(d(2025, 12, 25), "Christmas Day"))
            .unwrap();

        let xmas = hours_for_date(&store, &s.id, d(2025, 12, 25)).unwrap();
        assert_eq!(xmas.source, HoursSource::Override);
        assert!(xmas.is_closed);
        assert_eq!(xmas.note.as_deref(), Some("Christmas Day"));

        let monday = hours_for_date(&store, &s.id, d(2025, 12, 22)).unwrap();
        assert_eq!(monday.source, HoursSource::Weekly);
        assert!(!monday.is_closed);
        assert_eq!(monday.open_time, Some(t(8, 0)));
        assert_eq!(monday.close_time, Some(t(17, 0)));
        assert_eq!(monday.note, None);
    }

    #[test]
    fn weekly_entry_follows_iso_weekday() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .update_weekly_entry(
                &s.id,
                7,
                WeeklyEntryInput {
                    is_closed: true,
                    ..Default::default()
                },
            )
            .unwrap();
        // 2025-12-28 is a Sunday.
        let sunday = hours_for_date(&store, &s.id, d(2025, 12, 28)).unwrap();
        assert_eq!(sunday.source, HoursSource::Weekly);
        assert!(sunday.is_closed);
        assert_eq!(sunday.open_time, None);
    }

    #[test]
    fn recurring_override_matches_any_year() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .create_override_entry(
                &s.id,
                OverrideInput::open(d(2019, 12, 24), t(8, 0), t(12, 0))
                    .recurring()
                    .with_note("Christmas Eve"),
            )
            .unwrap();

        for year in [2025, 2030] {
            let eve = hours_for_date(&store, &s.id, d(year, 12, 24)).unwrap();
            assert_eq!(eve.source, HoursSource::Override);
            assert!(!eve.is_closed);
            assert_eq!(eve.close_time, Some(t(12, 0)));
            assert_eq!(eve.close_time_nice().as_deref(), Some("12:00pm"));
        }
    }

    #[test]
    fn exact_override_beats_recurring() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .create_override_entry(&s.id, OverrideInput::closed(d(2000, 7, 4), "July 4th").recurring())
            .unwrap();
        store
            .create_override_entry(
                &s.id,
                OverrideInput::open(d(2026, 7, 4), t(10, 0), t(14, 0)).with_note("Semiquincentennial"),
            )
            .unwrap();

        let special = hours_for_date(&store, &s.id, d(2026, 7, 4)).unwrap();
        assert!(!special.is_closed);
        assert_eq!(special.note.as_deref(), Some("Semiquincentennial"));

        let usual = hours_for_date(&store, &s.id, d(2027, 7, 4)).unwrap();
        assert!(usual.is_closed);
        assert_eq!(usual.note.as_deref(), Some("July 4th"));
    }

    /// Recurring entries only, listed newest first.
    struct RecurringOnly(Vec<DateOverrideEntry>);

    impl HoursStore for RecurringOnly {
        fn list_weekly_entries(&self, _: &Uuid) -> Result<Vec<crate::model::WeeklyHourEntry>> {
            Ok(Vec::new())
        }

        fn find_override_by_exact_date(
            &self,
            _: &Uuid,
            _: NaiveDate,
        ) -> Result<Option<DateOverrideEntry>> {
            Ok(None)
        }

        fn list_recurring_overrides(&self, _: &Uuid) -> Result<Vec<DateOverrideEntry>> {
            Ok(self.0.clone())
        }

        fn create_override_entry(&self, _: &Uuid, _: OverrideInput) -> Result<DateOverrideEntry> {
            Err(Error::validation("read-only"))
        }
    }

    #[test]
    fn oldest_recurring_entry_wins() {
        let older = Utc::now() - chrono::Duration::days(10);
        let entries = [("newer", Utc::now()), ("older", older)]
            .into_iter()
            .map(|(note, created_at)| DateOverrideEntry {
                id: Uuid::new_v4(),
                date: d(2020, 1, 2),
                is_recurring: true,
                is_closed: true,
                open_time: None,
                close_time: None,
                note: Some(note.into()),
                created_at,
            })
            .collect();
        let store = RecurringOnly(entries);

        let h = hours_for_date(&store, &Uuid::new_v4(), d(2031, 1, 2)).unwrap();
        assert_eq!(h.note.as_deref(), Some("older"));
    }

    #[test]
    fn unseeded_schedule_resolves_to_none() {
        let store = ScheduleStore::in_memory();
        let mut s = Schedule::seeded("Empty", t(8, 0), t(17, 0));
        s.hours.clear();
        let id = s.id;
        store.insert_schedule(s).unwrap();

        for date in [d(2025, 1, 6), d(2025, 6, 15), d(2030, 12, 25)] {
            let h = hours_for_date(&store, &id, date).unwrap();
            assert_eq!(h, EffectiveHours::none());
        }
    }

    #[test]
    fn string_dates_parse_at_the_boundary() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        assert_eq!(
            hours_for_date_str(&store, &s.id, "2025-12-22").unwrap().source,
            HoursSource::Weekly
        );
        assert!(matches!(
            hours_for_date_str(&store, &s.id, "next tuesday"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn unknown_schedule_is_not_found() {
        let store = ScheduleStore::in_memory();
        assert!(matches!(
            hours_for_date(&store, &Uuid::new_v4(), d(2025, 1, 1)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn week_from_covers_consecutive_days() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .create_override_entry(&s.id, OverrideInput::closed(d(2025, 12, 25), "Christmas Day"))
            .unwrap();
        let week = week_from(&store, &s.id, d(2025, 12, 22), 7).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].0, d(2025, 12, 22));
        assert_eq!(week[6].0, d(2025, 12, 28));
        let closed: Vec<NaiveDate> = week.iter().filter(|(_, h)| h.is_closed).map(|(d, _)| *d).collect();
        assert_eq!(closed, vec![d(2025, 12, 25)]);
    }

    #[test]
    fn week_from_refuses_oversized_ranges() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        assert!(matches!(
            week_from(&store, &s.id, d(2025, 1, 1), u32::MAX),
            Err(Error::Validation(_))
        ));
        let year = week_from(&store, &s.id, d(2024, 1, 1), MAX_RANGE_DAYS).unwrap();
        assert_eq!(year.len(), 366);
        assert_eq!(year[365].0, d(2024, 12, 31));
        assert!(week_from(&store, &s.id, d(2025, 1, 1), 0).unwrap().is_empty());
    }
}
