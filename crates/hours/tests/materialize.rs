use std::cell::RefCell;

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use sl_domain::error::{Error, Result};
use sl_hours::{
    hours_for_date, materialize_federal_holidays, DateOverrideEntry, HoursSource, HoursStore,
    OverrideInput, ScheduleStore, WeeklyEntryInput, WeeklyHourEntry,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn second_run_creates_nothing() {
    let store = ScheduleStore::in_memory();
    let s = store.create_schedule("Main").unwrap();

    let first = materialize_federal_holidays(&store, &s.id, 2021, true, true).unwrap();
    // 2021: Juneteenth (Sat), Independence Day (Sun), Christmas (Sat) shift;
    // New Year's Day 2022 is not part of 2021.
    assert_eq!(first, 14);
    let second = materialize_federal_holidays(&store, &s.id, 2021, true, true).unwrap();
    assert_eq!(second, 0);
    assert_eq!(store.get_schedule(&s.id).unwrap().overrides.len(), 14);
}

#[test]
fn rerun_with_observed_adds_only_new_dates() {
    let store = ScheduleStore::in_memory();
    let s = store.create_schedule("Main").unwrap();

    assert_eq!(materialize_federal_holidays(&store, &s.id, 2021, false, true).unwrap(), 11);
    assert_eq!(materialize_federal_holidays(&store, &s.id, 2021, true, true).unwrap(), 3);
}

#[test]
fn existing_editor_override_is_kept() {
    let store = ScheduleStore::in_memory();
    let s = store.create_schedule("Main").unwrap();
    store
        .create_override_entry(
            &s.id,
            OverrideInput::open(d(2025, 11, 28), t(10, 0), t(14, 0)).with_note("Black Friday"),
        )
        .unwrap();
    store
        .create_override_entry(
            &s.id,
            OverrideInput::open(d(2025, 11, 27), t(9, 0), t(12, 0)).with_note("Short day"),
        )
        .unwrap();

    let created = materialize_federal_holidays(&store, &s.id, 2025, true, true).unwrap();
    assert_eq!(created, 10);

    let thanksgiving = hours_for_date(&store, &s.id, d(2025, 11, 27)).unwrap();
    assert!(!thanksgiving.is_closed);
    assert_eq!(thanksgiving.note.as_deref(), Some("Short day"));
}

#[test]
fn generated_entries_drive_resolution() {
    let store = ScheduleStore::in_memory();
    let s = store.create_schedule("Main").unwrap();
    materialize_federal_holidays(&store, &s.id, 2021, true, true).unwrap();

    let observed = hours_for_date(&store, &s.id, d(2021, 6, 18)).unwrap();
    assert_eq!(observed.source, HoursSource::Override);
    assert!(observed.is_closed);
    assert_eq!(
        observed.note.as_deref(),
        Some("Juneteenth National Independence Day (Observed)")
    );

    let ordinary = hours_for_date(&store, &s.id, d(2021, 6, 17)).unwrap();
    assert_eq!(ordinary.source, HoursSource::Weekly);
}

#[test]
fn open_holidays_copy_weekly_hours() {
    let store = ScheduleStore::in_memory();
    let s = store.create_schedule("Main").unwrap();
    store
        .update_weekly_entry(
            &s.id,
            1,
            WeeklyEntryInput {
                label: None,
                is_closed: false,
                open_time: Some(t(10, 0)),
                close_time: Some(t(15, 0)),
            },
        )
        .unwrap();
    store
        .update_weekly_entry(
            &s.id,
            4,
            WeeklyEntryInput {
                is_closed: true,
                ..Default::default()
            },
        )
        .unwrap();

    materialize_federal_holidays(&store, &s.id, 2024, false, false).unwrap();

    let mlk = hours_for_date(&store, &s.id, d(2024, 1, 15)).unwrap();
    assert_eq!(mlk.source, HoursSource::Override);
    assert!(!mlk.is_closed);
    assert_eq!(mlk.open_time, Some(t(10, 0)));
    assert_eq!(mlk.close_time, Some(t(15, 0)));
    assert_eq!(mlk.note.as_deref(), Some("Birthday of Martin Luther King, Jr."));

    // Thursdays are closed, so Thanksgiving stays closed.
    let thanksgiving = hours_for_date(&store, &s.id, d(2024, 11, 28)).unwrap();
    assert!(thanksgiving.is_closed);
    assert_eq!(thanksgiving.note.as_deref(), Some("Thanksgiving Day"));
}

#[test]
fn unknown_schedule_fails() {
    let store = ScheduleStore::in_memory();
    assert!(matches!(
        materialize_federal_holidays(&store, &Uuid::new_v4(), 2025, true, true),
        Err(Error::NotFound(_))
    ));
}

// ── A minimal store using the trait's default insert-if-absent ──────

#[derive(Default)]
struct VecStore {
    weekly: Vec<WeeklyHourEntry>,
    overrides: RefCell<Vec<DateOverrideEntry>>,
}

impl HoursStore for VecStore {
    fn list_weekly_entries(&self, _: &Uuid) -> Result<Vec<WeeklyHourEntry>> {
        Ok(self.weekly.clone())
    }

    fn find_override_by_exact_date(
        &self,
        _: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<DateOverrideEntry>> {
        Ok(self.overrides.borrow().iter().find(|o| o.date == date).cloned())
    }

    fn list_recurring_overrides(&self, _: &Uuid) -> Result<Vec<DateOverrideEntry>> {
        Ok(self
            .overrides
            .borrow()
            .iter()
            .filter(|o| o.is_recurring)
            .cloned()
            .collect())
    }

    fn create_override_entry(&self, _: &Uuid, input: OverrideInput) -> Result<DateOverrideEntry> {
        let (open_time, close_time) =
            sl_hours::validation::validate_hours(input.is_closed, input.open_time, input.close_time)?;
        let entry = DateOverrideEntry {
            id: Uuid::new_v4(),
            date: input.date,
            is_recurring: input.is_recurring,
            is_closed: input.is_closed,
            open_time,
            close_time,
            note: input.note,
            created_at: Utc::now(),
        };
        self.overrides.borrow_mut().push(entry.clone());
        Ok(entry)
    }
}

#[test]
fn default_insert_if_absent_is_idempotent() {
    let store = VecStore::default();
    let id = Uuid::new_v4();
    assert_eq!(materialize_federal_holidays(&store, &id, 2025, false, true).unwrap(), 11);
    assert_eq!(materialize_federal_holidays(&store, &id, 2025, false, true).unwrap(), 0);
}

#[test]
fn empty_weekly_store_resolves_to_none() {
    let store = VecStore::default();
    let h = hours_for_date(&store, &Uuid::new_v4(), d(2025, 12, 22)).unwrap();
    assert_eq!(h.source, HoursSource::None);
    assert!(h.is_closed);
}
