//! Schedule storage.
//!
//! [`HoursStore`] is the narrow read/write surface the resolver and the
//! holiday generator depend on. [`ScheduleStore`] implements it over a map
//! of schedules persisted to `schedules.json` under the configured state
//! path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use sl_domain::error::{Error, Result};

use crate::model::{
    day_name, DateOverrideEntry, OverrideInput, Schedule, WeeklyEntryInput, WeeklyHourEntry,
};
use crate::validation::{normalize_schedule, validate_day_of_week, validate_hours};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Weekly/override lookups and override creation for one schedule.
///
/// Every method fails with [`Error::NotFound`] for an unknown schedule id.
pub trait HoursStore {
    /// Weekly entries sorted Monday..Sunday (empty if never seeded).
    fn list_weekly_entries(&self, schedule_id: &Uuid) -> Result<Vec<WeeklyHourEntry>>;

    fn find_override_by_exact_date(
        &self,
        schedule_id: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<DateOverrideEntry>>;

    /// Recurring overrides, oldest first.
    fn list_recurring_overrides(&self, schedule_id: &Uuid) -> Result<Vec<DateOverrideEntry>>;

    /// Validate and persist a new override.
    fn create_override_entry(
        &self,
        schedule_id: &Uuid,
        input: OverrideInput,
    ) -> Result<DateOverrideEntry>;

    /// Create the override unless one already exists on the exact date.
    /// Returns `None` when skipped.
    ///
    /// The default implementation checks then inserts in two steps; stores
    /// that can do both under one lock should override it.
    fn insert_override_if_absent(
        &self,
        schedule_id: &Uuid,
        input: OverrideInput,
    ) -> Result<Option<DateOverrideEntry>> {
        if self.find_override_by_exact_date(schedule_id, input.date)?.is_some() {
            return Ok(None);
        }
        self.create_override_entry(schedule_id, input).map(Some)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JSON-file schedule store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Schedule store backed by a JSON file (or nothing, for tests).
#[derive(Debug)]
pub struct ScheduleStore {
    persist_path: Option<PathBuf>,
    schedules: RwLock<HashMap<Uuid, Schedule>>,
    default_open: NaiveTime,
    default_close: NaiveTime,
}

impl ScheduleStore {
    /// Load or create the store at `state_path/schedules.json`.
    ///
    /// Every loaded schedule is checked like an import; a state file with
    /// invalid entries is refused rather than served.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;

        let persist_path = state_path.join("schedules.json");
        let schedules: HashMap<Uuid, Schedule> = if persist_path.exists() {
            let raw = std::fs::read_to_string(&persist_path).map_err(Error::Io)?;
            let list: Vec<Schedule> = serde_json::from_str(&raw)?;
            let mut map = HashMap::with_capacity(list.len());
            for mut schedule in list {
                normalize_schedule(&mut schedule)?;
                if map.insert(schedule.id, schedule).is_some() {
                    return Err(Error::validation(format!(
                        "{} lists a schedule id twice",
                        persist_path.display()
                    )));
                }
            }
            map
        } else {
            HashMap::new()
        };

        tracing::info!(
            schedules = schedules.len(),
            path = %persist_path.display(),
            "schedule store loaded"
        );

        Ok(Self {
            persist_path: Some(persist_path),
            schedules: RwLock::new(schedules),
            ..Self::in_memory()
        })
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            persist_path: None,
            schedules: RwLock::new(HashMap::new()),
            default_open: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            default_close: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        }
    }

    /// Hours seeded into new schedules. Rejects `close <= open`.
    pub fn with_default_hours(mut self, open: NaiveTime, close: NaiveTime) -> Result<Self> {
        validate_hours(false, Some(open), Some(close))?;
        self.default_open = open;
        self.default_close = close;
        Ok(self)
    }

    /// Write all schedules to disk. No-op for in-memory stores.
    pub fn flush(&self) -> Result<()> {
        self.persist(&self.schedules.read())
    }

    /// Serialize `map` oldest first and swap it into place.
    fn persist(&self, map: &HashMap<Uuid, Schedule>) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        let mut list: Vec<&Schedule> = map.values().collect();
        list.sort_by_key(|s| (s.created_at, s.id));
        write_json_file(path, &list)
    }

    /// Apply `f` to a copy of the map, persist the copy, then publish it.
    ///
    /// The write lock is held throughout, so writers are serialized and
    /// readers never see a change that did not reach disk.
    fn commit<T>(
        &self,
        f: impl FnOnce(&mut HashMap<Uuid, Schedule>) -> Result<T>,
    ) -> Result<T> {
        let mut map = self.schedules.write();
        let mut next = map.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *map = next;
        Ok(out)
    }

    // ── Schedules ────────────────────────────────────────────────────

    /// Create a schedule and seed its seven weekly entries.
    pub fn create_schedule(&self, title: &str) -> Result<Schedule> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::validation("schedule title must not be empty"));
        }
        let schedule = Schedule::seeded(title, self.default_open, self.default_close);
        self.commit(|map| {
            map.insert(schedule.id, schedule.clone());
            Ok(())
        })?;
        tracing::info!(schedule_id = %schedule.id, title, "schedule created");
        Ok(schedule)
    }

    /// Insert a schedule (import, tests), replacing any schedule with the
    /// same id. Entries are checked as on every other write; closed entries
    /// lose their times.
    pub fn insert_schedule(&self, mut schedule: Schedule) -> Result<()> {
        normalize_schedule(&mut schedule)?;
        self.commit(|map| {
            map.insert(schedule.id, schedule);
            Ok(())
        })
    }

    pub fn get_schedule(&self, id: &Uuid) -> Option<Schedule> {
        self.schedules.read().get(id).cloned()
    }

    /// All schedules, oldest first.
    pub fn list_schedules(&self) -> Vec<Schedule> {
        let mut list: Vec<Schedule> = self.schedules.read().values().cloned().collect();
        list.sort_by_key(|s| (s.created_at, s.id));
        list
    }

    pub fn delete_schedule(&self, id: &Uuid) -> Result<bool> {
        if !self.schedules.read().contains_key(id) {
            return Ok(false);
        }
        self.commit(|map| Ok(map.remove(id).is_some()))
    }

    /// Set the notes field of a schedule.
    pub fn set_notes(&self, id: &Uuid, notes: Option<String>) -> Result<Schedule> {
        self.mutate(id, |s| {
            s.notes = notes.filter(|n| !n.trim().is_empty());
            Ok(())
        })
    }

    // ── Weekly entries ───────────────────────────────────────────────

    /// Replace the hours of one weekday. Invalid times are rejected.
    pub fn update_weekly_entry(
        &self,
        schedule_id: &Uuid,
        day_of_week: u8,
        input: WeeklyEntryInput,
    ) -> Result<WeeklyHourEntry> {
        validate_day_of_week(day_of_week)?;
        let (open_time, close_time) =
            validate_hours(input.is_closed, input.open_time, input.close_time)?;

        let mut updated = None;
        self.mutate(schedule_id, |s| {
            let entry = s
                .hours
                .iter_mut()
                .find(|h| h.day_of_week == day_of_week)
                .ok_or_else(|| {
                    Error::not_found(format!(
                        "weekly entry for day {day_of_week} on schedule {}",
                        s.id
                    ))
                })?;
            entry.is_closed = input.is_closed;
            entry.open_time = open_time;
            entry.close_time = close_time;
            if let Some(label) = input.label {
                let label = label.trim();
                entry.label = if label.is_empty() {
                    day_name(day_of_week).unwrap_or_default().to_string()
                } else {
                    label.to_string()
                };
            }
            updated = Some(entry.clone());
            Ok(())
        })?;

        updated.ok_or_else(|| Error::not_found(format!("schedule {schedule_id}")))
    }

    // ── Overrides ────────────────────────────────────────────────────

    pub fn delete_override(&self, schedule_id: &Uuid, override_id: &Uuid) -> Result<bool> {
        let mut removed = false;
        self.mutate(schedule_id, |s| {
            let before = s.overrides.len();
            s.overrides.retain(|o| o.id != *override_id);
            removed = s.overrides.len() != before;
            Ok(())
        })?;
        Ok(removed)
    }

    /// Run `f` against one schedule and commit the result.
    fn mutate(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut Schedule) -> Result<()>,
    ) -> Result<Schedule> {
        self.commit(|map| {
            let schedule = map
                .get_mut(id)
                .ok_or_else(|| Error::not_found(format!("schedule {id}")))?;
            f(schedule)?;
            schedule.updated_at = Utc::now();
            Ok(schedule.clone())
        })
    }

    fn read<T>(&self, id: &Uuid, f: impl FnOnce(&Schedule) -> T) -> Result<T> {
        self.schedules
            .read()
            .get(id)
            .map(f)
            .ok_or_else(|| Error::not_found(format!("schedule {id}")))
    }
}

/// Pretty-print `value` to `path` through a sibling temp file, so a failed
/// write leaves the previous file intact.
pub(crate) fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    let written = std::fs::write(&tmp, json).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        tracing::warn!(path = %path.display(), error = %e, "state file write failed");
        return Err(Error::Io(e));
    }
    Ok(())
}

/// Validate `input` against the schedule's existing overrides and build
/// the entry to insert.
fn build_override(schedule: &Schedule, input: OverrideInput) -> Result<DateOverrideEntry> {
    let (open_time, close_time) =
        validate_hours(input.is_closed, input.open_time, input.close_time)?;

    if schedule.overrides.iter().any(|o| o.date == input.date) {
        return Err(Error::validation(format!(
            "an override for {} already exists",
            input.date
        )));
    }
    if input.is_recurring
        && schedule
            .overrides
            .iter()
            .any(|o| o.is_recurring && o.matches_month_day(input.date))
    {
        return Err(Error::validation(format!(
            "a recurring override for {} already exists",
            input.date.format("%m-%d")
        )));
    }

    Ok(DateOverrideEntry {
        id: Uuid::new_v4(),
        date: input.date,
        is_recurring: input.is_recurring,
        is_closed: input.is_closed,
        open_time,
        close_time,
        note: input.note.filter(|n| !n.trim().is_empty()),
        created_at: Utc::now(),
    })
}

impl HoursStore for ScheduleStore {
    fn list_weekly_entries(&self, schedule_id: &Uuid) -> Result<Vec<WeeklyHourEntry>> {
        self.read(schedule_id, |s| {
            let mut hours = s.hours.clone();
            hours.sort_by_key(|h| h.day_of_week);
            hours
        })
    }

    fn find_override_by_exact_date(
        &self,
        schedule_id: &Uuid,
        date: NaiveDate,
    ) -> Result<Option<DateOverrideEntry>> {
        self.read(schedule_id, |s| {
            s.overrides
                .iter()
                .filter(|o| o.date == date)
                .min_by_key(|o| o.created_at)
                .cloned()
        })
    }

    fn list_recurring_overrides(&self, schedule_id: &Uuid) -> Result<Vec<DateOverrideEntry>> {
        self.read(schedule_id, |s| {
            let mut out: Vec<DateOverrideEntry> =
                s.overrides.iter().filter(|o| o.is_recurring).cloned().collect();
            out.sort_by_key(|o| o.created_at);
            out
        })
    }

    fn create_override_entry(
        &self,
        schedule_id: &Uuid,
        input: OverrideInput,
    ) -> Result<DateOverrideEntry> {
        let mut created = None;
        self.mutate(schedule_id, |s| {
            let entry = build_override(s, input)?;
            s.overrides.push(entry.clone());
            created = Some(entry);
            Ok(())
        })?;
        created.ok_or_else(|| Error::not_found(format!("schedule {schedule_id}")))
    }

    /// Final check and insert happen under one write lock.
    fn insert_override_if_absent(
        &self,
        schedule_id: &Uuid,
        input: OverrideInput,
    ) -> Result<Option<DateOverrideEntry>> {
        if self.find_override_by_exact_date(schedule_id, input.date)?.is_some() {
            return Ok(None);
        }
        // Re-checked under the write lock.
        self.commit(|map| {
            let schedule = map
                .get_mut(schedule_id)
                .ok_or_else(|| Error::not_found(format!("schedule {schedule_id}")))?;
            if schedule.overrides.iter().any(|o| o.date == input.date) {
                return Ok(None);
            }
            let entry = build_override(schedule, input)?;
            schedule.overrides.push(entry.clone());
            schedule.updated_at = Utc::now();
            Ok(Some(entry))
        })
    }
}
