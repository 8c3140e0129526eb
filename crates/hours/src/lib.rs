//! Store-hours engine.
//!
//! Weekly schedules with per-date overrides, effective-hours resolution,
//! and U.S. federal holiday generation:
//! - [`model`]: entries, schedules, and the resolved [`EffectiveHours`]
//! - [`validation`]: the closed/open-time invariant shared by all entries
//! - [`holidays`]: federal holiday calendar and bulk materialization
//! - [`resolver`]: override-then-weekly lookup for one date
//! - [`store`]: the [`HoursStore`] trait and a JSON-file [`ScheduleStore`]
//! - [`location`]: store locations, their JSON-file store, and the link to
//!   a default schedule

pub mod format;
pub mod holidays;
pub mod location;
pub mod model;
pub mod resolver;
pub mod store;
pub mod validation;

pub use holidays::{generate_federal_holidays, materialize_federal_holidays};
pub use location::{Location, LocationStore};
pub use model::{
    DateOverrideEntry, EffectiveHours, HoursSource, OverrideInput, Schedule, WeeklyEntryInput,
    WeeklyHourEntry,
};
pub use resolver::{hours_for_date, hours_for_date_str, week_from, MAX_RANGE_DAYS};
pub use store::{HoursStore, ScheduleStore};
