//! Store locations and their link to a default schedule.
//!
//! A [`Location`] is saved through [`LocationStore::save`], which cleans
//! its fields, drops map URLs that do not point at Google, and creates
//! and links a "`{title} Schedule`" the first time a location is saved
//! without one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sl_domain::error::{Error, Result};

use crate::model::EffectiveHours;
use crate::resolver::hours_for_date;
use crate::store::{write_json_file, HoursStore, ScheduleStore};

/// A physical store location.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// Assigned on first save.
    #[serde(default)]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// `src` of a Google Maps embed (`https://www.google.com/maps/embed?pb=...`).
    #[serde(default)]
    pub map_embed_url: Option<String>,
    /// Plain Google Maps link for "directions" buttons.
    #[serde(default)]
    pub map_link_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Recipients for mail sent on behalf of this location.
    #[serde(default)]
    pub mailto: Option<String>,
    /// Schedule used for hours lookups.
    #[serde(default)]
    pub default_schedule: Option<Uuid>,
}

fn google_maps_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^https://(www\.)?google\.(com|[a-z.]+)/").ok())
        .as_ref()
}

/// True for `https://google.<tld>/...` and `https://www.google.<tld>/...`.
pub fn is_google_maps_url(url: &str) -> bool {
    google_maps_pattern().is_some_and(|re| re.is_match(url.trim()))
}

fn clean(field: &mut Option<String>) {
    *field = field
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}

impl Location {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Non-empty address parts joined with `", "`.
    pub fn full_address(&self) -> String {
        [
            &self.address,
            &self.address2,
            &self.city,
            &self.state,
            &self.zip,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref().map(str::trim).filter(|s| !s.is_empty()))
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Title for the schedule auto-created alongside this location.
    pub fn schedule_title(&self) -> String {
        format!("{} Schedule", self.title)
    }

    /// Trim every text field, turn blanks into `None`, and clear map URLs
    /// that are not Google URLs.
    pub fn sanitize(&mut self) {
        self.title = self.title.trim().to_string();
        for field in [
            &mut self.address,
            &mut self.address2,
            &mut self.city,
            &mut self.state,
            &mut self.zip,
            &mut self.phone,
            &mut self.email,
            &mut self.map_embed_url,
            &mut self.map_link_url,
            &mut self.notes,
            &mut self.mailto,
        ] {
            clean(field);
        }
        for url in [&mut self.map_embed_url, &mut self.map_link_url] {
            if url.as_deref().is_some_and(|u| !is_google_maps_url(u)) {
                tracing::debug!(location = %self.title, "clearing non-Google map URL");
                *url = None;
            }
        }
    }

    /// Return the linked schedule, creating and linking "`{title} Schedule`"
    /// when none is set. A link to a schedule that no longer exists is
    /// [`Error::NotFound`].
    pub fn ensure_schedule(&mut self, schedules: &ScheduleStore) -> Result<Uuid> {
        if let Some(id) = self.default_schedule {
            if schedules.get_schedule(&id).is_none() {
                return Err(Error::not_found(format!(
                    "schedule {id} linked from location {}",
                    self.title
                )));
            }
            return Ok(id);
        }
        let schedule = schedules.create_schedule(&self.schedule_title())?;
        tracing::info!(
            location = %self.title,
            schedule_id = %schedule.id,
            "created default schedule for location"
        );
        self.default_schedule = Some(schedule.id);
        Ok(schedule.id)
    }

    /// Effective hours via the linked schedule; closed with source `none`
    /// when no schedule is linked.
    pub fn effective_hours_for_date<S: HoursStore + ?Sized>(
        &self,
        store: &S,
        date: NaiveDate,
    ) -> Result<EffectiveHours> {
        match &self.default_schedule {
            Some(id) => hours_for_date(store, id, date),
            None => Ok(EffectiveHours::none()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Location store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Locations persisted to `locations.json` next to the schedules.
pub struct LocationStore {
    persist_path: Option<PathBuf>,
    locations: RwLock<HashMap<Uuid, Location>>,
}

impl LocationStore {
    /// Load or create the store at `state_path/locations.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(Error::Io)?;

        let persist_path = state_path.join("locations.json");
        let locations: HashMap<Uuid, Location> = if persist_path.exists() {
            let raw = std::fs::read_to_string(&persist_path).map_err(Error::Io)?;
            let list: Vec<Location> = serde_json::from_str(&raw)?;
            list.into_iter().map(|l| (l.id, l)).collect()
        } else {
            HashMap::new()
        };

        tracing::info!(
            locations = locations.len(),
            path = %persist_path.display(),
            "location store loaded"
        );

        Ok(Self {
            persist_path: Some(persist_path),
            locations: RwLock::new(locations),
        })
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            persist_path: None,
            locations: RwLock::new(HashMap::new()),
        }
    }

    /// Create or replace a location.
    ///
    /// Cleans the fields, assigns an id to new locations, and links a
    /// default schedule (creating one in `schedules` if needed).
    pub fn save(&self, mut location: Location, schedules: &ScheduleStore) -> Result<Location> {
        location.sanitize();
        if location.title.is_empty() {
            return Err(Error::validation("location title must not be empty"));
        }
        if location.id.is_nil() {
            location.id = Uuid::new_v4();
        }
        location.ensure_schedule(schedules)?;

        let mut map = self.locations.write();
        let mut next = map.clone();
        next.insert(location.id, location.clone());
        self.persist(&next)?;
        *map = next;
        Ok(location)
    }

    pub fn get(&self, id: &Uuid) -> Option<Location> {
        self.locations.read().get(id).cloned()
    }

    /// All locations sorted by title.
    pub fn list(&self) -> Vec<Location> {
        let mut list: Vec<Location> = self.locations.read().values().cloned().collect();
        list.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        list
    }

    /// Remove a location. Its schedule is left in place.
    pub fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut map = self.locations.write();
        if !map.contains_key(id) {
            return Ok(false);
        }
        let mut next = map.clone();
        next.remove(id);
        self.persist(&next)?;
        *map = next;
        Ok(true)
    }

    fn persist(&self, map: &HashMap<Uuid, Location>) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        let mut list: Vec<&Location> = map.values().collect();
        list.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        write_json_file(path, &list)
    }
}
