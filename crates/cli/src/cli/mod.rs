pub mod config;
pub mod holidays;
pub mod location;
pub mod schedule;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// storehours: weekly schedules, holiday overrides, and effective hours.
#[derive(Debug, Parser)]
#[command(name = "storehours", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the U.S. federal holidays for a year.
    Holidays {
        #[arg(long)]
        year: i32,
        /// Leave out Friday/Monday observed dates.
        #[arg(long)]
        no_observed: bool,
        /// Output as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Schedule management.
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Weekly hours.
    #[command(subcommand)]
    Weekly(WeeklyCommand),
    /// Date overrides (holidays, special hours).
    #[command(subcommand)]
    Override(OverrideCommand),
    /// Add the federal holidays for a year to a schedule.
    Generate {
        schedule: Uuid,
        #[arg(long)]
        year: i32,
        #[command(flatten)]
        options: GenerateArgs,
    },
    /// Show effective hours for a date.
    Hours {
        schedule: Uuid,
        date: NaiveDate,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Store locations and their default schedules.
    #[command(subcommand)]
    Location(LocationCommand),
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Create a schedule with seven seeded weekly entries.
    Create {
        title: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List all schedules.
    List,
    /// Show weekly hours and overrides for one schedule.
    Show { schedule: Uuid },
    /// Delete a schedule and all its entries.
    Delete { schedule: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum WeeklyCommand {
    /// Set the hours for one weekday (1 = Monday .. 7 = Sunday).
    Set {
        schedule: Uuid,
        day: u8,
        #[command(flatten)]
        hours: HoursArgs,
        /// Display label; pass an empty string to reset to the weekday name.
        #[arg(long)]
        label: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OverrideCommand {
    /// Add a date override.
    Add {
        schedule: Uuid,
        date: NaiveDate,
        #[command(flatten)]
        hours: HoursArgs,
        /// Repeat every year on the same month-day.
        #[arg(long)]
        recurring: bool,
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove a date override.
    Remove { schedule: Uuid, id: Uuid },
}

/// `--closed` or `--open HH:MM --close HH:MM`.
#[derive(Debug, Args)]
pub struct HoursArgs {
    #[arg(long, conflicts_with_all = ["open", "close"])]
    pub closed: bool,
    #[arg(long, value_parser = parse_time_arg)]
    pub open: Option<NaiveTime>,
    #[arg(long, value_parser = parse_time_arg)]
    pub close: Option<NaiveTime>,
}

/// Holiday generation switches. Each pair overrides `[holidays]` in the
/// config; the last flag given wins.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Include Friday/Monday observed dates.
    #[arg(long, overrides_with = "no_observed")]
    pub observed: bool,
    /// Leave out observed dates.
    #[arg(long, overrides_with = "observed")]
    pub no_observed: bool,
    /// Keep the store open on holidays with its regular weekly hours.
    #[arg(long, overrides_with = "closed")]
    pub open: bool,
    /// Mark holidays closed.
    #[arg(long, overrides_with = "open")]
    pub closed: bool,
}

impl GenerateArgs {
    /// `Some(true)` for `--observed`, `Some(false)` for `--no-observed`.
    pub fn include_observed(&self) -> Option<bool> {
        flag_pair(self.observed, self.no_observed)
    }

    /// `Some(true)` for `--closed`, `Some(false)` for `--open`.
    pub fn mark_closed(&self) -> Option<bool> {
        flag_pair(self.closed, self.open)
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Date range and output format for hours lookups.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Number of consecutive days to show.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(sl_hours::MAX_RANGE_DAYS))
    )]
    pub days: u32,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    /// Add a location. Without `--schedule` a "<title> Schedule" is created
    /// and linked.
    Add {
        title: String,
        #[command(flatten)]
        details: LocationArgs,
    },
    /// Change fields of an existing location.
    Update {
        location: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        details: LocationArgs,
    },
    /// List all locations.
    List,
    /// Show one location with its address and schedule.
    Show { location: Uuid },
    /// Effective hours at a location.
    Hours {
        location: Uuid,
        date: NaiveDate,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Delete a location. Its schedule is kept.
    Delete { location: Uuid },
}

/// Optional location fields; omitted flags leave the field unchanged.
#[derive(Debug, Default, Args)]
pub struct LocationArgs {
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub address2: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Google Maps embed `src` URL.
    #[arg(long)]
    pub map_embed: Option<String>,
    /// Google Maps link for directions.
    #[arg(long)]
    pub map_link: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Mail recipients for this location.
    #[arg(long)]
    pub mailto: Option<String>,
    /// Link an existing schedule instead of the auto-created one.
    #[arg(long)]
    pub schedule: Option<Uuid>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

fn parse_time_arg(s: &str) -> Result<NaiveTime, String> {
    sl_domain::config::parse_clock_time(s).ok_or_else(|| format!("invalid time '{s}': expected HH:MM"))
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `STOREHOURS_CONFIG`
/// (or `storehours.toml` by default). Returns the parsed [`Config`] and the
/// path that was used.
///
/// [`Config`]: sl_domain::config::Config
pub fn load_config() -> anyhow::Result<(sl_domain::config::Config, String)> {
    let config_path =
        std::env::var("STOREHOURS_CONFIG").unwrap_or_else(|_| "storehours.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        sl_domain::config::Config::default()
    };

    Ok((config, config_path))
}

/// Open the schedule store described by the config.
pub fn open_store(config: &sl_domain::config::Config) -> anyhow::Result<sl_hours::ScheduleStore> {
    use anyhow::Context;

    let (open, close) = config
        .defaults
        .seed_hours()
        .context("run `storehours config validate`")?;
    let store = sl_hours::ScheduleStore::new(&config.store.state_path)
        .with_context(|| format!("opening store at {}", config.store.state_path.display()))?;
    Ok(store.with_default_hours(open, close)?)
}

/// Open the location store that lives next to the schedules.
pub fn open_locations(config: &sl_domain::config::Config) -> anyhow::Result<sl_hours::LocationStore> {
    use anyhow::Context;

    sl_hours::LocationStore::new(&config.store.state_path).with_context(|| {
        format!("opening locations at {}", config.store.state_path.display())
    })
}
