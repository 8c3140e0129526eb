//! `storehours location ...`: store locations linked to schedules.

use std::fmt::Write as _;

use chrono::Days;

use sl_domain::config::Config;
use sl_hours::{Location, Schedule};

use super::schedule::render_hours;
use super::{LocationArgs, LocationCommand};

pub fn location(config: &Config, cmd: LocationCommand) -> anyhow::Result<()> {
    let schedules = super::open_store(config)?;
    let locations = super::open_locations(config)?;
    match cmd {
        LocationCommand::Add { title, details } => {
            let saved = locations.save(apply(Location::new(title), details), &schedules)?;
            println!("{}", saved.id);
        }
        LocationCommand::Update { location, title, details } => {
            let mut current = locations
                .get(&location)
                .ok_or_else(|| anyhow::anyhow!("location {location} not found"))?;
            if let Some(title) = title {
                current.title = title;
            }
            let saved = locations.save(apply(current, details), &schedules)?;
            let schedule = saved.default_schedule.and_then(|id| schedules.get_schedule(&id));
            print!("{}", render_location(&saved, schedule.as_ref())?);
        }
        LocationCommand::List => {
            for loc in locations.list() {
                println!("{}  {}  {}", loc.id, loc.title, loc.full_address());
            }
        }
        LocationCommand::Show { location } => {
            let loc = locations
                .get(&location)
                .ok_or_else(|| anyhow::anyhow!("location {location} not found"))?;
            let schedule = loc.default_schedule.and_then(|id| schedules.get_schedule(&id));
            print!("{}", render_location(&loc, schedule.as_ref())?);
        }
        LocationCommand::Hours { location, date, range } => {
            let loc = locations
                .get(&location)
                .ok_or_else(|| anyhow::anyhow!("location {location} not found"))?;
            let resolved = (0..range.days)
                .filter_map(|offset| date.checked_add_days(Days::new(offset.into())))
                .map(|d| Ok((d, loc.effective_hours_for_date(&schedules, d)?)))
                .collect::<sl_domain::Result<Vec<_>>>()?;
            print!("{}", render_hours(&resolved, range.json)?);
        }
        LocationCommand::Delete { location } => {
            if !locations.delete(&location)? {
                anyhow::bail!("location {location} not found");
            }
            println!("Deleted {location}");
        }
    }
    Ok(())
}

/// Copy the flags that were given onto `loc`.
fn apply(mut loc: Location, details: LocationArgs) -> Location {
    let LocationArgs {
        address,
        address2,
        city,
        state,
        zip,
        phone,
        email,
        map_embed,
        map_link,
        notes,
        mailto,
        schedule,
    } = details;
    for (field, value) in [
        (&mut loc.address, address),
        (&mut loc.address2, address2),
        (&mut loc.city, city),
        (&mut loc.state, state),
        (&mut loc.zip, zip),
        (&mut loc.phone, phone),
        (&mut loc.email, email),
        (&mut loc.map_embed_url, map_embed),
        (&mut loc.map_link_url, map_link),
        (&mut loc.notes, notes),
        (&mut loc.mailto, mailto),
    ] {
        if value.is_some() {
            *field = value;
        }
    }
    if schedule.is_some() {
        loc.default_schedule = schedule;
    }
    loc
}

pub fn render_location(loc: &Location, schedule: Option<&Schedule>) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "{}  ({})", loc.title, loc.id)?;
    let address = loc.full_address();
    if !address.is_empty() {
        writeln!(out, "  Address:   {address}")?;
    }
    for (label, value) in [
        ("Phone", &loc.phone),
        ("Email", &loc.email),
        ("Mail to", &loc.mailto),
        ("Map", &loc.map_link_url),
        ("Embed", &loc.map_embed_url),
        ("Notes", &loc.notes),
    ] {
        if let Some(value) = value {
            writeln!(out, "  {:<10} {value}", format!("{label}:"))?;
        }
    }
    match (loc.default_schedule, schedule) {
        (Some(_), Some(s)) => writeln!(out, "  Schedule:  {}  ({})", s.title, s.id)?,
        (Some(id), None) => writeln!(out, "  Schedule:  {id} (missing)")?,
        (None, _) => writeln!(out, "  Schedule:  (none)")?,
    }
    Ok(out)
}
