//! `storehours holidays` and `storehours generate`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use uuid::Uuid;

use sl_domain::config::Config;
use sl_hours::{generate_federal_holidays, materialize_federal_holidays};

use super::GenerateArgs;

/// Render a holiday map as `YYYY-MM-DD  Dow  Name` lines, or as a JSON object.
pub fn render_holidays(map: &BTreeMap<NaiveDate, String>, json: bool) -> anyhow::Result<String> {
    if json {
        let obj: BTreeMap<String, &String> =
            map.iter().map(|(d, n)| (d.to_string(), n)).collect();
        return Ok(serde_json::to_string_pretty(&obj)?);
    }
    let mut out = String::new();
    for (date, name) in map {
        writeln!(out, "{}  {}  {}", date, date.format("%a"), name)?;
    }
    Ok(out)
}

pub fn holidays(year: i32, no_observed: bool, json: bool) -> anyhow::Result<()> {
    let map = generate_federal_holidays(year, !no_observed);
    print!("{}", render_holidays(&map, json)?);
    if json {
        println!();
    }
    Ok(())
}

/// Materialize holidays into a schedule and report the count.
///
/// The `--observed`/`--no-observed` and `--open`/`--closed` pairs win over
/// `[holidays]` in the config.
pub fn generate(
    config: &Config,
    schedule: Uuid,
    year: i32,
    options: &GenerateArgs,
) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let (include_observed, mark_closed) = generation_switches(config, options);

    let created =
        materialize_federal_holidays(&store, &schedule, year, include_observed, mark_closed)?;
    if created > 0 {
        println!("Created {created} holiday row(s) for {year}.");
    } else {
        println!("No holidays created for {year} (possibly already present).");
    }
    Ok(())
}

/// `(include_observed, mark_closed)` after applying command-line overrides.
fn generation_switches(config: &Config, options: &GenerateArgs) -> (bool, bool) {
    (
        options
            .include_observed()
            .unwrap_or(config.holidays.include_observed),
        options.mark_closed().unwrap_or(config.holidays.mark_closed),
    )
}
