use std::fmt::Write as _;

use sl_domain::config::{Config, ConfigSeverity};
use sl_hours::format::nice_time;

/// Validate the config and print the report.
///
/// Returns `true` when no errors were found (warnings are allowed).
pub fn validate(config: &Config, config_path: &str) -> bool {
    let (report, ok) = validation_report(config, config_path);
    print!("{report}");
    ok
}

fn validation_report(config: &Config, config_path: &str) -> (String, bool) {
    let issues = config.validate();
    let errors = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    let mut out = String::new();
    for issue in &issues {
        let _ = writeln!(out, "{issue}");
    }
    if issues.is_empty() {
        let _ = writeln!(out, "Config OK ({config_path})");
    } else {
        let _ = writeln!(
            out,
            "\n{errors} error(s), {} warning(s) in {config_path}",
            issues.len() - errors
        );
    }
    if errors == 0 {
        let _ = write!(out, "{}", summary(config));
    }
    (out, errors == 0)
}

/// What the config means for schedules: seed hours, holiday defaults,
/// and the state files in use.
fn summary(config: &Config) -> String {
    let mut out = String::new();
    let seed = match config.defaults.seed_hours() {
        Ok((open, close)) => format!("{} - {} every day", nice_time(open), nice_time(close)),
        Err(e) => format!("invalid ({e})"),
    };
    let observed = if config.holidays.include_observed {
        "with observed dates"
    } else {
        "without observed dates"
    };
    let state = if config.holidays.mark_closed {
        "closed"
    } else {
        "open with weekly hours"
    };
    let dir = &config.store.state_path;
    let _ = writeln!(out, "# new schedules:  {seed}");
    let _ = writeln!(out, "# holidays:       {state}, {observed}");
    let _ = writeln!(out, "# schedules file: {}", dir.join("schedules.json").display());
    let _ = writeln!(out, "# locations file: {}", dir.join("locations.json").display());
    out
}

/// Dump the resolved config (with all defaults filled in) as TOML,
/// preceded by a commented summary.
pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render_show(config)?);
    Ok(())
}

fn render_show(config: &Config) -> anyhow::Result<String> {
    let toml = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    Ok(format!("{}\n{toml}", summary(config)))
}
