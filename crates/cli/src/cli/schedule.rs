//! Schedule, weekly-hours, override, and effective-hours commands.

use std::fmt::Write as _;

use chrono::NaiveDate;
use uuid::Uuid;

use sl_domain::config::Config;
use sl_hours::{
    week_from, EffectiveHours, HoursStore, OverrideInput, Schedule, WeeklyEntryInput,
};

use super::{HoursArgs, OverrideCommand, RangeArgs, ScheduleCommand, WeeklyCommand};

pub fn schedule(config: &Config, cmd: ScheduleCommand) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    match cmd {
        ScheduleCommand::Create { title, notes } => {
            let s = store.create_schedule(&title)?;
            if notes.is_some() {
                store.set_notes(&s.id, notes)?;
            }
            println!("{}", s.id);
        }
        ScheduleCommand::List => {
            for s in store.list_schedules() {
                println!("{}  {}  ({} override(s))", s.id, s.title, s.overrides.len());
            }
        }
        ScheduleCommand::Show { schedule } => {
            let s = store
                .get_schedule(&schedule)
                .ok_or_else(|| anyhow::anyhow!("schedule {schedule} not found"))?;
            print!("{}", render_schedule(&s)?);
        }
        ScheduleCommand::Delete { schedule } => {
            if !store.delete_schedule(&schedule)? {
                anyhow::bail!("schedule {schedule} not found");
            }
            println!("Deleted {schedule}");
        }
    }
    Ok(())
}

pub fn weekly(config: &Config, cmd: WeeklyCommand) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    match cmd {
        WeeklyCommand::Set { schedule, day, hours, label } => {
            let HoursArgs { closed, open, close } = hours;
            let entry = store.update_weekly_entry(
                &schedule,
                day,
                WeeklyEntryInput {
                    label,
                    is_closed: closed,
                    open_time: open,
                    close_time: close,
                },
            )?;
            println!("{}", render_weekly_line(&entry));
        }
    }
    Ok(())
}

pub fn overrides(config: &Config, cmd: OverrideCommand) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    match cmd {
        OverrideCommand::Add { schedule, date, hours, recurring, note } => {
            let HoursArgs { closed, open, close } = hours;
            let entry = store.create_override_entry(
                &schedule,
                OverrideInput {
                    date,
                    is_recurring: recurring,
                    is_closed: closed,
                    open_time: open,
                    close_time: close,
                    note,
                },
            )?;
            println!("{}", entry.id);
        }
        OverrideCommand::Remove { schedule, id } => {
            if !store.delete_override(&schedule, &id)? {
                anyhow::bail!("override {id} not found on schedule {schedule}");
            }
            println!("Removed {id}");
        }
    }
    Ok(())
}

pub fn hours(
    config: &Config,
    schedule: Uuid,
    date: NaiveDate,
    range: &RangeArgs,
) -> anyhow::Result<()> {
    let store = super::open_store(config)?;
    let resolved = week_from(&store, &schedule, date, range.days)?;
    print!("{}", render_hours(&resolved, range.json)?);
    Ok(())
}

// ── Rendering ─────────────────────────────────────────────────────────

fn render_weekly_line(entry: &sl_hours::WeeklyHourEntry) -> String {
    let hours = EffectiveHours::from(entry);
    format!("{:<9}  {:<16}  {}", entry.day_name(), entry.label, hours)
}

pub fn render_schedule(s: &Schedule) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "{}  ({})", s.title, s.id)?;
    if let Some(notes) = &s.notes {
        writeln!(out, "{notes}")?;
    }
    writeln!(out, "\nWeekly hours:")?;
    if s.hours.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for entry in &s.hours {
        writeln!(out, "  {}", render_weekly_line(entry))?;
    }
    writeln!(out, "\nOverrides:")?;
    let overrides = s.overrides_by_date();
    if overrides.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for o in overrides {
        let date = if o.is_recurring {
            format!("{} (yearly)", o.date.format("%m-%d"))
        } else {
            o.date.to_string()
        };
        let hours = match (o.is_closed, o.open_time_nice(), o.close_time_nice()) {
            (false, Some(open), Some(close)) => format!("{open} - {close}"),
            _ => "closed".to_string(),
        };
        writeln!(out, "  {date:<16}  {:<48}  {hours}  [{}]", o.holiday_name(), o.id)?;
    }
    Ok(out)
}

pub fn render_hours(resolved: &[(NaiveDate, EffectiveHours)], json: bool) -> anyhow::Result<String> {
    if json {
        let rows: Vec<serde_json::Value> = resolved
            .iter()
            .map(|(date, h)| {
                serde_json::json!({
                    "date": date,
                    "source": h.source,
                    "is_closed": h.is_closed,
                    "open_time": h.open_time,
                    "close_time": h.close_time,
                    "open_time_nice": h.open_time_nice(),
                    "close_time_nice": h.close_time_nice(),
                    "note": h.note,
                })
            })
            .collect();
        let mut s = serde_json::to_string_pretty(&rows)?;
        s.push('\n');
        return Ok(s);
    }
    let mut out = String::new();
    for (date, h) in resolved {
        writeln!(out, "{}  {}  {:<8}  {}", date, date.format("%a"), h.source, h)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use sl_hours::ScheduleStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn hours_text_shows_source_and_times() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .create_override_entry(&s.id, OverrideInput::closed(d(2025, 12, 25), "Christmas Day"))
            .unwrap();
        let resolved = week_from(&store, &s.id, d(2025, 12, 24), 2).unwrap();
        let text = render_hours(&resolved, false).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2025-12-24  Wed  weekly    8:00am - 5:00pm");
        assert_eq!(lines[1], "2025-12-25  Thu  override  closed (Christmas Day)");
    }

    #[test]
    fn hours_json_has_nice_times() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        let resolved = week_from(&store, &s.id, d(2025, 12, 22), 1).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&render_hours(&resolved, true).unwrap()).unwrap();
        assert_eq!(value[0]["source"], "weekly");
        assert_eq!(value[0]["open_time"], "08:00:00");
        assert_eq!(value[0]["close_time_nice"], "5:00pm");
        assert!(value[0]["note"].is_null());
    }

    #[test]
    fn schedule_listing_includes_overrides() {
        let store = ScheduleStore::in_memory();
        let s = store.create_schedule("Main").unwrap();
        store
            .create_override_entry(
                &s.id,
                OverrideInput::open(d(2024, 12, 24), t(8, 0), t(12, 0)).recurring(),
            )
            .unwrap();
        let text = render_schedule(&store.get_schedule(&s.id).unwrap()).unwrap();
        assert!(text.starts_with("Main  ("));
        assert!(text.contains("Monday     Monday            8:00am - 5:00pm"));
        assert!(text.contains("12-24 (yearly)"));
        assert!(text.contains("Holiday"));
        assert!(text.contains("8:00am - 12:00pm"));
    }
}
