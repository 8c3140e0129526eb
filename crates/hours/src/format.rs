//! Presentation helpers for clock times.

use chrono::NaiveTime;

/// Render a 24-hour time as a compact 12-hour string, e.g. `17:00` → `5:00pm`.
pub fn nice_time(t: NaiveTime) -> String {
    t.format("%-I:%M%P").to_string()
}
