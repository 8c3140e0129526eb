use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Holiday generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Defaults for federal holiday materialization (CLI flags override them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidaysConfig {
    /// Add Friday/Monday entries when a fixed-date holiday falls on a weekend.
    #[serde(default = "d_true")]
    pub include_observed: bool,
    /// Generated entries are closed all day.
    #[serde(default = "d_true")]
    pub mark_closed: bool,
}

impl Default for HolidaysConfig {
    fn default() -> Self {
        Self {
            include_observed: true,
            mark_closed: true,
        }
    }
}

fn d_true() -> bool {
    true
}
