pub mod buttons;
pub mod schedule;

use chrono::{DateTime, Utc};

/// Format a timestamp the way menus show it
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
}
