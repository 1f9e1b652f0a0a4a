//! Compact recency labels for conversation lists.

use chrono::{DateTime, Utc};

/// `now`, `{n}m`, `{n}h`, or the calendar date for anything a day or older.
#[must_use]
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "now".to_owned();
    }
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h");
    }
    then.format("%Y-%m-%d").to_string()
}
