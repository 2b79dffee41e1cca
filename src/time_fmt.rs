//! Relative time formatting for ticket creation dates

use chrono::{DateTime, Utc};

/// Parse a Jira timestamp such as `2024-01-15T10:30:00.000+0000`
pub fn parse_jira_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Human readable age of `raw` relative to `now`. Unparseable input is returned as-is.
pub fn format_relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_jira_timestamp(raw) else {
        return raw.to_string();
    };
    let elapsed = now.signed_duration_since(then);

    let seconds = elapsed.num_seconds();
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if seconds < 60 {
        if seconds <= 1 {
            "just now".to_string()
        } else {
            format!("{seconds} seconds ago")
        }
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else if days < 30 {
        plural(days / 7, "week")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        plural(days / 365, "year")
    }
}
