//! Human "time ago" rendering for post timestamps

use chrono::{DateTime, Utc};

const INTERVALS: &[(&str, i64)] = &[
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Render the distance between `then` and `now` as "3 days ago",
/// "1 minute ago", or "just now" under a minute.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    for (unit, seconds_in_unit) in INTERVALS {
        let interval = seconds / seconds_in_unit;
        if interval >= 1 {
            let plural = if interval > 1 { "s" } else { "" };
            return format!("{} {}{} ago", interval, unit, plural);
        }
    }

    "just now".to_string()
}
