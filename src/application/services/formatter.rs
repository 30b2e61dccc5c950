//! Display formatting of timestamps and dates.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Formats a message timestamp relative to `now`: `HH:MM` on the same
/// calendar day, `Mon D HH:MM` otherwise. The day is evaluated in `now`'s zone.
#[must_use]
pub fn format_timestamp<Tz>(timestamp: DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let local = timestamp.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %-d %H:%M").to_string()
    }
}

/// [`format_timestamp`] against the current local time.
#[must_use]
pub fn format_timestamp_now(timestamp: DateTime<Utc>) -> String {
    format_timestamp(timestamp, &Local::now())
}

/// Formats a calendar date, e.g. `Mar 4, 2024`.
#[must_use]
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%b %-d, %Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_same_day_shows_time_only() {
        let now = utc(2024, 3, 4, 18, 0);
        assert_eq!(format_timestamp(utc(2024, 3, 4, 9, 5), &now), "09:05");
    }

    #[test]
    fn test_other_day_shows_date() {
        let now = utc(2024, 3, 5, 0, 30);
        assert_eq!(format_timestamp(utc(2024, 3, 4, 23, 59), &now), "Mar 4 23:59");
    }

    #[test]
    fn test_day_boundary_uses_viewer_zone() {
        let zone = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let now = utc(2024, 3, 4, 23, 0).with_timezone(&zone);
        // 22:30 UTC is already 00:30 on Mar 5 for the viewer.
        assert_eq!(format_timestamp(utc(2024, 3, 4, 22, 30), &now), "00:30");
    }
}
