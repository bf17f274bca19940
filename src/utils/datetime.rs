use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

/// `05:00 PM, Mar 06` on the user's clock.
pub fn format_datetime(dt: &DateTime<Utc>, tz: &Tz) -> String {
    dt.with_timezone(tz).format("%I:%M %p, %b %d").to_string()
}

/// `05:00 PM` on the user's clock.
pub fn format_clock(dt: &DateTime<Utc>, tz: &Tz) -> String {
    dt.with_timezone(tz).format("%I:%M %p").to_string()
}

/// `March 06` on the user's clock.
pub fn format_day(dt: &DateTime<Utc>, tz: &Tz) -> String {
    dt.with_timezone(tz).format("%B %d").to_string()
}

/// Compact countdown such as `2h 30m`, `3d 4h` or `<1m`.
pub fn format_duration(delta: TimeDelta) -> String {
    let minutes = delta.num_minutes();
    if minutes < 1 {
        return "<1m".to_string();
    }
    let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 && days == 0 {
        parts.push(format!("{}m", mins));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_in_user_timezone() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 6, 11, 30, 0).unwrap();
        assert_eq!(format_datetime(&dt, &chrono_tz::Asia::Kolkata), "05:00 PM, Mar 06");
        assert_eq!(format_clock(&dt, &chrono_tz::UTC), "11:30 AM");
        assert_eq!(format_day(&dt, &chrono_tz::UTC), "March 06");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::seconds(20)), "<1m");
        assert_eq!(format_duration(TimeDelta::minutes(150)), "2h 30m");
        assert_eq!(format_duration(TimeDelta::minutes(45)), "45m");
        assert_eq!(format_duration(TimeDelta::minutes(3 * 1440 + 250)), "3d 4h");
        assert_eq!(format_duration(TimeDelta::days(2)), "2d");
    }
}
