//! Expiration date rules used by the date picker.
//!
//! Dates are calendar days (`NaiveDate`). A day counts as "in the past" when
//! its first instant is earlier than now, so today itself can only be picked
//! at exactly midnight.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Whether `day` may be picked as an expiration date at time `now`.
pub fn is_selectable(day: NaiveDate, now: NaiveDateTime) -> bool {
    day.and_time(NaiveTime::MIN) >= now
}

/// The "7 días" shortcut.
pub fn plus_seven_days(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(7)).unwrap_or(today)
}

/// The "1 mes" shortcut. Days past the end of the target month clamp to its
/// last day (Jan 31 becomes Feb 28/29).
pub fn plus_one_month(today: NaiveDate) -> NaiveDate {
    today.checked_add_months(Months::new(1)).unwrap_or(today)
}

/// Long display form, e.g. `October 23rd, 2026`.
pub fn format_display(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = month_start(date);
    match start.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(start).num_days() as u32,
        None => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_past_days_are_disabled() {
        let now = at(2026, 10, 16, 9, 30);
        assert!(!is_selectable(day(2026, 10, 15), now));
        assert!(!is_selectable(day(2026, 10, 16), now));
        assert!(is_selectable(day(2026, 10, 17), now));
    }

    #[test]
    fn test_today_is_selectable_at_midnight() {
        let now = at(2026, 10, 16, 0, 0);
        assert!(is_selectable(day(2026, 10, 16), now));
    }

    #[test]
    fn test_plus_seven_days_crosses_month() {
        assert_eq!(plus_seven_days(day(2026, 10, 28)), day(2026, 11, 4));
    }

    #[test]
    fn test_plus_one_month() {
        assert_eq!(plus_one_month(day(2026, 10, 16)), day(2026, 11, 16));
        assert_eq!(plus_one_month(day(2026, 12, 5)), day(2027, 1, 5));
    }

    #[test]
    fn test_plus_one_month_clamps_to_month_end() {
        assert_eq!(plus_one_month(day(2027, 1, 31)), day(2027, 2, 28));
        assert_eq!(plus_one_month(day(2028, 1, 31)), day(2028, 2, 29));
    }

    #[test]
    fn test_shortcuts_are_selectable() {
        let now = at(2026, 10, 16, 23, 59);
        let today = now.date();
        assert!(is_selectable(plus_seven_days(today), now));
        assert!(is_selectable(plus_one_month(today), now));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(day(2026, 10, 23)), "October 23rd, 2026");
        assert_eq!(format_display(day(2026, 7, 1)), "July 1st, 2026");
        assert_eq!(format_display(day(2026, 7, 12)), "July 12th, 2026");
        assert_eq!(format_display(day(2026, 7, 22)), "July 22nd, 2026");
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(day(2026, 2, 10)), 28);
        assert_eq!(days_in_month(day(2028, 2, 10)), 29);
        assert_eq!(days_in_month(day(2026, 12, 31)), 31);
        assert_eq!(days_in_month(day(2026, 11, 1)), 30);
    }
}
