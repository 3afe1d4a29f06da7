//! Built-in Gothenburg 2013 fee table

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Weekday};

use crate::domain::vehicle::Vehicle;

/// Daily cap of the built-in rules
pub const BUILT_IN_MAX_DAILY_FEE: u32 = 60;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Public and bridging holidays of 2013, including all of July.
pub fn is_holiday(date: NaiveDate) -> bool {
    if date.year() != 2013 {
        return false;
    }
    matches!(
        (date.month(), date.day()),
        (1, 1)
            | (3, 28 | 29)
            | (4, 1 | 30)
            | (5, 1 | 8 | 9)
            | (6, 5 | 6 | 21)
            | (7, _)
            | (11, 1)
            | (12, 24 | 25 | 26 | 31)
    )
}

pub fn is_toll_free_date(date: NaiveDate) -> bool {
    is_weekend(date) || is_holiday(date)
}

/// Fee for a crossing at `hour:minute` on a taxable day.
pub fn time_of_day_fee(hour: u32, minute: u32) -> u32 {
    match (hour, minute) {
        (6, 0..=29) => 8,
        (6, _) => 13,
        (7, _) => 18,
        (8, 0..=29) => 13,
        (8, _) | (9..=14, _) => 8,
        (15, 0..=29) => 13,
        (15, _) | (16, _) => 18,
        (17, _) => 13,
        (18, 0..=29) => 8,
        _ => 0,
    }
}

/// Stand-alone fee of one crossing under the built-in rules.
pub fn crossing_fee(at: &DateTime<FixedOffset>, vehicle: &Vehicle) -> u32 {
    if vehicle.is_tax_exempt() || is_toll_free_date(at.date_naive()) {
        return 0;
    }
    time_of_day_fee(at.hour(), at.minute())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn fee_table_boundaries() {
        let cases = [
            ((5, 59), 0),
            ((6, 0), 8),
            ((6, 29), 8),
            ((6, 30), 13),
            ((6, 59), 13),
            ((7, 0), 18),
            ((7, 59), 18),
            ((8, 0), 13),
            ((8, 29), 13),
            ((8, 30), 8),
            ((9, 0), 8),
            ((12, 15), 8),
            ((14, 59), 8),
            ((15, 0), 13),
            ((15, 29), 13),
            ((15, 30), 18),
            ((16, 0), 18),
            ((16, 59), 18),
            ((17, 0), 13),
            ((17, 59), 13),
            ((18, 0), 8),
            ((18, 29), 8),
            ((18, 30), 0),
            ((23, 59), 0),
            ((0, 0), 0),
        ];
        for ((hour, minute), fee) in cases {
            assert_eq!(time_of_day_fee(hour, minute), fee, "{hour:02}:{minute:02}");
        }
    }

    #[test]
    fn afternoon_peak_band_starts_at_half_past_three() {
        assert_eq!(time_of_day_fee(15, 29), 13);
        assert_eq!(time_of_day_fee(15, 30), 18);
        assert_eq!(time_of_day_fee(16, 59), 18);
        assert_eq!(time_of_day_fee(17, 0), 13);
    }

    #[test]
    fn holidays_2013() {
        let free = [
            date(2013, 1, 1),
            date(2013, 3, 28),
            date(2013, 3, 29),
            date(2013, 4, 1),
            date(2013, 4, 30),
            date(2013, 5, 1),
            date(2013, 5, 8),
            date(2013, 5, 9),
            date(2013, 6, 5),
            date(2013, 6, 6),
            date(2013, 6, 21),
            date(2013, 7, 15),
            date(2013, 11, 1),
            date(2013, 12, 24),
            date(2013, 12, 25),
            date(2013, 12, 26),
            date(2013, 12, 31),
        ];
        for d in free {
            assert!(is_toll_free_date(d), "{d} should be toll free");
        }

        let taxable = [date(2013, 1, 2), date(2013, 3, 27), date(2013, 8, 1)];
        for d in taxable {
            assert!(!is_toll_free_date(d), "{d} should be taxable");
        }
    }

    #[test]
    fn holidays_only_apply_in_2013() {
        // 2014-01-01 is a Wednesday
        assert!(!is_holiday(date(2014, 1, 1)));
        assert!(!is_toll_free_date(date(2014, 1, 1)));
    }

    #[test]
    fn weekends_are_toll_free() {
        assert!(is_weekend(date(2013, 2, 9)));
        assert!(is_weekend(date(2013, 2, 10)));
        assert!(!is_weekend(date(2013, 2, 11)));
    }

    #[test]
    fn crossing_fee_reads_local_clock() {
        let car = Vehicle::new("Car", "ABC123").unwrap();
        // 07:15 local, 06:15 UTC
        assert_eq!(crossing_fee(&at("2013-02-07T07:15:00+01:00"), &car), 18);
        assert_eq!(crossing_fee(&at("2013-02-07T06:15:00Z"), &car), 8);
    }

    #[test]
    fn exempt_vehicle_and_free_dates_cost_nothing() {
        let car = Vehicle::new("Car", "ABC123").unwrap();
        let bus = Vehicle::new("Bus", "BUS001").unwrap();
        assert_eq!(crossing_fee(&at("2013-02-07T07:15:00Z"), &bus), 0);
        assert_eq!(crossing_fee(&at("2013-01-01T07:15:00Z"), &car), 0);
        assert_eq!(crossing_fee(&at("2013-02-09T07:15:00Z"), &car), 0);
    }
}
