//! Daily fee aggregation over rolling 60-minute windows

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use utoipa::ToSchema;

use super::{builtin, custom};
use crate::domain::tax_rule::TaxRule;
use crate::domain::vehicle::Vehicle;

/// Crossings within this span of a window's first crossing share one fee.
pub fn window_length() -> Duration {
    Duration::minutes(60)
}

/// Which rule set prices the crossings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeMode<'a> {
    BuiltIn,
    Custom(&'a TaxRule),
}

impl<'a> FeeMode<'a> {
    pub fn crossing_fee(&self, at: &DateTime<FixedOffset>, vehicle: &Vehicle) -> u32 {
        match self {
            Self::BuiltIn => builtin::crossing_fee(at, vehicle),
            Self::Custom(rules) => custom::crossing_fee(at, vehicle, rules),
        }
    }

    pub fn max_daily_fee(&self) -> u32 {
        match self {
            Self::BuiltIn => builtin::BUILT_IN_MAX_DAILY_FEE,
            Self::Custom(rules) => rules.max_daily_fee(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// One charged window: anchored at its first crossing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeeWindow {
    #[schema(value_type = String)]
    pub start: DateTime<FixedOffset>,
    pub crossings: usize,
    /// Highest stand-alone fee among the window's crossings
    pub fee: u32,
}

/// How a daily total was assembled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeeBreakdown {
    pub windows: Vec<FeeWindow>,
    pub uncapped_total: u32,
    pub max_daily_fee: u32,
    pub total: u32,
}

impl FeeBreakdown {
    pub fn is_capped(&self) -> bool {
        self.uncapped_total > self.total
    }
}

/// Group crossings into windows and price them.
///
/// Input order does not matter. A crossing exactly 60 minutes after the
/// window anchor still belongs to that window.
pub fn fee_breakdown(
    vehicle: &Vehicle,
    crossings: &[DateTime<FixedOffset>],
    mode: FeeMode<'_>,
) -> FeeBreakdown {
    let mut sorted = crossings.to_vec();
    sorted.sort();

    let mut windows: Vec<FeeWindow> = Vec::new();
    for at in sorted {
        let fee = mode.crossing_fee(&at, vehicle);
        match windows.last_mut() {
            Some(window) if at - window.start <= window_length() => {
                window.crossings += 1;
                window.fee = window.fee.max(fee);
            }
            _ => windows.push(FeeWindow {
                start: at,
                crossings: 1,
                fee,
            }),
        }
    }

    let uncapped_total = windows
        .iter()
        .fold(0u32, |sum, window| sum.saturating_add(window.fee));
    let max_daily_fee = mode.max_daily_fee();

    FeeBreakdown {
        windows,
        uncapped_total,
        max_daily_fee,
        total: uncapped_total.min(max_daily_fee),
    }
}

/// Total daily fee for `vehicle`, clamped to the mode's daily maximum.
pub fn total_fee(vehicle: &Vehicle, crossings: &[DateTime<FixedOffset>], mode: FeeMode<'_>) -> u32 {
    fee_breakdown(vehicle, crossings, mode).total
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tax_rule::HourlyPrice;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn car() -> Vehicle {
        Vehicle::new("Car", "ABC123").unwrap()
    }

    // 2013-02-07 is a regular Thursday
    fn day(times: &[&str]) -> Vec<DateTime<FixedOffset>> {
        times
            .iter()
            .map(|t| at(&format!("2013-02-07T{t}:00+01:00")))
            .collect()
    }

    #[test]
    fn empty_list_costs_nothing() {
        assert_eq!(total_fee(&car(), &[], FeeMode::BuiltIn), 0);
        let breakdown = fee_breakdown(&car(), &[], FeeMode::BuiltIn);
        assert!(breakdown.windows.is_empty());
        assert_eq!(breakdown.total, 0);
    }

    #[test]
    fn single_crossing_costs_its_fee() {
        assert_eq!(total_fee(&car(), &day(&["07:30"]), FeeMode::BuiltIn), 18);
    }

    #[test]
    fn crossings_59_minutes_apart_share_one_window() {
        // 06:20 → 8, 07:19 → 18
        let crossings = day(&["06:20", "07:19"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::BuiltIn);
        assert_eq!(breakdown.windows.len(), 1);
        assert_eq!(breakdown.windows[0].crossings, 2);
        assert_eq!(breakdown.total, 18);
    }

    #[test]
    fn crossings_61_minutes_apart_are_charged_separately() {
        let crossings = day(&["06:20", "07:21"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::BuiltIn);
        assert_eq!(breakdown.windows.len(), 2);
        assert_eq!(breakdown.total, 26);
    }

    #[test]
    fn exactly_60_minutes_stays_in_window() {
        let crossings = day(&["06:20", "07:20"]);
        assert_eq!(total_fee(&car(), &crossings, FeeMode::BuiltIn), 18);
    }

    #[test]
    fn one_second_past_60_minutes_opens_new_window() {
        let crossings = vec![
            at("2013-02-07T06:20:00+01:00"),
            at("2013-02-07T07:20:01+01:00"),
        ];
        assert_eq!(total_fee(&car(), &crossings, FeeMode::BuiltIn), 26);
    }

    #[test]
    fn window_is_anchored_at_first_crossing_not_sliding() {
        // 06:00 anchors; 06:50 joins; 07:30 is 90 minutes after the anchor
        let crossings = day(&["06:00", "06:50", "07:30"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::BuiltIn);
        assert_eq!(breakdown.windows.len(), 2);
        assert_eq!(breakdown.windows[0].fee, 13);
        assert_eq!(breakdown.windows[1].fee, 18);
        assert_eq!(breakdown.total, 31);
    }

    #[test]
    fn input_order_does_not_matter() {
        let ordered = day(&["06:05", "06:45", "08:10", "12:00", "15:40", "17:05"]);
        let expected = total_fee(&car(), &ordered, FeeMode::BuiltIn);

        let mut reversed = ordered.clone();
        reversed.reverse();
        assert_eq!(total_fee(&car(), &reversed, FeeMode::BuiltIn), expected);

        let mut rotated = ordered.clone();
        rotated.rotate_left(2);
        assert_eq!(total_fee(&car(), &rotated, FeeMode::BuiltIn), expected);

        let shuffled = vec![
            ordered[3], ordered[0], ordered[5], ordered[1], ordered[4], ordered[2],
        ];
        assert_eq!(total_fee(&car(), &shuffled, FeeMode::BuiltIn), expected);
    }

    #[test]
    fn daily_total_is_capped_at_60() {
        let crossings = day(&["06:00", "07:05", "08:10", "15:30", "16:35", "17:40"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::BuiltIn);
        // 8 + 18 + 13 + 18 + 18 + 13
        assert_eq!(breakdown.uncapped_total, 88);
        assert_eq!(breakdown.total, 60);
        assert!(breakdown.is_capped());
    }

    #[test]
    fn exempt_vehicle_pays_nothing() {
        let crossings = day(&["06:00", "07:05", "15:30"]);
        for kind in ["Bus", "Motorbike", "Military", "Diplomat", "Emergency", "Foreign"] {
            let vehicle = Vehicle::new(kind, "EX-1").unwrap();
            assert_eq!(total_fee(&vehicle, &crossings, FeeMode::BuiltIn), 0, "{kind}");
        }
    }

    #[test]
    fn holiday_and_weekend_cost_nothing() {
        let new_year = vec![at("2013-01-01T07:30:00+01:00"), at("2013-01-01T16:00:00+01:00")];
        assert_eq!(total_fee(&car(), &new_year, FeeMode::BuiltIn), 0);

        let saturday = vec![at("2013-02-09T07:30:00+01:00")];
        assert_eq!(total_fee(&car(), &saturday, FeeMode::BuiltIn), 0);
    }

    #[test]
    fn free_crossing_can_anchor_a_window() {
        // 05:50 is free but still anchors the window that 06:40 joins
        let crossings = day(&["05:50", "06:40", "07:00"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::BuiltIn);
        assert_eq!(breakdown.windows.len(), 2);
        assert_eq!(breakdown.windows[0].fee, 13);
        assert_eq!(breakdown.windows[1].fee, 18);
        assert_eq!(breakdown.total, 31);
    }

    #[test]
    fn custom_mode_uses_its_own_cap() {
        let rules = TaxRule {
            hourly_prices: vec![HourlyPrice { start_hour: 0, end_hour: 23, rate: 20 }],
            max_taxed_fee: 45,
            ..Default::default()
        };
        let crossings = day(&["06:00", "08:00", "10:00", "12:00"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::Custom(&rules));
        assert_eq!(breakdown.uncapped_total, 80);
        assert_eq!(breakdown.max_daily_fee, 45);
        assert_eq!(breakdown.total, 45);
    }

    #[test]
    fn custom_mode_without_cap_falls_back_to_60() {
        let rules = TaxRule {
            hourly_prices: vec![HourlyPrice { start_hour: 0, end_hour: 23, rate: 25 }],
            ..Default::default()
        };
        let crossings = day(&["06:00", "08:00", "10:00"]);
        assert_eq!(total_fee(&car(), &crossings, FeeMode::Custom(&rules)), 60);
    }

    #[test]
    fn custom_excluded_day_contributes_nothing() {
        let rules = TaxRule {
            hourly_prices: vec![HourlyPrice { start_hour: 6, end_hour: 18, rate: 10 }],
            excluded_days: vec![15],
            ..Default::default()
        };
        // 2013-03-15 is a Friday
        let crossings = vec![at("2013-03-15T07:00:00+01:00"), at("2013-03-15T12:00:00+01:00")];
        assert_eq!(total_fee(&car(), &crossings, FeeMode::Custom(&rules)), 0);
    }

    #[test]
    fn total_stays_within_bounds() {
        let rules = TaxRule {
            hourly_prices: vec![HourlyPrice { start_hour: 0, end_hour: 23, rate: u32::MAX }],
            ..Default::default()
        };
        let crossings = day(&["01:00", "03:00", "05:00"]);
        let breakdown = fee_breakdown(&car(), &crossings, FeeMode::Custom(&rules));
        assert_eq!(breakdown.uncapped_total, u32::MAX);
        assert_eq!(breakdown.total, 60);
    }
}
