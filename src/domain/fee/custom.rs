//! Fee resolution against a caller-supplied rule set

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};

use super::builtin;
use crate::domain::tax_rule::TaxRule;
use crate::domain::vehicle::Vehicle;

/// Exemptions defined by the rule set itself.
///
/// Saturday and Sunday are both governed by `tax_on_weekend`.
pub fn is_excluded_date(date: NaiveDate, rules: &TaxRule) -> bool {
    (!rules.tax_on_weekend && builtin::is_weekend(date))
        || rules.excluded_months.contains(&date.month())
        || rules.excluded_days.contains(&date.day())
        || rules.excluded_dates.contains(&date)
}

/// The 2013 holiday calendar still applies on top of the custom exemptions.
pub fn is_toll_free_date(date: NaiveDate, rules: &TaxRule) -> bool {
    builtin::is_holiday(date) || is_excluded_date(date, rules)
}

/// Stand-alone fee of one crossing under `rules`.
pub fn crossing_fee(at: &DateTime<FixedOffset>, vehicle: &Vehicle, rules: &TaxRule) -> u32 {
    if vehicle.is_tax_exempt() || is_toll_free_date(at.date_naive(), rules) {
        return 0;
    }
    rules.rate_for_hour(at.hour()).unwrap_or(0)
}

// ── Tests ──────────────────────────────────────────────────────
