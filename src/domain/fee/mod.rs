//! Congestion fee rules and daily aggregation
//!
//! - `builtin`: fixed Gothenburg 2013 time-of-day table and holiday calendar
//! - `custom`: fee resolution against a caller-supplied [`TaxRule`](crate::domain::TaxRule)
//! - `calculator`: rolling 60-minute window aggregation with daily cap

pub mod builtin;
pub mod calculator;
pub mod custom;

pub use builtin::BUILT_IN_MAX_DAILY_FEE;
pub use calculator::{fee_breakdown, total_fee, FeeBreakdown, FeeMode, FeeWindow};
