//! Random crossing generator for demos and load tests

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use rand::Rng;

use crate::domain::{DomainError, DomainResult};

/// Uniformly random instant between Jan 1 and Dec 31 00:00 UTC of `year`.
pub fn random_crossing<R: Rng + ?Sized>(rng: &mut R, year: i32) -> DomainResult<DateTime<FixedOffset>> {
    let (start, end) = NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| DomainError::Validation(format!("year out of range: {}", year)))?;

    let start = Utc.from_utc_datetime(&start.and_time(Default::default()));
    let end = Utc.from_utc_datetime(&end.and_time(Default::default()));
    let seconds = rng.gen_range(0..(end - start).num_seconds());

    Ok((start + Duration::seconds(seconds)).fixed_offset())
}

/// `count` random crossings within `year`, sorted.
pub fn random_crossings<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    year: i32,
) -> DomainResult<Vec<DateTime<FixedOffset>>> {
    let mut crossings = (0..count)
        .map(|_| random_crossing(rng, year))
        .collect::<DomainResult<Vec<_>>>()?;
    crossings.sort();
    Ok(crossings)
}
