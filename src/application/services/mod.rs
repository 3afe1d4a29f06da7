pub mod sample;
mod tax;

pub use sample::{random_crossing, random_crossings};
pub use tax::{TaxOutcome, TaxRequest, TaxService};
