pub mod services;

pub use services::{random_crossings, TaxOutcome, TaxRequest, TaxService};
