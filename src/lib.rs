//! # Congestion Tax Service
//!
//! Daily congestion tax calculation for a single vehicle: the built-in
//! Gothenburg 2013 rules or a caller-supplied rule set, served over REST.
//!
//! ## Architecture
//!
//! - **domain**: vehicles, rule sets and the fee calculator
//! - **application**: [`TaxService`] use cases and the random crossing generator
//! - **infrastructure**: city rule files on disk and the in-memory rule cache
//! - **interfaces**: REST API with Swagger documentation and Prometheus metrics
//! - **server**: server lifecycle and tracing setup
//! - **support**: errors and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use application::{TaxOutcome, TaxRequest, TaxService};
pub use config::{default_config_path, AppConfig};
pub use interfaces::http::create_api_router;
