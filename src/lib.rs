pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::CliConfig;
pub use core::{
    acquirer::{FixAcquirer, FixFailure, FixOutcome, StatusMessages},
    checker::PrerequisiteChecker,
    engine::{GeoEngine, RunOutcome},
    reporter::{OutputFormat, Reporter},
    resolver::{AddressResolver, NominatimClient},
};
pub use utils::error::{GeoError, Result};
