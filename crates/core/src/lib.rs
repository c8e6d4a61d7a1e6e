//! Patrimoine Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Patrimoine: the asset
//! registry, the observation ledgers, and the valuation reconstruction
//! engine. It is storage-agnostic and defines traits that are implemented
//! by the `storage-csv` crate.

pub mod assets;
pub mod constants;
pub mod errors;
pub mod ledgers;
pub mod quotes;
pub mod utils;
pub mod valuation;

// Re-export common types from the domain modules
pub use assets::*;
pub use ledgers::*;
pub use quotes::*;
pub use valuation::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
