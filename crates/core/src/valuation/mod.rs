//! Valuation reconstruction module.
//!
//! Rebuilds the portfolio's value over time from the asset registry, the
//! two observation ledgers, and an externally supplied price table. One
//! per-(asset, date) valuation pass feeds all three output series so they
//! can never drift apart.

mod valuation_cache;
mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

#[cfg(test)]
mod valuation_calculator_tests;

pub use valuation_cache::{input_fingerprint, ValuationCache};
pub use valuation_calculator::{reconstruct, ReconstructionInput};
pub use valuation_model::{AssetRow, CategoryRow, Reconstruction, TotalPoint, ValuationPoint};
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;
