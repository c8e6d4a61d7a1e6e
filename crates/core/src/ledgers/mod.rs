//! Observation ledgers - append-only dated observations with as-of lookup.
//!
//! One ledger implementation backs both the manual valuation history and the
//! position history, since their temporal semantics are identical: last
//! value at or before a date, undefined before the first observation.

mod ledger_model;
mod ledger_traits;


pub use ledger_model::{Observation, ObservationLedger};
pub use ledger_traits::LedgerRepositoryTrait;
