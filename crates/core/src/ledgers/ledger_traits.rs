use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger_model::Observation;
use crate::errors::Result;

/// Trait defining the contract for persisted observation ledgers.
///
/// Two instances exist at runtime: one amount-valued (manual valuations)
/// and one quantity-valued (positions). The storage layer guarantees one
/// physical record per (asset, date) key: a newer write supersedes the
/// previous record, and rows are purged only on asset deletion.
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Upserts the observation for (asset, date).
    /// Fails with a validation error if `value` is negative.
    fn record(&self, asset_id: &str, date: NaiveDate, value: Decimal) -> Result<()>;

    /// Removes all observations for the asset; irreversible.
    /// Returns the number of records removed.
    fn delete_asset(&self, asset_id: &str) -> Result<usize>;

    /// Loads every observation, deduplicated by the storage contract.
    fn load(&self) -> Result<Vec<Observation>>;
}
