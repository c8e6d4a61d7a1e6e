use std::sync::Arc;

use chrono::NaiveDate;

use super::valuation_model::Reconstruction;
use crate::errors::Result;
use crate::quotes::PriceTable;

/// Trait defining the contract for valuation reconstruction.
pub trait ValuationServiceTrait: Send + Sync {
    /// Rebuilds the valuation table from the current registry and ledger
    /// snapshots against the supplied price table.
    ///
    /// The price table must be pre-fetched by the caller; provider
    /// latency or failure never reaches this call, the table is simply as
    /// gapped as the fetch left it. `start_date` clips the output to a
    /// lookback window.
    ///
    /// Reconstruction is a pure function of its inputs, so results are
    /// memoized on an input fingerprint; repeated calls with unchanged
    /// inputs return the cached table.
    ///
    /// # Returns
    /// The shared valuation table; `total_series`, `category_series` and
    /// `asset_series` are derived from it on demand.
    fn reconstruct(
        &self,
        price_table: &PriceTable,
        start_date: Option<NaiveDate>,
    ) -> Result<Arc<Reconstruction>>;
}
