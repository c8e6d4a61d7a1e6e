//! Valuation service implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::valuation_cache::{input_fingerprint, ValuationCache};
use super::valuation_calculator::{reconstruct, ReconstructionInput};
use super::valuation_model::Reconstruction;
use super::valuation_traits::ValuationServiceTrait;
use crate::assets::{AssetCategory, AssetRepositoryTrait};
use crate::errors::Result;
use crate::ledgers::{LedgerRepositoryTrait, ObservationLedger};
use crate::quotes::PriceTable;

/// Service orchestrating valuation reconstruction over the repositories.
///
/// Loads the registry and both ledgers, verifies the storage dedup
/// contract while building the in-memory ledgers, and memoizes results on
/// an input fingerprint. Holds no other state: two calls with identical
/// inputs return the same table.
pub struct ValuationService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    manual_ledger: Arc<dyn LedgerRepositoryTrait>,
    position_ledger: Arc<dyn LedgerRepositoryTrait>,
    quoted_categories: BTreeSet<AssetCategory>,
    cache: ValuationCache,
}

impl ValuationService {
    /// Creates a new ValuationService instance.
    pub fn new(
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        manual_ledger: Arc<dyn LedgerRepositoryTrait>,
        position_ledger: Arc<dyn LedgerRepositoryTrait>,
        quoted_categories: BTreeSet<AssetCategory>,
    ) -> Self {
        Self {
            asset_repository,
            manual_ledger,
            position_ledger,
            quoted_categories,
            cache: ValuationCache::new(),
        }
    }

    /// Drops memoized results. Call after any registry or ledger write.
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }
}

impl ValuationServiceTrait for ValuationService {
    fn reconstruct(
        &self,
        price_table: &PriceTable,
        start_date: Option<NaiveDate>,
    ) -> Result<Arc<Reconstruction>> {
        let assets = self.asset_repository.list()?;
        let manual_rows = self.manual_ledger.load()?;
        let position_rows = self.position_ledger.load()?;

        let fingerprint = input_fingerprint(
            &assets,
            &manual_rows,
            &position_rows,
            price_table,
            &self.quoted_categories,
            start_date,
        );
        if let Some(hit) = self.cache.get(&fingerprint) {
            debug!("Valuation cache hit for fingerprint {}", &fingerprint[..12]);
            return Ok(hit);
        }

        // The storage layer owes us one row per (asset, date); a duplicate
        // here is a contract violation and fails the reconstruction.
        let manual_ledger = ObservationLedger::from_rows(manual_rows)?;
        let position_ledger = ObservationLedger::from_rows(position_rows)?;

        let result = Arc::new(reconstruct(&ReconstructionInput {
            assets: &assets,
            manual_ledger: &manual_ledger,
            position_ledger: &position_ledger,
            price_table,
            quoted_categories: &self.quoted_categories,
            start_date,
        }));

        self.cache.put(fingerprint, result.clone());
        Ok(result)
    }
}
