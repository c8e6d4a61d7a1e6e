use std::collections::HashMap;

use rust_decimal::Decimal;

use super::assets_model::{Asset, AssetCategory, NewAsset, UpdateAssetProfile};
use crate::errors::Result;

/// Trait defining the contract for Asset service operations.
///
/// The service coordinates the registry with both observation ledgers:
/// creates seed the ledgers, edits append observations, deletes cascade.
pub trait AssetServiceTrait: Send + Sync {
    fn get_assets(&self) -> Result<Vec<Asset>>;
    fn get_asset_by_id(&self, asset_id: &str) -> Result<Asset>;

    /// Creates a quoted asset and records its initial position observation.
    fn create_quoted_asset(
        &self,
        name: &str,
        ticker: &str,
        category: AssetCategory,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<Asset>;

    /// Creates a manual asset and records its initial amount observation.
    fn create_manual_asset(
        &self,
        name: &str,
        category: AssetCategory,
        amount: Decimal,
    ) -> Result<Asset>;

    /// Edits a quoted asset. A changed quantity appends a dated position
    /// observation; an unchanged one leaves the ledger untouched.
    fn update_quoted_asset(
        &self,
        asset_id: &str,
        name: &str,
        ticker: &str,
        category: AssetCategory,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<Asset>;

    /// Edits a manual asset and records the amount in the ledger.
    fn update_manual_asset(
        &self,
        asset_id: &str,
        name: &str,
        category: AssetCategory,
        amount: Decimal,
    ) -> Result<Asset>;

    /// Deletes an asset and purges its rows from both ledgers.
    /// History is erased retroactively: later reconstructions exclude the
    /// asset from all past dates as well.
    fn remove_asset(&self, asset_id: &str) -> Result<()>;

    /// Applies a latest-price map (ticker -> close) to the quoted assets'
    /// current values. Returns the tickers that had no price.
    fn apply_prices(&self, prices: &HashMap<String, Decimal>) -> Result<Vec<String>>;
}

/// Trait defining the contract for Asset repository operations.
pub trait AssetRepositoryTrait: Send + Sync {
    fn create(&self, new_asset: NewAsset) -> Result<Asset>;
    fn update(&self, asset_id: &str, payload: UpdateAssetProfile) -> Result<Asset>;
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;
    fn list(&self) -> Result<Vec<Asset>>;
    fn delete(&self, asset_id: &str) -> Result<()>;
}
