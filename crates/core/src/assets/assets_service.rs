use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use super::assets_model::{
    validate_ticker, Asset, AssetCategory, NewAsset, PricingMode, UpdateAssetProfile,
};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use crate::constants::VALUE_DECIMAL_PRECISION;
use crate::errors::{Result, ValidationError};
use crate::ledgers::LedgerRepositoryTrait;
use crate::utils::time_utils;

/// Service for managing assets and their ledger side effects.
///
/// Holds the manual valuation ledger and the position ledger next to the
/// registry so that every registry mutation keeps the history consistent:
/// creations seed an initial observation, edits append one, deletions purge
/// both ledgers.
pub struct AssetService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    manual_ledger: Arc<dyn LedgerRepositoryTrait>,
    position_ledger: Arc<dyn LedgerRepositoryTrait>,
    quoted_categories: BTreeSet<AssetCategory>,
}

impl AssetService {
    /// Creates a new AssetService instance.
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
        }
    }

    fn ensure_quoted_category(&self, category: AssetCategory) -> Result<()> {
        if !self.quoted_categories.contains(&category) {
            return Err(ValidationError::InvalidInput(format!(
                "category '{}' is not a quoted category",
                category.label()
            ))
            .into());
        }
        Ok(())
    }

    fn ensure_manual_category(&self, category: AssetCategory) -> Result<()> {
        if self.quoted_categories.contains(&category) {
            return Err(ValidationError::InvalidInput(format!(
                "category '{}' requires a ticker and a quantity",
                category.label()
            ))
            .into());
        }
        Ok(())
    }
}

impl AssetServiceTrait for AssetService {
    /// Lists all assets
    fn get_assets(&self) -> Result<Vec<Asset>> {
        self.asset_repository.list()
    }

    /// Retrieves an asset by its ID
    fn get_asset_by_id(&self, asset_id: &str) -> Result<Asset> {
        self.asset_repository.get_by_id(asset_id)
    }

    fn create_quoted_asset(
        &self,
        name: &str,
        ticker: &str,
        category: AssetCategory,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<Asset> {
        self.ensure_quoted_category(category)?;
        validate_ticker(ticker)?;

        let new_asset = NewAsset::quoted(name, ticker, category, quantity, unit_cost);
        new_asset.validate()?;

        let asset = self.asset_repository.create(new_asset)?;
        self.position_ledger
            .record(&asset.id, time_utils::valuation_date_today(), quantity)?;

        debug!("Created quoted asset {} ({})", asset.id, ticker);
        Ok(asset)
    }

    fn create_manual_asset(
        &self,
        name: &str,
        category: AssetCategory,
        amount: Decimal,
    ) -> Result<Asset> {
        self.ensure_manual_category(category)?;

        let new_asset = NewAsset::manual(name, category, amount);
        new_asset.validate()?;

        let asset = self.asset_repository.create(new_asset)?;
        self.manual_ledger
            .record(&asset.id, time_utils::valuation_date_today(), amount)?;

        debug!("Created manual asset {} ({})", asset.id, name);
        Ok(asset)
    }

    fn update_quoted_asset(
        &self,
        asset_id: &str,
        name: &str,
        ticker: &str,
        category: AssetCategory,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<Asset> {
        self.ensure_quoted_category(category)?;
        validate_ticker(ticker)?;

        let current = self.asset_repository.get_by_id(asset_id)?;
        if current.pricing_mode != PricingMode::Quoted {
            return Err(ValidationError::InvalidInput(format!(
                "asset {} is not a quoted asset",
                asset_id
            ))
            .into());
        }

        let asset = self.asset_repository.update(
            asset_id,
            UpdateAssetProfile {
                name: Some(name.to_string()),
                category: Some(category),
                ticker: Some(ticker.to_string()),
                quantity: Some(quantity),
                unit_cost: Some(unit_cost),
                ..Default::default()
            },
        )?;

        if quantity != current.quantity {
            self.position_ledger
                .record(asset_id, time_utils::valuation_date_today(), quantity)?;
        }

        Ok(asset)
    }

    fn update_manual_asset(
        &self,
        asset_id: &str,
        name: &str,
        category: AssetCategory,
        amount: Decimal,
    ) -> Result<Asset> {
        self.ensure_manual_category(category)?;

        let current = self.asset_repository.get_by_id(asset_id)?;
        if current.pricing_mode != PricingMode::Manual {
            return Err(ValidationError::InvalidInput(format!(
                "asset {} is not a manual asset",
                asset_id
            ))
            .into());
        }

        let asset = self.asset_repository.update(
            asset_id,
            UpdateAssetProfile {
                name: Some(name.to_string()),
                category: Some(category),
                market_value: Some(amount),
                ..Default::default()
            },
        )?;

        // Manual edits always land in the ledger: the entered amount is the
        // observation.
        self.manual_ledger
            .record(asset_id, time_utils::valuation_date_today(), amount)?;

        Ok(asset)
    }

    fn remove_asset(&self, asset_id: &str) -> Result<()> {
        let purged_amounts = self.manual_ledger.delete_asset(asset_id)?;
        let purged_positions = self.position_ledger.delete_asset(asset_id)?;
        self.asset_repository.delete(asset_id)?;

        debug!(
            "Removed asset {} ({} amount rows, {} position rows purged)",
            asset_id, purged_amounts, purged_positions
        );
        Ok(())
    }

    fn apply_prices(&self, prices: &HashMap<String, Decimal>) -> Result<Vec<String>> {
        let mut missing: Vec<String> = Vec::new();

        for asset in self.asset_repository.list()? {
            if !asset.is_quoted() {
                continue;
            }
            let Some(ticker) = asset.ticker.as_deref() else {
                warn!("Quoted asset {} has no ticker, skipping", asset.id);
                continue;
            };
            match prices.get(ticker) {
                Some(close) => {
                    let market_value =
                        (*close * asset.quantity).round_dp(VALUE_DECIMAL_PRECISION);
                    self.asset_repository.update(
                        &asset.id,
                        UpdateAssetProfile {
                            market_value: Some(market_value),
                            ..Default::default()
                        },
                    )?;
                }
                None => missing.push(ticker.to_string()),
            }
        }

        if !missing.is_empty() {
            warn!("No price available for tickers: {}", missing.join(", "));
        }
        Ok(missing)
    }
}
