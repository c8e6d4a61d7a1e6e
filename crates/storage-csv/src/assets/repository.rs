//! CSV-backed asset repository.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;

use patrimoine_core::assets::{Asset, AssetRepositoryTrait, NewAsset, UpdateAssetProfile};
use patrimoine_core::errors::Result;

use super::model::{AssetRecord, HEADERS};
use crate::errors::{header_mismatch, not_found, open_failed, read_failed, write_failed};

/// Repository for managing asset data in a CSV file.
///
/// The file is the only state: every operation reads it fresh and writes
/// it back whole, so no record can survive a delete and no key can appear
/// twice. Missing or empty files read as empty stores.
pub struct CsvAssetRepository {
    path: PathBuf,
}

impl CsvAssetRepository {
    /// Creates a new CsvAssetRepository instance for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<Vec<Asset>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| open_failed(&self.path, e))?;

        let headers = reader.headers().map_err(|e| read_failed(&self.path, e))?;
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Ok(Vec::new());
        }
        if headers.iter().ne(HEADERS) {
            return Err(header_mismatch(&self.path, headers));
        }

        let mut assets = Vec::new();
        for row in reader.deserialize::<AssetRecord>() {
            let record = row.map_err(|e| read_failed(&self.path, e))?;
            assets.push(Asset::try_from(record)?);
        }
        Ok(assets)
    }

    fn save_all(&self, assets: &[Asset]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_failed(&self.path, e))?;
            }
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        let mut writer =
            csv::Writer::from_path(&tmp_path).map_err(|e| write_failed(&tmp_path, e))?;
        for asset in assets {
            writer
                .serialize(AssetRecord::from(asset))
                .map_err(|e| write_failed(&tmp_path, e))?;
        }
        writer.flush().map_err(|e| write_failed(&tmp_path, e))?;
        drop(writer);

        fs::rename(&tmp_path, &self.path).map_err(|e| write_failed(&self.path, e))?;
        Ok(())
    }
}

impl AssetRepositoryTrait for CsvAssetRepository {
    fn create(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;
        let mut assets = self.load_all()?;

        let now = Utc::now().naive_utc();

        let asset = Asset {
            id: new_asset.id,
            name: new_asset.name,
            category: new_asset.category,
            pricing_mode: new_asset.pricing_mode,
            ticker: new_asset.ticker,
            quantity: new_asset.quantity,
            unit_cost: new_asset.unit_cost,
            market_value: new_asset.market_value,
            notes: new_asset.notes,
            created_at: now,
            updated_at: now,
        };

        assets.push(asset.clone());
        self.save_all(&assets)?;
        debug!("Stored asset {} in {}", asset.id, self.path.display());
        Ok(asset)
    }

    fn update(&self, asset_id: &str, payload: UpdateAssetProfile) -> Result<Asset> {
        let mut assets = self.load_all()?;
        let asset = assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| not_found(format!("asset {}", asset_id)))?;

        if let Some(name) = payload.name {
            asset.name = name;
        }
        if let Some(category) = payload.category {
            asset.category = category;
        }
        if let Some(ticker) = payload.ticker {
            asset.ticker = Some(ticker);
        }
        if let Some(quantity) = payload.quantity {
            asset.quantity = quantity;
        }
        if let Some(unit_cost) = payload.unit_cost {
            asset.unit_cost = unit_cost;
        }
        if let Some(market_value) = payload.market_value {
            asset.market_value = market_value;
        }
        if let Some(notes) = payload.notes {
            asset.notes = Some(notes);
        }
        asset.updated_at = Utc::now().naive_utc();

        let updated = asset.clone();
        self.save_all(&assets)?;
        Ok(updated)
    }

    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        self.load_all()?
            .into_iter()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| not_found(format!("asset {}", asset_id)))
    }

    fn list(&self) -> Result<Vec<Asset>> {
        self.load_all()
    }

    fn delete(&self, asset_id: &str) -> Result<()> {
        let mut assets = self.load_all()?;
        let before = assets.len();
        assets.retain(|a| a.id != asset_id);
        if assets.len() == before {
            return Err(not_found(format!("asset {}", asset_id)));
        }
        self.save_all(&assets)?;
        Ok(())
    }
}
