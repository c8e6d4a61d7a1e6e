//! CSV row model for assets.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use patrimoine_core::assets::{Asset, AssetCategory, PricingMode};
use patrimoine_core::errors::{Error, StorageError};

pub(crate) const HEADERS: [&str; 11] = [
    "id",
    "name",
    "category",
    "pricing_mode",
    "ticker",
    "quantity",
    "unit_cost",
    "market_value",
    "notes",
    "created_at",
    "updated_at",
];

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One asset as stored on disk. All fields are strings so the file stays
/// hand-editable; parsing happens on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AssetRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub pricing_mode: String,
    pub ticker: String,
    pub quantity: String,
    pub unit_cost: String,
    pub market_value: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Asset> for AssetRecord {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            category: asset.category.as_db_str().to_string(),
            pricing_mode: asset.pricing_mode.as_db_str().to_string(),
            ticker: asset.ticker.clone().unwrap_or_default(),
            quantity: asset.quantity.to_string(),
            unit_cost: asset.unit_cost.to_string(),
            market_value: asset.market_value.to_string(),
            notes: asset.notes.clone().unwrap_or_default(),
            created_at: asset.created_at.format(DATETIME_FORMAT).to_string(),
            updated_at: asset.updated_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}

impl TryFrom<AssetRecord> for Asset {
    type Error = Error;

    fn try_from(record: AssetRecord) -> Result<Self, Error> {
        let category = AssetCategory::from_db_str(&record.category)
            .ok_or_else(|| corrupt(&record.id, "category", &record.category))?;
        let pricing_mode = PricingMode::from_db_str(&record.pricing_mode)
            .ok_or_else(|| corrupt(&record.id, "pricing_mode", &record.pricing_mode))?;

        Ok(Asset {
            id: record.id.clone(),
            name: record.name,
            category,
            pricing_mode,
            ticker: some_unless_empty(record.ticker),
            quantity: parse_decimal(&record.id, "quantity", &record.quantity)?,
            unit_cost: parse_decimal(&record.id, "unit_cost", &record.unit_cost)?,
            market_value: parse_decimal(&record.id, "market_value", &record.market_value)?,
            notes: some_unless_empty(record.notes),
            created_at: parse_datetime(&record.id, "created_at", &record.created_at)?,
            updated_at: parse_datetime(&record.id, "updated_at", &record.updated_at)?,
        })
    }
}

fn some_unless_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_decimal(id: &str, field: &str, raw: &str) -> Result<Decimal, Error> {
    raw.parse().map_err(|_| corrupt(id, field, raw))
}

fn parse_datetime(id: &str, field: &str, raw: &str) -> Result<NaiveDateTime, Error> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map_err(|_| corrupt(id, field, raw))
}

fn corrupt(id: &str, field: &str, raw: &str) -> Error {
    StorageError::ReadFailed(format!(
        "asset {}: unreadable {} value '{}'",
        id, field, raw
    ))
    .into()
}
