//! Asset domain models.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ValidationError};

/// Fixed portfolio category set.
///
/// Categories double as the aggregation axis for the category series and as
/// the switch between pricing modes: membership in the quoted set decides
/// whether an asset is valued from market quotes or from manual entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCategory {
    ActionsFonds, // Listed stocks and funds
    Crypto,
    #[default]
    Livrets, // Savings accounts
    Immobilier, // Real estate
    FondsEuros, // Euro-denominated insurance funds
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 5] = [
        AssetCategory::ActionsFonds,
        AssetCategory::Crypto,
        AssetCategory::Livrets,
        AssetCategory::Immobilier,
        AssetCategory::FondsEuros,
    ];

    /// User-facing label, also the column name in the category series.
    pub const fn label(&self) -> &'static str {
        match self {
            AssetCategory::ActionsFonds => "Actions & Fonds",
            AssetCategory::Crypto => "Crypto",
            AssetCategory::Livrets => "Livrets",
            AssetCategory::Immobilier => "Immobilier",
            AssetCategory::FondsEuros => "Fonds euros",
        }
    }

    /// Returns the storage string representation (SCREAMING_SNAKE_CASE).
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            AssetCategory::ActionsFonds => "ACTIONS_FONDS",
            AssetCategory::Crypto => "CRYPTO",
            AssetCategory::Livrets => "LIVRETS",
            AssetCategory::Immobilier => "IMMOBILIER",
            AssetCategory::FondsEuros => "FONDS_EUROS",
        }
    }

    /// Parses a category from its storage string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ACTIONS_FONDS" => Some(AssetCategory::ActionsFonds),
            "CRYPTO" => Some(AssetCategory::Crypto),
            "LIVRETS" => Some(AssetCategory::Livrets),
            "IMMOBILIER" => Some(AssetCategory::Immobilier),
            "FONDS_EUROS" => Some(AssetCategory::FondsEuros),
            _ => None,
        }
    }

    /// Categories whose assets are valued as quantity x market price.
    pub fn default_quoted() -> BTreeSet<AssetCategory> {
        BTreeSet::from([AssetCategory::ActionsFonds, AssetCategory::Crypto])
    }
}

/// How the asset is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingMode {
    #[default]
    Manual, // User-entered amounts only
    Quoted, // Quantity x externally supplied market price
}

impl PricingMode {
    /// Returns the storage string representation (SCREAMING_SNAKE_CASE).
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            PricingMode::Manual => "MANUAL",
            PricingMode::Quoted => "QUOTED",
        }
    }

    /// Parses a pricing mode from its storage string.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(PricingMode::Manual),
            "QUOTED" => Some(PricingMode::Quoted),
            _ => None,
        }
    }
}

/// Validates the shape of a ticker symbol.
///
/// Accepts provider-style symbols: uppercase letters and digits, with
/// `.`, `-`, `=` and `^` as separators (MC.PA, BTC-EUR, ^FCHI). Lookup
/// against a live provider is a collaborator concern, not done here.
pub fn validate_ticker(ticker: &str) -> Result<()> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() || trimmed.len() > 20 {
        return Err(ValidationError::InvalidTicker(ticker.to_string()).into());
    }
    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '=' | '^'));
    if !valid {
        return Err(ValidationError::InvalidTicker(ticker.to_string()).into());
    }
    Ok(())
}

/// Domain model representing an asset in the registry.
///
/// Identity is opaque (UUID) and immutable; everything else is mutable
/// through edits or price refreshes. Deleting an asset cascades to both
/// observation ledgers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: AssetCategory,
    pub pricing_mode: PricingMode,

    /// Provider symbol; present iff the asset is quoted.
    pub ticker: Option<String>,

    /// Current share count (zero for manual assets).
    pub quantity: Decimal,

    /// Current unit cost basis (zero for manual assets).
    pub unit_cost: Decimal,

    /// Current value: last applied price x quantity for quoted assets,
    /// last entered amount for manual ones.
    pub market_value: Decimal,

    pub notes: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Asset {
    pub fn is_quoted(&self) -> bool {
        self.pricing_mode == PricingMode::Quoted
    }
}

/// Input for creating a new asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub id: String,
    pub name: String,
    pub category: AssetCategory,
    pub pricing_mode: PricingMode,
    pub ticker: Option<String>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub market_value: Decimal,
    pub notes: Option<String>,
}

impl NewAsset {
    /// A quoted asset (stocks, crypto): valued from quantity x price.
    pub fn quoted(
        name: impl Into<String>,
        ticker: impl Into<String>,
        category: AssetCategory,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            pricing_mode: PricingMode::Quoted,
            ticker: Some(ticker.into()),
            quantity,
            unit_cost,
            market_value: Decimal::ZERO,
            notes: None,
        }
    }

    /// A manual asset (savings, real estate): valued from entered amounts.
    pub fn manual(name: impl Into<String>, category: AssetCategory, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            pricing_mode: PricingMode::Manual,
            ticker: None,
            quantity: Decimal::ZERO,
            unit_cost: Decimal::ZERO,
            market_value: amount,
            notes: None,
        }
    }

    /// Checks the mode/ticker pairing and value signs.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        match self.pricing_mode {
            PricingMode::Quoted => match self.ticker.as_deref() {
                Some(ticker) => validate_ticker(ticker)?,
                None => return Err(ValidationError::MissingField("ticker".to_string()).into()),
            },
            PricingMode::Manual => {
                if self.ticker.is_some() {
                    return Err(ValidationError::InvalidInput(
                        "manual assets cannot carry a ticker".to_string(),
                    )
                    .into());
                }
            }
        }
        for (field, value) in [
            ("quantity", self.quantity),
            ("unit_cost", self.unit_cost),
            ("market_value", self.market_value),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ValidationError::NegativeValue {
                    field,
                    asset_id: self.id.clone(),
                    value: value.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Partial update applied to an existing asset; `None` fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetProfile {
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    pub ticker: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub notes: Option<String>,
}
