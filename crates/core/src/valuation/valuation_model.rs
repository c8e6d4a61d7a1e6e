//! Valuation domain models.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::AssetCategory;
use crate::constants::VALUE_DECIMAL_PRECISION;

/// One derived valuation: what one asset was worth on one date.
/// Never persisted; recomputed from the ledgers and the price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub asset_id: String,
    pub value: Decimal,
}

/// One point of the aggregate series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPoint {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// One row of the category pivot: category label -> value.
/// Categories with no defined value on that date are absent, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Decimal>,
}

/// One row of the per-asset pivot: asset name -> value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Decimal>,
}

/// Metadata the pivots need about one asset.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AssetLabel {
    pub name: String,
    pub category: AssetCategory,
}

/// Result of one reconstruction pass.
///
/// Holds the single per-(date, asset) valuation table all three series are
/// derived from, so `total(d) == sum(category_breakdown(d))` holds by
/// construction for every emitted date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    /// date -> (asset id -> value); only defined values are present, and
    /// dates with no defined value at all are never inserted.
    points: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
    labels: HashMap<String, AssetLabel>,
}

impl Reconstruction {
    pub(crate) fn new(
        points: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
        labels: HashMap<String, AssetLabel>,
    ) -> Self {
        debug_assert!(points.values().all(|row| !row.is_empty()));
        Self { points, labels }
    }

    /// Total portfolio value per date, ascending, no duplicate dates.
    /// Dates where no asset has a defined value are dropped, not zero.
    pub fn total_series(&self) -> Vec<TotalPoint> {
        self.points
            .iter()
            .map(|(date, row)| TotalPoint {
                date: *date,
                total: row.values().sum::<Decimal>().round_dp(VALUE_DECIMAL_PRECISION),
            })
            .collect()
    }

    /// Per-category value per date, pivoted to one column per category.
    pub fn category_series(&self) -> Vec<CategoryRow> {
        self.points
            .iter()
            .map(|(date, row)| {
                let mut values: BTreeMap<String, Decimal> = BTreeMap::new();
                for (asset_id, value) in row {
                    if let Some(label) = self.labels.get(asset_id) {
                        *values
                            .entry(label.category.label().to_string())
                            .or_insert(Decimal::ZERO) += *value;
                    }
                }
                CategoryRow { date: *date, values }
            })
            .collect()
    }

    /// Per-asset value per date, pivoted to one column per asset name.
    /// Assets sharing a name share a column (their values sum).
    pub fn asset_series(&self) -> Vec<AssetRow> {
        self.points
            .iter()
            .map(|(date, row)| {
                let mut values: BTreeMap<String, Decimal> = BTreeMap::new();
                for (asset_id, value) in row {
                    if let Some(label) = self.labels.get(asset_id) {
                        *values.entry(label.name.clone()).or_insert(Decimal::ZERO) += *value;
                    }
                }
                AssetRow { date: *date, values }
            })
            .collect()
    }

    /// The defined value of one asset on one date, if any.
    pub fn value_at(&self, date: NaiveDate, asset_id: &str) -> Option<Decimal> {
        self.points.get(&date)?.get(asset_id).copied()
    }

    /// All defined valuations, flattened, ordered by (date, asset id).
    pub fn valuation_points(&self) -> Vec<ValuationPoint> {
        self.points
            .iter()
            .flat_map(|(date, row)| {
                row.iter().map(move |(asset_id, value)| ValuationPoint {
                    date: *date,
                    asset_id: asset_id.clone(),
                    value: *value,
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of emitted dates.
    pub fn len(&self) -> usize {
        self.points.len()
    }
}
