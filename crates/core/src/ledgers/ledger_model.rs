//! Observation ledger domain models.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// A single dated observation for one asset.
///
/// The same shape serves both ledgers: `value` is an amount in the manual
/// valuation ledger and a share count in the position ledger. Dates are
/// calendar days; at most one observation exists per (asset, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub asset_id: String,
    pub date: NaiveDate,
    pub value: Decimal,
}

impl Observation {
    pub fn new(asset_id: impl Into<String>, date: NaiveDate, value: Decimal) -> Self {
        Self {
            asset_id: asset_id.into(),
            date,
            value,
        }
    }
}

/// In-memory observation ledger with as-of lookup semantics.
///
/// Observations are keyed by (asset, date) and hold one non-negative value.
/// `value_as_of` returns the latest observation at or before a date, or
/// `None` (never zero) when no such observation exists: an asset simply
/// has no defined value before its first observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationLedger {
    series: BTreeMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl ObservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from persistence-layer rows.
    ///
    /// The storage contract guarantees one row per (asset, date) key, so a
    /// duplicate here is a data-integrity violation: "last value" would be
    /// ambiguous without a defined tie-break, and the load is rejected.
    pub fn from_rows(rows: impl IntoIterator<Item = Observation>) -> Result<Self> {
        let mut ledger = Self::new();
        for row in rows {
            validate_value(&row.asset_id, row.value)?;
            let series = ledger.series.entry(row.asset_id.clone()).or_default();
            if series.insert(row.date, row.value).is_some() {
                return Err(ValidationError::DuplicateObservation {
                    asset_id: row.asset_id,
                    date: row.date,
                }
                .into());
            }
        }
        Ok(ledger)
    }

    /// Upserts the observation for (asset, date). A write for an existing
    /// key replaces the previous value, never duplicates the row.
    pub fn record(&mut self, asset_id: &str, date: NaiveDate, value: Decimal) -> Result<()> {
        validate_value(asset_id, value)?;
        self.series
            .entry(asset_id.to_string())
            .or_default()
            .insert(date, value);
        Ok(())
    }

    /// Returns the value of the latest observation at or before `date` for
    /// the asset, or `None` if no such observation exists.
    pub fn value_as_of(&self, asset_id: &str, date: NaiveDate) -> Option<Decimal> {
        self.series
            .get(asset_id)?
            .range(..=date)
            .next_back()
            .map(|(_, value)| *value)
    }

    /// Removes all observations for the asset. Irreversible.
    /// Returns the number of observations removed.
    pub fn delete_asset(&mut self, asset_id: &str) -> usize {
        self.series
            .remove(asset_id)
            .map(|s| s.len())
            .unwrap_or(0)
    }

    /// Earliest observation date across all assets, if any.
    pub fn first_observation_date(&self) -> Option<NaiveDate> {
        self.series
            .values()
            .filter_map(|s| s.keys().next())
            .min()
            .copied()
    }

    /// Distinct observation dates across all assets, sorted ascending.
    pub fn observation_dates(&self) -> BTreeSet<NaiveDate> {
        self.series
            .values()
            .flat_map(|s| s.keys().copied())
            .collect()
    }

    /// The sparse date-sorted series for one asset, if it has observations.
    pub fn series_for(&self, asset_id: &str) -> Option<&BTreeMap<NaiveDate, Decimal>> {
        self.series.get(asset_id)
    }

    /// All observations as rows, sorted by (asset, date).
    pub fn rows(&self) -> Vec<Observation> {
        self.series
            .iter()
            .flat_map(|(asset_id, series)| {
                series
                    .iter()
                    .map(move |(date, value)| Observation::new(asset_id.clone(), *date, *value))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(|s| s.is_empty())
    }

    /// Total number of observations across all assets.
    pub fn len(&self) -> usize {
        self.series.values().map(|s| s.len()).sum()
    }
}

fn validate_value(asset_id: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeValue {
            field: "observation value",
            asset_id: asset_id.to_string(),
            value: value.to_string(),
        }
        .into());
    }
    Ok(())
}
