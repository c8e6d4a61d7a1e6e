//! Fingerprint-keyed memoization of reconstruction results.
//!
//! Reconstruction is pure, so a result is fully determined by its inputs.
//! The fingerprint is a SHA-256 over a canonical serialization of every
//! input; the cache maps fingerprints to shared results. Invalidation is
//! the caller's job: clear after any registry or ledger write.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use super::valuation_model::Reconstruction;
use crate::assets::{Asset, AssetCategory};
use crate::ledgers::Observation;
use crate::quotes::PriceTable;

/// Computes a stable fingerprint for one set of reconstruction inputs.
///
/// Rows are hashed in a canonical order (assets by id, observations by
/// (asset, date), quotes by (ticker, date)) so that storage iteration
/// order cannot change the key. Two input sets share a fingerprint iff
/// they would produce the same reconstruction.
pub fn input_fingerprint(
    assets: &[Asset],
    manual_rows: &[Observation],
    position_rows: &[Observation],
    price_table: &PriceTable,
    quoted_categories: &BTreeSet<AssetCategory>,
    start_date: Option<NaiveDate>,
) -> String {
    let mut hasher = Sha256::new();

    let mut sorted_assets: Vec<&Asset> = assets.iter().collect();
    sorted_assets.sort_by(|a, b| a.id.cmp(&b.id));
    for asset in sorted_assets {
        hasher.update(asset.id.as_bytes());
        hasher.update(b"|");
        hasher.update(asset.name.as_bytes());
        hasher.update(b"|");
        hasher.update(asset.category.as_db_str().as_bytes());
        hasher.update(b"|");
        if let Some(ticker) = asset.ticker.as_deref() {
            hasher.update(ticker.as_bytes());
        }
        hasher.update(b";");
    }
    hasher.update(b"#");

    for rows in [manual_rows, position_rows] {
        let mut sorted: Vec<&Observation> = rows.iter().collect();
        sorted.sort_by(|a, b| (&a.asset_id, a.date).cmp(&(&b.asset_id, b.date)));
        for row in sorted {
            hasher.update(row.asset_id.as_bytes());
            hasher.update(b"|");
            hasher.update(row.date.format("%Y-%m-%d").to_string().as_bytes());
            hasher.update(b"|");
            hasher.update(normalize_decimal(row.value).as_bytes());
            hasher.update(b";");
        }
        hasher.update(b"#");
    }

    // PriceTable::rows is already canonically ordered by (ticker, date)
    for quote in price_table.rows() {
        hasher.update(quote.ticker.as_bytes());
        hasher.update(b"|");
        hasher.update(quote.date.format("%Y-%m-%d").to_string().as_bytes());
        hasher.update(b"|");
        hasher.update(normalize_decimal(quote.close).as_bytes());
        hasher.update(b";");
    }
    hasher.update(b"#");

    for category in quoted_categories {
        hasher.update(category.as_db_str().as_bytes());
        hasher.update(b";");
    }
    hasher.update(b"#");

    if let Some(start) = start_date {
        hasher.update(start.format("%Y-%m-%d").to_string().as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Normalize decimal to a consistent string format.
fn normalize_decimal(d: Decimal) -> String {
    // Remove trailing zeros for consistent hashing
    d.normalize().to_string()
}

/// Shared, thread-safe reconstruction cache.
#[derive(Default)]
pub struct ValuationCache {
    inner: RwLock<HashMap<String, Arc<Reconstruction>>>,
}

impl ValuationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &str) -> Option<Arc<Reconstruction>> {
        self.inner.read().unwrap().get(fingerprint).cloned()
    }

    pub fn put(&self, fingerprint: String, reconstruction: Arc<Reconstruction>) {
        self.inner
            .write()
            .unwrap()
            .insert(fingerprint, reconstruction);
    }

    /// Drops every cached result. Call after any registry or ledger write.
    pub fn clear(&self) {
        self.inner.write().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}
