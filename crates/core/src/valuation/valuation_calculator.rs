//! Point-in-time valuation reconstruction.
//!
//! Pure functions: no I/O, no shared state, no clock. Given registry and
//! ledger snapshots plus a price table, rebuilds the per-(asset, date)
//! valuation table by running an as-of (temporal) join per asset against a
//! shared date axis.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::valuation_model::{AssetLabel, Reconstruction};
use crate::assets::{Asset, AssetCategory};
use crate::constants::VALUE_DECIMAL_PRECISION;
use crate::ledgers::ObservationLedger;
use crate::quotes::PriceTable;

/// Inputs of one reconstruction pass, all plain data.
///
/// The price table is restricted to whatever window the caller fetched;
/// gaps and missing tickers are expected, never fatal. `start_date` clips
/// the output axis to a lookback window.
#[derive(Debug, Clone, Copy)]
pub struct ReconstructionInput<'a> {
    pub assets: &'a [Asset],
    pub manual_ledger: &'a ObservationLedger,
    pub position_ledger: &'a ObservationLedger,
    pub price_table: &'a PriceTable,
    pub quoted_categories: &'a BTreeSet<AssetCategory>,
    pub start_date: Option<NaiveDate>,
}

/// Rebuilds the valuation table for the given inputs.
///
/// The axis is the sorted union of manual-ledger dates and price-table
/// dates. Position-only dates never add axis points; positions are
/// sampled at the shared dates. The axis is clipped so that no value is
/// invented before any observation exists.
pub fn reconstruct(input: &ReconstructionInput) -> Reconstruction {
    let axis = assemble_date_axis(input);
    if axis.is_empty() {
        debug!("Valuation axis is empty, nothing to reconstruct");
        return Reconstruction::default();
    }

    let mut points: BTreeMap<NaiveDate, BTreeMap<String, Decimal>> = BTreeMap::new();
    let mut labels: HashMap<String, AssetLabel> = HashMap::new();

    for asset in input.assets {
        let series = if input.quoted_categories.contains(&asset.category) {
            quoted_value_series(asset, &axis, input)
        } else {
            manual_value_series(asset, &axis, input.manual_ledger)
        };

        if series.iter().all(Option::is_none) {
            continue;
        }

        labels.insert(
            asset.id.clone(),
            AssetLabel {
                name: asset.name.clone(),
                category: asset.category,
            },
        );
        for (date, value) in axis.iter().zip(series) {
            if let Some(value) = value {
                points.entry(*date).or_default().insert(asset.id.clone(), value);
            }
        }
    }

    debug!(
        "Reconstructed {} assets over {} axis dates ({} dates emitted)",
        labels.len(),
        axis.len(),
        points.len()
    );
    Reconstruction::new(points, labels)
}

/// Sorted union of manual and quote dates, clipped to the earliest known
/// observation across both ledgers and to the caller's lookback window.
fn assemble_date_axis(input: &ReconstructionInput) -> Vec<NaiveDate> {
    let earliest_known = match [
        input.manual_ledger.first_observation_date(),
        input.position_ledger.first_observation_date(),
    ]
    .into_iter()
    .flatten()
    .min()
    {
        Some(date) => date,
        // No observation anywhere: no value can exist on any date.
        None => return Vec::new(),
    };

    let mut dates: BTreeSet<NaiveDate> = input.manual_ledger.observation_dates();
    dates.extend(input.price_table.trading_dates());

    dates
        .into_iter()
        .filter(|d| *d >= earliest_known)
        .filter(|d| input.start_date.is_none_or(|start| *d >= start))
        .collect()
}

/// quantity_as_of x close_as_of per axis date, both forward-filled; `None`
/// wherever either side is undefined. Absence is never coerced to zero.
fn quoted_value_series(
    asset: &Asset,
    axis: &[NaiveDate],
    input: &ReconstructionInput,
) -> Vec<Option<Decimal>> {
    let Some(ticker) = asset.ticker.as_deref() else {
        warn!("Quoted asset {} has no ticker, excluded from series", asset.id);
        return vec![None; axis.len()];
    };
    let Some(quantities) = input.position_ledger.series_for(&asset.id) else {
        return vec![None; axis.len()];
    };
    let Some(closes) = input.price_table.series_for(ticker) else {
        // Unknown to the price table: unobservable for the whole window.
        debug!("No quotes for ticker {}, asset {} contributes nothing", ticker, asset.id);
        return vec![None; axis.len()];
    };

    let quantity_filled = forward_fill(axis, quantities);
    let close_filled = forward_fill(axis, closes);

    quantity_filled
        .into_iter()
        .zip(close_filled)
        .map(|pair| match pair {
            (Some(quantity), Some(close)) => {
                Some((quantity * close).round_dp(VALUE_DECIMAL_PRECISION))
            }
            _ => None,
        })
        .collect()
}

/// amount_as_of per axis date, forward-filled; `None` before the first
/// observation.
fn manual_value_series(
    asset: &Asset,
    axis: &[NaiveDate],
    manual_ledger: &ObservationLedger,
) -> Vec<Option<Decimal>> {
    match manual_ledger.series_for(&asset.id) {
        Some(amounts) => forward_fill(axis, amounts),
        None => vec![None; axis.len()],
    }
}

/// Merges a sparse date-sorted series against the axis in one pass:
/// each axis date gets the latest observation at or before it, `None`
/// before the first observation. O(axis + observations).
fn forward_fill(
    axis: &[NaiveDate],
    series: &BTreeMap<NaiveDate, Decimal>,
) -> Vec<Option<Decimal>> {
    let mut filled = Vec::with_capacity(axis.len());
    let mut pending = series.iter().peekable();
    let mut last: Option<Decimal> = None;

    for date in axis {
        while let Some((obs_date, value)) = pending.peek() {
            if **obs_date <= *date {
                last = Some(**value);
                pending.next();
            } else {
                break;
            }
        }
        filled.push(last);
    }
    filled
}
