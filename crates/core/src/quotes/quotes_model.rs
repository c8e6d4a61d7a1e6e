//! Price quote domain models.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// One closing price for a ticker on a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub ticker: String,
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PriceQuote {
    pub fn new(ticker: impl Into<String>, date: NaiveDate, close: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            close,
        }
    }
}

/// Date-indexed closing-price table, one column per ticker.
///
/// Lookups are forward-filled: `close_as_of` returns the most recent close
/// at or before the requested date, bridging non-trading gaps. A ticker
/// absent from the table, or probed before its first quote, yields `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    columns: BTreeMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from quote rows.
    ///
    /// Closing prices must be strictly positive, and at most one quote may
    /// exist per (ticker, date); a duplicate makes "most recent close"
    /// ambiguous and the load is rejected.
    pub fn from_quotes(rows: impl IntoIterator<Item = PriceQuote>) -> Result<Self> {
        let mut table = Self::new();
        for row in rows {
            if row.close <= Decimal::ZERO {
                return Err(ValidationError::NonPositiveClose {
                    ticker: row.ticker,
                    date: row.date,
                }
                .into());
            }
            let column = table.columns.entry(row.ticker.clone()).or_default();
            if column.insert(row.date, row.close).is_some() {
                return Err(ValidationError::DuplicateQuote {
                    ticker: row.ticker,
                    date: row.date,
                }
                .into());
            }
        }
        Ok(table)
    }

    /// Most recent close at or before `date` for the ticker, or `None`.
    pub fn close_as_of(&self, ticker: &str, date: NaiveDate) -> Option<Decimal> {
        self.columns
            .get(ticker)?
            .range(..=date)
            .next_back()
            .map(|(_, close)| *close)
    }

    /// Last known close for the ticker, or `None` if the ticker is absent.
    pub fn latest_close(&self, ticker: &str) -> Option<Decimal> {
        self.columns
            .get(ticker)?
            .values()
            .next_back()
            .copied()
    }

    /// Distinct trading dates across all tickers, sorted ascending.
    pub fn trading_dates(&self) -> BTreeSet<NaiveDate> {
        self.columns
            .values()
            .flat_map(|c| c.keys().copied())
            .collect()
    }

    /// The sparse date-sorted close series for one ticker, if present.
    pub fn series_for(&self, ticker: &str) -> Option<&BTreeMap<NaiveDate, Decimal>> {
        self.columns.get(ticker)
    }

    /// All quotes as rows, sorted by (ticker, date).
    pub fn rows(&self) -> Vec<PriceQuote> {
        self.columns
            .iter()
            .flat_map(|(ticker, column)| {
                column
                    .iter()
                    .map(move |(date, close)| PriceQuote::new(ticker.clone(), *date, *close))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(|c| c.is_empty())
    }

    /// Total number of quotes across all tickers.
    pub fn len(&self) -> usize {
        self.columns.values().map(|c| c.len()).sum()
    }
}
