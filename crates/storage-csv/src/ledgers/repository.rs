//! CSV-backed observation ledger store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use patrimoine_core::errors::Result;
use patrimoine_core::ledgers::{LedgerRepositoryTrait, Observation, ObservationLedger};

use super::model::{ObservationRecord, HEADERS};
use crate::errors::{header_mismatch, open_failed, read_failed, write_failed};

/// One persisted observation ledger.
///
/// Two instances exist in a deployment: one file for manual amounts, one
/// for positions. Mutations go through the core `ObservationLedger`, so
/// the upsert and purge semantics on disk are exactly the in-memory ones:
/// one record per (asset, date), newer write supersedes, rows removed only
/// when an asset is deleted.
pub struct CsvLedgerRepository {
    path: PathBuf,
}

impl CsvLedgerRepository {
    /// Creates a new CsvLedgerRepository instance for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_rows(&self) -> Result<Vec<Observation>> {
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

        let mut rows = Vec::new();
        for row in reader.deserialize::<ObservationRecord>() {
            let record = row.map_err(|e| read_failed(&self.path, e))?;
            rows.push(Observation::try_from(record)?);
        }
        Ok(rows)
    }

    fn save_rows(&self, rows: &[Observation]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| write_failed(&self.path, e))?;
            }
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        let mut writer =
            csv::Writer::from_path(&tmp_path).map_err(|e| write_failed(&tmp_path, e))?;
        for row in rows {
            writer
                .serialize(ObservationRecord::from(row))
                .map_err(|e| write_failed(&tmp_path, e))?;
        }
        writer.flush().map_err(|e| write_failed(&tmp_path, e))?;
        drop(writer);

        fs::rename(&tmp_path, &self.path).map_err(|e| write_failed(&self.path, e))?;
        Ok(())
    }

    fn load_ledger(&self) -> Result<ObservationLedger> {
        ObservationLedger::from_rows(self.load_rows()?)
    }
}

impl LedgerRepositoryTrait for CsvLedgerRepository {
    fn record(&self, asset_id: &str, date: NaiveDate, value: Decimal) -> Result<()> {
        let mut ledger = self.load_ledger()?;
        ledger.record(asset_id, date, value)?;
        self.save_rows(&ledger.rows())?;
        debug!(
            "Recorded observation {} @ {} in {}",
            asset_id,
            date,
            self.path.display()
        );
        Ok(())
    }

    fn delete_asset(&self, asset_id: &str) -> Result<usize> {
        let mut ledger = self.load_ledger()?;
        let removed = ledger.delete_asset(asset_id);
        if removed > 0 {
            self.save_rows(&ledger.rows())?;
        }
        Ok(removed)
    }

    fn load(&self) -> Result<Vec<Observation>> {
        self.load_rows()
    }
}
