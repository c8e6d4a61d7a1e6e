//! CSV row model for ledger observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use patrimoine_core::errors::{Error, StorageError};
use patrimoine_core::ledgers::Observation;

pub(crate) const HEADERS: [&str; 3] = ["asset_id", "date", "value"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One observation as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ObservationRecord {
    pub asset_id: String,
    pub date: String,
    pub value: String,
}

impl From<&Observation> for ObservationRecord {
    fn from(observation: &Observation) -> Self {
        Self {
            asset_id: observation.asset_id.clone(),
            date: observation.date.format(DATE_FORMAT).to_string(),
            value: observation.value.to_string(),
        }
    }
}

impl TryFrom<ObservationRecord> for Observation {
    type Error = Error;

    fn try_from(record: ObservationRecord) -> Result<Self, Error> {
        let date = NaiveDate::parse_from_str(&record.date, DATE_FORMAT)
            .map_err(|_| corrupt(&record.asset_id, "date", &record.date))?;
        let value = record
            .value
            .parse()
            .map_err(|_| corrupt(&record.asset_id, "value", &record.value))?;
        Ok(Observation::new(record.asset_id, date, value))
    }
}

fn corrupt(asset_id: &str, field: &str, raw: &str) -> Error {
    StorageError::ReadFailed(format!(
        "observation for {}: unreadable {} value '{}'",
        asset_id, field, raw
    ))
    .into()
}
