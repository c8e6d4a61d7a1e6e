//! Conversions from file-level failures into the core's storage errors.

use std::fmt::Display;
use std::path::Path;

use patrimoine_core::errors::{Error, StorageError};

pub(crate) fn open_failed(path: &Path, err: impl Display) -> Error {
    StorageError::OpenFailed(format!("{}: {}", path.display(), err)).into()
}

pub(crate) fn read_failed(path: &Path, err: impl Display) -> Error {
    StorageError::ReadFailed(format!("{}: {}", path.display(), err)).into()
}

pub(crate) fn write_failed(path: &Path, err: impl Display) -> Error {
    StorageError::WriteFailed(format!("{}: {}", path.display(), err)).into()
}

pub(crate) fn header_mismatch(path: &Path, found: &csv::StringRecord) -> Error {
    StorageError::HeaderMismatch(format!(
        "{}: found [{}]",
        path.display(),
        found.iter().collect::<Vec<_>>().join(", ")
    ))
    .into()
}

pub(crate) fn not_found(what: impl Display) -> Error {
    StorageError::NotFound(what.to_string()).into()
}
