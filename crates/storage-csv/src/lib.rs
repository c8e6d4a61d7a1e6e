//! CSV storage implementation for Patrimoine.
//!
//! This crate provides file-backed persistence for the asset registry and
//! both observation ledgers. It implements the repository traits defined
//! in `patrimoine-core` and is the only place where file formats exist;
//! the core stays storage-agnostic and works with traits.
//!
//! Storage contract: one physical record per key, (id) for assets,
//! (asset_id, date) for observations. A newer write supersedes the
//! previous record, and ledger rows are purged only on asset deletion.
//! Files are rewritten atomically (temp file + rename) on every mutation.
//!
//! Callers are responsible for exclusive access during writes: the stores
//! hold no locks of their own, matching the single-writer model of the
//! application.

mod errors;

pub mod assets;
pub mod ledgers;

pub use assets::CsvAssetRepository;
pub use ledgers::CsvLedgerRepository;
