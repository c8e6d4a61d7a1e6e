//! Price quote module - the date-indexed closing-price table.
//!
//! The table is plain data handed to the core by the caller; fetching,
//! caching, and TTL policy for quotes live outside this crate. The table
//! may have gaps (non-trading days, unknown tickers) and the core treats
//! every gap as "no value", never as zero.

mod quotes_model;


pub use quotes_model::{PriceQuote, PriceTable};
