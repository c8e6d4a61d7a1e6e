/// Decimal precision for asset valuations
pub const VALUE_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for unit prices
pub const PRICE_DECIMAL_PRECISION: u32 = 4;

/// Column label used for the aggregate series
pub const TOTAL_SERIES_LABEL: &str = "Total patrimoine";
