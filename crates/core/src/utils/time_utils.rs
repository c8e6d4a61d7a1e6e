use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for valuation dates.
/// This is the canonical timezone used to convert UTC instants to domain
/// dates. The ledgers hold calendar-day observations, so every timestamp
/// entering the system goes through this conversion exactly once.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::Europe::Paris;

/// Converts a UTC instant to a valuation date in the given timezone.
///
/// This is the single source of truth for converting instants to domain
/// dates. Use this whenever you need to derive a "business date" from a
/// timestamp.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Convenience function that uses the default valuation timezone.
/// Equivalent to `valuation_date_from_utc(instant, DEFAULT_VALUATION_TZ)`.
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_valuation_date_crosses_midnight() {
        // 23:30 UTC on Jan 1 is already Jan 2 in Paris (UTC+1 in winter)
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let date = valuation_date_from_utc(instant, DEFAULT_VALUATION_TZ);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_valuation_date_same_day() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let date = valuation_date_from_utc(instant, DEFAULT_VALUATION_TZ);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }
}
