//! JSON decoders for the valuation API payloads.
//!
//! Wire records are deserialized with serde first, so a missing or wrongly
//! typed field fails the whole payload. Each record is then passed through
//! the domain constructor, and invariant violations are reported with the
//! record's index.

use serde::Deserialize;

use crate::{DecodeError, ExchangeRate, MonthlyPrice};

#[derive(Debug, Deserialize)]
struct ExchangeRatePayload {
    from_currency: String,
    to_currency: String,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct MonthlyPricePayload {
    timestamp: String,
    value: f64,
    company: String,
    currency: String,
}

/// Decode the `exchange-rates` payload, preserving input order.
pub fn decode_exchange_rates(payload: &str) -> Result<Vec<ExchangeRate>, DecodeError> {
    let items: Vec<ExchangeRatePayload> = serde_json::from_str(payload)?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            ExchangeRate::new(item.from_currency, item.to_currency, item.rate)
                .map_err(|source| DecodeError::Record { index, source })
        })
        .collect()
}

/// Decode the `monthly-data` payload, preserving input order.
///
/// Impossible calendar dates such as `2025-02-30` are accepted here.
pub fn decode_monthly_prices(payload: &str) -> Result<Vec<MonthlyPrice>, DecodeError> {
    let items: Vec<MonthlyPricePayload> = serde_json::from_str(payload)?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            MonthlyPrice::new(item.timestamp, item.value, item.company, item.currency)
                .map_err(|source| DecodeError::Record { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn decodes_rates_in_order_and_ignores_extra_fields() {
        let payload = r#"[
            {"from_currency": "EUR", "to_currency": "SEK", "rate": 11.0, "source": "ecb"},
            {"from_currency": "USD", "to_currency": "SEK", "rate": 10}
        ]"#;

        let rates = decode_exchange_rates(payload).expect("must decode");
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].from_currency(), "EUR");
        assert_eq!(rates[1].rate(), 10.0);
    }

    #[test]
    fn missing_rate_field_is_a_json_error() {
        let payload = r#"[{"from_currency": "EUR", "to_currency": "SEK"}]"#;
        let err = decode_exchange_rates(payload).expect_err("must fail");
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let err = decode_monthly_prices(r#"{"detail": "Not Found"}"#).expect_err("must fail");
        assert!(matches!(err, DecodeError::Json(_)));

        let err = decode_monthly_prices("<html>").expect_err("must fail");
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn negative_rate_reports_record_index() {
        let payload = r#"[
            {"from_currency": "EUR", "to_currency": "SEK", "rate": 11.0},
            {"from_currency": "USD", "to_currency": "SEK", "rate": -1.0}
        ]"#;

        let err = decode_exchange_rates(payload).expect_err("must fail");
        assert!(matches!(
            err,
            DecodeError::Record {
                index: 1,
                source: ValidationError::NonPositiveRate { .. }
            }
        ));
    }

    #[test]
    fn decodes_monthly_prices_with_integer_values() {
        let payload = r#"[
            {"timestamp": "2024-12-31", "value": 250, "company": "Nexara Technologies", "currency": "USD"},
            {"timestamp": "2025-02-30", "value": 12.5, "company": "Acme", "currency": "SEK"}
        ]"#;

        let prices = decode_monthly_prices(payload).expect("must decode");
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].value(), 250.0);
        assert_eq!(prices[0].year(), 2024);
        assert_eq!(prices[1].day(), 30);
    }

    #[test]
    fn whitespace_padded_timestamp_still_decodes() {
        let payload = r#"[
            {"timestamp": "2024-01-31", "value": 1, "company": "A", "currency": "SEK"},
            {"timestamp": "2024-01-31 ", "value": 2, "company": "B", "currency": "SEK"},
            {"timestamp": " 2024-02-29", "value": 3, "company": "C", "currency": "SEK"}
        ]"#;

        let prices = decode_monthly_prices(payload).expect("must decode");
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[1].timestamp(), "2024-01-31 ");
        assert_eq!(prices[2].year_month(), "2024-02");
    }

    #[test]
    fn null_value_is_rejected() {
        let payload =
            r#"[{"timestamp": "2024-12-31", "value": null, "company": "A", "currency": "USD"}]"#;
        assert!(matches!(
            decode_monthly_prices(payload),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn unsplittable_timestamp_reports_record_index() {
        let payload = r#"[{"timestamp": "31/12/2024", "value": 1, "company": "A", "currency": "USD"}]"#;
        let err = decode_monthly_prices(payload).expect_err("must fail");
        assert!(matches!(
            err,
            DecodeError::Record {
                index: 0,
                source: ValidationError::MalformedTimestamp { .. }
            }
        ));
    }
}
