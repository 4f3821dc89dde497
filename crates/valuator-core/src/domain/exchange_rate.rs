use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::ValidationError;

/// Conversion factor from one currency into another.
///
/// `amount_in_from * rate == amount_in_to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    from_currency: String,
    to_currency: String,
    rate: f64,
}

impl ExchangeRate {
    pub fn new(
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: f64,
    ) -> Result<Self, ValidationError> {
        let from_currency = non_empty("from_currency", from_currency.into())?;
        let to_currency = non_empty("to_currency", to_currency.into())?;

        if !rate.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "rate" });
        }
        if rate <= 0.0 {
            return Err(ValidationError::NonPositiveRate {
                value: rate.to_string(),
            });
        }

        Ok(Self {
            from_currency,
            to_currency,
            rate,
        })
    }

    pub fn from_currency(&self) -> &str {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &str {
        &self.to_currency
    }

    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether this rate converts `from` into `to`.
    pub fn converts(&self, from: &str, to: &str) -> bool {
        self.from_currency == from && self.to_currency == to
    }
}

impl Display for ExchangeRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Exchange rate from {} to {} is {}",
            self.from_currency, self.to_currency, self.rate
        )
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_rate() {
        let err = ExchangeRate::new("EUR", "SEK", 0.0).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonPositiveRate { .. }));

        let err = ExchangeRate::new("EUR", "SEK", -11.0).expect_err("must fail");
        assert!(matches!(err, ValidationError::NonPositiveRate { .. }));
    }

    #[test]
    fn rejects_empty_currency() {
        let err = ExchangeRate::new(" ", "SEK", 11.0).expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::EmptyField {
                field: "from_currency"
            }
        );
    }

    #[test]
    fn matches_direction_exactly() {
        let rate = ExchangeRate::new("EUR", "SEK", 11.0).expect("valid");
        assert!(rate.converts("EUR", "SEK"));
        assert!(!rate.converts("SEK", "EUR"));
        assert_eq!(rate.to_string(), "Exchange rate from EUR to SEK is 11");
    }
}
