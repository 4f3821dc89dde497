use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{ExchangeRate, ValidationError};

/// Monthly valuation point of one company.
///
/// `year`, `month` and `day` are split out of `timestamp` at construction;
/// whitespace around each component is ignored. Calendar validity of the timestamp is not checked here; see
/// [`parse_iso_date`](crate::domain::parse_iso_date).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPrice {
    timestamp: String,
    value: f64,
    company: String,
    currency: String,
    #[serde(skip)]
    year: i32,
    #[serde(skip)]
    month: u32,
    #[serde(skip)]
    day: u32,
}

impl MonthlyPrice {
    pub fn new(
        timestamp: impl Into<String>,
        value: f64,
        company: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let timestamp = timestamp.into();
        let (year, month, day) = split_date_components(&timestamp)?;

        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "value" });
        }

        Ok(Self {
            timestamp,
            value,
            company: company.into(),
            currency: currency.into(),
            year,
            month,
            day,
        })
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> u32 {
        self.month
    }

    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Grouping key of the calendar month, e.g. `2025-01`.
    pub fn year_month(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// Restate the value in the rate's target currency.
    pub fn convert(&mut self, rate: &ExchangeRate) {
        self.value *= rate.rate();
        self.currency = rate.to_currency().to_owned();
    }
}

impl Display for MonthlyPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Monthly price for {} at {} is {} {}",
            self.company, self.timestamp, self.value, self.currency
        )
    }
}

fn split_date_components(timestamp: &str) -> Result<(i32, u32, u32), ValidationError> {
    let malformed = || ValidationError::MalformedTimestamp {
        value: timestamp.to_owned(),
    };

    let mut parts = timestamp.split('-');
    let year = parts
        .next()
        .and_then(|part| part.trim().parse::<i32>().ok())
        .ok_or_else(malformed)?;
    let month = parts
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok())
        .ok_or_else(malformed)?;
    let day = parts
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok())
        .ok_or_else(malformed)?;

    Ok((year, month, day))
}
