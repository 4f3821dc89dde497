//! Record filtering and currency normalization.
//!
//! [`filter_monthly_data`] drops records outside the accepted window and
//! currency set, then restates every survivor in the reference currency
//! using the explicitly supplied rate set.

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::parse_iso_date;
use crate::{ExchangeRate, MonthlyPrice, ValidationError};

pub const REFERENCE_CURRENCY: &str = "SEK";
pub const DEFAULT_CUTOFF: &str = "2025-01-24";
pub const DEFAULT_MAX_YEAR: i32 = 2025;
pub const ACCEPTED_CURRENCIES: [&str; 3] = ["EUR", "USD", "SEK"];

/// Record selection window and currency rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    cutoff: String,
    max_year: i32,
    accepted_currencies: Vec<String>,
    reference_currency: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff: String::from(DEFAULT_CUTOFF),
            max_year: DEFAULT_MAX_YEAR,
            accepted_currencies: ACCEPTED_CURRENCIES.iter().map(|c| String::from(*c)).collect(),
            reference_currency: String::from(REFERENCE_CURRENCY),
        }
    }
}

impl FilterConfig {
    /// Build a config with a custom cutoff date (inclusive) and maximum year.
    pub fn new(cutoff: &str, max_year: i32) -> Result<Self, ValidationError> {
        parse_iso_date(cutoff)?;
        Ok(Self {
            cutoff: cutoff.to_owned(),
            max_year,
            ..Self::default()
        })
    }

    pub fn cutoff(&self) -> &str {
        &self.cutoff
    }

    pub const fn max_year(&self) -> i32 {
        self.max_year
    }

    pub fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    pub fn accepts(&self, currency: &str) -> bool {
        self.accepted_currencies.iter().any(|c| c == currency)
    }
}

/// What to do with a record whose currency has no rate into the reference currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRatePolicy {
    /// Drop the record and report it in [`NormalizeOutcome::unconverted`].
    #[default]
    Skip,
    /// Fail normalization.
    Abort,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no exchange rate from {currency} to {reference} for '{company}' at {timestamp}")]
    MissingRate {
        currency: String,
        reference: String,
        company: String,
        timestamp: String,
    },
}

/// Result of [`filter_monthly_data`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizeOutcome {
    /// Surviving records, all in the reference currency, in input order.
    pub records: Vec<MonthlyPrice>,
    /// Records dropped because no rate could convert them.
    pub unconverted: Vec<MonthlyPrice>,
}

/// Filter `records` and convert the survivors into the reference currency.
///
/// The first rate in `rates` that converts the record's currency into the
/// reference currency is used.
pub fn filter_monthly_data(
    mut records: Vec<MonthlyPrice>,
    rates: &[ExchangeRate],
    config: &FilterConfig,
    policy: MissingRatePolicy,
) -> Result<NormalizeOutcome, NormalizeError> {
    let received = records.len();

    // Lexicographic on purpose: both sides are fixed-width YYYY-MM-DD.
    records.retain(|price| price.timestamp() <= config.cutoff());
    records.retain(|price| parse_iso_date(price.timestamp()).is_ok());
    records.retain(|price| price.year() <= config.max_year());
    records.retain(|price| price.value() > 0.0);
    records.retain(|price| config.accepts(price.currency()));

    debug!(
        received,
        retained = records.len(),
        "filtered monthly records"
    );

    let reference = config.reference_currency();
    let mut outcome = NormalizeOutcome {
        records: Vec::with_capacity(records.len()),
        unconverted: Vec::new(),
    };

    for mut price in records {
        if price.currency() == reference {
            outcome.records.push(price);
            continue;
        }

        match find_rate(rates, price.currency(), reference) {
            Some(rate) => {
                price.convert(rate);
                outcome.records.push(price);
            }
            None if policy == MissingRatePolicy::Abort => {
                return Err(NormalizeError::MissingRate {
                    currency: price.currency().to_owned(),
                    reference: reference.to_owned(),
                    company: price.company().to_owned(),
                    timestamp: price.timestamp().to_owned(),
                });
            }
            None => {
                warn!(
                    currency = price.currency(),
                    company = price.company(),
                    timestamp = price.timestamp(),
                    "skipping record without exchange rate into {reference}"
                );
                outcome.unconverted.push(price);
            }
        }
    }

    Ok(outcome)
}

/// First rate in input order converting `from` into `to`.
pub fn find_rate<'a>(rates: &'a [ExchangeRate], from: &str, to: &str) -> Option<&'a ExchangeRate> {
    rates.iter().find(|rate| rate.converts(from, to))
}
