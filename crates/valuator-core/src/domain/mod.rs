//! # Domain Models
//!
//! Typed records for exchange rates and company valuations.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ExchangeRate`] | Directed conversion factor between two currencies |
//! | [`MonthlyPrice`] | One company valuation for one month |
//! | [`MonthlyLeader`] | Most valuable company of a month |
//! | [`AnnualAverage`] | Mean valuation of a company over a year |
//!
//! ## Validation
//!
//! Constructors enforce invariants and return [`ValidationError`](crate::ValidationError):
//!
//! ```rust
//! use valuator_core::{ExchangeRate, ValidationError};
//!
//! assert!(ExchangeRate::new("EUR", "SEK", 11.0).is_ok());
//! assert!(matches!(
//!     ExchangeRate::new("EUR", "SEK", 0.0),
//!     Err(ValidationError::NonPositiveRate { .. })
//! ));
//! ```

mod calendar;
mod exchange_rate;
mod monthly_price;
mod summary;

pub use calendar::parse_iso_date;
pub use exchange_rate::ExchangeRate;
pub use monthly_price::MonthlyPrice;
pub use summary::{AnnualAverage, MonthlyLeader};
