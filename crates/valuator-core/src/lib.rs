//! # Valuator Core
//!
//! Fetches exchange rates and monthly company valuations from the valuation
//! API, restates every value in a single reference currency (SEK), and
//! computes monthly leaders, company totals and annual averages.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregate`] | Monthly leaders, totals and per-year averages |
//! | [`api`] | Typed client for the valuation API endpoints |
//! | [`decode`] | JSON payload decoders |
//! | [`domain`] | Domain models (ExchangeRate, MonthlyPrice, AnnualAverage) |
//! | [`error`] | Validation and decode errors |
//! | [`http_client`] | HTTP transport abstraction (reqwest, curl, mock) |
//! | [`normalize`] | Record filtering and currency conversion |
//! | [`pipeline`] | End-to-end run producing a [`ValuationReport`] |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ValuationApi   │────▶│ HTTP Client      │
//! │                 │     │ (reqwest/curl)   │
//! └────────┬────────┘     └──────────────────┘
//!          │ decode
//!          ▼
//! ┌─────────────────┐
//! │ filter_monthly_ │  rates passed explicitly
//! │ data            │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ aggregate       │──▶ POST annual-data
//! └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use valuator_core::normalize::{filter_monthly_data, FilterConfig, MissingRatePolicy};
//! use valuator_core::{ExchangeRate, MonthlyPrice};
//!
//! let rates = vec![ExchangeRate::new("EUR", "SEK", 11.0).unwrap()];
//! let prices = vec![MonthlyPrice::new("2025-01-01", 100.0, "A", "EUR").unwrap()];
//!
//! let outcome = filter_monthly_data(
//!     prices,
//!     &rates,
//!     &FilterConfig::default(),
//!     MissingRatePolicy::Skip,
//! )
//! .unwrap();
//! assert_eq!(outcome.records[0].value(), 1100.0);
//! assert_eq!(outcome.records[0].currency(), "SEK");
//! ```

pub mod aggregate;
pub mod api;
pub mod decode;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalize;
pub mod pipeline;

// Domain models
pub use domain::{AnnualAverage, ExchangeRate, MonthlyLeader, MonthlyPrice};

// Error types
pub use error::{DecodeError, ValidationError};

// HTTP client types
pub use http_client::{
    CurlHttpClient, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, MockHttpClient,
    ReqwestHttpClient,
};

// API client
pub use api::{ApiError, Endpoint, PostOutcome, ValuationApi};

// Normalization
pub use normalize::{FilterConfig, MissingRatePolicy, NormalizeError, NormalizeOutcome};

// Pipeline
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, ValuationReport};
