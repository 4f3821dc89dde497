//! Client for the valuation API endpoints.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::{decode_exchange_rates, decode_monthly_prices};
use crate::http_client::{HttpClient, HttpError, HttpRequest};
use crate::{AnnualAverage, DecodeError, ExchangeRate, MonthlyPrice, ValidationError};

pub const DEFAULT_BASE_URL: &str = "https://technical-case-platform-engineer.onrender.com/";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Endpoints exposed by the valuation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ExchangeRates,
    MonthlyData,
    AnnualData,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::ExchangeRates => "exchange-rates",
            Self::MonthlyData => "monthly-data",
            Self::AnnualData => "annual-data",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: HttpError,
    },

    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("{endpoint} payload could not be decoded: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: DecodeError,
    },

    #[error("annual average could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of posting one annual average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostOutcome {
    pub average: AnnualAverage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status.is_some_and(|status| (200..300).contains(&status))
    }
}

/// Typed access to the `exchange-rates`, `monthly-data` and `annual-data` endpoints.
#[derive(Clone)]
pub struct ValuationApi {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl ValuationApi {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ValidationError> {
        if timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn fetch_exchange_rates(&self) -> Result<Vec<ExchangeRate>, ApiError> {
        let endpoint = Endpoint::ExchangeRates;
        let body = self.get(endpoint).await?;
        let rates = decode_exchange_rates(&body)
            .map_err(|source| ApiError::Decode { endpoint, source })?;
        debug!(count = rates.len(), "decoded exchange rates");
        Ok(rates)
    }

    pub async fn fetch_monthly_prices(&self) -> Result<Vec<MonthlyPrice>, ApiError> {
        let endpoint = Endpoint::MonthlyData;
        let body = self.get(endpoint).await?;
        let prices = decode_monthly_prices(&body)
            .map_err(|source| ApiError::Decode { endpoint, source })?;
        debug!(count = prices.len(), "decoded monthly prices");
        Ok(prices)
    }

    /// POST one annual average.
    ///
    /// Transport failures and non-2xx statuses are captured in the outcome;
    /// only a serialization failure is returned as an error.
    pub async fn post_annual_average(
        &self,
        average: &AnnualAverage,
    ) -> Result<PostOutcome, ApiError> {
        let body = serde_json::to_string(average)?;
        let request = HttpRequest::post(self.url(Endpoint::AnnualData))
            .with_header("accept", JSON_MEDIA_TYPE)
            .with_header("content-type", JSON_MEDIA_TYPE)
            .with_body(body)
            .with_timeout_ms(self.timeout_ms);

        let outcome = match self.http_client.execute(request).await {
            Ok(response) if response.is_success() => PostOutcome {
                average: average.clone(),
                status: Some(response.status),
                error: None,
            },
            Ok(response) => PostOutcome {
                average: average.clone(),
                status: Some(response.status),
                error: Some(format!("annual-data returned status {}", response.status)),
            },
            Err(error) => PostOutcome {
                average: average.clone(),
                status: None,
                error: Some(error.to_string()),
            },
        };

        if let Some(error) = &outcome.error {
            warn!(
                company = %average.company,
                year = average.year,
                "annual average not accepted: {error}"
            );
        }

        Ok(outcome)
    }

    async fn get(&self, endpoint: Endpoint) -> Result<String, ApiError> {
        let request = HttpRequest::get(self.url(endpoint))
            .with_header("accept", JSON_MEDIA_TYPE)
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        if !response.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }
}

/// Validate an http(s) base URL and make sure it ends with `/`.
pub fn normalize_base_url(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty() && !rest.starts_with('/'));

    if !has_scheme || !has_host {
        return Err(ValidationError::InvalidBaseUrl {
            value: input.to_owned(),
        });
    }

    if trimmed.ends_with('/') {
        Ok(trimmed.to_owned())
    } else {
        Ok(format!("{trimmed}/"))
    }
}
