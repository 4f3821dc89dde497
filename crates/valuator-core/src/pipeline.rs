//! End-to-end valuation run: fetch, normalize, aggregate, post.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::aggregate::{
    annual_averages, average_by_company_and_year, most_valuable_company, total_value,
};
use crate::api::{ApiError, PostOutcome, ValuationApi};
use crate::normalize::{
    filter_monthly_data, FilterConfig, MissingRatePolicy, NormalizeError, NormalizeOutcome,
};
use crate::{AnnualAverage, MonthlyLeader, MonthlyPrice};

pub const DEFAULT_COMPANY: &str = "Nexara Technologies";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Knobs for one valuation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub filter: FilterConfig,
    pub missing_rate: MissingRatePolicy,
    /// Company whose total value is reported.
    pub company: String,
    /// Whether annual averages are posted back to the API.
    pub post: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            missing_rate: MissingRatePolicy::default(),
            company: String::from(DEFAULT_COMPANY),
            post: false,
        }
    }
}

/// Everything a run computed, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    pub run_id: Uuid,
    pub reference_currency: String,
    pub record_count: usize,
    pub monthly_leaders: Vec<MonthlyLeader>,
    pub company: String,
    pub company_total: f64,
    pub annual_averages: Vec<AnnualAverage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_unconverted: Vec<MonthlyPrice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub posts: Vec<PostOutcome>,
}

impl ValuationReport {
    pub fn failed_posts(&self) -> usize {
        self.posts.iter().filter(|post| !post.is_success()).count()
    }
}

/// Aggregate normalized records into a report without any I/O.
pub fn summarize(outcome: NormalizeOutcome, options: &PipelineOptions) -> ValuationReport {
    let NormalizeOutcome {
        records,
        unconverted,
    } = outcome;
    let reference = options.filter.reference_currency();
    let averages = average_by_company_and_year(&records);

    ValuationReport {
        run_id: Uuid::new_v4(),
        reference_currency: reference.to_owned(),
        record_count: records.len(),
        monthly_leaders: most_valuable_company(&records),
        company: options.company.clone(),
        company_total: total_value(&records, &options.company),
        annual_averages: annual_averages(&averages, reference),
        skipped_unconverted: unconverted,
        posts: Vec::new(),
    }
}

/// Sequential driver over a [`ValuationApi`].
#[derive(Clone)]
pub struct Pipeline {
    api: ValuationApi,
}

impl Pipeline {
    pub fn new(api: ValuationApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ValuationApi {
        &self.api
    }

    /// Fetch rates and monthly prices, then filter and convert.
    ///
    /// The complete rate set is loaded before any record is converted.
    pub async fn load_normalized(
        &self,
        options: &PipelineOptions,
    ) -> Result<NormalizeOutcome, PipelineError> {
        let rates = self.api.fetch_exchange_rates().await?;
        let prices = self.api.fetch_monthly_prices().await?;
        info!(
            rates = rates.len(),
            prices = prices.len(),
            "fetched valuation inputs"
        );

        let outcome =
            filter_monthly_data(prices, &rates, &options.filter, options.missing_rate)?;
        info!(
            retained = outcome.records.len(),
            unconverted = outcome.unconverted.len(),
            "normalized monthly prices to {}",
            options.filter.reference_currency()
        );
        Ok(outcome)
    }

    pub async fn run(&self, options: &PipelineOptions) -> Result<ValuationReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("valuation_run", %run_id);

        async {
            let outcome = self.load_normalized(options).await?;
            let mut report = summarize(outcome, options);
            report.run_id = run_id;

            if options.post {
                for average in &report.annual_averages {
                    let outcome = self.api.post_annual_average(average).await?;
                    report.posts.push(outcome);
                }
                info!(
                    posted = report.posts.len(),
                    failed = report.failed_posts(),
                    "posted annual averages"
                );
            }

            Ok::<_, PipelineError>(report)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_without_records_is_empty_but_valid() {
        let report = summarize(NormalizeOutcome::default(), &PipelineOptions::default());
        assert_eq!(report.record_count, 0);
        assert!(report.monthly_leaders.is_empty());
        assert!(report.annual_averages.is_empty());
        assert_eq!(report.company, DEFAULT_COMPANY);
        assert_eq!(report.company_total, 0.0);
        assert_eq!(report.failed_posts(), 0);
    }
}
