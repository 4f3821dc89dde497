//! Run configuration resolved from flags, environment and defaults.

use std::sync::Arc;

use valuator_core::api::DEFAULT_BASE_URL;
use valuator_core::{
    CurlHttpClient, FilterConfig, HttpClient, PipelineOptions, ReqwestHttpClient, ValidationError,
    ValuationApi,
};

use crate::cli::{Cli, FilterArgs, ReportArgs, Transport};
use crate::error::CliError;

pub const BASE_URL_ENV: &str = "VALUATOR_BASE_URL";

/// Connection settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub base_url: String,
    pub transport: Transport,
    pub timeout_ms: u64,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            base_url: resolve_base_url(cli.base_url.as_deref(), std::env::var(BASE_URL_ENV).ok()),
            transport: cli.transport,
            timeout_ms: cli.timeout_ms,
        }
    }

    pub fn build_api(&self) -> Result<ValuationApi, CliError> {
        let http_client: Arc<dyn HttpClient> = match self.transport {
            Transport::Reqwest => Arc::new(ReqwestHttpClient::new()?),
            Transport::Curl => Arc::new(CurlHttpClient::new()),
        };

        let api = ValuationApi::new(http_client, &self.base_url)?.with_timeout_ms(self.timeout_ms)?;
        Ok(api)
    }
}

/// Flag wins over environment, environment over the built-in default.
fn resolve_base_url(flag: Option<&str>, env: Option<String>) -> String {
    flag.map(str::to_owned)
        .or_else(|| env.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| String::from(DEFAULT_BASE_URL))
}

impl FilterArgs {
    pub fn to_options(&self, company: &str, post: bool) -> Result<PipelineOptions, ValidationError> {
        Ok(PipelineOptions {
            filter: FilterConfig::new(&self.cutoff, self.max_year)?,
            missing_rate: self.on_missing_rate.into(),
            company: company.to_owned(),
            post,
        })
    }
}

impl ReportArgs {
    pub fn to_options(&self, post: bool) -> Result<PipelineOptions, ValidationError> {
        self.filter.to_options(&self.company, post)
    }
}
