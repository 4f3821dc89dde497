//! CLI argument definitions for valuator.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rates` | Fetch and print exchange rates |
//! | `monthly` | Fetch and normalize monthly valuations |
//! | `report` | Print monthly leaders, a company total and annual averages |
//! | `sync` | Like `report`, then POST every annual average |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--base-url` | `$VALUATOR_BASE_URL` or the public API | API root |
//! | `--transport` | `reqwest` | HTTP transport (reqwest, curl) |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Log progress at info level |
//!
//! # Examples
//!
//! ```bash
//! valuator report
//! valuator report --company "Nexara Technologies" --format json --pretty
//! valuator sync --transport curl --on-missing-rate abort
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use valuator_core::api::DEFAULT_TIMEOUT_MS;
use valuator_core::normalize::{DEFAULT_CUTOFF, DEFAULT_MAX_YEAR};
use valuator_core::pipeline::DEFAULT_COMPANY;
use valuator_core::MissingRatePolicy;

/// Company valuation aggregation against the valuation API.
#[derive(Debug, Parser)]
#[command(
    name = "valuator",
    author,
    version,
    about = "Normalize company valuations to SEK and publish annual averages",
    long_about = "valuator fetches exchange rates and monthly company valuations, \
restates every value in SEK, and computes monthly leaders, company totals and \
per-year averages.\n\
\n\
Use 'valuator <command> --help' for command-specific help."
)]
pub struct Cli {
    /// API root URL. Falls back to $VALUATOR_BASE_URL, then the public API.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// HTTP transport used for API calls.
    #[arg(long, global = true, value_enum, default_value_t = Transport::Reqwest)]
    pub transport: Transport,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log progress at info level (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    Table,
    /// Single JSON object.
    Json,
}

/// HTTP transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// In-process HTTP client.
    Reqwest,
    /// Shell out to the `curl` executable.
    Curl,
}

/// Handling of records whose currency has no rate into SEK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingRate {
    /// Drop the record and warn.
    Skip,
    /// Fail the run.
    Abort,
}

impl From<MissingRate> for MissingRatePolicy {
    fn from(value: MissingRate) -> Self {
        match value {
            MissingRate::Skip => Self::Skip,
            MissingRate::Abort => Self::Abort,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and print the exchange rates published by the API.
    Rates,

    /// Fetch monthly valuations and print the records that survive filtering,
    /// converted to SEK.
    Monthly(FilterArgs),

    /// Print monthly leaders, the total for one company and annual averages.
    ///
    /// Nothing is posted back to the API.
    ///
    /// # Examples
    ///
    ///   valuator report
    ///   valuator report --company Borealis --cutoff 2024-12-31
    Report(ReportArgs),

    /// Compute the report, then POST one annual average per company and year.
    ///
    /// Exits with code 3 when any POST is not accepted.
    Sync(ReportArgs),
}

/// Record filtering options.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Latest timestamp to keep (inclusive), YYYY-MM-DD.
    #[arg(long, default_value = DEFAULT_CUTOFF)]
    pub cutoff: String,

    /// Latest calendar year to keep.
    #[arg(long, default_value_t = DEFAULT_MAX_YEAR)]
    pub max_year: i32,

    /// What to do with records that cannot be converted to SEK.
    #[arg(long, value_enum, default_value_t = MissingRate::Skip)]
    pub on_missing_rate: MissingRate,
}

/// Arguments shared by `report` and `sync`.
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Company whose total value is reported.
    #[arg(long, default_value = DEFAULT_COMPANY)]
    pub company: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_match_fixed_window() {
        let cli = Cli::try_parse_from(["valuator", "report"]).expect("must parse");
        assert_eq!(cli.transport, Transport::Reqwest);
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.timeout_ms, DEFAULT_TIMEOUT_MS);

        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.company, "Nexara Technologies");
        assert_eq!(args.filter.cutoff, "2025-01-24");
        assert_eq!(args.filter.max_year, 2025);
        assert_eq!(args.filter.on_missing_rate, MissingRate::Skip);
    }

    #[test]
    fn global_options_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "valuator",
            "sync",
            "--transport",
            "curl",
            "--format",
            "json",
            "--on-missing-rate",
            "abort",
        ])
        .expect("must parse");

        assert_eq!(cli.transport, Transport::Curl);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Command::Sync(ReportArgs {
                filter: FilterArgs {
                    on_missing_rate: MissingRate::Abort,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn rejects_unknown_transport() {
        assert!(Cli::try_parse_from(["valuator", "rates", "--transport", "wget"]).is_err());
    }
}
