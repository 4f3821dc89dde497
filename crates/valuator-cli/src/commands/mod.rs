mod monthly;
mod rates;
mod report;

use serde_json::Value;
use valuator_core::Pipeline;

use crate::cli::{Cli, Command};
use crate::config::RunConfig;
use crate::error::CliError;

/// Rendered output of one command.
pub struct CommandResult {
    /// Machine-readable payload for `--format json`.
    pub data: Value,
    /// Human-readable lines for `--format table`.
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
    pub failed_posts: usize,
}

impl CommandResult {
    pub fn ok(data: Value, lines: Vec<String>) -> Self {
        Self {
            data,
            lines,
            warnings: Vec::new(),
            failed_posts: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_failed_posts(mut self, failed_posts: usize) -> Self {
        self.failed_posts = failed_posts;
        self
    }
}

pub async fn run(cli: &Cli, config: &RunConfig) -> Result<CommandResult, CliError> {
    let pipeline = Pipeline::new(config.build_api()?);

    match &cli.command {
        Command::Rates => rates::run(&pipeline).await,
        Command::Monthly(args) => monthly::run(args, &pipeline).await,
        Command::Report(args) => report::run(args, &pipeline, false).await,
        Command::Sync(args) => report::run(args, &pipeline, true).await,
    }
}
