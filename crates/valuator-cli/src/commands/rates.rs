use serde_json::json;
use valuator_core::Pipeline;

use crate::error::CliError;

use super::CommandResult;

pub async fn run(pipeline: &Pipeline) -> Result<CommandResult, CliError> {
    let rates = pipeline.api().fetch_exchange_rates().await?;

    let lines = rates.iter().map(ToString::to_string).collect();
    let data = json!({ "rates": rates });

    Ok(CommandResult::ok(data, lines))
}
