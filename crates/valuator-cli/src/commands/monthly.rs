use serde_json::json;
use valuator_core::Pipeline;

use crate::cli::FilterArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &FilterArgs, pipeline: &Pipeline) -> Result<CommandResult, CliError> {
    let options = args.to_options("", false)?;
    let outcome = pipeline.load_normalized(&options).await?;

    let lines = outcome.records.iter().map(ToString::to_string).collect();
    let data = json!({
        "reference_currency": options.filter.reference_currency(),
        "records": outcome.records,
        "skipped_unconverted": outcome.unconverted,
    });

    let mut result = CommandResult::ok(data, lines);
    for skipped in &outcome.unconverted {
        result = result.with_warning(format!("no exchange rate, skipped: {skipped}"));
    }
    Ok(result)
}
