use valuator_core::{Pipeline, ValuationReport};

use crate::cli::ReportArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &ReportArgs,
    pipeline: &Pipeline,
    post: bool,
) -> Result<CommandResult, CliError> {
    let options = args.to_options(post)?;
    let report = pipeline.run(&options).await?;

    let data = serde_json::to_value(&report)?;
    let mut result =
        CommandResult::ok(data, report_lines(&report)).with_failed_posts(report.failed_posts());

    if !report.skipped_unconverted.is_empty() {
        result = result.with_warning(format!(
            "{} record(s) skipped: no exchange rate into {}",
            report.skipped_unconverted.len(),
            report.reference_currency
        ));
    }
    if result.failed_posts > 0 {
        result = result.with_warning(format!(
            "{} of {} annual average(s) were not accepted",
            report.failed_posts(),
            report.posts.len()
        ));
    }

    Ok(result)
}

fn report_lines(report: &ValuationReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .monthly_leaders
        .iter()
        .map(|leader| {
            format!(
                "{} - Most valuable company: {} - Value: {}",
                leader.year_month, leader.company, leader.value
            )
        })
        .collect();

    lines.push(format!(
        "Total value of entries for {}: {}",
        report.company, report.company_total
    ));

    for average in &report.annual_averages {
        lines.push(format!(
            "Average for {} in {}: {} {}",
            average.company, average.year, average.value, average.currency
        ));
    }

    for post in &report.posts {
        let status = match (&post.error, post.status) {
            (None, Some(status)) => format!("posted (status {status})"),
            (Some(error), _) => format!("FAILED: {error}"),
            (None, None) => String::from("FAILED: no response"),
        };
        lines.push(format!(
            "{} {}: {}",
            post.average.company, post.average.year, status
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cli::{FilterArgs, MissingRate};
    use valuator_core::pipeline::summarize;
    use valuator_core::{
        AnnualAverage, HttpMethod, HttpResponse, MockHttpClient, MonthlyPrice, NormalizeOutcome,
        PipelineOptions, PostOutcome, ValuationApi,
    };

    const BASE: &str = "https://valuation.test/";

    #[test]
    fn lines_follow_leader_then_total_then_averages() {
        let records = vec![
            MonthlyPrice::new("2025-01-10", 50.0, "A", "SEK").expect("valid"),
            MonthlyPrice::new("2025-01-20", 80.0, "B", "SEK").expect("valid"),
        ];
        let options = PipelineOptions {
            company: String::from("A"),
            ..PipelineOptions::default()
        };
        let mut report = summarize(
            NormalizeOutcome {
                records,
                unconverted: Vec::new(),
            },
            &options,
        );
        report.posts.push(PostOutcome {
            average: AnnualAverage {
                year: 2025,
                value: 50.0,
                company: String::from("A"),
                currency: String::from("SEK"),
            },
            status: Some(500),
            error: Some(String::from("annual-data returned status 500")),
        });

        let lines = report_lines(&report);
        assert_eq!(lines[0], "2025-01 - Most valuable company: B - Value: 80");
        assert_eq!(lines[1], "Total value of entries for A: 50");
        assert_eq!(lines[2], "Average for A in 2025: 50 SEK");
        assert_eq!(lines[3], "Average for B in 2025: 80 SEK");
        assert_eq!(lines[4], "A 2025: FAILED: annual-data returned status 500");
    }

    #[tokio::test]
    async fn sync_warns_about_skipped_records_and_rejected_posts() {
        // annual-data is unrouted, so every POST gets a 404.
        let client = Arc::new(
            MockHttpClient::new()
                .with_response(
                    HttpMethod::Get,
                    format!("{BASE}exchange-rates"),
                    HttpResponse::ok_json(
                        r#"[{"from_currency": "EUR", "to_currency": "SEK", "rate": 11.0}]"#,
                    ),
                )
                .with_response(
                    HttpMethod::Get,
                    format!("{BASE}monthly-data"),
                    HttpResponse::ok_json(
                        r#"[
                            {"timestamp": "2024-01-31", "value": 10, "company": "A", "currency": "EUR"},
                            {"timestamp": "2024-02-29", "value": 20, "company": "A", "currency": "USD"},
                            {"timestamp": "2023-05-31", "value": 30, "company": "B", "currency": "SEK"}
                        ]"#,
                    ),
                ),
        );
        let pipeline = Pipeline::new(ValuationApi::new(client, BASE).expect("valid base url"));
        let args = ReportArgs {
            filter: FilterArgs {
                cutoff: String::from("2025-01-24"),
                max_year: 2025,
                on_missing_rate: MissingRate::Skip,
            },
            company: String::from("A"),
        };

        let result = run(&args, &pipeline, true).await.expect("run succeeds");

        assert_eq!(result.failed_posts, 2);
        assert_eq!(
            result.warnings,
            vec![
                String::from("1 record(s) skipped: no exchange rate into SEK"),
                String::from("2 of 2 annual average(s) were not accepted"),
            ]
        );
        assert!(result
            .lines
            .iter()
            .any(|line| line == "Total value of entries for A: 110"));
    }
}
