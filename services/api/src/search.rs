use crate::cli::CatalogArgs;
use crate::infra::{apply_catalog_overrides, lookup_tool};
use clap::Args;
use course_advisor::config::AppConfig;
use course_advisor::error::AppError;
use course_advisor::telemetry;
use course_advisor::workflows::admissions::parse_payload;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Filter payload as JSON, e.g. '{"course name": "nursing"}'
    #[arg(long, conflicts_with = "filters_file")]
    pub(crate) filters: Option<String>,
    /// Read the filter payload from a JSON file
    #[arg(long)]
    pub(crate) filters_file: Option<PathBuf>,
    /// Print the structured outcome as JSON instead of the tool text
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        filters,
        filters_file,
        json,
        catalog,
    } = args;

    let mut config = AppConfig::load()?;
    apply_catalog_overrides(&mut config.catalog, catalog);
    telemetry::init(&config.telemetry)?;

    let payload = match (filters, filters_file) {
        (Some(filters), _) => filters,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => "{}".to_string(),
    };

    let tool = lookup_tool(&config.catalog);
    if !json {
        println!("{}", tool.invoke_json(&payload));
        return Ok(());
    }

    let request = parse_payload(&payload)?;
    let result = tool.lookup(&request)?;
    println!(
        "{:#}",
        json!({
            "outcome": result.outcome,
            "result": result.text,
        })
    );
    Ok(())
}
