use crate::search::{run_search, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use course_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Course Advisor",
    about = "Match applicant qualifications against the university program catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one course lookup against the catalog and print the result
    Search(SearchArgs),
}

/// Catalog overrides shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CatalogArgs {
    /// Catalog file (.csv, .xlsx, .xls or .ods); overrides CATALOG_PATH
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Worksheet to read from spreadsheet catalogs; overrides CATALOG_SHEET
    #[arg(long)]
    pub(crate) sheet: Option<String>,
    /// Maximum courses listed per university; overrides CATALOG_RESULTS_PER_UNIVERSITY
    #[arg(long)]
    pub(crate) per_university: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Search(args) => run_search(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["course-advisor-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn search_accepts_filters_and_catalog_overrides() {
        let cli = Cli::try_parse_from([
            "course-advisor-api",
            "search",
            "--filters",
            r#"{"course name": "nursing"}"#,
            "--catalog",
            "data/catalog.csv",
            "--per-university",
            "3",
        ])
        .expect("parses");

        let Some(Command::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.filters.as_deref(), Some(r#"{"course name": "nursing"}"#));
        assert_eq!(args.catalog.catalog, Some(PathBuf::from("data/catalog.csv")));
        assert_eq!(args.catalog.per_university, Some(3));
        assert!(!args.json);
    }
}
