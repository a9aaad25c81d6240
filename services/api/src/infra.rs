use crate::cli::CatalogArgs;
use course_advisor::config::CatalogConfig;
use course_advisor::workflows::admissions::{CourseLookupTool, FileCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fold command-line catalog flags over the environment configuration.
pub(crate) fn apply_catalog_overrides(config: &mut CatalogConfig, args: CatalogArgs) {
    if let Some(path) = args.catalog {
        config.path = path;
    }
    if let Some(sheet) = args.sheet {
        config.sheet = sheet;
    }
    if let Some(cap) = args.per_university {
        config.results_per_university = cap;
    }
}

pub(crate) fn lookup_tool(config: &CatalogConfig) -> CourseLookupTool<FileCatalog> {
    let provider = FileCatalog::new(config.path.clone(), config.sheet.clone());
    CourseLookupTool::new(Arc::new(provider))
        .with_results_per_university(config.results_per_university)
}
