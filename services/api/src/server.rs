use crate::cli::ServeArgs;
use crate::infra::{apply_catalog_overrides, lookup_tool, AppState};
use crate::routes::with_course_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use course_advisor::config::AppConfig;
use course_advisor::error::AppError;
use course_advisor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    apply_catalog_overrides(&mut config.catalog, args.catalog);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let tool = Arc::new(lookup_tool(&config.catalog));
    match tool.engine().catalog() {
        Ok(catalog) => info!(
            rows = catalog.len(),
            path = %config.catalog.path.display(),
            "course catalog warmed"
        ),
        Err(error) => warn!(
            %error,
            path = %config.catalog.path.display(),
            "course catalog not loaded at startup; lookups will retry"
        ),
    }

    let app = with_course_routes(tool)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "course advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
