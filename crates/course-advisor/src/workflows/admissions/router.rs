use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use super::catalog::{CatalogError, CatalogProvider};
use super::filter::FilterRequest;
use super::tool::{parse_payload, CourseLookupTool};

/// Router builder exposing the course lookup tool over HTTP.
pub fn course_router<P>(tool: Arc<CourseLookupTool<P>>) -> Router
where
    P: CatalogProvider + 'static,
{
    Router::new()
        .route("/api/v1/courses/search", post(search_handler::<P>))
        .route("/api/v1/courses/tool", post(tool_handler::<P>))
        .route("/api/v1/courses/catalog", get(catalog_handler::<P>))
        .with_state(tool)
}

pub(crate) async fn search_handler<P>(
    State(tool): State<Arc<CourseLookupTool<P>>>,
    axum::Json(payload): axum::Json<Value>,
) -> Response
where
    P: CatalogProvider + 'static,
{
    let request = match FilterRequest::from_value(payload) {
        Ok(request) => request,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match tool.lookup(&request) {
        Ok(result) => {
            let payload = json!({
                "outcome": result.outcome.kind(),
                "result": result.text,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => catalog_unavailable(error),
    }
}

pub(crate) async fn tool_handler<P>(
    State(tool): State<Arc<CourseLookupTool<P>>>,
    body: String,
) -> Response
where
    P: CatalogProvider + 'static,
{
    let request = match parse_payload(&body) {
        Ok(request) => request,
        Err(error) => {
            let payload = json!({ "result": error.to_string() });
            return (StatusCode::OK, axum::Json(payload)).into_response();
        }
    };

    match tool.invoke(&request) {
        Ok(text) => (StatusCode::OK, axum::Json(json!({ "result": text }))).into_response(),
        Err(error) => catalog_unavailable(error),
    }
}

pub(crate) async fn catalog_handler<P>(State(tool): State<Arc<CourseLookupTool<P>>>) -> Response
where
    P: CatalogProvider + 'static,
{
    match tool.engine().catalog() {
        Ok(catalog) => (StatusCode::OK, axum::Json(catalog.summary())).into_response(),
        Err(error) => catalog_unavailable(error),
    }
}

fn catalog_unavailable(error: CatalogError) -> Response {
    tracing::error!(%error, "course catalog unavailable");
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}
