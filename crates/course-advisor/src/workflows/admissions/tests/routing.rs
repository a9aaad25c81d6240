use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::admissions::router::{course_router, search_handler, tool_handler};
use crate::workflows::admissions::tool::CourseLookupTool;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn search_route_returns_rendered_matches() {
    let router = course_router(Arc::new(lookup_tool()));

    let response = router
        .oneshot(post_json(
            "/api/v1/courses/search",
            json!({ "university_name": "University of Suffolk", "gpa": 3.9 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["outcome"], json!("programs"));
    assert_eq!(
        payload["result"],
        json!("University of Suffolk - Construction Management, University of Suffolk - PhD Computer Science")
    );
}

#[tokio::test]
async fn search_route_reports_course_lookup_misses() {
    let router = course_router(Arc::new(lookup_tool()));

    let response = router
        .oneshot(post_json(
            "/api/v1/courses/search",
            json!({ "course name": "Marine Biology" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["outcome"], json!("no_universities_for_course"));
    assert_eq!(
        payload["result"],
        json!("No universities found for this course.")
    );
}

#[tokio::test]
async fn tool_route_accepts_wrapped_filters() {
    let router = course_router(Arc::new(lookup_tool()));

    let response = router
        .oneshot(post_json(
            "/api/v1/courses/tool",
            json!({ "filters": { "latest qualification": "A-Level", "location": "Birmingham" } }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["result"],
        json!("University College Birmingham - Business Management Foundation")
    );
}

#[tokio::test]
async fn tool_handler_returns_parse_errors_as_results() {
    let response = tool_handler(State(Arc::new(lookup_tool())), "[1, 2".to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload["result"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Error parsing filters JSON:"));
}

#[tokio::test]
async fn search_handler_returns_unavailable_without_catalog() {
    let tool = Arc::new(CourseLookupTool::new(Arc::new(UnavailableCatalog)));

    let response = search_handler(State(tool), axum::Json(json!({}))).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("Sheet1"));
}

#[tokio::test]
async fn catalog_route_summarizes_the_snapshot() {
    let router = course_router(Arc::new(lookup_tool()));

    let response = router
        .oneshot(
            Request::get("/api/v1/courses/catalog")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rows"], json!(8));
    assert_eq!(payload["universities"], json!(6));
    assert!(payload.get("source").is_none());
}

#[tokio::test]
async fn search_route_accepts_both_spellings_of_a_key() {
    let router = course_router(Arc::new(lookup_tool()));

    let response = router
        .oneshot(post_json(
            "/api/v1/courses/search",
            json!({ "degree program type": null, "degree_program": "PhD" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["result"],
        json!("University of Suffolk - PhD Computer Science")
    );
}

#[tokio::test]
async fn search_handler_rejects_malformed_fields() {
    let response = search_handler(
        State(Arc::new(lookup_tool())),
        axum::Json(json!({ "ielts": [6.5] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
