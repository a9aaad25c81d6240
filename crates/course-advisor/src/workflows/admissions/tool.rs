//! String-in, string-out adapter used by conversational agents.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::catalog::{CatalogError, CatalogProvider};
use super::filter::{CourseFilterEngine, FilterOutcome, FilterRequest, ProgramMatch};
use crate::config::DEFAULT_RESULTS_PER_UNIVERSITY;

/// Errors surfaced by the tool before or while filtering.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Error parsing filters JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("Course catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

/// Outcome of a lookup together with its rendered text.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResult {
    pub outcome: FilterOutcome,
    pub text: String,
}

/// Course lookup tool: validates a filter payload, runs the engine and
/// flattens the matches into one line of text.
pub struct CourseLookupTool<P> {
    engine: CourseFilterEngine<P>,
    results_per_university: usize,
}

impl<P> CourseLookupTool<P>
where
    P: CatalogProvider + 'static,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            engine: CourseFilterEngine::new(provider),
            results_per_university: DEFAULT_RESULTS_PER_UNIVERSITY,
        }
    }

    /// Cap on courses listed per university. Zero is treated as one.
    pub fn with_results_per_university(mut self, cap: usize) -> Self {
        self.results_per_university = cap.max(1);
        self
    }

    pub fn engine(&self) -> &CourseFilterEngine<P> {
        &self.engine
    }

    pub fn lookup(&self, request: &FilterRequest) -> Result<LookupResult, CatalogError> {
        let outcome = self.engine.filter(request)?;
        info!(
            outcome = outcome.kind(),
            matches = outcome.len(),
            "course lookup completed"
        );
        let text = render(&outcome, self.results_per_university);
        Ok(LookupResult { outcome, text })
    }

    pub fn invoke(&self, request: &FilterRequest) -> Result<String, CatalogError> {
        self.lookup(request).map(|result| result.text)
    }

    /// Entry point for raw JSON payloads. Failures come back as text.
    pub fn invoke_json(&self, payload: &str) -> String {
        let outcome = parse_payload(payload)
            .and_then(|request| self.invoke(&request).map_err(ToolError::from));
        match outcome {
            Ok(text) => text,
            Err(err @ ToolError::InvalidPayload(_)) => {
                warn!(error = %err, "rejected course lookup payload");
                err.to_string()
            }
            Err(err) => {
                error!(error = %err, "course lookup failed");
                err.to_string()
            }
        }
    }
}

/// Parse a bare filter object or one wrapped as `{"filters": {...}}`.
/// Keys next to a `filters` object are ignored.
pub fn parse_payload(payload: &str) -> Result<FilterRequest, ToolError> {
    let value = match serde_json::from_str::<Value>(payload)? {
        Value::Object(mut map) if map.get("filters").is_some_and(Value::is_object) => {
            map.remove("filters").unwrap_or_default()
        }
        other => other,
    };

    Ok(FilterRequest::from_value(value)?)
}

/// Render an outcome as the tool's single-line response.
///
/// Program matches are grouped by university (case-insensitively) in name order, keeping at most
/// `per_university` courses each.
pub fn render(outcome: &FilterOutcome, per_university: usize) -> String {
    match outcome {
        FilterOutcome::Programs(matches) => {
            let mut grouped: BTreeMap<String, Vec<&ProgramMatch>> = BTreeMap::new();
            for program in matches {
                grouped
                    .entry(program.university_name.to_lowercase())
                    .or_default()
                    .push(program);
            }

            grouped
                .into_values()
                .flat_map(|programs| programs.into_iter().take(per_university))
                .map(|program| {
                    format!(
                        "{} - {}",
                        program.university_name, program.course_or_degree_name
                    )
                })
                .collect::<Vec<_>>()
                .join(", ")
        }
        FilterOutcome::Universities(names) => names.join(", "),
        FilterOutcome::NoMatchingResults | FilterOutcome::NoUniversitiesForCourse => outcome
            .message()
            .unwrap_or_default()
            .to_string(),
    }
}
