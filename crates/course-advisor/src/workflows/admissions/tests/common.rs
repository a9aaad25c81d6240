use std::sync::Arc;

use crate::workflows::admissions::catalog::{
    Catalog, CatalogError, CatalogProvider, ProgramRecord, StaticCatalog,
};
use crate::workflows::admissions::filter::{FilterOutcome, FilterRequest, ProgramMatch};
use crate::workflows::admissions::tool::CourseLookupTool;

pub(super) fn program(
    university: &str,
    field: &str,
    location: &str,
    degree: &str,
    course: &str,
) -> ProgramRecord {
    ProgramRecord {
        university_name: university.to_string(),
        field_name: field.to_string(),
        location: location.to_string(),
        degree_program: degree.to_string(),
        course_or_degree_name: course.to_string(),
        ..ProgramRecord::default()
    }
}

pub(super) fn programs() -> Vec<ProgramRecord> {
    vec![
        program("X", "Engineering", "London", "Bachelor's", "Civil Engineering"),
        ProgramRecord {
            ielts: Some(6.0),
            ucas_tariff: Some("112 UCAS points".to_string()),
            a_levels_overall: Some("BBC".to_string()),
            ..program(
                "University of Suffolk",
                "Engineering",
                "Ipswich",
                "Bachelor's",
                "Construction Management",
            )
        },
        ProgramRecord {
            ielts: Some(6.5),
            ielts_individual_component: Some(5.5),
            bachelors_degree: Some("2:1 or above".to_string()),
            ..program(
                "University of Westminster",
                "Business",
                "London",
                "Master's",
                "International Business and Management",
            )
        },
        ProgramRecord {
            gcse_overall: Some("Grade 4 in English and grade 4 in Maths".to_string()),
            mandatory_subject_of_gcse: Some("English, Maths".to_string()),
            ..program(
                "University of Worcester",
                "Education",
                "Worcester",
                "Bachelor's",
                "Primary Education BA Hons with QTS",
            )
        },
        ProgramRecord {
            ielts: Some(5.0),
            ..program(
                "University College Birmingham",
                "Business",
                "Birmingham",
                "Foundation",
                "Business Management Foundation",
            )
        },
        ProgramRecord {
            btec_diploma: Some("DM".to_string()),
            ..program(
                "University of Westminster",
                "Engineering",
                "London",
                "Foundation",
                "Construction Management Foundation",
            )
        },
        ProgramRecord {
            bachelors_degree: Some("First class honours".to_string()),
            ..program(
                "University of Suffolk",
                "Computer Science",
                "Ipswich",
                "PhD",
                "PhD Computer Science",
            )
        },
        ProgramRecord {
            gcse_overall: Some("grade 3 in English".to_string()),
            ..program(
                "University of West London",
                "Healthcare",
                "London",
                "International Year",
                "Nursing International Year",
            )
        },
    ]
}

pub(super) fn catalog() -> Catalog {
    Catalog::new(programs())
}

pub(super) fn provider() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::new(catalog()))
}

pub(super) fn lookup_tool() -> CourseLookupTool<StaticCatalog> {
    CourseLookupTool::new(provider())
}

pub(super) fn request() -> FilterRequest {
    FilterRequest::default()
}

pub(super) fn programs_of(outcome: &FilterOutcome) -> Vec<ProgramMatch> {
    match outcome {
        FilterOutcome::Programs(matches) => matches.clone(),
        _ => Vec::new(),
    }
}

pub(super) fn courses_of(outcome: &FilterOutcome) -> Vec<String> {
    programs_of(outcome)
        .into_iter()
        .map(|program| program.course_or_degree_name)
        .collect()
}

/// Provider standing in for a catalog file that cannot be read.
pub(super) struct UnavailableCatalog;

impl CatalogProvider for UnavailableCatalog {
    fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        Err(CatalogError::MissingSheet("Sheet1".to_string()))
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}
