//! Multi-predicate search over the program catalog.

mod outcome;
mod predicates;
mod request;

pub use outcome::{FilterOutcome, ProgramMatch, NO_MATCHING_RESULTS, NO_UNIVERSITIES_FOR_COURSE};
pub use predicates::GCSE_PASS_GRADE;
pub use request::{is_known_field, FilterRequest, COUNTRY_WILDCARD, KNOWN_FIELDS};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::catalog::{Catalog, CatalogEntry, CatalogError, CatalogProvider, Column};
use super::eligibility::{eligible_tiers, ProgramTier};
use predicates::thresholds_for;

/// Filter engine bound to a catalog provider.
pub struct CourseFilterEngine<P> {
    provider: Arc<P>,
}

impl<P> CourseFilterEngine<P>
where
    P: CatalogProvider + 'static,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Run `request` against the provider's current catalog snapshot.
    pub fn filter(&self, request: &FilterRequest) -> Result<FilterOutcome, CatalogError> {
        let catalog = self.provider.catalog()?;
        Ok(filter_catalog(&catalog, request))
    }

    pub fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.provider.catalog()
    }
}

/// Apply every stage of the pipeline to `catalog`.
///
/// Stages only ever remove rows. Predicates on columns the catalog lacks are
/// skipped, and a record with no stated requirement passes that requirement.
pub fn filter_catalog(catalog: &Catalog, request: &FilterRequest) -> FilterOutcome {
    let request = request.normalized();
    let mut working: Vec<&CatalogEntry> = catalog.entries().iter().collect();
    debug!(rows = working.len(), "initial course count");

    if let Some(qualification) = request.latest_qualification.as_deref() {
        if catalog.has_column(Column::DegreeProgram) {
            let tiers = eligible_tiers(qualification, request.requires_gcse);
            working.retain(|entry| {
                entry
                    .key(Column::DegreeProgram)
                    .and_then(ProgramTier::from_catalog)
                    .is_some_and(|tier| tiers.contains(&tier))
            });
            debug!(
                rows = working.len(),
                qualification, "after eligibility filter"
            );
        }
    }

    if let Some(course) = request.course_name.as_deref() {
        if !request.has_categorical_predicate() {
            return universities_offering(catalog, &working, course);
        }
        debug!(course, "course title ignored alongside categorical predicates");
    }

    retain_exact(
        catalog,
        &mut working,
        Column::UniversityName,
        request.university_name.as_deref(),
    );
    if let Some(field) = request.field_type.as_deref() {
        if !is_known_field(field) {
            debug!(field, "field type outside the known field list");
        }
    }
    retain_exact(
        catalog,
        &mut working,
        Column::FieldName,
        request.field_type.as_deref(),
    );
    retain_exact(
        catalog,
        &mut working,
        Column::Location,
        request.location.as_deref(),
    );
    retain_exact(
        catalog,
        &mut working,
        Column::DegreeProgram,
        request.degree_program.as_deref(),
    );

    for threshold in thresholds_for(&request) {
        let column = threshold.column();
        if !catalog.has_column(column) {
            debug!(column = column.header(), "column missing; predicate skipped");
            continue;
        }
        working.retain(|entry| threshold.admits(entry.record()));
        debug!(rows = working.len(), column = column.header(), "after threshold filter");
    }

    if working.is_empty() || !catalog.has_column(Column::CourseOrDegreeName) {
        return FilterOutcome::NoMatchingResults;
    }

    FilterOutcome::Programs(
        working
            .into_iter()
            .map(|entry| ProgramMatch {
                university_name: entry.record().university_name.clone(),
                course_or_degree_name: entry.record().course_or_degree_name.clone(),
            })
            .collect(),
    )
}

fn universities_offering(
    catalog: &Catalog,
    working: &[&CatalogEntry],
    course: &str,
) -> FilterOutcome {
    if !catalog.has_column(Column::CourseOrDegreeName) {
        return FilterOutcome::NoUniversitiesForCourse;
    }

    let mut seen = HashSet::new();
    let universities = working
        .iter()
        .filter(|entry| {
            entry
                .key(Column::CourseOrDegreeName)
                .is_some_and(|title| title.contains(course))
        })
        .filter(|entry| seen.insert(entry.key(Column::UniversityName)))
        .map(|entry| entry.record().university_name.clone())
        .collect::<Vec<_>>();
    debug!(course, universities = universities.len(), "after course name lookup");

    if universities.is_empty() {
        FilterOutcome::NoUniversitiesForCourse
    } else {
        FilterOutcome::Universities(universities)
    }
}

fn retain_exact(
    catalog: &Catalog,
    working: &mut Vec<&CatalogEntry>,
    column: Column,
    expected: Option<&str>,
) {
    let Some(expected) = expected else {
        return;
    };
    if !catalog.has_column(column) {
        debug!(column = column.header(), "column missing; predicate skipped");
        return;
    }

    working.retain(|entry| entry.key(column) == Some(expected));
    debug!(rows = working.len(), column = column.header(), "after exact-match filter");
}
