//! Admissions search: grade normalization, eligibility, catalog filtering and
//! the lookup tool exposed to conversational agents.

pub mod catalog;
mod coerce;
pub mod eligibility;
pub mod filter;
pub mod grading;
pub mod router;
pub mod tool;

#[cfg(test)]
mod tests;

pub use catalog::{
    Catalog, CatalogEntry, CatalogError, CatalogProvider, CatalogSummary, Column, FileCatalog,
    ProgramRecord, StaticCatalog,
};
pub use eligibility::{eligible_tiers, ProgramTier, Qualification};
pub use filter::{
    filter_catalog, CourseFilterEngine, FilterOutcome, FilterRequest, ProgramMatch,
    NO_MATCHING_RESULTS, NO_UNIVERSITIES_FOR_COURSE,
};
pub use grading::DegreeClass;
pub use router::course_router;
pub use tool::{parse_payload, CourseLookupTool, LookupResult, ToolError};
