use serde::{Deserialize, Serialize};

pub const NO_MATCHING_RESULTS: &str = "No matching results found.";
pub const NO_UNIVERSITIES_FOR_COURSE: &str = "No universities found for this course.";

/// A program that satisfied every requested predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMatch {
    pub university_name: String,
    pub course_or_degree_name: String,
}

/// Result of one filter run. The two empty outcomes are distinct so callers
/// can tell a failed course lookup from a general miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "matches", rename_all = "snake_case")]
pub enum FilterOutcome {
    Programs(Vec<ProgramMatch>),
    Universities(Vec<String>),
    NoMatchingResults,
    NoUniversitiesForCourse,
}

impl FilterOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            FilterOutcome::Programs(_) => "programs",
            FilterOutcome::Universities(_) => "universities",
            FilterOutcome::NoMatchingResults => "no_matching_results",
            FilterOutcome::NoUniversitiesForCourse => "no_universities_for_course",
        }
    }

    /// Fixed informational message for the empty outcomes.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            FilterOutcome::NoMatchingResults => Some(NO_MATCHING_RESULTS),
            FilterOutcome::NoUniversitiesForCourse => Some(NO_UNIVERSITIES_FOR_COURSE),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FilterOutcome::Programs(matches) => matches.len(),
            FilterOutcome::Universities(names) => names.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
