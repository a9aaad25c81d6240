//! Maps an applicant's most recent qualification to the program tiers they may apply for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Program level as recorded in the catalog's `degree_program` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramTier {
    Foundation,
    InternationalYear,
    Bachelors,
    Masters,
    Phd,
}

impl ProgramTier {
    pub fn label(&self) -> &'static str {
        match self {
            ProgramTier::Foundation => "foundation",
            ProgramTier::InternationalYear => "international year",
            ProgramTier::Bachelors => "bachelor's",
            ProgramTier::Masters => "master's",
            ProgramTier::Phd => "phd",
        }
    }

    /// Parse a normalized catalog value. Underscores and a missing apostrophe are tolerated.
    pub fn from_catalog(value: &str) -> Option<Self> {
        let cleaned = value.trim().to_lowercase().replace('_', " ");
        match cleaned.as_str() {
            "foundation" => Some(ProgramTier::Foundation),
            "international year" => Some(ProgramTier::InternationalYear),
            "bachelor's" | "bachelors" => Some(ProgramTier::Bachelors),
            "master's" | "masters" => Some(ProgramTier::Masters),
            "phd" => Some(ProgramTier::Phd),
            _ => None,
        }
    }
}

impl fmt::Display for ProgramTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Applicant's highest completed qualification, grouped by what it unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    /// A-Level, GCSE, O-Level, BTEC, IB, CACHE, HND, HNC or NVQ.
    PreTertiary,
    Bachelors,
    Masters,
    Unrecognized,
}

const PRE_TERTIARY: [&str; 9] = [
    "a-level", "gcse", "o-level", "btec", "ib", "cache", "hnd", "hnc", "nvq",
];

impl Qualification {
    pub fn from_label(label: &str) -> Self {
        let cleaned = label.trim().to_lowercase().replace(['_', ' '], "-");
        let singular = cleaned.strip_suffix('s').unwrap_or(&cleaned);

        if PRE_TERTIARY.contains(&cleaned.as_str()) || PRE_TERTIARY.contains(&singular) {
            return Qualification::PreTertiary;
        }

        match cleaned.as_str() {
            "bachelor's" | "bachelors" | "bachelor" => Qualification::Bachelors,
            "master's" | "masters" | "master" => Qualification::Masters,
            _ => Qualification::Unrecognized,
        }
    }
}

/// Tiers open to an applicant holding `latest_qualification`.
///
/// An unrecognized qualification opens nothing, which empties the search.
pub fn eligible_tiers(latest_qualification: &str, requires_gcse: bool) -> BTreeSet<ProgramTier> {
    match Qualification::from_label(latest_qualification) {
        Qualification::PreTertiary => {
            BTreeSet::from([ProgramTier::Foundation, ProgramTier::InternationalYear])
        }
        Qualification::Bachelors if requires_gcse => {
            BTreeSet::from([ProgramTier::Masters, ProgramTier::Phd])
        }
        Qualification::Bachelors => BTreeSet::from([ProgramTier::Masters]),
        Qualification::Masters => BTreeSet::from([ProgramTier::Phd]),
        Qualification::Unrecognized => BTreeSet::new(),
    }
}
