//! Converters from free-text grade notations into comparable numbers.
//!
//! Every converter is total: empty or unrecognizable input yields `None`
//! (or an empty list) instead of an error, so a single malformed catalog
//! cell never aborts a search.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// UCAS-style points per A-Level grade.
const A_LEVEL_WEIGHTS: [(&str, u32); 6] = [
    ("A*", 56),
    ("A", 48),
    ("B", 40),
    ("C", 32),
    ("D", 24),
    ("E", 16),
];

const BTEC_WEIGHTS: [(&str, u32); 4] = [("D*", 4), ("D", 3), ("M", 2), ("P", 1)];

fn a_level_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `A*` must be tried before `A`; regex alternation is leftmost-first.
    PATTERN.get_or_init(|| Regex::new(r"A\*|A|B|C|D|E").expect("A-Level pattern compiles"))
}

fn btec_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"D\*|D|M|P").expect("BTEC pattern compiles"))
}

fn gcse_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)grade\s*(\d+)").expect("GCSE pattern compiles"))
}

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("integer pattern compiles"))
}

fn weighted_sum(text: &str, pattern: &Regex, weights: &[(&str, u32)]) -> Option<u32> {
    let upper = text.trim().to_ascii_uppercase();
    let mut matched = false;
    let mut total = 0;

    for token in pattern.find_iter(&upper) {
        matched = true;
        total += weights
            .iter()
            .find(|(grade, _)| *grade == token.as_str())
            .map(|(_, weight)| *weight)
            .unwrap_or(0);
    }

    matched.then_some(total)
}

/// Sum of A-Level grade points, e.g. `"AAB"` is 48 + 48 + 40 = 136.
pub fn a_level_points(grade: &str) -> Option<u32> {
    weighted_sum(grade, a_level_pattern(), &A_LEVEL_WEIGHTS)
}

/// Sum of BTEC grade weights, e.g. `"D*D*D*"` is 12.
pub fn btec_points(grade: &str) -> Option<u32> {
    weighted_sum(grade, btec_pattern(), &BTEC_WEIGHTS)
}

/// Every `grade <n>` mention in order of appearance. Duplicates are kept.
pub fn gcse_grades(text: &str) -> Vec<u32> {
    gcse_pattern()
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .filter_map(|digits| digits.as_str().parse().ok())
        .collect()
}

/// First run of digits embedded in the text, as used for UCAS tariff cells.
pub fn first_integer(text: &str) -> Option<u32> {
    integer_pattern()
        .find(text)
        .and_then(|digits| digits.as_str().parse().ok())
}

/// UK undergraduate degree classification, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeClass {
    First,
    UpperSecond,
    LowerSecond,
    Third,
}

impl DegreeClass {
    /// Rank used for unclassified degrees and "no requirement" cells.
    pub const UNCLASSIFIED_RANK: u8 = 5;

    pub fn label(&self) -> &'static str {
        match self {
            DegreeClass::First => "first class",
            DegreeClass::UpperSecond => "upper second class",
            DegreeClass::LowerSecond => "lower second class",
            DegreeClass::Third => "third class",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            DegreeClass::First => 1,
            DegreeClass::UpperSecond => 2,
            DegreeClass::LowerSecond => 3,
            DegreeClass::Third => 4,
        }
    }

    /// Rank of an optional classification; `None` sorts after third class.
    pub fn rank_of(class: Option<DegreeClass>) -> u8 {
        class.map_or(Self::UNCLASSIFIED_RANK, |class| class.rank())
    }

    /// Classification earned with a 4.0-scale GPA. Below 2.5 (or NaN) has none.
    pub fn from_gpa(gpa: f64) -> Option<Self> {
        if gpa >= 3.7 {
            Some(DegreeClass::First)
        } else if gpa >= 3.3 {
            Some(DegreeClass::UpperSecond)
        } else if gpa >= 3.0 {
            Some(DegreeClass::LowerSecond)
        } else if gpa >= 2.5 {
            Some(DegreeClass::Third)
        } else {
            None
        }
    }

    /// Same as [`DegreeClass::from_gpa`] for a textual GPA; non-numeric text has none.
    pub fn from_gpa_text(gpa: &str) -> Option<Self> {
        gpa.trim().parse::<f64>().ok().and_then(Self::from_gpa)
    }

    /// Requirement named by a catalog description such as `"2:1 or above"`.
    pub fn from_description(text: &str) -> Option<Self> {
        let value = text.trim().to_lowercase();

        if value.contains("first") {
            Some(DegreeClass::First)
        } else if ["upper second", "2:1", "second upper"]
            .iter()
            .any(|needle| value.contains(needle))
        {
            Some(DegreeClass::UpperSecond)
        } else if ["lower second", "2:2", "second lower"]
            .iter()
            .any(|needle| value.contains(needle))
        {
            Some(DegreeClass::LowerSecond)
        } else if value.contains("third") {
            Some(DegreeClass::Third)
        } else {
            None
        }
    }
}

impl fmt::Display for DegreeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
