use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::super::catalog::normalize_text;
use super::super::coerce::{
    empty_string_as_none, lenient_decimal, lenient_flag, lenient_integer, lenient_list,
};

/// Location value meaning "anywhere in the country".
pub const COUNTRY_WILDCARD: &str = "uk";

/// Alternate key spellings and the field each one fills.
const KEY_ALIASES: [(&str, &str); 10] = [
    ("university name", "university_name"),
    ("field type", "field_type"),
    ("field_name", "field_type"),
    ("degree program type", "degree_program"),
    ("degree program", "degree_program"),
    ("degree_program_type", "degree_program"),
    ("course name", "course_name"),
    ("course_or_degree_name", "course_name"),
    ("latest qualification", "latest_qualification"),
    ("requires gcse", "requires_gcse"),
];

/// Structured search request. Every field is an independent, optional predicate.
///
/// Space-separated key spellings used by conversational callers
/// (`"university name"`, `"course name"`, ...) are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(
        default,
        alias = "university name",
        deserialize_with = "empty_string_as_none"
    )]
    pub university_name: Option<String>,
    #[serde(
        default,
        alias = "field type",
        alias = "field_name",
        deserialize_with = "empty_string_as_none"
    )]
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    #[serde(
        default,
        alias = "degree program type",
        alias = "degree program",
        alias = "degree_program_type",
        deserialize_with = "empty_string_as_none"
    )]
    pub degree_program: Option<String>,
    #[serde(
        default,
        alias = "course name",
        alias = "course_or_degree_name",
        deserialize_with = "empty_string_as_none"
    )]
    pub course_name: Option<String>,
    #[serde(
        default,
        alias = "latest qualification",
        deserialize_with = "empty_string_as_none"
    )]
    pub latest_qualification: Option<String>,
    #[serde(default, alias = "requires gcse", deserialize_with = "lenient_flag")]
    pub requires_gcse: bool,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub ielts: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub ielts_individual_component: Option<f64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub ucas_tariff: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub a_levels_overall: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub btec_diploma: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub btec_extended_diploma: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub gcse_overall: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub mandatory_subject_of_gcse: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub mandatory_subject_of_a_levels: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub gpa: Option<f64>,
}

impl FilterRequest {
    /// Deserialize a JSON object, folding alternate key spellings onto their
    /// field first. The first non-null spelling wins, so a payload carrying
    /// both `"university name"` and `"university_name"` is accepted.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(map) => serde_json::from_value(Value::Object(fold_aliases(map))),
            other => serde_json::from_value(other),
        }
    }

    /// Normalized copy: text predicates trimmed and lower-cased, blanks
    /// dropped, and the country wildcard location removed.
    pub fn normalized(&self) -> Self {
        let clean = |value: &Option<String>| {
            value
                .as_deref()
                .map(normalize_text)
                .filter(|value| !value.is_empty())
        };

        Self {
            university_name: clean(&self.university_name),
            field_type: clean(&self.field_type),
            location: clean(&self.location).filter(|location| location != COUNTRY_WILDCARD),
            degree_program: clean(&self.degree_program),
            course_name: clean(&self.course_name),
            latest_qualification: clean(&self.latest_qualification),
            ..self.clone()
        }
    }

    /// True when any exact-match predicate besides the course title is set.
    pub fn has_categorical_predicate(&self) -> bool {
        self.university_name.is_some()
            || self.field_type.is_some()
            || self.location.is_some()
            || self.degree_program.is_some()
    }
}

fn fold_aliases(mut map: Map<String, Value>) -> Map<String, Value> {
    for (alias, field) in KEY_ALIASES {
        let Some(value) = map.remove(alias) else {
            continue;
        };
        let vacant = map.get(field).map_or(true, Value::is_null);
        if vacant && !value.is_null() {
            map.insert(field.to_string(), value);
        }
    }
    map
}

/// Broad fields of study used to classify catalog programs.
pub const KNOWN_FIELDS: [&str; 11] = [
    "computer science",
    "business",
    "law",
    "healthcare",
    "engineering",
    "arts & humanities",
    "social sciences",
    "natural sciences",
    "education",
    "agriculture & environmental science",
    "mathematics & statistics",
];

pub fn is_known_field(field: &str) -> bool {
    let field = normalize_text(field);
    KNOWN_FIELDS.iter().any(|known| *known == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_spaced_and_snake_case_keys() {
        let spaced: FilterRequest = serde_json::from_str(
            r#"{"university name": "University of Suffolk", "field type": "Engineering",
                "degree program type": "bachelor's", "course name": "Construction Management"}"#,
        )
        .expect("spaced keys parse");
        let snake: FilterRequest = serde_json::from_str(
            r#"{"university_name": "University of Suffolk", "field_type": "Engineering",
                "degree_program": "bachelor's", "course_name": "Construction Management"}"#,
        )
        .expect("snake keys parse");

        assert_eq!(spaced, snake);
        assert_eq!(spaced.course_name.as_deref(), Some("Construction Management"));
    }

    #[test]
    fn duplicate_spellings_of_one_key_are_folded() {
        let request = FilterRequest::from_value(serde_json::json!({
            "university name": null,
            "university_name": "University of Suffolk",
            "course name": "Nursing",
            "course_or_degree_name": "Midwifery",
            "field type": "healthcare",
        }))
        .expect("folded payload parses");

        assert_eq!(request.university_name.as_deref(), Some("University of Suffolk"));
        assert_eq!(request.course_name.as_deref(), Some("Nursing"));
        assert_eq!(request.field_type.as_deref(), Some("healthcare"));
    }

    #[test]
    fn nulls_and_missing_fields_impose_nothing() {
        let request: FilterRequest =
            serde_json::from_str(r#"{"university name": null, "ielts": null}"#)
                .expect("nulls parse");
        assert_eq!(request, FilterRequest::default());
    }

    #[test]
    fn normalization_drops_wildcard_location_and_blanks() {
        let request = FilterRequest {
            location: Some(" UK ".to_string()),
            field_type: Some("  ".to_string()),
            university_name: Some(" University  of Worcester".to_string()),
            ielts: Some(6.5),
            ..FilterRequest::default()
        }
        .normalized();

        assert_eq!(request.location, None);
        assert_eq!(request.field_type, None);
        assert_eq!(
            request.university_name.as_deref(),
            Some("university of worcester")
        );
        assert_eq!(request.ielts, Some(6.5));
        assert!(request.has_categorical_predicate());
    }

    #[test]
    fn numeric_fields_coerce_from_text() {
        let request: FilterRequest = serde_json::from_str(
            r#"{"gpa": "3.4", "ucas_tariff": "112 points", "mandatory_subject_of_gcse": "maths, english"}"#,
        )
        .expect("lenient values parse");

        assert_eq!(request.gpa, Some(3.4));
        assert_eq!(request.ucas_tariff, Some(112));
        assert_eq!(
            request.mandatory_subject_of_gcse,
            Some(vec!["maths".to_string(), " english".to_string()])
        );
    }

    #[test]
    fn known_fields_match_case_insensitively() {
        assert!(is_known_field("Computer Science"));
        assert!(!is_known_field("astrology"));
    }
}
