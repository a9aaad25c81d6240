//! Lenient field coercion shared by catalog rows and inbound filter payloads.

use serde::{Deserialize, Deserializer};

use super::grading::first_integer;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Flag(bool),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| match value {
            NumberOrText::Number(number) => number.to_string(),
            NumberOrText::Flag(flag) => flag.to_string(),
            NumberOrText::Text(text) => text,
        })
        .filter(|value| is_stated(value)))
}

/// Spreadsheet placeholders that mean "nothing stated".
const PLACEHOLDERS: [&str; 4] = ["n/a", "na", "nan", "-"];

fn is_stated(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && !PLACEHOLDERS
            .iter()
            .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
}

/// Catalog cell text exactly as written; blanks and placeholders become `None`.
pub(crate) fn cell_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|text| is_stated(text)))
}

/// Numbers or numeric strings; anything unparseable becomes `None`.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(opt
        .and_then(|value| match value {
            NumberOrText::Number(number) => Some(number),
            NumberOrText::Flag(_) => None,
            NumberOrText::Text(text) => text.trim().parse().ok(),
        })
        .filter(|number: &f64| number.is_finite()))
}

/// Numbers or strings with an embedded integer such as `"112 points"`.
pub(crate) fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(opt.and_then(|value| match value {
        NumberOrText::Number(number) if number.is_finite() && number >= 0.0 => {
            Some(number.trunc().min(u32::MAX as f64) as u32)
        }
        NumberOrText::Number(_) | NumberOrText::Flag(_) => None,
        NumberOrText::Text(text) => first_integer(&text),
    }))
}

/// A JSON array of names or a single comma-separated string.
pub(crate) fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<ListOrText>::deserialize(deserializer)?;
    Ok(opt.map(|value| match value {
        ListOrText::List(items) => items,
        ListOrText::Text(text) => text.split(',').map(str::to_string).collect(),
    }))
}

/// Booleans, `"true"`/`"yes"` strings, or null (false).
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match opt {
        Some(NumberOrText::Flag(flag)) => flag,
        Some(NumberOrText::Number(number)) => number != 0.0,
        Some(NumberOrText::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        None => false,
    })
}
