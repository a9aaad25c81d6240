use std::collections::BTreeSet;

/// Display form: invisible characters stripped and whitespace collapsed.
pub(crate) fn tidy_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form for exact-match comparison: the tidy form, lower-cased.
pub(crate) fn normalize_text(value: &str) -> String {
    tidy_text(value).to_lowercase()
}

/// Spreadsheet header to column key: `"University Name"` becomes `"university_name"`.
pub(crate) fn normalize_header(value: &str) -> String {
    normalize_text(value).replace(' ', "_")
}

/// Comma-separated subject list as a set of normalized names.
pub(crate) fn subject_set<'a, I>(subjects: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    subjects
        .into_iter()
        .flat_map(|entry| entry.split(','))
        .map(normalize_text)
        .filter(|subject| !subject.is_empty())
        .collect()
}
