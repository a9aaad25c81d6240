use super::normalizer::normalize_header;
use super::{CatalogError, Column, ProgramRecord};
use csv::StringRecord;
use std::collections::BTreeSet;
use std::io::Read;
use tracing::warn;

pub(crate) struct ParsedCatalog {
    pub(crate) records: Vec<ProgramRecord>,
    pub(crate) columns: BTreeSet<Column>,
}

/// Read catalog rows from CSV. Headers are matched case-insensitively, blank
/// rows are dropped and a row that cannot be read is skipped, not fatal.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<ParsedCatalog, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect::<StringRecord>();
    let columns = headers
        .iter()
        .filter_map(Column::from_header)
        .collect::<BTreeSet<_>>();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let mut row = row?;
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }

        // Ragged rows are padded or cut to the header width.
        row.truncate(headers.len());
        while row.len() < headers.len() {
            row.push_field("");
        }

        match row.deserialize::<ProgramRecord>(Some(&headers)) {
            Ok(record) => records.push(record),
            Err(error) => {
                let line = row.position().map(|position| position.line());
                warn!(?line, %error, "catalog row skipped");
            }
        }
    }

    Ok(ParsedCatalog { records, columns })
}
