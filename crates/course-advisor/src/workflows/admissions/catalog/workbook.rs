use super::CatalogError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Re-encode one worksheet as CSV so spreadsheet and CSV catalogs share a parser.
pub(crate) fn sheet_as_csv(path: &Path, sheet: &str) -> Result<Vec<u8>, CatalogError> {
    let mut workbook = open_workbook_auto(path)?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(CatalogError::MissingSheet(sheet.to_string()));
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for row in range.rows() {
        writer.write_record(row.iter().map(cell_text))?;
    }

    writer
        .into_inner()
        .map_err(|err| CatalogError::Io(err.into_error()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        _ => String::new(),
    }
}
