//! Program catalog: row model, loaders and the provider seam used by the filter engine.

mod normalizer;
mod parser;
mod workbook;

pub(crate) use normalizer::{normalize_text, subject_set};

use normalizer::tidy_text;

use super::coerce::{cell_text, lenient_decimal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::info;

/// Catalog columns the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    UniversityName,
    FieldName,
    Location,
    DegreeProgram,
    CourseOrDegreeName,
    Ielts,
    IeltsIndividualComponent,
    UcasTariff,
    BtecDiploma,
    BtecExtendedDiploma,
    GcseOverall,
    MandatorySubjectOfGcse,
    ALevelsOverall,
    MandatorySubjectOfALevels,
    BachelorsDegree,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::UniversityName,
        Column::FieldName,
        Column::Location,
        Column::DegreeProgram,
        Column::CourseOrDegreeName,
        Column::Ielts,
        Column::IeltsIndividualComponent,
        Column::UcasTariff,
        Column::BtecDiploma,
        Column::BtecExtendedDiploma,
        Column::GcseOverall,
        Column::MandatorySubjectOfGcse,
        Column::ALevelsOverall,
        Column::MandatorySubjectOfALevels,
        Column::BachelorsDegree,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::UniversityName => "university_name",
            Column::FieldName => "field_name",
            Column::Location => "location",
            Column::DegreeProgram => "degree_program",
            Column::CourseOrDegreeName => "course_or_degree_name",
            Column::Ielts => "ielts",
            Column::IeltsIndividualComponent => "ielts_individual_component",
            Column::UcasTariff => "ucas_tariff",
            Column::BtecDiploma => "btec_diploma",
            Column::BtecExtendedDiploma => "btec_extended_diploma",
            Column::GcseOverall => "gcse_overall",
            Column::MandatorySubjectOfGcse => "mandatory_subject_of_gcse",
            Column::ALevelsOverall => "a_levels_overall",
            Column::MandatorySubjectOfALevels => "mandatory_subject_of_a_levels",
            Column::BachelorsDegree => "bachelors_degree",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.header() == header)
    }
}

/// One program offered by a university. Requirement fields are minimums;
/// `None` means the program states no requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramRecord {
    #[serde(default)]
    pub university_name: String,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub degree_program: String,
    #[serde(default)]
    pub course_or_degree_name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub ielts: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub ielts_individual_component: Option<f64>,
    #[serde(default, deserialize_with = "cell_text")]
    pub ucas_tariff: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub btec_diploma: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub btec_extended_diploma: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub gcse_overall: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub mandatory_subject_of_gcse: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub a_levels_overall: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub mandatory_subject_of_a_levels: Option<String>,
    #[serde(default, deserialize_with = "cell_text")]
    pub bachelors_degree: Option<String>,
}

impl ProgramRecord {
    fn tidy(mut self) -> Self {
        self.university_name = tidy_text(&self.university_name);
        self.field_name = tidy_text(&self.field_name);
        self.location = tidy_text(&self.location);
        self.degree_program = tidy_text(&self.degree_program);
        self.course_or_degree_name = tidy_text(&self.course_or_degree_name);
        self
    }
}

/// A catalog row with the lower-cased keys used for exact and substring matching.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    record: ProgramRecord,
    university: String,
    field: String,
    location: String,
    degree_program: String,
    course: String,
}

impl CatalogEntry {
    fn new(record: ProgramRecord) -> Self {
        let record = record.tidy();
        Self {
            university: record.university_name.to_lowercase(),
            field: record.field_name.to_lowercase(),
            location: record.location.to_lowercase(),
            degree_program: record.degree_program.to_lowercase(),
            course: record.course_or_degree_name.to_lowercase(),
            record,
        }
    }

    /// Row as read from the dataset, with whitespace tidied.
    pub fn record(&self) -> &ProgramRecord {
        &self.record
    }

    /// Normalized value of a text column; requirement columns have no key.
    pub fn key(&self, column: Column) -> Option<&str> {
        match column {
            Column::UniversityName => Some(&self.university),
            Column::FieldName => Some(&self.field),
            Column::Location => Some(&self.location),
            Column::DegreeProgram => Some(&self.degree_program),
            Column::CourseOrDegreeName => Some(&self.course),
            _ => None,
        }
    }
}

/// Immutable snapshot of the program catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    columns: BTreeSet<Column>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// In-memory catalog where every known column is considered present.
    pub fn new(records: Vec<ProgramRecord>) -> Self {
        Self::with_columns(records, Column::ALL)
    }

    pub fn with_columns<I>(records: Vec<ProgramRecord>, columns: I) -> Self
    where
        I: IntoIterator<Item = Column>,
    {
        Self {
            entries: records.into_iter().map(CatalogEntry::new).collect(),
            columns: columns.into_iter().collect(),
            source: None,
            loaded_at: Utc::now(),
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let parsed = parser::parse_records(reader)?;
        Ok(Self::with_columns(parsed.records, parsed.columns))
    }

    /// Load a `.csv` file, or the named sheet of a spreadsheet workbook.
    pub fn from_path<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let mut catalog = match extension.as_str() {
            "csv" => Self::from_csv_reader(File::open(path)?)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
                let bytes = workbook::sheet_as_csv(path, sheet)?;
                Self::from_csv_reader(Cursor::new(bytes))?
            }
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };
        catalog.source = Some(path.to_path_buf());

        info!(
            rows = catalog.len(),
            source = %path.display(),
            "program catalog loaded"
        );
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &ProgramRecord> {
        self.entries.iter().map(CatalogEntry::record)
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            rows: self.entries.len(),
            universities: self
                .entries
                .iter()
                .map(|entry| entry.university.as_str())
                .filter(|name| !name.is_empty())
                .collect::<BTreeSet<_>>()
                .len(),
            columns: self.columns.iter().map(|column| column.header()).collect(),
            source: self.source.as_ref().map(|path| path.display().to_string()),
            loaded_at: self.loaded_at,
        }
    }
}

/// Status view of a loaded catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub rows: usize,
    pub universities: usize,
    pub columns: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// Errors raised while loading the backing dataset.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open catalog workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("worksheet '{0}' not found in catalog workbook")]
    MissingSheet(String),
    #[error("unsupported catalog format '{0}' (expected csv, xlsx, xls or ods)")]
    UnsupportedFormat(String),
}

/// Source of catalog snapshots for the filter engine.
pub trait CatalogProvider: Send + Sync {
    fn catalog(&self) -> Result<Arc<Catalog>, CatalogError>;
}

/// Provider over a catalog that never changes.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: Arc<Catalog>,
}

impl StaticCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

impl From<Vec<ProgramRecord>> for StaticCatalog {
    fn from(records: Vec<ProgramRecord>) -> Self {
        Self::new(Catalog::new(records))
    }
}

impl CatalogProvider for StaticCatalog {
    fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        Ok(self.catalog.clone())
    }
}

struct CachedCatalog {
    modified: Option<SystemTime>,
    catalog: Arc<Catalog>,
}

/// File-backed provider. The parsed catalog is cached and reloaded only
/// when the file's modification time changes.
pub struct FileCatalog {
    path: PathBuf,
    sheet: String,
    cache: Mutex<Option<CachedCatalog>>,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for FileCatalog {
    fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        let modified = std::fs::metadata(&self.path)?.modified().ok();

        // Held across the load so concurrent first callers parse the file once.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.as_ref() {
            if cached.modified.is_some() && cached.modified == modified {
                return Ok(cached.catalog.clone());
            }
        }

        let catalog = Arc::new(Catalog::from_path(&self.path, &self.sheet)?);
        *cache = Some(CachedCatalog {
            modified,
            catalog: catalog.clone(),
        });
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(university: &str, course: &str) -> ProgramRecord {
        ProgramRecord {
            university_name: university.to_string(),
            course_or_degree_name: course.to_string(),
            ..ProgramRecord::default()
        }
    }

    #[test]
    fn entries_keep_display_text_and_lowercase_keys() {
        let catalog = Catalog::new(vec![ProgramRecord {
            location: " London ".to_string(),
            degree_program: "Bachelor's".to_string(),
            ..record("University of Westminster", "Civil  Engineering")
        }]);

        let entry = &catalog.entries()[0];
        assert_eq!(entry.record().university_name, "University of Westminster");
        assert_eq!(entry.record().course_or_degree_name, "Civil Engineering");
        assert_eq!(entry.key(Column::UniversityName), Some("university of westminster"));
        assert_eq!(entry.key(Column::Location), Some("london"));
        assert_eq!(entry.key(Column::DegreeProgram), Some("bachelor's"));
        assert_eq!(entry.key(Column::Ielts), None);
        assert!(catalog.has_column(Column::BachelorsDegree));
    }

    #[test]
    fn summary_counts_distinct_universities() {
        let catalog = Catalog::new(vec![
            record("Uni A", "Law"),
            record("uni a", "History"),
            record("Uni B", "Law"),
        ]);

        let summary = catalog.summary();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.universities, 2);
        assert!(summary.source.is_none());
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = Catalog::from_path("catalog.json", "Sheet1").expect_err("json unsupported");
        assert!(matches!(err, CatalogError::UnsupportedFormat(ext) if ext == "json"));
    }

    #[test]
    fn file_provider_reports_missing_file() {
        let provider = FileCatalog::new("missing/catalog.csv", "Sheet1");
        assert!(matches!(provider.catalog(), Err(CatalogError::Io(_))));
    }

    #[test]
    fn file_provider_reuses_unchanged_catalog() {
        let path = std::env::temp_dir().join(format!(
            "course-advisor-catalog-{}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "university_name,course_or_degree_name\nUni A,Nursing\n",
        )
        .expect("fixture written");

        let provider = FileCatalog::new(&path, "Sheet1");
        let first = provider.catalog().expect("first load");
        let second = provider.catalog().expect("cached load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.entries()[0].key(Column::CourseOrDegreeName), Some("nursing"));
        assert_eq!(first.summary().source, Some(path.display().to_string()));

        std::fs::remove_file(&path).ok();
    }
}
