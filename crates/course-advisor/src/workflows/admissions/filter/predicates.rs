use std::collections::BTreeSet;

use tracing::warn;

use super::super::catalog::{subject_set, Column, ProgramRecord};
use super::super::grading::{a_level_points, btec_points, first_integer, gcse_grades, DegreeClass};
use super::request::FilterRequest;

/// Lowest GCSE grade a program may list for the GCSE predicate to admit it.
pub const GCSE_PASS_GRADE: u32 = 4;

/// One numeric or ordinal requirement check derived from a request field.
///
/// A record that states no requirement, or one that cannot be parsed,
/// is always admitted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Threshold {
    IeltsOverall(f64),
    IeltsComponent(f64),
    UcasTariff(u32),
    ALevels(u32),
    BtecDiploma(u32),
    BtecExtendedDiploma(u32),
    GcsePass,
    GcseSubjects(BTreeSet<String>),
    ALevelSubjects(BTreeSet<String>),
    DegreeClassification(Option<DegreeClass>),
}

impl Threshold {
    pub(crate) fn column(&self) -> Column {
        match self {
            Threshold::IeltsOverall(_) => Column::Ielts,
            Threshold::IeltsComponent(_) => Column::IeltsIndividualComponent,
            Threshold::UcasTariff(_) => Column::UcasTariff,
            Threshold::ALevels(_) => Column::ALevelsOverall,
            Threshold::BtecDiploma(_) => Column::BtecDiploma,
            Threshold::BtecExtendedDiploma(_) => Column::BtecExtendedDiploma,
            Threshold::GcsePass => Column::GcseOverall,
            Threshold::GcseSubjects(_) => Column::MandatorySubjectOfGcse,
            Threshold::ALevelSubjects(_) => Column::MandatorySubjectOfALevels,
            Threshold::DegreeClassification(_) => Column::BachelorsDegree,
        }
    }

    pub(crate) fn admits(&self, record: &ProgramRecord) -> bool {
        match self {
            Threshold::IeltsOverall(score) => record.ielts.map_or(true, |min| min <= *score),
            Threshold::IeltsComponent(score) => record
                .ielts_individual_component
                .map_or(true, |min| min <= *score),
            Threshold::UcasTariff(points) => record
                .ucas_tariff
                .as_deref()
                .and_then(first_integer)
                .map_or(true, |min| min <= *points),
            Threshold::ALevels(points) => record
                .a_levels_overall
                .as_deref()
                .and_then(a_level_points)
                .map_or(true, |min| min <= *points),
            Threshold::BtecDiploma(points) => record
                .btec_diploma
                .as_deref()
                .and_then(btec_points)
                .map_or(true, |min| min <= *points),
            Threshold::BtecExtendedDiploma(points) => record
                .btec_extended_diploma
                .as_deref()
                .and_then(btec_points)
                .map_or(true, |min| min <= *points),
            Threshold::GcsePass => record.gcse_overall.as_deref().map_or(true, |text| {
                gcse_grades(text)
                    .into_iter()
                    .all(|grade| grade >= GCSE_PASS_GRADE)
            }),
            Threshold::GcseSubjects(required) => record
                .mandatory_subject_of_gcse
                .as_deref()
                .map_or(true, |listed| subject_set([listed]).is_superset(required)),
            Threshold::ALevelSubjects(required) => record
                .mandatory_subject_of_a_levels
                .as_deref()
                .map_or(true, |listed| subject_set([listed]).is_superset(required)),
            Threshold::DegreeClassification(achieved) => {
                let required = record
                    .bachelors_degree
                    .as_deref()
                    .and_then(DegreeClass::from_description);
                DegreeClass::rank_of(required) >= DegreeClass::rank_of(*achieved)
            }
        }
    }
}

/// Thresholds requested by `request`, in evaluation order.
pub(crate) fn thresholds_for(request: &FilterRequest) -> Vec<Threshold> {
    let mut thresholds = Vec::new();

    if let Some(score) = request.ielts {
        thresholds.push(Threshold::IeltsOverall(score));
    }
    if let Some(score) = request.ielts_individual_component {
        thresholds.push(Threshold::IeltsComponent(score));
    }
    if let Some(points) = request.ucas_tariff {
        thresholds.push(Threshold::UcasTariff(points));
    }
    if let Some(points) = graded("a_levels_overall", &request.a_levels_overall, a_level_points) {
        thresholds.push(Threshold::ALevels(points));
    }
    if let Some(points) = graded("btec_diploma", &request.btec_diploma, btec_points) {
        thresholds.push(Threshold::BtecDiploma(points));
    }
    if let Some(points) = graded(
        "btec_extended_diploma",
        &request.btec_extended_diploma,
        btec_points,
    ) {
        thresholds.push(Threshold::BtecExtendedDiploma(points));
    }
    if request.gcse_overall.is_some() {
        thresholds.push(Threshold::GcsePass);
    }
    if let Some(subjects) = &request.mandatory_subject_of_gcse {
        thresholds.push(Threshold::GcseSubjects(subject_set(
            subjects.iter().map(String::as_str),
        )));
    }
    if let Some(subjects) = &request.mandatory_subject_of_a_levels {
        thresholds.push(Threshold::ALevelSubjects(subject_set(
            subjects.iter().map(String::as_str),
        )));
    }
    if let Some(gpa) = request.gpa {
        thresholds.push(Threshold::DegreeClassification(DegreeClass::from_gpa(gpa)));
    }

    thresholds
}

fn graded(
    field: &'static str,
    value: &Option<String>,
    convert: fn(&str) -> Option<u32>,
) -> Option<u32> {
    let raw = value.as_deref()?;
    let points = convert(raw);
    if points.is_none() {
        warn!(field, value = raw, "unrecognized grade; predicate skipped");
    }
    points
}
