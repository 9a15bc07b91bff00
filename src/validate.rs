//! Record validation: raw string cells in, typed records out.
//!
//! Header problems fail the whole batch. Anything wrong with a single row
//! is reported against that row and never stops the rows after it.

use std::collections::{HashMap, HashSet};

use crate::error::{RowIssue, SchemaError};
use crate::models::{RowError, StudentRecord};

/// Row number reported for whole-batch failures.
pub const STRUCTURAL_ROW: usize = 0;
/// Row number used for manual single-record entry.
pub const SINGLE_ENTRY_ROW: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    DisplayName,
    Cohort,
    AttendanceRate30,
    ConsecutiveAbsences,
    AverageScore,
    LastScore,
    FeePaid,
    IsSocioeconomicRisk,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Id,
        Field::DisplayName,
        Field::Cohort,
        Field::AttendanceRate30,
        Field::ConsecutiveAbsences,
        Field::AverageScore,
        Field::LastScore,
        Field::FeePaid,
        Field::IsSocioeconomicRisk,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::DisplayName => "displayName",
            Field::Cohort => "cohort",
            Field::AttendanceRate30 => "attendanceRate30",
            Field::ConsecutiveAbsences => "consecutiveAbsences",
            Field::AverageScore => "averageScore",
            Field::LastScore => "lastScore",
            Field::FeePaid => "feePaid",
            Field::IsSocioeconomicRisk => "isSocioeconomicRisk",
        }
    }

    /// Column names used by older exports of the same data.
    pub fn legacy_column(&self) -> &'static str {
        match self {
            Field::Id => "student_id",
            Field::DisplayName => "name",
            Field::Cohort => "klass",
            Field::AttendanceRate30 => "attendance_rate_30",
            Field::ConsecutiveAbsences => "consec_absent",
            Field::AverageScore => "avg_score",
            Field::LastScore => "last_score",
            Field::FeePaid => "last_payment_status",
            Field::IsSocioeconomicRisk => "socioeconomic_flag",
        }
    }

    fn matches(&self, name: &str) -> bool {
        let name = name.trim().trim_start_matches('\u{feff}');
        name == self.column() || name == self.legacy_column()
    }
}

/// Where each required field lives in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [usize; 9],
}

impl ColumnMap {
    pub fn resolve<H: AsRef<str>>(header: &[H]) -> Result<Self, SchemaError> {
        let mut indices = [0usize; 9];
        let mut missing = Vec::new();

        for (slot, field) in Field::ALL.iter().enumerate() {
            match header.iter().position(|name| field.matches(name.as_ref())) {
                Some(index) => indices[slot] = index,
                None => missing.push(field.column().to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { indices })
        } else {
            Err(SchemaError::MissingColumns(missing))
        }
    }

    pub fn index_of(&self, field: Field) -> usize {
        self.indices[field as usize]
    }
}

/// Anything a candidate record can be read from.
pub trait FieldSource {
    /// The raw value for `field`; absent values read as empty.
    fn value(&self, field: Field) -> &str;
}

pub struct RowView<'a, C> {
    columns: &'a ColumnMap,
    cells: &'a [C],
}

impl<'a, C: AsRef<str>> RowView<'a, C> {
    pub fn new(columns: &'a ColumnMap, cells: &'a [C]) -> Self {
        Self { columns, cells }
    }
}

impl<C: AsRef<str>> FieldSource for RowView<'_, C> {
    fn value(&self, field: Field) -> &str {
        self.cells
            .get(self.columns.index_of(field))
            .map(|cell| cell.as_ref().trim())
            .unwrap_or("")
    }
}

impl FieldSource for HashMap<String, String> {
    fn value(&self, field: Field) -> &str {
        self.get(field.column())
            .or_else(|| self.get(field.legacy_column()))
            .map(|value| value.trim())
            .unwrap_or("")
    }
}

pub fn validate_record(source: &impl FieldSource) -> Result<StudentRecord, RowIssue> {
    let id = source.value(Field::Id);
    let display_name = source.value(Field::DisplayName);
    if id.is_empty() || display_name.is_empty() {
        return Err(RowIssue::MissingIdentity);
    }

    let attendance_rate_30 = parse_decimal(source, Field::AttendanceRate30)?;
    let consecutive_absences = parse_count(source, Field::ConsecutiveAbsences)?;
    let average_score = parse_decimal(source, Field::AverageScore)?;
    let last_score = parse_decimal(source, Field::LastScore)?;

    if !(0.0..=1.0).contains(&attendance_rate_30) {
        return Err(RowIssue::OutOfRange {
            column: Field::AttendanceRate30.column(),
            value: source.value(Field::AttendanceRate30).to_string(),
        });
    }

    Ok(StudentRecord {
        id: id.to_string(),
        display_name: display_name.to_string(),
        cohort: source.value(Field::Cohort).to_string(),
        attendance_rate_30,
        consecutive_absences,
        average_score,
        last_score,
        fee_paid: parse_flag(source.value(Field::FeePaid)),
        is_socioeconomic_risk: parse_flag(source.value(Field::IsSocioeconomicRisk)),
    })
}

/// Validates every data row against `header`. Row numbers are 1-based
/// with the header excluded. A repeated id is rejected; its first
/// occurrence stays accepted.
pub fn validate_rows<H, C>(
    header: &[H],
    rows: &[Vec<C>],
) -> Result<(Vec<StudentRecord>, Vec<RowError>), SchemaError>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let columns = ColumnMap::resolve(header)?;
    let mut records = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, cells) in rows.iter().enumerate() {
        let row = index + 1;
        let outcome = validate_record(&RowView::new(&columns, cells)).and_then(|record| {
            if seen.insert(record.id.clone()) {
                Ok(record)
            } else {
                Err(RowIssue::DuplicateId(record.id))
            }
        });

        match outcome {
            Ok(record) => records.push(record),
            Err(issue) => {
                log::debug!("row {row} rejected: {issue}");
                errors.push(row_error(row, &issue));
            }
        }
    }

    Ok((records, errors))
}

/// Manual entry: same rules as a batch row, reported as row 1.
pub fn validate_fields(fields: &HashMap<String, String>) -> Result<StudentRecord, RowError> {
    validate_record(fields).map_err(|issue| row_error(SINGLE_ENTRY_ROW, &issue))
}

pub fn row_error(row: usize, issue: &RowIssue) -> RowError {
    RowError {
        row,
        reason: issue.to_string(),
    }
}

fn parse_decimal(source: &impl FieldSource, field: Field) -> Result<f64, RowIssue> {
    let raw = source.value(field);
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| invalid_number(field, raw))
}

fn parse_count(source: &impl FieldSource, field: Field) -> Result<u32, RowIssue> {
    let raw = source.value(field);
    raw.parse::<u32>().map_err(|_| invalid_number(field, raw))
}

fn parse_flag(raw: &str) -> bool {
    raw == "1"
}

fn invalid_number(field: Field, raw: &str) -> RowIssue {
    RowIssue::InvalidNumber {
        column: field.column(),
        value: raw.to_string(),
    }
}
