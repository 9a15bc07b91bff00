use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::error::RowIssue;
use crate::models::{BatchReport, RowError};
use crate::pipeline;
use crate::validate;

/// Canonical upload file: the header and three example students.
pub const TEMPLATE: &str = "\
id,displayName,cohort,attendanceRate30,consecutiveAbsences,averageScore,lastScore,feePaid,isSocioeconomicRisk
STU001,John Doe,10-A,0.85,2,75.5,78,1,0
STU002,Jane Smith,9-B,0.65,5,45.2,38,0,1
STU003,Mike Johnson,11-C,0.92,1,88.4,91,1,0
";

/// Header plus data rows as read from delimited text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based numbers of the entries in `rows`.
    pub row_numbers: Vec<usize>,
    /// Rows the reader itself could not decode.
    pub unreadable: Vec<RowError>,
}

pub fn read_table<R: Read>(input: R) -> anyhow::Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let header = reader
        .headers()
        .context("failed to read header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = RawTable {
        header,
        ..RawTable::default()
    };

    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        match result {
            Ok(record) => {
                table.rows.push(record.iter().map(str::to_string).collect());
                table.row_numbers.push(row);
            }
            Err(err) => {
                let issue = RowIssue::Malformed(err.to_string());
                log::debug!("row {row} unreadable: {issue}");
                table.unreadable.push(validate::row_error(row, &issue));
            }
        }
    }

    Ok(table)
}

/// Validates and assesses a table, keeping the original row numbers in
/// every rejection.
pub fn process_table(table: &RawTable) -> BatchReport {
    let mut report = pipeline::validate_batch(&table.header, &table.rows);
    if report.structural_error().is_some() {
        return report;
    }

    for error in report.rejected.iter_mut() {
        if let Some(original) = table.row_numbers.get(error.row - 1) {
            error.row = *original;
        }
    }
    report.rejected.extend(table.unreadable.iter().cloned());
    report.rejected.sort_by_key(|error| error.row);
    report
}

pub fn process_csv<R: Read>(input: R) -> anyhow::Result<BatchReport> {
    let table = read_table(input)?;
    Ok(process_table(&table))
}

pub fn process_csv_path(path: &Path) -> anyhow::Result<BatchReport> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    process_csv(file).with_context(|| format!("failed to read CSV from {}", path.display()))
}
