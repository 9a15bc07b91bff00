//! Drives validate -> score -> classify -> recommend over a batch.

use std::collections::HashMap;

use crate::interventions;
use crate::models::{
    AssessedStudent, BatchReport, InterventionPlan, RiskAssessment, RiskFactor, RowError,
    StudentRecord,
};
use crate::risk;
use crate::validate::{self, STRUCTURAL_ROW};

pub fn score_and_classify(record: &StudentRecord) -> RiskAssessment {
    risk::assess(record)
}

pub fn recommend_interventions(factors: &[RiskFactor]) -> Vec<InterventionPlan> {
    interventions::recommend(factors)
}

/// Runs a validated record through the rest of the pipeline.
pub fn assess_record(record: StudentRecord) -> AssessedStudent {
    let assessment = score_and_classify(&record);
    let plans = recommend_interventions(&assessment.factors);
    log::debug!(
        "assessed {}: score {:.2}, tier {}, {} plans",
        record.id,
        assessment.score,
        assessment.tier,
        plans.len()
    );
    AssessedStudent {
        record,
        assessment,
        plans,
    }
}

pub fn validate_batch<H, C>(header: &[H], rows: &[Vec<C>]) -> BatchReport
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    match validate::validate_rows(header, rows) {
        Ok((records, rejected)) => {
            let accepted: Vec<AssessedStudent> = records.into_iter().map(assess_record).collect();
            log::info!(
                "processed batch of {} rows: {} accepted, {} rejected",
                rows.len(),
                accepted.len(),
                rejected.len()
            );
            BatchReport { accepted, rejected }
        }
        Err(err) => {
            log::warn!("batch rejected: {err}");
            BatchReport {
                accepted: Vec::new(),
                rejected: vec![RowError {
                    row: STRUCTURAL_ROW,
                    reason: err.to_string(),
                }],
            }
        }
    }
}

pub fn validate_single(fields: &HashMap<String, String>) -> Result<AssessedStudent, RowError> {
    validate::validate_fields(fields).map(assess_record)
}
