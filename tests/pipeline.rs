use std::collections::HashMap;

use cohort_risk_pipeline::{
    ingest, recommend_interventions, score_and_classify, validate_batch, validate_single,
    InterventionCategory, RiskFactor, RiskTier, Roster, RowError, StudentRecord,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

const HEADER: [&str; 9] = [
    "id",
    "displayName",
    "cohort",
    "attendanceRate30",
    "consecutiveAbsences",
    "averageScore",
    "lastScore",
    "feePaid",
    "isSocioeconomicRisk",
];

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

fn record(
    attendance_rate_30: f64,
    consecutive_absences: u32,
    average_score: f64,
    last_score: f64,
    fee_paid: bool,
    is_socioeconomic_risk: bool,
) -> StudentRecord {
    StudentRecord {
        id: "STU001".to_string(),
        display_name: "Aarav Kumar".to_string(),
        cohort: "10-A".to_string(),
        attendance_rate_30,
        consecutive_absences,
        average_score,
        last_score,
        fee_paid,
        is_socioeconomic_risk,
    }
}

#[test]
fn every_signal_firing_is_capped_and_gets_all_plans() {
    let assessment = score_and_classify(&record(0.65, 7, 45.2, 32.0, false, true));
    assert_eq!(
        assessment.factors,
        vec![
            RiskFactor::LowAttendance,
            RiskFactor::ConsecutiveAbsences,
            RiskFactor::LowAverageScore,
            RiskFactor::PoorRecentScore,
            RiskFactor::OutstandingFees,
            RiskFactor::SocioeconomicRisk,
        ]
    );
    assert_eq!(assessment.score, 0.95);
    assert_eq!(assessment.tier, RiskTier::High);

    let plans = recommend_interventions(&assessment.factors);
    let categories: Vec<InterventionCategory> = plans.iter().map(|plan| plan.category).collect();
    assert_eq!(
        categories,
        vec![
            InterventionCategory::Attendance,
            InterventionCategory::Academic,
            InterventionCategory::Financial,
            InterventionCategory::SocioeconomicSupport,
            InterventionCategory::Comprehensive,
        ]
    );
}

#[test]
fn healthy_student_has_no_factors_or_plans() {
    let assessment = score_and_classify(&record(0.85, 2, 72.8, 68.0, true, false));
    assert!(assessment.factors.is_empty());
    assert_eq!(assessment.score, 0.0);
    assert_eq!(assessment.tier, RiskTier::Low);
    assert!(recommend_interventions(&assessment.factors).is_empty());
}

#[test]
fn missing_last_score_column_rejects_whole_batch() {
    let header: Vec<&str> = HEADER.into_iter().filter(|name| *name != "lastScore").collect();
    let rows = vec![row(&["STU001", "Aarav", "10-A", "0.65", "7", "45.2", "0", "1"])];

    let report = validate_batch(&header, &rows);
    assert!(report.accepted.is_empty());
    assert_eq!(
        report.rejected,
        vec![RowError {
            row: 0,
            reason: "missing required columns: lastScore".to_string(),
        }]
    );
}

#[test]
fn non_numeric_attendance_only_rejects_that_row() {
    let rows = vec![
        row(&["STU001", "Aarav Kumar", "10-A", "abc", "7", "45.2", "32", "0", "1"]),
        row(&["STU002", "Priya Sharma", "9-B", "0.85", "2", "72.8", "68", "1", "0"]),
        row(&["STU003", "Rahul Mehta", "11-C", "0.75", "3", "55.4", "48", "0", "0"]),
    ];

    let report = validate_batch(&HEADER, &rows);
    assert_eq!(report.accepted.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].row, 1);
    assert!(report.rejected[0].reason.contains("invalid numeric value"));
}

#[test]
fn malformed_row_k_is_reported_as_row_k_plus_one() {
    let good = |id: &str| row(&[id, "Kavya Reddy", "9-A", "0.88", "1", "76.5", "82", "1", "0"]);
    for k in 0..5 {
        let mut rows: Vec<Vec<String>> = (0..5).map(|i| good(&format!("STU{i}"))).collect();
        rows[k][1] = String::new();

        let report = validate_batch(&HEADER, &rows);
        assert_eq!(report.accepted.len(), 4);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, k + 1);
    }
}

#[test]
fn csv_upload_feeds_roster() {
    let input = indoc! {"
        student_id,name,klass,attendance_rate_30,consec_absent,avg_score,last_score,last_payment_status,socioeconomic_flag
        STU004,Ananya Patel,10-B,0.92,1,84.6,87,1,0
        STU005,Vikram Singh,12-A,0.68,8,38.2,25,1,1
        STU006,Kavya Reddy,9-A,0.88,1,76.5,82,1,0
    "};
    let report = ingest::process_csv(input.as_bytes()).unwrap();
    assert!(report.rejected.is_empty());

    let roster = Roster::new().with_batch(&report);
    let high = roster.by_tier(RiskTier::High);
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].record.display_name, "Vikram Singh");
    assert_eq!(high[0].assessment.score, 0.95);
    assert_eq!(high[0].plans.len(), 4);
}

#[test]
fn manual_entry_matches_batch_row() {
    let cells = ["STU002", "Priya Sharma", "9-B", "0.65", "2", "72.8", "68", "1", "0"];
    let fields: HashMap<String, String> = HEADER
        .iter()
        .zip(cells)
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    let single = validate_single(&fields).unwrap();
    let batch = validate_batch(&HEADER, &[row(&cells)]);
    assert_eq!(single, batch.accepted[0]);
    assert_eq!(single.assessment.tier, RiskTier::Medium);
}
