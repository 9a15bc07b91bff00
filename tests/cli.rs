use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn cohort_risk() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cohort-risk"));
    command.env("RUST_LOG", "off");
    command
}

#[test]
fn template_then_import_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("students.csv");

    let output = cohort_risk()
        .args(["template", "--out"])
        .arg(&csv_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = cohort_risk()
        .args(["import", "--format", "json", "--csv"])
        .arg(&csv_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let accepted = json["accepted"].as_array().unwrap();
    assert_eq!(accepted.len(), 3);
    assert_eq!(accepted[1]["assessment"]["tier"], "high");
    assert_eq!(accepted[1]["record"]["attendanceRate30"], 0.65);
    assert_eq!(
        accepted[1]["assessment"]["factors"][0],
        "Low attendance (< 70%)"
    );
    assert_eq!(accepted[1]["plans"][0]["assignedRole"], "Student Mentor");
}

#[test]
fn structural_error_fails_the_command() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("broken.csv");
    fs::write(&csv_path, "id,displayName\nSTU001,John Doe\n").unwrap();

    let output = cohort_risk()
        .args(["import", "--csv"])
        .arg(&csv_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing required columns: cohort"));
}

#[test]
fn report_is_written_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("students.csv");
    let out_path = temp_dir.path().join("report.md");
    cohort_risk()
        .args(["template", "--out"])
        .arg(&csv_path)
        .output()
        .unwrap();

    let output = cohort_risk()
        .args(["report", "--csv"])
        .arg(&csv_path)
        .arg("--out")
        .arg(&out_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = fs::read_to_string(&out_path).unwrap();
    assert!(report.starts_with("# Student Risk Report"));
    assert!(report.contains("### Jane Smith"));
}

#[test]
fn assess_rejects_bad_numbers() {
    let output = cohort_risk()
        .args([
            "assess", "--id", "STU010", "--name", "Sam Lee", "--attendance", "abc",
            "--absences", "1", "--average", "70", "--last", "70",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid numeric value for attendanceRate30"));
}

#[test]
fn assess_prints_plans() {
    let output = cohort_risk()
        .args([
            "assess", "--id", "STU011", "--name", "Dana Cruz", "--cohort", "9-A",
            "--attendance", "0.6", "--absences", "6", "--average", "70", "--last", "70",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dana Cruz (STU011, 9-A) medium risk 50.0%"));
    assert!(stdout.contains("plan: Mentor Intervention - Attendance"));
}
