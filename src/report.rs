use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AssessedStudent, RiskTier, RowError};

pub const ATTENDANCE_TARGET: f64 = 0.80;
pub const PASSING_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// `None` when there are no students to average over.
    pub average_attendance: Option<f64>,
    pub below_attendance_target: usize,
    pub average_score: Option<f64>,
    pub failing: usize,
    pub outstanding_fees: usize,
    pub socioeconomic_risk: usize,
}

impl CohortSummary {
    pub fn tier_count(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::High => self.high,
            RiskTier::Medium => self.medium,
            RiskTier::Low => self.low,
        }
    }

    /// Percentage of all students in `tier`.
    pub fn tier_share(&self, tier: RiskTier) -> Option<f64> {
        (self.total > 0).then(|| self.tier_count(tier) as f64 / self.total as f64 * 100.0)
    }
}

pub fn summarize<'a>(students: impl IntoIterator<Item = &'a AssessedStudent>) -> CohortSummary {
    let mut summary = CohortSummary::default();
    let mut attendance_total = 0.0;
    let mut score_total = 0.0;

    for student in students {
        let record = &student.record;
        summary.total += 1;
        match student.assessment.tier {
            RiskTier::High => summary.high += 1,
            RiskTier::Medium => summary.medium += 1,
            RiskTier::Low => summary.low += 1,
        }
        attendance_total += record.attendance_rate_30;
        score_total += record.average_score;
        if record.attendance_rate_30 < ATTENDANCE_TARGET {
            summary.below_attendance_target += 1;
        }
        if record.average_score < PASSING_SCORE {
            summary.failing += 1;
        }
        if !record.fee_paid {
            summary.outstanding_fees += 1;
        }
        if record.is_socioeconomic_risk {
            summary.socioeconomic_risk += 1;
        }
    }

    if summary.total > 0 {
        summary.average_attendance = Some(attendance_total / summary.total as f64);
        summary.average_score = Some(score_total / summary.total as f64);
    }
    summary
}

pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

pub fn student_line(student: &AssessedStudent) -> String {
    let record = &student.record;
    format!(
        "{} ({}, {}) {} risk {}",
        record.display_name,
        record.id,
        record.cohort,
        student.assessment.tier,
        percent(student.assessment.score)
    )
}

pub fn build_report(
    scope: Option<&str>,
    generated_at: DateTime<Utc>,
    students: &[&AssessedStudent],
    rejected: &[RowError],
) -> String {
    let summary = summarize(students.iter().copied());
    let mut ranked = students.to_vec();
    ranked.sort_by(|a, b| {
        b.assessment
            .score
            .partial_cmp(&a.assessment.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all cohorts");

    let _ = writeln!(output, "# Student Risk Report");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        scope_label,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Mix");

    if summary.total == 0 {
        let _ = writeln!(output, "No students assessed.");
    } else {
        for tier in [RiskTier::High, RiskTier::Medium, RiskTier::Low] {
            let _ = writeln!(
                output,
                "- {}: {} students ({:.1}%)",
                tier,
                summary.tier_count(tier),
                summary.tier_share(tier).unwrap_or(0.0)
            );
        }
        if let (Some(attendance), Some(score)) = (summary.average_attendance, summary.average_score)
        {
            let _ = writeln!(
                output,
                "- Average attendance {} ({} below {})",
                percent(attendance),
                summary.below_attendance_target,
                percent(ATTENDANCE_TARGET)
            );
            let _ = writeln!(
                output,
                "- Average score {:.1} ({} below {:.0})",
                score, summary.failing, PASSING_SCORE
            );
        }
        let _ = writeln!(output, "- Outstanding fees: {}", summary.outstanding_fees);
        let _ = writeln!(output, "- Socioeconomic risk: {}", summary.socioeconomic_risk);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Risk Students");

    let flagged: Vec<&&AssessedStudent> = ranked
        .iter()
        .filter(|student| !student.assessment.factors.is_empty())
        .take(10)
        .collect();
    if flagged.is_empty() {
        let _ = writeln!(output, "No students with risk factors.");
    } else {
        for student in flagged {
            let factors: Vec<&str> = student
                .assessment
                .factors
                .iter()
                .map(|factor| factor.label())
                .collect();
            let _ = writeln!(output, "- {}: {}", student_line(student), factors.join("; "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Intervention Plans");

    let urgent: Vec<&&AssessedStudent> = ranked
        .iter()
        .filter(|student| student.assessment.tier == RiskTier::High)
        .collect();
    if urgent.is_empty() {
        let _ = writeln!(output, "No high risk students.");
    } else {
        for student in urgent {
            let _ = writeln!(output, "### {}", student.record.display_name);
            for plan in &student.plans {
                let _ = writeln!(
                    output,
                    "- {} ({} priority, {})",
                    plan.title,
                    plan.priority.as_str(),
                    plan.assigned_role
                );
                for step in plan.action_steps {
                    let _ = writeln!(output, "  - {step}");
                }
            }
        }
    }

    if !rejected.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Rejected Rows");
        for error in rejected {
            let _ = writeln!(output, "- row {}: {}", error.row, error.reason);
        }
    }

    output
}
