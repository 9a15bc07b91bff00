use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::UnknownFactor;

/// A validated student row. Never mutated after validation; an edit
/// produces a new record and a fresh assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub display_name: String,
    pub cohort: String,
    pub attendance_rate_30: f64,
    pub consecutive_absences: u32,
    pub average_score: f64,
    pub last_score: f64,
    pub fee_paid: bool,
    pub is_socioeconomic_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "high",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(RiskTier::High),
            "medium" => Ok(RiskTier::Medium),
            "low" => Ok(RiskTier::Low),
            other => Err(format!("unknown risk tier '{other}' (expected high, medium or low)")),
        }
    }
}

/// The six signals the scorer evaluates, declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskFactor {
    LowAttendance,
    ConsecutiveAbsences,
    LowAverageScore,
    PoorRecentScore,
    OutstandingFees,
    SocioeconomicRisk,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 6] = [
        RiskFactor::LowAttendance,
        RiskFactor::ConsecutiveAbsences,
        RiskFactor::LowAverageScore,
        RiskFactor::PoorRecentScore,
        RiskFactor::OutstandingFees,
        RiskFactor::SocioeconomicRisk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::LowAttendance => "Low attendance (< 70%)",
            RiskFactor::ConsecutiveAbsences => "Extended consecutive absences",
            RiskFactor::LowAverageScore => "Low average scores",
            RiskFactor::PoorRecentScore => "Recent poor test performance",
            RiskFactor::OutstandingFees => "Outstanding fee payments",
            RiskFactor::SocioeconomicRisk => "At-risk socioeconomic background",
        }
    }

    pub fn category(&self) -> InterventionCategory {
        match self {
            RiskFactor::LowAttendance | RiskFactor::ConsecutiveAbsences => {
                InterventionCategory::Attendance
            }
            RiskFactor::LowAverageScore | RiskFactor::PoorRecentScore => {
                InterventionCategory::Academic
            }
            RiskFactor::OutstandingFees => InterventionCategory::Financial,
            RiskFactor::SocioeconomicRisk => InterventionCategory::SocioeconomicSupport,
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskFactor {
    type Err = UnknownFactor;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        RiskFactor::ALL
            .into_iter()
            .find(|factor| factor.label() == label.trim())
            .ok_or_else(|| UnknownFactor(label.to_string()))
    }
}

impl Serialize for RiskFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub tier: RiskTier,
    pub factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionCategory {
    Attendance,
    Academic,
    Financial,
    SocioeconomicSupport,
    Comprehensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionPlan {
    pub category: InterventionCategory,
    pub priority: Priority,
    pub title: &'static str,
    pub description: &'static str,
    pub assigned_role: &'static str,
    pub action_steps: &'static [&'static str],
}

/// A record bundled with everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessedStudent {
    pub record: StudentRecord,
    pub assessment: RiskAssessment,
    pub plans: Vec<InterventionPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub accepted: Vec<AssessedStudent>,
    pub rejected: Vec<RowError>,
}

impl BatchReport {
    /// The whole-batch error, if the header was unusable.
    pub fn structural_error(&self) -> Option<&RowError> {
        match self.rejected.as_slice() {
            [error] if error.row == 0 && self.accepted.is_empty() => Some(error),
            _ => None,
        }
    }
}
