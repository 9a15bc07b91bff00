use crate::models::{RiskAssessment, RiskFactor, RiskTier, StudentRecord};

/// Highest score ever reported. The rule weights can add up to more.
pub const SCORE_CEILING: f64 = 0.95;
pub const HIGH_THRESHOLD: f64 = 0.60;
pub const MEDIUM_THRESHOLD: f64 = 0.30;

const CEILING_HUNDREDTHS: u32 = 95;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskScore {
    pub score: f64,
    pub factors: Vec<RiskFactor>,
}

/// Weight of each factor, in hundredths so boundary sums stay exact.
pub fn factor_weight(factor: RiskFactor) -> u32 {
    match factor {
        RiskFactor::LowAttendance => 30,
        RiskFactor::ConsecutiveAbsences => 20,
        RiskFactor::LowAverageScore => 25,
        RiskFactor::PoorRecentScore => 15,
        RiskFactor::OutstandingFees => 20,
        RiskFactor::SocioeconomicRisk => 15,
    }
}

pub fn factor_fires(factor: RiskFactor, record: &StudentRecord) -> bool {
    match factor {
        RiskFactor::LowAttendance => record.attendance_rate_30 < 0.70,
        RiskFactor::ConsecutiveAbsences => record.consecutive_absences > 5,
        RiskFactor::LowAverageScore => record.average_score < 50.0,
        RiskFactor::PoorRecentScore => record.last_score < 40.0,
        RiskFactor::OutstandingFees => !record.fee_paid,
        RiskFactor::SocioeconomicRisk => record.is_socioeconomic_risk,
    }
}

pub fn score_record(record: &StudentRecord) -> RiskScore {
    let factors: Vec<RiskFactor> = RiskFactor::ALL
        .into_iter()
        .filter(|factor| factor_fires(*factor, record))
        .collect();
    let total: u32 = factors.iter().map(|factor| factor_weight(*factor)).sum();

    RiskScore {
        score: f64::from(total.min(CEILING_HUNDREDTHS)) / 100.0,
        factors,
    }
}

pub fn classify(score: f64) -> RiskTier {
    if score >= HIGH_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

pub fn assess(record: &StudentRecord) -> RiskAssessment {
    let RiskScore { score, factors } = score_record(record);
    RiskAssessment {
        score,
        tier: classify(score),
        factors,
    }
}
