//! Caller-owned store of assessed students.
//!
//! A `Roster` is an immutable snapshot. Every change returns a new roster
//! that shares structure with the old one; entries are replaced whole,
//! never edited.

use std::collections::BTreeSet;

use im::{HashMap, Vector};

use crate::models::{AssessedStudent, BatchReport, RiskTier, StudentRecord};
use crate::pipeline;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vector<AssessedStudent>,
    positions: HashMap<String, usize>,
}

/// Criteria for [`Roster::query`]. Unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub tier: Option<RiskTier>,
    pub cohort: Option<String>,
    pub search: Option<String>,
}

impl RosterFilter {
    pub fn matches(&self, student: &AssessedStudent) -> bool {
        let record = &student.record;
        self.tier.is_none_or(|tier| student.assessment.tier == tier)
            && self.cohort.as_deref().is_none_or(|cohort| record.cohort == cohort)
            && self.search.as_deref().is_none_or(|term| matches_search(record, term))
    }
}

fn matches_search(record: &StudentRecord, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    [&record.display_name, &record.id, &record.cohort]
        .iter()
        .any(|value| value.to_lowercase().contains(&term))
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AssessedStudent> {
        self.positions.get(id).and_then(|index| self.students.get(*index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssessedStudent> {
        self.students.iter()
    }

    /// Inserts `student`, replacing any entry with the same id in place.
    pub fn with_student(&self, student: AssessedStudent) -> Roster {
        let mut next = self.clone();
        match next.positions.get(&student.record.id).copied() {
            Some(index) => {
                next.students.set(index, student);
            }
            None => {
                next.positions
                    .insert(student.record.id.clone(), next.students.len());
                next.students.push_back(student);
            }
        }
        next
    }

    /// Reassesses `record` and stores the result.
    pub fn with_record(&self, record: StudentRecord) -> Roster {
        self.with_student(pipeline::assess_record(record))
    }

    pub fn with_batch(&self, report: &BatchReport) -> Roster {
        report
            .accepted
            .iter()
            .cloned()
            .fold(self.clone(), |roster, student| roster.with_student(student))
    }

    pub fn query(&self, filter: &RosterFilter) -> Vec<&AssessedStudent> {
        self.students
            .iter()
            .filter(|student| filter.matches(student))
            .collect()
    }

    pub fn by_tier(&self, tier: RiskTier) -> Vec<&AssessedStudent> {
        self.query(&RosterFilter {
            tier: Some(tier),
            ..RosterFilter::default()
        })
    }

    pub fn cohorts(&self) -> Vec<String> {
        self.students
            .iter()
            .map(|student| student.record.cohort.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Students by descending score; ties keep insertion order.
    pub fn ranked(&self) -> Vec<&AssessedStudent> {
        let mut ranked: Vec<&AssessedStudent> = self.students.iter().collect();
        ranked.sort_by(|a, b| {
            b.assessment
                .score
                .partial_cmp(&a.assessment.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}
