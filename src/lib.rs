//! Student dropout early warning: validates tabular student records,
//! scores them against a fixed weighted rule set, assigns a risk tier and
//! recommends intervention plans.
//!
//! The pipeline is pure and synchronous. Callers hand it already-read
//! rows (or a reader, via [`ingest`]) and own whatever they keep.

pub mod error;
pub mod ingest;
pub mod interventions;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod roster;
pub mod validate;

pub use error::{RowIssue, SchemaError, UnknownFactor};
pub use models::{
    AssessedStudent, BatchReport, InterventionCategory, InterventionPlan, Priority,
    RiskAssessment, RiskFactor, RiskTier, RowError, StudentRecord,
};
pub use pipeline::{recommend_interventions, score_and_classify, validate_batch, validate_single};
pub use roster::Roster;
