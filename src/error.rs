use thiserror::Error;

/// Header problems that make a whole batch unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Why a single row was rejected. The display text is the reason shown
/// to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("missing student id or name")]
    MissingIdentity,
    #[error("invalid numeric value for {column}: '{value}'")]
    InvalidNumber { column: &'static str, value: String },
    #[error("{column} out of range: {value}")]
    OutOfRange { column: &'static str, value: String },
    #[error("duplicate student id '{0}' in batch")]
    DuplicateId(String),
    #[error("failed to parse row data: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown risk factor '{0}'")]
pub struct UnknownFactor(pub String);
