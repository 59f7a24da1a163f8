use thiserror::Error;

/// Rejected user input. Shown on the status line; the form stays open.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a subject name")]
    MissingName,

    #[error("Please enter a task title")]
    MissingTitle,

    #[error("Please enter a title and date")]
    MissingEventFields,

    #[error("Please enter a valid grade (0-100), got '{0}'")]
    InvalidGrade(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("No {kind} with id {id}")]
    UnknownId { kind: &'static str, id: String },
}
