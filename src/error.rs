use thiserror::Error;

/// Failures surfaced by the calculator and its collaborators.
///
/// None of these are fatal: format errors freeze the dependent output until
/// the field is corrected, collaborator errors are logged and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpanError {
    #[error("Invalid start time format. Use: HH:MM AM/PM")]
    InvalidStart,

    #[error("Invalid end time format. Use: HH:MM AM/PM")]
    InvalidEnd,

    #[error("Invalid time '{0}', expected HH:MM AM/PM")]
    InvalidTime(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}
