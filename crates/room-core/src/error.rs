use thiserror::Error;

/// Failure of the scene provider. Carries the underlying cause as text so
/// it can cross the JS boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    #[error("failed to fetch scene: {0}")]
    Fetch(String),
    #[error("failed to parse scene: {0}")]
    Parse(String),
    #[error("invalid scene: {0}")]
    Invalid(String),
}

/// A cross-context message that could not be understood.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MessageError {
    #[error("message is not valid JSON: {0}")]
    NotJson(String),
    #[error("unknown message: {0}")]
    Unknown(String),
}
