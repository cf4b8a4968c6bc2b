// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// Engine error types. These only arise at the JSON boundary; once data is
/// parsed, frame processing itself is infallible.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid landmark frame: {0}")]
    InvalidFrame(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::InvalidConfig("missing field".to_string());
        assert!(err.to_string().contains("missing field"));
    }
}
