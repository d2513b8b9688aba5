//! Error types for the verification scenario

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("timed out after {timeout_ms} ms waiting for element: {selector}")]
    ElementNotFound { selector: String, timeout_ms: u64 },

    #[error("verification failed: {check}: expected {expected:?}, actual {actual:?}")]
    Verification {
        check: String,
        expected: String,
        actual: String,
    },

    #[error("element {selector} has no attribute '{name}'")]
    MissingAttribute { selector: String, name: String },

    #[error("WebDriver session could not be established: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Driver(#[from] fantoccini::error::CmdError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl E2eError {
    /// Build a verification failure from an expected/actual pair.
    pub fn mismatch(
        check: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        E2eError::Verification {
            check: check.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

pub type E2eResult<T> = Result<T, E2eError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_message_carries_both_values() {
        let err = E2eError::mismatch("remaining label", "4 of 5 remaining", "5 of 5 remaining");
        let msg = err.to_string();
        assert!(msg.contains("remaining label"));
        assert!(msg.contains("4 of 5 remaining"));
        assert!(msg.contains("5 of 5 remaining"));
    }

    #[test]
    fn test_element_not_found_message() {
        let err = E2eError::ElementNotFound {
            selector: "css:h2".to_string(),
            timeout_ms: 10_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("css:h2"));
        assert!(msg.contains("10000 ms"));
    }

    #[test]
    fn test_missing_attribute_message() {
        let err = E2eError::MissingAttribute {
            selector: "xpath://span".to_string(),
            name: "class".to_string(),
        };
        assert!(err.to_string().contains("'class'"));
    }
}
