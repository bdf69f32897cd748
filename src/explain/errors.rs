//! Explain error types
//!
//! Error codes:
//! - EXPLAIN_MALFORMED_PLAN_RESULT (REJECT)
//! - EXPLAIN_INTERNAL_CONSISTENCY (FATAL)
//! - EXPLAIN_ENCODE_FAILED (ERROR)
//! - EXPLAIN_MALFORMED_MESSAGE (REJECT)
//!
//! Unresolved identifiers and ambiguous correlations are not errors: they
//! degrade the report locally and are only logged.

use std::fmt;

/// Severity levels for explain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Input rejected; the storage engine broke its explain contract
    Reject,
    /// Report could not be produced
    Error,
    /// Compiled artifact is corrupt; indicates an upstream compiler bug
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Explain error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainErrorCode {
    /// Raw result set has the wrong shape or is not UTF-8 JSON
    MalformedPlanResult,
    /// Compiled artifact violates an invariant
    InternalConsistencyFault,
    /// Report envelope could not be serialized or framed
    EncodeFailed,
    /// Wire message could not be decoded
    MalformedMessage,
}

impl ExplainErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ExplainErrorCode::MalformedPlanResult => "EXPLAIN_MALFORMED_PLAN_RESULT",
            ExplainErrorCode::InternalConsistencyFault => "EXPLAIN_INTERNAL_CONSISTENCY",
            ExplainErrorCode::EncodeFailed => "EXPLAIN_ENCODE_FAILED",
            ExplainErrorCode::MalformedMessage => "EXPLAIN_MALFORMED_MESSAGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExplainErrorCode::MalformedPlanResult => Severity::Reject,
            ExplainErrorCode::InternalConsistencyFault => Severity::Fatal,
            ExplainErrorCode::EncodeFailed => Severity::Error,
            ExplainErrorCode::MalformedMessage => Severity::Reject,
        }
    }
}

impl fmt::Display for ExplainErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Observed shape of a raw result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultShape {
    pub rows: usize,
    /// Columns of the first row (0 when there are no rows)
    pub columns: usize,
}

/// Explain error with context
#[derive(Debug, Clone)]
pub struct ExplainError {
    code: ExplainErrorCode,
    message: String,
    /// Observed shape for malformed result sets
    shape: Option<ResultShape>,
    /// Offending plan/IR node for consistency faults
    node: Option<String>,
}

impl ExplainError {
    /// Result set is not exactly one row of one column
    pub fn bad_shape(rows: usize, columns: usize) -> Self {
        Self {
            code: ExplainErrorCode::MalformedPlanResult,
            message: format!(
                "expected 1 row with 1 column, got {} row(s) with {} column(s)",
                rows, columns
            ),
            shape: Some(ResultShape { rows, columns }),
            node: None,
        }
    }

    /// Result value could not be decoded
    pub fn undecodable(reason: impl fmt::Display) -> Self {
        Self {
            code: ExplainErrorCode::MalformedPlanResult,
            message: format!("plan is not valid UTF-8 JSON: {}", reason),
            shape: None,
            node: None,
        }
    }

    /// Compiled artifact invariant broken at `node`
    pub fn consistency_fault(node: impl Into<String>, reason: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            code: ExplainErrorCode::InternalConsistencyFault,
            message: format!("{}: {}", node, reason.into()),
            shape: None,
            node: Some(node),
        }
    }

    /// Envelope serialization or framing failed
    pub fn encode_failed(reason: impl Into<String>) -> Self {
        Self {
            code: ExplainErrorCode::EncodeFailed,
            message: reason.into(),
            shape: None,
            node: None,
        }
    }

    /// Wire message decoding failed
    pub fn malformed_message(reason: impl Into<String>) -> Self {
        Self {
            code: ExplainErrorCode::MalformedMessage,
            message: reason.into(),
            shape: None,
            node: None,
        }
    }

    pub fn code(&self) -> ExplainErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Observed row/column counts, for shape failures
    pub fn shape(&self) -> Option<ResultShape> {
        self.shape
    }

    /// Offending node, for consistency faults
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ExplainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExplainError {}

/// Result type for explain operations
pub type ExplainResult<T> = Result<T, ExplainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExplainErrorCode::MalformedPlanResult.code(),
            "EXPLAIN_MALFORMED_PLAN_RESULT"
        );
        assert_eq!(
            ExplainErrorCode::InternalConsistencyFault.code(),
            "EXPLAIN_INTERNAL_CONSISTENCY"
        );
    }

    #[test]
    fn test_bad_shape_carries_counts() {
        let err = ExplainError::bad_shape(2, 1);
        assert_eq!(err.shape(), Some(ResultShape { rows: 2, columns: 1 }));
        assert_eq!(err.severity(), Severity::Reject);
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_consistency_fault_names_node() {
        let err = ExplainError::consistency_fault("q7", "wrapped twice");
        assert_eq!(err.node(), Some("q7"));
        assert!(err.is_fatal());

        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("EXPLAIN_INTERNAL_CONSISTENCY"));
        assert!(display.contains("q7"));
    }
}
