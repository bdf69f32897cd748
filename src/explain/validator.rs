//! Raw result set validation
//!
//! The storage engine answers an explain query with exactly one row of
//! one column holding the plan as JSON text. Anything else means the
//! engine broke its contract and is surfaced, never patched.

use serde_json::Value;

use super::errors::{ExplainError, ExplainResult};

/// Decodes the plan out of a raw result set
pub fn validate_plan_result(rows: &[Vec<Vec<u8>>]) -> ExplainResult<Value> {
    let columns = rows.first().map_or(0, Vec::len);
    if rows.len() != 1 || columns != 1 {
        return Err(ExplainError::bad_shape(rows.len(), columns));
    }

    let text = std::str::from_utf8(&rows[0][0]).map_err(ExplainError::undecodable)?;
    serde_json::from_str(text).map_err(ExplainError::undecodable)
}
