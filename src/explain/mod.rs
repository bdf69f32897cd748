//! Analyzed explain subsystem
//!
//! Turns the storage engine's raw explain output into a report a developer
//! can read against their schema and query.
//!
//! # Pipeline
//!
//! 1. Validate: exactly one row, one column, UTF-8 JSON
//! 2. Rewrite: schema object ids → readable names, `"Schema"` dumps dropped
//! 3. Correlate: plan aliases → IR paths → source spans (best effort)
//! 4. Encode: report envelope framed as a length-prefixed message
//!
//! Rewriting and correlation never fail on a miss; only malformed engine
//! output and corrupt compiled artifacts abort the report.

mod analyzer;
mod correlator;
mod encoder;
mod errors;
mod rewriter;
mod validator;
pub mod walk;

pub use analyzer::{analyze_explain_output, ExplainAnalyzer, ExplainOptions, ExplainReport};
pub use correlator::{analyze_queries, AnalysisInfo};
pub use encoder::{
    decode_message, frame, make_message, DecodedMessage, ReportEnvelope, ANALYZED_EXPLAIN_TAG,
    EDGEQL_UNIMPLEMENTED, FORMAT_MARKER, HEADER_LEN,
};
pub use errors::{ExplainError, ExplainErrorCode, ExplainResult, ResultShape, Severity};
pub use rewriter::{
    display_name, IdentifierRewriter, IndexNamePolicy, RewriteStats, INDEX_NAME_KEY, SCHEMA_KEY,
};
pub use validator::validate_plan_result;
