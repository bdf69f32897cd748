//! Observable events for planlens
//!
//! Events are explicit and typed. One explain request emits a bounded
//! number of INFO events; per-identifier and per-alias detail is TRACE.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Schema snapshot loaded from disk
    SchemaLoaded,

    // Explain pipeline
    /// Raw result set accepted
    PlanResultValidated,
    /// Raw result set rejected
    PlanResultMalformed,
    /// Source, IR and decoded plan of one request (TRACE)
    ExplainInputs,
    /// An identifier matched the pattern but has no schema object
    IdentifierUnresolved,
    /// Plan tree rewritten
    PlanRewritten,
    /// Backward walk produced spans for an alias
    AliasCorrelated,
    /// Backward walk hit a range var it had already visited
    CorrelationCycle,
    /// Path correlation finished
    CorrelationComplete,
    /// Compiled artifact violates an invariant (FATAL)
    InternalConsistencyFault,
    /// Wire message encoded
    ReportEncoded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",

            Event::PlanResultValidated => "PLAN_RESULT_VALIDATED",
            Event::PlanResultMalformed => "PLAN_RESULT_MALFORMED",
            Event::ExplainInputs => "EXPLAIN_INPUTS",
            Event::IdentifierUnresolved => "IDENTIFIER_UNRESOLVED",
            Event::PlanRewritten => "PLAN_REWRITTEN",
            Event::AliasCorrelated => "ALIAS_CORRELATED",
            Event::CorrelationCycle => "CORRELATION_CYCLE",
            Event::CorrelationComplete => "CORRELATION_COMPLETE",
            Event::InternalConsistencyFault => "INTERNAL_CONSISTENCY_FAULT",
            Event::ReportEncoded => "REPORT_ENCODED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::InternalConsistencyFault)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
