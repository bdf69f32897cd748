//! Observability subsystem for planlens
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed pipeline events
//! - Scope-based begin/complete tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on the explain report
//! 3. No async or background threads
//!
//! # Usage
//!
//! ```ignore
//! use planlens::observability::{Logger, Event, ObservationScope};
//!
//! Logger::info("PLAN_REWRITTEN", &[("strings", "42")]);
//!
//! let scope = ObservationScope::new("EXPLAIN");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a pipeline event at INFO (or FATAL for fatal events)
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a pipeline event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log a detail event at TRACE
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    Logger::trace(event.as_str(), fields);
}
