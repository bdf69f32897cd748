//! Explain pipeline entry point
//!
//! validate → rewrite → correlate → encode, for one request. Rewriting and
//! correlation are independent; their results meet only in the report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiled::{CompiledQueryUnit, Span};
use crate::observability::{
    log_event_with_fields, trace_event, Event, Logger, ObservationScope, Severity,
};
use crate::schema::SchemaSnapshot;

use super::correlator::analyze_queries;
use super::encoder::{make_message, ReportEnvelope};
use super::errors::ExplainResult;
use super::rewriter::{IdentifierRewriter, IndexNamePolicy, RewriteStats};
use super::validator::validate_plan_result;

/// Pipeline knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainOptions {
    /// Spelling of index name suffixes
    #[serde(default)]
    pub index_name_policy: IndexNamePolicy,
    /// Run path correlation
    #[serde(default = "default_correlate")]
    pub correlate: bool,
}

fn default_correlate() -> bool {
    true
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            index_name_policy: IndexNamePolicy::default(),
            correlate: default_correlate(),
        }
    }
}

/// Everything one request produced, before framing
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainReport {
    pub envelope: ReportEnvelope,
    pub rewrite_stats: RewriteStats,
    /// Alias → source spans; empty when correlation is disabled
    pub alias_spans: BTreeMap<String, Vec<Span>>,
}

/// Produces analyzed explain messages against one schema snapshot
pub struct ExplainAnalyzer<'a, S: SchemaSnapshot> {
    schema: &'a S,
    options: ExplainOptions,
}

impl<'a, S: SchemaSnapshot> ExplainAnalyzer<'a, S> {
    pub fn new(schema: &'a S, options: ExplainOptions) -> Self {
        Self { schema, options }
    }

    /// Builds the framed wire message for one explain result
    pub fn analyze(
        &self,
        unit: &CompiledQueryUnit,
        rows: &[Vec<Vec<u8>>],
    ) -> ExplainResult<Vec<u8>> {
        let scope = ObservationScope::new("EXPLAIN");

        let result = self
            .build_report(unit, rows)
            .and_then(|report| make_message(&report.envelope));

        match result {
            Ok(message) => {
                log_event_with_fields(
                    Event::ReportEncoded,
                    &[("bytes", &message.len().to_string())],
                );
                scope.complete();
                Ok(message)
            }
            Err(err) => {
                let severity = if err.is_fatal() {
                    Severity::Fatal
                } else {
                    Severity::Error
                };
                scope.fail(severity, err.code().code(), err.message());
                Err(err)
            }
        }
    }

    /// Runs validation, rewriting and correlation without framing
    pub fn build_report(
        &self,
        unit: &CompiledQueryUnit,
        rows: &[Vec<Vec<u8>>],
    ) -> ExplainResult<ExplainReport> {
        let plan = validate_plan_result(rows).map_err(|err| {
            log_event_with_fields(Event::PlanResultMalformed, &[("reason", err.message())]);
            err
        })?;
        log_event_with_fields(Event::PlanResultValidated, &[]);
        if Logger::enabled(Severity::Trace) {
            let dump = input_dump(unit, &plan);
            let fields: Vec<(&str, &str)> = dump.iter().map(|(k, v)| (*k, v.as_str())).collect();
            trace_event(Event::ExplainInputs, &fields);
        }

        let rewriter = IdentifierRewriter::new(self.schema, self.options.index_name_policy);
        let (rewritten, rewrite_stats) = rewriter.rewrite_with_stats(&plan);
        log_event_with_fields(
            Event::PlanRewritten,
            &[
                ("dropped_keys", &rewrite_stats.dropped_keys.to_string()),
                ("resolved", &rewrite_stats.resolved.to_string()),
                ("unresolved", &rewrite_stats.unresolved.to_string()),
            ],
        );

        let mut alias_spans = BTreeMap::new();
        if self.options.correlate {
            let info = analyze_queries(unit, self.schema)?;
            alias_spans = info
                .alias_spans
                .into_iter()
                .map(|(alias, spans)| (alias.to_string(), spans))
                .collect();
        }

        Ok(ExplainReport {
            envelope: ReportEnvelope::new(rewritten),
            rewrite_stats,
            alias_spans,
        })
    }
}

/// Source text, IR tree and decoded plan as log fields
fn input_dump(unit: &CompiledQueryUnit, plan: &Value) -> [(&'static str, String); 3] {
    [
        ("ir", unit.ir.to_string()),
        ("plan", plan.to_string()),
        ("source", unit.source.text().to_string()),
    ]
}

/// Convenience wrapper over [`ExplainAnalyzer::analyze`] with default options
pub fn analyze_explain_output<S: SchemaSnapshot>(
    schema: &S,
    unit: &CompiledQueryUnit,
    rows: &[Vec<Vec<u8>>],
) -> ExplainResult<Vec<u8>> {
    ExplainAnalyzer::new(schema, ExplainOptions::default()).analyze(unit, rows)
}
