//! Path correlation between plan aliases, IR paths and source text
//!
//! Best effort: every lookup miss (no scope, no matching set, ambiguous
//! sets) truncates the affected alias's annotation and nothing more.
//! Only broken invariants of the compiled artifact abort, as
//! `EXPLAIN_INTERNAL_CONSISTENCY`.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::compiled::{
    resolve_scopes, CompiledQueryUnit, IrSet, PathId, PlanRangeVar, RangeVarSource, ScopeId,
    SetId, Span,
};
use crate::observability::{log_event_with_fields, trace_event, Event, Logger, Severity};
use crate::schema::SchemaSnapshot;

use super::errors::{ExplainError, ExplainResult};
use super::walk::{self, StopReason, WalkContext, WalkState};

/// Correlation output for one compiled statement
#[derive(Debug)]
pub struct AnalysisInfo<'a> {
    /// Alias → range var
    pub aliases: BTreeMap<&'a str, &'a PlanRangeVar>,
    /// Alias → (path, scope) for base relations carrying a path id
    pub alias_to_path: BTreeMap<&'a str, (&'a PathId, Option<ScopeId>)>,
    /// Path → IR sets carrying a source span
    pub path_to_sets: HashMap<&'a PathId, Vec<&'a IrSet>>,
    /// Alias → source spans found by the backward walk
    pub alias_spans: BTreeMap<&'a str, Vec<Span>>,
}

impl AnalysisInfo<'_> {
    /// Source spans attributed to `alias`
    pub fn spans_for(&self, alias: &str) -> &[Span] {
        self.alias_spans.get(alias).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Correlates the physical plan of `unit` with its IR and source text.
///
/// The schema is not consulted yet; it is accepted so callers thread the
/// same snapshot through both halves of the pipeline.
pub fn analyze_queries<'a, S: SchemaSnapshot>(
    unit: &'a CompiledQueryUnit,
    _schema: &S,
) -> ExplainResult<AnalysisInfo<'a>> {
    let queries = unit.plan.all_queries();
    let rvars = unit.plan.all_range_vars();
    let mut ctx = WalkContext::default();

    // Every wrapped subquery has exactly one wrapper.
    for &rvar in &rvars {
        if let Some(subquery) = rvar.subquery_ref() {
            if let Some(previous) = ctx.subq_to_rvar.insert(subquery.id, rvar) {
                return Err(fault(
                    subquery.id.to_string(),
                    format!(
                        "subquery is wrapped by both range var '{}' and range var '{}'",
                        previous.alias, rvar.alias
                    ),
                ));
            }
        }
    }

    let mut query_ids = HashSet::new();
    for query in &queries {
        if !query_ids.insert(query.id) {
            return Err(fault(query.id.to_string(), "query id appears twice in the plan"));
        }
    }

    let mut aliases = BTreeMap::new();
    let mut alias_to_path = BTreeMap::new();
    for &rvar in &rvars {
        if aliases.insert(rvar.alias.as_str(), rvar).is_some() {
            return Err(fault(
                format!("range var '{}'", rvar.alias),
                "alias names more than one range var",
            ));
        }
        if let RangeVarSource::Relation {
            path_id: Some(path_id),
            scope_id,
            ..
        } = &rvar.source
        {
            alias_to_path.insert(rvar.alias.as_str(), (path_id, *scope_id));
        }
    }

    for &query in &queries {
        for entry in &query.path_rvar_map {
            if !aliases.contains_key(entry.rvar.as_str()) {
                return Err(fault(
                    query.id.to_string(),
                    format!(
                        "path '{}' ({}) resolves to unknown range var '{}'",
                        entry.path_id,
                        entry.aspect.as_str(),
                        entry.rvar
                    ),
                ));
            }
            ctx.reverse_path_rvar_map
                .entry(entry.rvar.as_str())
                .or_default()
                .push(((&entry.path_id, entry.aspect), query));
        }
    }

    let mut set_ids: HashSet<SetId> = HashSet::new();
    for set in unit.ir.all_sets() {
        if !set_ids.insert(set.id) {
            return Err(fault(format!("set {}", set.id), "set id appears twice in the IR"));
        }
        if set.source_span().is_some() {
            ctx.path_to_sets.entry(&set.path_id).or_default().push(set);
        }
    }

    let scopes = resolve_scopes(&unit.ir);
    let mut alias_spans: BTreeMap<&str, Vec<Span>> = BTreeMap::new();

    for (&alias, &(path_id, scope_id)) in &alias_to_path {
        let Some(scope_id) = scope_id else {
            continue;
        };
        let Some(sets) = ctx.path_to_sets.get(path_id) else {
            continue;
        };
        let rvar = aliases[alias];

        for set in sets {
            if scopes.get(&set.id) != Some(&scope_id) {
                continue;
            }
            let Some(seed) = set.source_span() else {
                continue;
            };

            let outcome = walk::run(&ctx, WalkState::new(path_id, rvar, seed));
            if outcome.stop == StopReason::Cycle {
                Logger::warn(
                    Event::CorrelationCycle.as_str(),
                    &[("alias", alias), ("set", &set.id.to_string())],
                );
            }

            let spans = alias_spans.entry(alias).or_default();
            for span in outcome.spans {
                if !spans.contains(&span) {
                    spans.push(span);
                }
            }
        }
    }

    if Logger::enabled(Severity::Trace) {
        for (alias, spans) in &alias_spans {
            let rendered: Vec<String> = spans.iter().map(Span::to_string).collect();
            let snippets: Vec<&str> = spans
                .iter()
                .filter_map(|span| unit.source.snippet(*span))
                .collect();
            trace_event(
                Event::AliasCorrelated,
                &[
                    ("alias", alias),
                    ("snippets", &snippets.join(" | ")),
                    ("spans", &rendered.join(",")),
                ],
            );
        }
    }

    log_event_with_fields(
        Event::CorrelationComplete,
        &[
            ("aliases", &aliases.len().to_string()),
            ("correlated", &alias_spans.len().to_string()),
            ("paths", &ctx.path_to_sets.len().to_string()),
        ],
    );

    Ok(AnalysisInfo {
        aliases,
        alias_to_path,
        path_to_sets: ctx.path_to_sets,
        alias_spans,
    })
}

fn fault(node: String, reason: impl Into<String>) -> ExplainError {
    let err = ExplainError::consistency_fault(node, reason);
    log_event_with_fields(Event::InternalConsistencyFault, &[("reason", err.message())]);
    err
}
