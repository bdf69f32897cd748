//! Backward walk from a range var towards the source query text
//!
//! Starting at a base-relation range var, the walk climbs through the
//! queries that use it as the source of a path, translating the path into
//! each parent's naming and collecting the source span bound to it.
//!
//! State is `{path, rvar, spans}`; [`step`] is pure and either yields the
//! next state or the finished outcome.

use std::collections::{HashMap, HashSet};

use crate::compiled::{IrSet, PathAspect, PathId, PlanQuery, PlanRangeVar, QueryId, Span};

/// Indexes the walk reads from
#[derive(Debug, Default)]
pub struct WalkContext<'a> {
    /// Range var alias → ((path, aspect), query whose path table names it)
    pub reverse_path_rvar_map: HashMap<&'a str, Vec<((&'a PathId, PathAspect), &'a PlanQuery)>>,
    /// Subquery → range var wrapping it
    pub subq_to_rvar: HashMap<QueryId, &'a PlanRangeVar>,
    /// Path → IR sets carrying a source span
    pub path_to_sets: HashMap<&'a PathId, Vec<&'a IrSet>>,
}

impl<'a> WalkContext<'a> {
    /// First query using `rvar` as the source of `path`
    pub fn source_query(&self, rvar: &PlanRangeVar, path: &PathId) -> Option<&'a PlanQuery> {
        self.reverse_path_rvar_map
            .get(rvar.alias.as_str())?
            .iter()
            .find(|((p, aspect), _)| *aspect == PathAspect::Source && *p == path)
            .map(|(_, query)| *query)
    }

    /// Span of the only IR set bound to `path`; `None` when zero or
    /// several sets are bound to it
    pub fn unique_span(&self, path: &PathId) -> Option<Span> {
        match self.path_to_sets.get(path).map(Vec::as_slice) {
            Some([set]) => set.source_span(),
            _ => None,
        }
    }
}

/// Why a walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No query uses the current range var as a path source
    NoSource,
    /// The source query is not wrapped by a range var (top of the plan)
    Unwrapped,
    /// The wrapping range var was already visited
    Cycle,
}

/// Walk state
#[derive(Debug, Clone)]
pub struct WalkState<'a> {
    pub path: &'a PathId,
    pub rvar: &'a PlanRangeVar,
    pub spans: Vec<Span>,
    visited: HashSet<&'a str>,
}

impl<'a> WalkState<'a> {
    /// Seeds a walk at `rvar` for `path` with the span of the starting set
    pub fn new(path: &'a PathId, rvar: &'a PlanRangeVar, seed: Span) -> Self {
        let mut visited = HashSet::new();
        visited.insert(rvar.alias.as_str());
        Self {
            path,
            rvar,
            spans: vec![seed],
            visited,
        }
    }

    fn finish(self, stop: StopReason) -> Step<'a> {
        Step::Done(WalkOutcome {
            spans: self.spans,
            stop,
        })
    }
}

/// Finished walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    pub spans: Vec<Span>,
    pub stop: StopReason,
}

/// Result of one step
#[derive(Debug)]
pub enum Step<'a> {
    Continue(WalkState<'a>),
    Done(WalkOutcome),
}

/// Advances the walk by one query
pub fn step<'a>(ctx: &WalkContext<'a>, mut state: WalkState<'a>) -> Step<'a> {
    let Some(query) = ctx.source_query(state.rvar, state.path) else {
        return state.finish(StopReason::NoSource);
    };

    let parent_path = query.remap_to_parent(state.path);
    if let Some(span) = ctx.unique_span(parent_path) {
        if !state.spans.contains(&span) {
            state.spans.push(span);
        }
    }
    state.path = parent_path;

    let Some(wrapper) = ctx.subq_to_rvar.get(&query.id).copied() else {
        return state.finish(StopReason::Unwrapped);
    };
    if !state.visited.insert(wrapper.alias.as_str()) {
        return state.finish(StopReason::Cycle);
    }
    state.rvar = wrapper;
    Step::Continue(state)
}

/// Runs a walk to completion
pub fn run<'a>(ctx: &WalkContext<'a>, mut state: WalkState<'a>) -> WalkOutcome {
    loop {
        match step(ctx, state) {
            Step::Continue(next) => state = next,
            Step::Done(outcome) => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiled::{PathAspect, PlanQuery, PlanRangeVar};

    // q1 (top) wraps q2 as "s"; q2 reads base relation "u".
    fn plan() -> PlanQuery {
        let inner = PlanQuery::new(2)
            .with_from(PlanRangeVar::relation_for_path("u", "User", "User", Some(1)))
            .with_path_rvar("User", PathAspect::Source, "u")
            .with_view_path("User", "view:User");

        PlanQuery::new(1)
            .with_from(PlanRangeVar::subquery("s", inner))
            .with_path_rvar("view:User", PathAspect::Source, "s")
    }

    fn context<'a>(plan: &'a PlanQuery, sets: &'a [IrSet]) -> WalkContext<'a> {
        let mut ctx = WalkContext::default();
        for query in plan.all_queries() {
            for entry in &query.path_rvar_map {
                ctx.reverse_path_rvar_map
                    .entry(entry.rvar.as_str())
                    .or_default()
                    .push(((&entry.path_id, entry.aspect), query));
            }
        }
        for rvar in plan.all_range_vars() {
            if let Some(sub) = rvar.subquery_ref() {
                ctx.subq_to_rvar.insert(sub.id, rvar);
            }
        }
        for set in sets {
            ctx.path_to_sets.entry(&set.path_id).or_default().push(set);
        }
        ctx
    }

    fn base_rvar(plan: &PlanQuery) -> &PlanRangeVar {
        &plan.from_clause[0].subquery_ref().unwrap().from_clause[0]
    }

    #[test]
    fn test_walks_to_top_collecting_spans() {
        let plan = plan();
        let sets = vec![
            IrSet::new(1, "User").with_span(7, 11),
            IrSet::new(2, "view:User").with_span(0, 20),
        ];
        let ctx = context(&plan, &sets);
        let rvar = base_rvar(&plan);
        let start = WalkState::new(&sets[0].path_id, rvar, Span::new(7, 11));

        let outcome = run(&ctx, start);
        assert_eq!(outcome.spans, vec![Span::new(7, 11), Span::new(0, 20)]);
        assert_eq!(outcome.stop, StopReason::Unwrapped);
    }

    #[test]
    fn test_single_step_moves_to_wrapper() {
        let plan = plan();
        let sets = vec![IrSet::new(1, "User").with_span(7, 11)];
        let ctx = context(&plan, &sets);
        let start = WalkState::new(&sets[0].path_id, base_rvar(&plan), Span::new(7, 11));

        match step(&ctx, start) {
            Step::Continue(next) => {
                assert_eq!(next.rvar.alias, "s");
                assert_eq!(next.path.as_str(), "view:User");
                assert_eq!(next.spans, vec![Span::new(7, 11)]);
            }
            Step::Done(outcome) => panic!("walk stopped early: {:?}", outcome),
        }
    }

    #[test]
    fn test_ambiguous_sets_are_skipped() {
        let plan = plan();
        let sets = vec![
            IrSet::new(1, "User").with_span(7, 11),
            IrSet::new(2, "view:User").with_span(0, 20),
            IrSet::new(3, "view:User").with_span(30, 40),
        ];
        let ctx = context(&plan, &sets);
        let start = WalkState::new(&sets[0].path_id, base_rvar(&plan), Span::new(7, 11));

        let outcome = run(&ctx, start);
        assert_eq!(outcome.spans, vec![Span::new(7, 11)]);
    }

    #[test]
    fn test_no_source_entry_stops_immediately() {
        let plan = plan();
        let sets = vec![IrSet::new(1, "Other").with_span(0, 5)];
        let ctx = context(&plan, &sets);
        let start = WalkState::new(&sets[0].path_id, base_rvar(&plan), Span::new(0, 5));

        let outcome = run(&ctx, start);
        assert_eq!(outcome.stop, StopReason::NoSource);
        assert_eq!(outcome.spans, vec![Span::new(0, 5)]);
    }

    #[test]
    fn test_non_source_aspect_is_ignored() {
        let inner = PlanQuery::new(2)
            .with_from(PlanRangeVar::relation_for_path("u", "User", "User", Some(1)))
            .with_path_rvar("User", PathAspect::Value, "u");
        let plan = PlanQuery::new(1).with_from(PlanRangeVar::subquery("s", inner));
        let sets = vec![IrSet::new(1, "User").with_span(7, 11)];
        let ctx = context(&plan, &sets);
        let start = WalkState::new(&sets[0].path_id, base_rvar(&plan), Span::new(7, 11));

        assert_eq!(run(&ctx, start).stop, StopReason::NoSource);
    }

    #[test]
    fn test_cycle_is_detected() {
        let plan = plan();
        let sets = vec![IrSet::new(1, "User").with_span(7, 11)];
        let mut ctx = context(&plan, &sets);
        // Make the top query claim to be wrapped by the base range var.
        ctx.subq_to_rvar.insert(QueryId(1), base_rvar(&plan));
        let start = WalkState::new(&sets[0].path_id, base_rvar(&plan), Span::new(7, 11));

        assert_eq!(run(&ctx, start).stop, StopReason::Cycle);
    }
}
