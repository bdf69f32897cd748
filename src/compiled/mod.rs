//! Compiled query artifacts
//!
//! The explain pipeline receives one compiled statement in three forms:
//! source text, IR and the lowered physical plan. These types model the
//! fields the path correlator reads; everything else the compiler
//! produces is out of scope.

mod ir;
mod plan;
mod unit;

pub use ir::{resolve_scopes, IrSet, IrStatement, PathId, ScopeId, SetId, Span};
pub use plan::{PathAspect, PathRvarEntry, PlanQuery, PlanRangeVar, QueryId, RangeVarSource};
pub use unit::{CompiledQueryUnit, SourceQuery};
