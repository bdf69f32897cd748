//! Physical plan structures consumed by the path correlator
//!
//! A plan is a tree of queries. Each query draws rows from range vars in
//! its FROM clause; a range var is either a base relation or a wrapped
//! subquery. Queries record which range var provides each (path, aspect).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ir::{PathId, ScopeId};

/// Identity of one plan query node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub u32);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Role a range var plays for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAspect {
    /// The range var is the row source of the path
    Source,
    Value,
    Identity,
    Serialized,
}

impl PathAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathAspect::Source => "source",
            PathAspect::Value => "value",
            PathAspect::Identity => "identity",
            PathAspect::Serialized => "serialized",
        }
    }
}

/// One entry of a query's path → range var table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRvarEntry {
    pub path_id: PathId,
    pub aspect: PathAspect,
    /// Alias of the resolving range var
    pub rvar: String,
}

/// What a range var reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeVarSource {
    /// Base relation, optionally tagged with the path it materializes
    Relation {
        name: String,
        #[serde(default)]
        path_id: Option<PathId>,
        #[serde(default)]
        scope_id: Option<ScopeId>,
    },
    /// Wrapped subquery
    Subquery { query: Box<PlanQuery> },
}

/// A row source under an alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRangeVar {
    pub alias: String,
    pub source: RangeVarSource,
}

impl PlanRangeVar {
    /// Range var over a base relation
    pub fn relation(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            source: RangeVarSource::Relation {
                name: name.into(),
                path_id: None,
                scope_id: None,
            },
        }
    }

    /// Range var over a base relation that materializes `path_id`
    pub fn relation_for_path(
        alias: impl Into<String>,
        name: impl Into<String>,
        path_id: impl Into<String>,
        scope_id: Option<u32>,
    ) -> Self {
        Self {
            alias: alias.into(),
            source: RangeVarSource::Relation {
                name: name.into(),
                path_id: Some(PathId::new(path_id)),
                scope_id: scope_id.map(ScopeId),
            },
        }
    }

    /// Range var wrapping a subquery
    pub fn subquery(alias: impl Into<String>, query: PlanQuery) -> Self {
        Self {
            alias: alias.into(),
            source: RangeVarSource::Subquery {
                query: Box::new(query),
            },
        }
    }

    /// The wrapped subquery, if any
    pub fn subquery_ref(&self) -> Option<&PlanQuery> {
        match &self.source {
            RangeVarSource::Subquery { query } => Some(query),
            RangeVarSource::Relation { .. } => None,
        }
    }
}

/// A query node of the physical plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanQuery {
    pub id: QueryId,
    /// Which range var resolves each (path, aspect)
    #[serde(default)]
    pub path_rvar_map: Vec<PathRvarEntry>,
    /// Translation of paths this query exposes to its embedding context,
    /// keyed by the path id used inside the query
    #[serde(default)]
    pub view_path_id_map: HashMap<PathId, PathId>,
    #[serde(default)]
    pub from_clause: Vec<PlanRangeVar>,
    /// Queries nested outside the FROM clause (sublinks, CTEs)
    #[serde(default)]
    pub subqueries: Vec<PlanQuery>,
}

impl PlanQuery {
    pub fn new(id: u32) -> Self {
        Self {
            id: QueryId(id),
            path_rvar_map: Vec::new(),
            view_path_id_map: HashMap::new(),
            from_clause: Vec::new(),
            subqueries: Vec::new(),
        }
    }

    pub fn with_from(mut self, rvar: PlanRangeVar) -> Self {
        self.from_clause.push(rvar);
        self
    }

    pub fn with_path_rvar(
        mut self,
        path_id: impl Into<String>,
        aspect: PathAspect,
        rvar: impl Into<String>,
    ) -> Self {
        self.path_rvar_map.push(PathRvarEntry {
            path_id: PathId::new(path_id),
            aspect,
            rvar: rvar.into(),
        });
        self
    }

    pub fn with_view_path(mut self, inner: impl Into<String>, outer: impl Into<String>) -> Self {
        self.view_path_id_map
            .insert(PathId::new(inner), PathId::new(outer));
        self
    }

    pub fn with_subquery(mut self, query: PlanQuery) -> Self {
        self.subqueries.push(query);
        self
    }

    /// Maps a path id used inside this query to the one its parent sees.
    /// Paths without a translation are exposed unchanged.
    pub fn remap_to_parent<'a>(&'a self, path_id: &'a PathId) -> &'a PathId {
        self.view_path_id_map.get(path_id).unwrap_or(path_id)
    }

    /// All queries in this tree (self included), pre-order
    pub fn all_queries(&self) -> Vec<&PlanQuery> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(query) = stack.pop() {
            out.push(query);
            for nested in query.subqueries.iter().rev() {
                stack.push(nested);
            }
            for rvar in query.from_clause.iter().rev() {
                if let Some(sub) = rvar.subquery_ref() {
                    stack.push(sub);
                }
            }
        }
        out
    }

    /// All range vars in this tree, pre-order
    pub fn all_range_vars(&self) -> Vec<&PlanRangeVar> {
        self.all_queries()
            .into_iter()
            .flat_map(|q| q.from_clause.iter())
            .collect()
    }
}
