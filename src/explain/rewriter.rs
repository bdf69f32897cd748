//! Identifier rewriting over the decoded plan tree
//!
//! The engine names relations, columns, indexes and constraints after
//! schema object ids. The rewriter folds over the plan and replaces every
//! id it can resolve with a readable name:
//!
//! - arrays map element-wise
//! - objects map value-wise, dropping the engine's `"Schema"` dump
//! - string leaves are scanned for ids
//!
//! Ids with no schema object are left byte-for-byte as they were.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::observability::{trace_event, Event, Logger, Severity};
use crate::schema::{SchemaObject, SchemaSnapshot};

/// Key under which the engine embeds a redundant schema dump
pub const SCHEMA_KEY: &str = "Schema";

/// Key whose string value is an index name
pub const INDEX_NAME_KEY: &str = "Index Name";

/// How storage-level index name suffixes are spelled out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexNamePolicy {
    /// `_index` reads as ` index`
    #[default]
    Plain,
    /// `_index` reads as ` backward inline link index`
    BackwardInline,
}

impl IndexNamePolicy {
    /// Ordered literal replacements applied to `"Index Name"` values.
    ///
    /// `_source_target_key` must be replaced before `_target_key`.
    pub fn replacements(&self) -> [(&'static str, &'static str); 4] {
        let index = match self {
            IndexNamePolicy::Plain => " index",
            IndexNamePolicy::BackwardInline => " backward inline link index",
        };
        [
            ("_source_target_key", " forward link index"),
            (";schemaconstr", " exclusive constraint index"),
            ("_target_key", " backward link index"),
            ("_index", index),
        ]
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?i)(\.?"?)([0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12})("?)"#,
        )
        .expect("identifier pattern is a valid regex")
    })
}

/// Readable name of a schema object.
///
/// A dotted reference (`.<id>`) already has its qualifier in context, so
/// pointers keep only their member name; undotted pointers are qualified
/// with their source. Link properties always read as `@name`.
pub fn display_name(object: &SchemaObject, dotted: bool) -> String {
    let name = match object {
        SchemaObject::Pointer(ptr) if ptr.is_link_property() => format!("@{}", ptr.short_name),
        SchemaObject::Pointer(ptr) if dotted => ptr.short_name.clone(),
        SchemaObject::Constraint(constraint) => constraint.verbose_name(),
        SchemaObject::Pointer(_) | SchemaObject::Named(_) => object.qualified_name(),
    };

    if dotted {
        format!(".{}", name)
    } else {
        name
    }
}

/// Counters collected over one rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Ids replaced with a name
    pub resolved: usize,
    /// Id-shaped text left untouched
    pub unresolved: usize,
    /// `"Schema"` keys dropped
    pub dropped_keys: usize,
}

/// Rewrites schema object ids in a plan tree into readable names
pub struct IdentifierRewriter<'a, S: SchemaSnapshot> {
    schema: &'a S,
    policy: IndexNamePolicy,
}

impl<'a, S: SchemaSnapshot> IdentifierRewriter<'a, S> {
    /// Creates a rewriter over a borrowed schema snapshot
    pub fn new(schema: &'a S, policy: IndexNamePolicy) -> Self {
        Self { schema, policy }
    }

    /// Returns a rewritten copy of `plan`
    pub fn rewrite(&self, plan: &Value) -> Value {
        self.rewrite_with_stats(plan).0
    }

    /// Returns a rewritten copy of `plan` with resolution counters
    pub fn rewrite_with_stats(&self, plan: &Value) -> (Value, RewriteStats) {
        let mut stats = RewriteStats::default();
        let rewritten = self.fold(plan, None, &mut stats);
        (rewritten, stats)
    }

    fn fold(&self, value: &Value, key: Option<&str>, stats: &mut RewriteStats) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.fold(v, None, stats)).collect())
            }
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map {
                    if k == SCHEMA_KEY {
                        stats.dropped_keys += 1;
                        continue;
                    }
                    out.insert(k.clone(), self.fold(v, Some(k), stats));
                }
                Value::Object(out)
            }
            Value::String(text) => Value::String(self.rewrite_leaf(text, key, stats)),
            other => other.clone(),
        }
    }

    /// Rewrites one string found under `key`
    pub fn rewrite_string(&self, text: &str, key: Option<&str>) -> String {
        self.rewrite_leaf(text, key, &mut RewriteStats::default())
    }

    fn rewrite_leaf(&self, text: &str, key: Option<&str>, stats: &mut RewriteStats) -> String {
        let mut text = Cow::Borrowed(text);
        if key == Some(INDEX_NAME_KEY) {
            for (from, to) in self.policy.replacements() {
                if text.contains(from) {
                    text = Cow::Owned(text.replace(from, to));
                }
            }
        }

        let rewritten = identifier_pattern().replace_all(&text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            let object = Uuid::parse_str(&caps[2])
                .ok()
                .and_then(|id| self.schema.lookup(&id));

            match object {
                Some(object) => {
                    stats.resolved += 1;
                    display_name(object, caps[1].starts_with('.'))
                }
                None => {
                    stats.unresolved += 1;
                    if Logger::enabled(Severity::Trace) {
                        trace_event(Event::IdentifierUnresolved, &[("id", &caps[2])]);
                    }
                    matched.to_string()
                }
            }
        });

        rewritten.into_owned()
    }
}
