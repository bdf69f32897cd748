//! Identifier Rewrite Tests
//!
//! Rewriting schema object ids in plan trees:
//! - Every id-shaped token that names a schema object is replaced
//! - Unknown ids pass through untouched
//! - Dotted references keep only the member name
//! - "Schema" keys disappear, everything else keeps shape and order

use planlens::explain::{IdentifierRewriter, IndexNamePolicy, INDEX_NAME_KEY};
use planlens::schema::{
    Constraint, InMemorySchema, NamedObject, Pointer, PointerKind, SchemaLoader, SchemaObject,
};
use serde_json::json;
use uuid::Uuid;

// =============================================================================
// Helper Functions
// =============================================================================

const USER: &str = "4dae6b20-1d3a-11ef-8f4e-7b3e9f2c9d43";
const FRIENDS: &str = "7ad19e53-1d3a-11ef-8f4e-ae61c25fc076";
const SINCE: &str = "8be2af64-1d3a-11ef-8f4e-bf72d3600187";
const EXCL: &str = "5ebf7c31-1d3a-11ef-8f4e-8c4fa03dae54";
const UNKNOWN: &str = "9cf3b075-1d3a-11ef-8f4e-c083e4711298";

fn schema() -> InMemorySchema {
    let id = |s: &str| Uuid::parse_str(s).unwrap();
    InMemorySchema::new()
        .with_object(
            id(USER),
            SchemaObject::Named(NamedObject {
                name: "default::User".into(),
            }),
        )
        .with_object(
            id(FRIENDS),
            SchemaObject::Pointer(Pointer {
                short_name: "friends".into(),
                kind: PointerKind::Link,
                source: "default::User".into(),
            }),
        )
        .with_object(
            id(SINCE),
            SchemaObject::Pointer(Pointer {
                short_name: "since".into(),
                kind: PointerKind::LinkProperty,
                source: "default::User.friends".into(),
            }),
        )
        .with_object(
            id(EXCL),
            SchemaObject::Constraint(Constraint {
                name: "std::exclusive".into(),
                subject: "link 'friends' of object type 'default::User'".into(),
            }),
        )
}

// =============================================================================
// Plan Trees
// =============================================================================

#[test]
fn test_nested_plan_rewrite() {
    let schema = schema();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::Plain);

    let plan = json!([{
        "Plan": {
            "Node Type": "Nested Loop",
            "Schema": "edgedbpub",
            "Plans": [
                {
                    "Node Type": "Index Scan",
                    "Relation Name": FRIENDS,
                    "Index Name": format!("{}_source_target_key", FRIENDS),
                    "Schema": "edgedbpub",
                    "Output": [format!(r#"f."{}""#, SINCE)]
                },
                {
                    "Node Type": "Seq Scan",
                    "Relation Name": USER,
                    "Filter": format!(r#"("{}" IS NOT NULL)"#, UNKNOWN)
                }
            ]
        }
    }]);

    let (out, stats) = rw.rewrite_with_stats(&plan);
    assert_eq!(
        out,
        json!([{
            "Plan": {
                "Node Type": "Nested Loop",
                "Plans": [
                    {
                        "Node Type": "Index Scan",
                        "Relation Name": "default::User.friends",
                        "Index Name": "default::User.friends forward link index",
                        "Output": ["f.@since"]
                    },
                    {
                        "Node Type": "Seq Scan",
                        "Relation Name": "default::User",
                        "Filter": format!(r#"("{}" IS NOT NULL)"#, UNKNOWN)
                    }
                ]
            }
        }])
    );
    assert_eq!(stats.dropped_keys, 2);
    assert_eq!(stats.unresolved, 1);
    assert_eq!(stats.resolved, 4);
}

#[test]
fn test_exclusive_constraint_index() {
    let schema = schema();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::Plain);
    let name = format!("{};schemaconstr", EXCL);

    assert_eq!(
        rw.rewrite_string(&name, Some(INDEX_NAME_KEY)),
        "constraint 'std::exclusive' of link 'friends' of object type 'default::User' exclusive constraint index"
    );
}

#[test]
fn test_backward_link_index() {
    let schema = schema();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::Plain);

    assert_eq!(
        rw.rewrite_string(&format!("{}_target_key", FRIENDS), Some(INDEX_NAME_KEY)),
        "default::User.friends backward link index"
    );
}

#[test]
fn test_hyphenless_and_uppercase_ids() {
    let schema = schema();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::Plain);
    let compact = USER.replace('-', "").to_uppercase();

    assert_eq!(rw.rewrite_string(&compact, None), "default::User");
}

#[test]
fn test_non_string_leaves_untouched() {
    let schema = schema();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::Plain);
    let plan = json!({"Plan Rows": 10, "Parallel Aware": false, "Startup Cost": 0.25, "X": null});

    assert_eq!(rw.rewrite(&plan), plan);
}

#[test]
fn test_rewrite_twice_is_stable() {
    let schema = schema();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::BackwardInline);
    let plan = json!({
        "Index Name": format!("{}_index", USER),
        "Filter": format!(r#"(x."{}" > now())"#, SINCE),
    });

    let once = rw.rewrite(&plan);
    assert_eq!(once["Index Name"], "default::User backward inline link index");
    assert_eq!(rw.rewrite(&once), once);
}

// =============================================================================
// Snapshot Loading
// =============================================================================

#[test]
fn test_snapshot_from_json_resolves() {
    let content = json!({
        "objects": {
            USER: {"type": "named", "name": "default::User"}
        }
    })
    .to_string();
    let schema = SchemaLoader::from_json(&content).unwrap();
    let rw = IdentifierRewriter::new(&schema, IndexNamePolicy::Plain);

    assert_eq!(rw.rewrite_string(USER, None), "default::User");
}

#[test]
fn test_snapshot_with_blank_name_rejected() {
    let content = json!({
        "objects": {
            USER: {"type": "named", "name": ""}
        }
    })
    .to_string();

    let err = SchemaLoader::from_json(&content).unwrap_err();
    assert_eq!(err.code(), "PLANLENS_LOAD_INVALID_OBJECT");
}
