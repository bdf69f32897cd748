//! Schema object model consumed by the identifier rewriter
//!
//! Only the accessors needed to render a readable name are modelled:
//! short name, qualified name, link-property predicate, source type name
//! and verbose constraint name.

use serde::{Deserialize, Serialize};

/// Kind of pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Scalar property of an object type
    Property,
    /// Forward link to another object type
    Link,
    /// Backward link (computed inverse of a forward link)
    BackwardLink,
    /// Property defined on a link
    LinkProperty,
}

/// A property or link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    /// Unqualified member name, e.g. `email`
    pub short_name: String,
    /// Pointer kind
    pub kind: PointerKind,
    /// Fully-qualified name of the declaring source, e.g. `default::User`
    pub source: String,
}

impl Pointer {
    /// Returns true if the pointer is a link property
    pub fn is_link_property(&self) -> bool {
        self.kind == PointerKind::LinkProperty
    }
}

/// A constraint on a type or pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name, e.g. `std::exclusive`
    pub name: String,
    /// Verbose description of the constrained subject,
    /// e.g. `property 'email' of object type 'default::User'`
    pub subject: String,
}

impl Constraint {
    /// Verbose name qualified with its parent subject
    pub fn verbose_name(&self) -> String {
        format!("constraint '{}' of {}", self.name, self.subject)
    }
}

/// Any other named schema object (object types, scalars, indexes...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedObject {
    /// Fully-qualified name, e.g. `default::User`
    pub name: String,
}

/// Schema object, closed over the kinds the rewriter distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaObject {
    Pointer(Pointer),
    Constraint(Constraint),
    Named(NamedObject),
}

impl SchemaObject {
    /// Fully-qualified name of the object
    pub fn qualified_name(&self) -> String {
        match self {
            SchemaObject::Pointer(ptr) => format!("{}.{}", ptr.source, ptr.short_name),
            SchemaObject::Constraint(c) => c.name.clone(),
            SchemaObject::Named(obj) => obj.name.clone(),
        }
    }

    /// Checks that every name the rewriter may print is non-empty
    pub fn validate_structure(&self) -> Result<(), String> {
        match self {
            SchemaObject::Pointer(ptr) => {
                if ptr.short_name.is_empty() {
                    return Err("pointer short_name must not be empty".into());
                }
                if ptr.source.is_empty() {
                    return Err(format!("pointer '{}' has no source", ptr.short_name));
                }
            }
            SchemaObject::Constraint(c) => {
                if c.name.is_empty() || c.subject.is_empty() {
                    return Err("constraint name and subject must not be empty".into());
                }
            }
            SchemaObject::Named(obj) => {
                if obj.name.is_empty() {
                    return Err("object name must not be empty".into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_tagged_kinds() {
        let ptr: SchemaObject = serde_json::from_value(json!({
            "type": "pointer",
            "short_name": "email",
            "kind": "property",
            "source": "default::User",
        }))
        .unwrap();
        assert_eq!(ptr.qualified_name(), "default::User.email");

        let named: SchemaObject = serde_json::from_value(json!({
            "type": "named",
            "name": "default::User",
        }))
        .unwrap();
        assert_eq!(named.qualified_name(), "default::User");
    }

    #[test]
    fn test_constraint_verbose_name() {
        let c = Constraint {
            name: "std::exclusive".into(),
            subject: "property 'email' of object type 'default::User'".into(),
        };
        assert_eq!(
            c.verbose_name(),
            "constraint 'std::exclusive' of property 'email' of object type 'default::User'"
        );
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let obj = SchemaObject::Named(NamedObject { name: String::new() });
        assert!(obj.validate_structure().is_err());
    }
}
