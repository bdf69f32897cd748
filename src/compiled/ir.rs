//! IR structures consumed by the path correlator
//!
//! Only the parts of the compiler's IR the correlator reads are modelled:
//! bound set occurrences with their path id, scope tag and source span.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque navigation path identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathId(String);

impl PathId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one IR set occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(pub u32);

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open range in the source query text, counted in characters
/// (Unicode scalar values), not bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if the span covers no text
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One bound expression occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrSet {
    pub id: SetId,
    pub path_id: PathId,
    /// Scope the set is explicitly bound in, if any
    #[serde(default)]
    pub scope: Option<ScopeId>,
    #[serde(default)]
    pub span: Option<Span>,
    /// Nested sets (shape elements, filters, subexpressions)
    #[serde(default)]
    pub children: Vec<IrSet>,
}

impl IrSet {
    pub fn new(id: u32, path_id: impl Into<String>) -> Self {
        Self {
            id: SetId(id),
            path_id: PathId::new(path_id),
            scope: None,
            span: None,
            children: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: u32) -> Self {
        self.scope = Some(ScopeId(scope));
        self
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some(Span::new(start, end));
        self
    }

    pub fn with_child(mut self, child: IrSet) -> Self {
        self.children.push(child);
        self
    }

    /// Span if present and non-empty
    pub fn source_span(&self) -> Option<Span> {
        self.span.filter(|s| !s.is_empty())
    }
}

/// Compact one-line form: `#id path [scope=s] [@span] { children }`
impl fmt::Display for IrSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.path_id)?;
        if let Some(scope) = self.scope {
            write!(f, " scope={}", scope)?;
        }
        if let Some(span) = self.span {
            write!(f, " @{}", span)?;
        }
        if !self.children.is_empty() {
            f.write_str(" {")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(";")?;
                }
                write!(f, " {}", child)?;
            }
            f.write_str(" }")?;
        }
        Ok(())
    }
}

/// IR root of one compiled statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrStatement {
    #[serde(default)]
    pub sets: Vec<IrSet>,
}

impl IrStatement {
    pub fn new(sets: Vec<IrSet>) -> Self {
        Self { sets }
    }

    /// All sets in pre-order
    pub fn all_sets(&self) -> Vec<&IrSet> {
        let mut out = Vec::new();
        let mut stack: Vec<&IrSet> = self.sets.iter().rev().collect();
        while let Some(set) = stack.pop() {
            out.push(set);
            stack.extend(set.children.iter().rev());
        }
        out
    }
}

impl fmt::Display for IrStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", set)?;
        }
        Ok(())
    }
}

/// Resolves the scope every set is bound in.
///
/// A set's scope is its own tag, or else the resolved scope of its nearest
/// ancestor. Sets with no tagged ancestor are absent from the result.
pub fn resolve_scopes(ir: &IrStatement) -> HashMap<SetId, ScopeId> {
    let mut scopes = HashMap::new();
    let mut stack: Vec<(&IrSet, Option<ScopeId>)> =
        ir.sets.iter().map(|s| (s, None)).collect();

    while let Some((set, inherited)) = stack.pop() {
        let resolved = set.scope.or(inherited);
        if let Some(scope) = resolved {
            scopes.insert(set.id, scope);
        }
        stack.extend(set.children.iter().map(|c| (c, resolved)));
    }

    scopes
}
