//! One compiled statement: source text, IR and physical plan

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::{LoadError, LoadResult};

use super::ir::{IrStatement, Span};
use super::plan::PlanQuery;

/// Source text of the query the spans point into
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceQuery {
    text: String,
}

impl SourceQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters, the unit spans are measured in
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Text covered by `span`; `None` if the span is reversed or runs past
    /// the end of the source
    pub fn snippet(&self, span: Span) -> Option<&str> {
        if span.end < span.start {
            return None;
        }
        let start = self.byte_offset(span.start)?;
        let end = self.byte_offset(span.end)?;
        self.text.get(start..end)
    }

    /// Byte offset of character `index`; the end of the text counts
    fn byte_offset(&self, index: usize) -> Option<usize> {
        self.text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(self.text.len()))
            .nth(index)
    }
}

/// The three compiled representations of one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQueryUnit {
    pub source: SourceQuery,
    pub ir: IrStatement,
    pub plan: PlanQuery,
}

impl CompiledQueryUnit {
    pub fn new(source: impl Into<String>, ir: IrStatement, plan: PlanQuery) -> Self {
        Self {
            source: SourceQuery::new(source),
            ir,
            plan,
        }
    }

    /// Loads a unit from a JSON file
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses a unit from JSON and checks every span points into the source
    pub fn from_json(content: &str) -> LoadResult<Self> {
        let unit: Self = serde_json::from_str(content)?;
        unit.validate_spans()?;
        Ok(unit)
    }

    /// Checks that every IR span addresses text of the source query
    pub fn validate_spans(&self) -> LoadResult<()> {
        for set in self.ir.all_sets() {
            if let Some(span) = set.span {
                if self.source.snippet(span).is_none() {
                    return Err(LoadError::InvalidUnit(format!(
                        "set {} has span {} outside of the {}-character source",
                        set.id,
                        span,
                        self.source.char_len()
                    )));
                }
            }
        }
        Ok(())
    }
}
