//! Page model for wiki-style tables.
//!
//! ```text
//! !|eg.music.Display|
//! |title|artist|track count|
//! |Akila|Toure Kunda|3|
//! ```
//!
//! Every cell, row and table remembers its byte span in the page so that
//! diagnostics can point straight at it.

use serde::{Deserialize, Serialize};

use crate::errors::{to_error_source, SourceArc};

pub mod parser;

pub use parser::parse;

/// Byte range into a page's source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Trimmed cell text.
    pub text: String,
    pub span: Span,
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub span: Span,
}

impl Row {
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
    pub span: Span,
    /// Row 0 was written `!|...|`.
    pub escaped: bool,
}

impl Table {
    /// Text of the first cell, which names the fixture or directive.
    pub fn heading(&self) -> &str {
        self.rows
            .first()
            .and_then(|r| r.cells.first())
            .map(|c| c.text.as_str())
            .unwrap_or_default()
    }

    pub fn heading_span(&self) -> Span {
        self.rows
            .first()
            .and_then(|r| r.cells.first())
            .map(|c| c.span)
            .unwrap_or(self.span)
    }
}

/// A parsed page: its source and the tables found in it, in order.
#[derive(Debug, Clone)]
pub struct Page {
    pub name: String,
    pub source: SourceArc,
    pub tables: Vec<Table>,
}

impl Page {
    pub fn empty(name: impl AsRef<str>, source: &str) -> Self {
        Self {
            name: name.as_ref().to_string(),
            source: to_error_source(name, source),
            tables: Vec::new(),
        }
    }
}
