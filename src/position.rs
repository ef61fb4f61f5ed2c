//! Source Position Tracking
//!
//! This module provides the position type threaded through every parsing
//! step. Positions advance only by consuming input: each consumed character
//! increments the column, and consuming a newline resets the column to 1 and
//! increments the line.
//!
//! Lines and columns are 1-based.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A position in source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Optional source name (e.g. a file name) used in error reporting
    pub name: Option<Rc<str>>,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl SourcePosition {
    /// Create a new source position
    #[inline]
    pub fn new(name: Option<Rc<str>>, line: usize, column: usize) -> Self {
        Self { name, line, column }
    }

    /// Create a position at the start of input
    #[inline]
    pub fn start() -> Self {
        Self {
            name: None,
            line: 1,
            column: 1,
        }
    }

    /// Tag this position with a source name
    #[inline]
    pub fn named(mut self, name: impl Into<Rc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Return the position after consuming `consumed`, newline-aware.
    ///
    /// Columns count characters, not bytes.
    pub fn advanced_over(&self, consumed: &str) -> SourcePosition {
        let bytes = consumed.as_bytes();
        let newlines = memchr::memchr_iter(b'\n', bytes).count();
        match memchr::memrchr(b'\n', bytes) {
            Some(last) => {
                let tail = &consumed[last + 1..];
                SourcePosition {
                    name: self.name.clone(),
                    line: self.line + newlines,
                    column: 1 + tail.chars().count(),
                }
            }
            None => SourcePosition {
                name: self.name.clone(),
                line: self.line,
                column: self.column + consumed.chars().count(),
            },
        }
    }

    /// Total order by `(line, column)`; the source name does not participate.
    #[inline]
    pub fn cmp_location(&self, other: &SourcePosition) -> Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}
