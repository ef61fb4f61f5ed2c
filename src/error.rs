//! Parse Errors and the Alternation Merge Algorithm
//!
//! A [`ParseError`] is a positioned, multi-message failure record. Errors
//! from competing alternatives are combined with [`ParseError::merge`]:
//! the error that got furthest into the input wins, and when two errors
//! stopped at the same position their messages accumulate.
//!
//! # Example output
//!
//! ```text
//! (line 1, column 3) expected string matching {abc}
//! expected string matching {abcd}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::SourcePosition;

/// Classification of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Generic failure
    Failure,
    /// Ran out of input
    Eof,
    /// A labeled/named requirement was unmet
    Expectation,
}

/// Information about a parsing failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    /// Where the failure occurred
    pub position: SourcePosition,
    /// Relevant messages, in insertion order, deduplicated on merge
    pub messages: Vec<String>,
    /// The kind of failure
    pub kind: ErrorKind,
    /// Whether this failure (or any failure merged into it) hit end of input
    pub was_eof: bool,
}

impl ParseError {
    /// Create an error with a single message at a position
    pub fn at(position: SourcePosition, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            position,
            messages: vec![message.into()],
            kind,
            was_eof: kind == ErrorKind::Eof,
        }
    }

    /// Merge two competing failures.
    ///
    /// An absent or message-less side yields the other side. Otherwise the
    /// error that reached strictly further into the input wins outright;
    /// at equal positions the messages concatenate (first occurrence kept,
    /// order preserved) and the kind is taken from `b`. With `replace` set
    /// (used by labels), the messages and kind are always `b`'s while the
    /// position stays the furthest reached. The eof flag is true if either
    /// side's was.
    pub fn merge(a: Option<ParseError>, b: Option<ParseError>, replace: bool) -> Option<ParseError> {
        let (a, b) = match (a, b) {
            (None, b) => return b,
            (a, None) => return a,
            (Some(a), Some(b)) => (a, b),
        };
        if a.messages.is_empty() && !b.messages.is_empty() {
            return Some(b);
        }
        if b.messages.is_empty() && !a.messages.is_empty() {
            return Some(a);
        }
        let was_eof = a.was_eof || b.was_eof;
        let merged = if replace {
            let position = match a.position.cmp_location(&b.position) {
                std::cmp::Ordering::Greater => a.position,
                _ => b.position,
            };
            ParseError {
                position,
                messages: b.messages,
                kind: b.kind,
                was_eof,
            }
        } else {
            match a.position.cmp_location(&b.position) {
                std::cmp::Ordering::Greater => ParseError { was_eof, ..a },
                std::cmp::Ordering::Less => ParseError { was_eof, ..b },
                std::cmp::Ordering::Equal => {
                    let mut messages = a.messages;
                    for msg in b.messages {
                        if !messages.contains(&msg) {
                            messages.push(msg);
                        }
                    }
                    ParseError {
                        position: a.position,
                        messages,
                        kind: b.kind,
                        was_eof,
                    }
                }
            }
        };
        Some(merged)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(line {}, column {}) {}",
            self.position.line,
            self.position.column,
            self.messages.join("\n")
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(line: usize, column: usize, msg: &str, kind: ErrorKind) -> ParseError {
        ParseError::at(SourcePosition::new(None, line, column), msg, kind)
    }

    #[test]
    fn test_at_sets_eof_flag() {
        assert!(err(1, 1, "unexpected eof", ErrorKind::Eof).was_eof);
        assert!(!err(1, 1, "nope", ErrorKind::Failure).was_eof);
    }

    #[test]
    fn test_merge_absent_sides() {
        let e = err(1, 1, "x", ErrorKind::Failure);
        assert_eq!(ParseError::merge(None, Some(e.clone()), false), Some(e.clone()));
        assert_eq!(ParseError::merge(Some(e.clone()), None, false), Some(e));
        assert_eq!(ParseError::merge(None, None, false), None);
    }

    #[test]
    fn test_merge_equal_positions_accumulates() {
        let a = err(1, 1, "foo", ErrorKind::Failure);
        let b = err(1, 1, "bar", ErrorKind::Failure);
        let merged = ParseError::merge(Some(a), Some(b), false).unwrap();
        assert_eq!(merged.messages, vec!["foo", "bar"]);
        assert_eq!(merged.position.column, 1);
    }

    #[test]
    fn test_merge_dedups_messages() {
        let a = err(1, 1, "foo", ErrorKind::Failure);
        let mut b = err(1, 1, "bar", ErrorKind::Failure);
        b.messages.push("foo".to_string());
        let merged = ParseError::merge(Some(a), Some(b), false).unwrap();
        assert_eq!(merged.messages, vec!["foo", "bar"]);
    }

    #[test]
    fn test_merge_furthest_wins_entirely() {
        let near = err(1, 1, "near", ErrorKind::Failure);
        let far = err(1, 4, "far", ErrorKind::Expectation);
        let merged =
            ParseError::merge(Some(near.clone()), Some(far.clone()), false).unwrap();
        assert_eq!(merged.messages, vec!["far"]);
        assert_eq!(merged.position.column, 4);
        assert_eq!(merged.kind, ErrorKind::Expectation);

        let merged = ParseError::merge(Some(far), Some(near), false).unwrap();
        assert_eq!(merged.messages, vec!["far"]);
        assert_eq!(merged.position.column, 4);
    }

    #[test]
    fn test_merge_replace_keeps_furthest_position() {
        let inner = err(1, 4, "parser error", ErrorKind::Failure);
        let labeled = err(1, 1, "expected thing", ErrorKind::Expectation);
        let merged = ParseError::merge(Some(inner), Some(labeled), true).unwrap();
        assert_eq!(merged.messages, vec!["expected thing"]);
        assert_eq!(merged.position.column, 4);
        assert_eq!(merged.kind, ErrorKind::Expectation);
    }

    #[test]
    fn test_merge_eof_flag_is_sticky() {
        let eof = err(1, 3, "unexpected eof", ErrorKind::Eof);
        let label = err(1, 1, "expected foo", ErrorKind::Expectation);
        let merged = ParseError::merge(Some(eof), Some(label), true).unwrap();
        assert_eq!(merged.kind, ErrorKind::Expectation);
        assert!(merged.was_eof);
    }

    #[test]
    fn test_merge_line_beats_column() {
        let a = err(1, 80, "near", ErrorKind::Failure);
        let b = err(2, 1, "far", ErrorKind::Failure);
        let merged = ParseError::merge(Some(a), Some(b), false).unwrap();
        assert_eq!(merged.messages, vec!["far"]);
        assert_eq!(merged.position.line, 2);
    }

    #[test]
    fn test_display_format() {
        let mut e = err(1, 3, "expected a", ErrorKind::Expectation);
        e.messages.push("expected b".to_string());
        assert_eq!(format!("{}", e), "(line 1, column 3) expected a\nexpected b");
    }
}
