//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from
//! combinol. Importing this module with a wildcard import brings the whole
//! combinator vocabulary into scope:
//!
//! ```
//! use combinol::prelude::*;
//! ```

// ============================================================================
// Core Types
// ============================================================================

pub use crate::error::{ErrorKind, ParseError};
pub use crate::position::SourcePosition;
pub use crate::state::{Parser, State, Step};

// ============================================================================
// Primitive Algebra
// ============================================================================

pub use crate::primitive::{
    bind, delay, eof, expected, fail, fail_default, fail_with, filter, label, look_ahead, map,
    satisfy, token, tokens, value,
};

// ============================================================================
// Combinators
// ============================================================================

pub use crate::combinator::{
    all, between, choice, exactly, followed_by, maybe, not, repeat, sep_by, sep_end_by, sequence,
    skip, unless, Halt, Seq,
};

// ============================================================================
// Drivers
// ============================================================================

pub use crate::run::{parse, parse_with, run, ParseOptions, Success};
pub use crate::stream::{StreamError, StreamingParser};

// ============================================================================
// String and Number Parsers
// ============================================================================

pub use crate::number::{float, integer, natural};
pub use crate::text::{
    alpha, alpha_lower, alpha_upper, alphanum, concat, digit, literal, literal_no_case, none_of,
    one_of, pattern, range, space, spaces, text, trim, trim_left, trim_right,
};
