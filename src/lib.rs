//! Combinol - Direct-Style Parser Combinator Library
//!
//! This is a parser-combinator engine: a library of small composable
//! parsers that consume a textual input and either succeed with a value
//! plus an advanced cursor, or fail with a positioned, accumulating error.
//! It provides:
//! - An immutable-cursor parsing state with line/column tracking
//! - Positioned, multi-message errors with "furthest failure wins" merging
//!   across alternation
//! - A primitive algebra (`value`, `bind`, `token`, `label`, ...) and a
//!   combinator layer (`choice`, `repeat`, `sep_by`, do-notation, ...)
//! - A synchronous driver and an incremental driver fed by chunks
//! - String and number leaf parsers built on the public core
//!
//! Parsing is direct-style and backtracking with unbounded lookahead; there
//! is no grammar compilation, no memoization, and no linear-time guarantee.
//!
//! ## Quick Start
//!
//! ```rust
//! use combinol::prelude::*;
//!
//! let word = text(alpha(), 1..);
//! let list = sep_by(word, literal(","), ..);
//!
//! let names = parse(&list, "ada,grace,edsger").unwrap();
//! assert_eq!(names, vec!["ada", "grace", "edsger"]);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use combinol::prelude::*;
//!
//! let mut total = 0usize;
//! // Values are delivered through the callback as soon as the buffered
//! // input completes them; a handle stays usable until done() or error().
//! let mut stream = StreamingParser::new(literal("ab"), move |outcome| {
//!     if outcome.is_ok() {
//!         total += 1;
//!     }
//! });
//! stream.data("aba").unwrap();
//! stream.data("b").unwrap();
//! stream.done().unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging of the streaming drain loop using the
//!   `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

// Prelude module for convenient imports
pub mod prelude;

pub mod combinator;
pub mod error;
pub mod number;
pub mod position;
pub mod primitive;
pub mod regex_cache;
pub mod run;
pub mod state;
pub mod stream;
pub mod text;

/// Re-export commonly used types for convenience
pub use crate::{
    combinator::{
        all, between, choice, exactly, followed_by, maybe, not, repeat, sep_by, sep_end_by,
        sequence, skip, unless, Halt, Seq,
    },
    error::{ErrorKind, ParseError},
    position::SourcePosition,
    primitive::{
        bind, delay, eof, expected, fail, fail_default, fail_with, filter, label, look_ahead, map,
        satisfy, token, tokens, value,
    },
    run::{parse, parse_with, run, ParseOptions, Success},
    state::{Parser, State, Step},
    stream::{StreamError, StreamingParser},
};
