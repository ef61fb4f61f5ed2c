//! Synchronous Driver
//!
//! Runs a parser once over a complete in-memory input. [`parse`] returns
//! just the value, [`parse_with`] takes options, and [`run`] additionally
//! returns the full final [`State`] for callers that need the cursor (the
//! streaming driver is one such caller).

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::combinator::followed_by;
use crate::error::ParseError;
use crate::position::SourcePosition;
use crate::primitive::eof;
use crate::state::{Parser, State, Step};

/// Options for a single driver invocation.
///
/// Each call gets its own owned value; nothing here is shared or mutated
/// across calls.
#[derive(Clone, Default)]
pub struct ParseOptions {
    /// Allow unconsumed input after the parser finishes (default: the
    /// whole input must be consumed)
    pub allow_trailing: bool,
    /// Source name (e.g. a file name) used in position reporting
    pub source_name: Option<String>,
    /// Start from an externally supplied position instead of line 1,
    /// column 1
    pub position: Option<SourcePosition>,
    /// Opaque caller data available to custom primitives via
    /// [`State::user_state`]
    pub user_state: Option<Rc<dyn Any>>,
}

impl ParseOptions {
    /// Create the default options
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit trailing unconsumed input
    #[inline]
    pub fn allow_trailing(mut self) -> Self {
        self.allow_trailing = true;
        self
    }

    /// Set the source name used in position reporting
    #[inline]
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Resume from an externally supplied starting position
    #[inline]
    pub fn position(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach opaque caller data
    #[inline]
    pub fn user_state(mut self, user: Rc<dyn Any>) -> Self {
        self.user_state = Some(user);
        self
    }

    fn starting_position(&self) -> SourcePosition {
        match &self.position {
            Some(position) => position.clone(),
            None => match &self.source_name {
                Some(name) => SourcePosition::start().named(name.as_str()),
                None => SourcePosition::start(),
            },
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("allow_trailing", &self.allow_trailing)
            .field("source_name", &self.source_name)
            .field("position", &self.position)
            .field("user_state", &self.user_state.is_some())
            .finish()
    }
}

/// A successful parse: the value plus the full final state
#[derive(Debug)]
pub struct Success<T> {
    /// The parsed value
    pub value: T,
    /// The state at the end of the parse
    pub state: State,
}

/// Run `parser` over `input` with default options.
///
/// The whole input must be consumed; see
/// [`ParseOptions::allow_trailing`] otherwise.
///
/// ```
/// use combinol::prelude::*;
///
/// let greeting = all(vec![literal("hello "), literal("world")]);
/// assert_eq!(parse(&greeting, "hello world").unwrap(), "world");
/// assert!(parse(&greeting, "hello mars").is_err());
/// ```
pub fn parse<T: 'static>(parser: &Parser<T>, input: &str) -> Result<T, ParseError> {
    parse_with(parser, input, ParseOptions::default())
}

/// Run `parser` over `input` with explicit options
pub fn parse_with<T: 'static>(
    parser: &Parser<T>,
    input: &str,
    options: ParseOptions,
) -> Result<T, ParseError> {
    run(parser, input, options).map(|success| success.value)
}

/// Run `parser` over `input`, returning the value together with the final
/// state
pub fn run<T: 'static>(
    parser: &Parser<T>,
    input: &str,
    options: ParseOptions,
) -> Result<Success<T>, ParseError> {
    let wrapped = if options.allow_trailing {
        parser.clone()
    } else {
        followed_by(parser.clone(), eof())
    };
    let mut state = State::new(input, options.starting_position());
    if let Some(user) = options.user_state {
        state = state.with_user_state(user);
    }
    match wrapped.apply(state) {
        Step::Done(state, value) => Ok(Success { value, state }),
        Step::Fail(failed) => Err(failed.into_error()),
    }
}
