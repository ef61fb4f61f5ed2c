//! Parsing State and the Parser Type
//!
//! A [`State`] is the immutable-by-convention snapshot threaded through
//! every parsing step: the shared input text, a byte cursor, the source
//! position corresponding to that cursor, an opaque user-state side channel,
//! and the accumulated error context that alternation threads forward.
//!
//! A parser is a pure function from a `State` to a [`Step`]: either
//! `Done(state, value)` or `Fail(state)`, where a failed state always
//! carries an error. Backtracking is cheap by construction — a caller that
//! discards a failed branch's state simply resumes from its own clone of
//! the original.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::{ErrorKind, ParseError};
use crate::position::SourcePosition;

/// The immutable snapshot threaded through every parsing step
#[derive(Clone)]
pub struct State {
    pub(crate) input: Rc<str>,
    pub(crate) offset: usize,
    pub(crate) position: SourcePosition,
    pub(crate) user: Option<Rc<dyn Any>>,
    pub(crate) error: Option<ParseError>,
}

impl State {
    /// Create an initial state over `input` at `position`
    pub fn new(input: impl Into<Rc<str>>, position: SourcePosition) -> Self {
        Self {
            input: input.into(),
            offset: 0,
            position,
            user: None,
            error: None,
        }
    }

    /// Attach an opaque user-state value
    pub fn with_user_state(mut self, user: Rc<dyn Any>) -> Self {
        self.user = Some(user);
        self
    }

    /// The full input text
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset of the cursor into the input
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Source position corresponding to the cursor
    #[inline]
    pub fn position(&self) -> &SourcePosition {
        &self.position
    }

    /// The not-yet-consumed remainder of the input
    #[inline]
    pub fn remaining(&self) -> &str {
        &self.input[self.offset..]
    }

    /// True if the cursor has reached the end of input
    #[inline]
    pub fn at_eof(&self) -> bool {
        self.offset == self.input.len()
    }

    /// Downcast the opaque user-state side channel, if any
    pub fn user_state<T: 'static>(&self) -> Option<&T> {
        self.user.as_deref().and_then(|u| u.downcast_ref::<T>())
    }

    /// The accumulated error context, if any
    #[inline]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Return a copy advanced by `consumed`, which must be the text at the
    /// cursor. Offset and position move together.
    pub(crate) fn advanced(&self, consumed: &str) -> State {
        State {
            input: Rc::clone(&self.input),
            offset: self.offset + consumed.len(),
            position: self.position.advanced_over(consumed),
            user: self.user.clone(),
            error: self.error.clone(),
        }
    }

    /// Merge a new failure into the accumulated error at `position` and
    /// return the state as a failed step.
    pub(crate) fn fail_at<T>(
        mut self,
        position: SourcePosition,
        message: impl Into<String>,
        kind: ErrorKind,
        replace: bool,
    ) -> Step<T> {
        let new_error = ParseError::at(position, message, kind);
        self.error = ParseError::merge(self.error.take(), Some(new_error), replace);
        Step::Fail(self)
    }

    /// Fail at the current cursor position.
    pub(crate) fn fail_here<T>(
        self,
        message: impl Into<String>,
        kind: ErrorKind,
        replace: bool,
    ) -> Step<T> {
        let position = self.position.clone();
        self.fail_at(position, message, kind, replace)
    }

    /// Extract the failure error, falling back to a generic error at the
    /// current position if the channel is somehow empty.
    pub(crate) fn into_error(mut self) -> ParseError {
        match self.error.take() {
            Some(error) => error,
            None => ParseError::at(self.position, "parser error", ErrorKind::Failure),
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("offset", &self.offset)
            .field("position", &self.position)
            .field("error", &self.error)
            .finish()
    }
}

/// The two-outcome result of applying a parser to a state
#[derive(Debug)]
pub enum Step<T> {
    /// Success: the successor state and the produced value
    Done(State, T),
    /// Failure: the state at the failure point, carrying the error
    Fail(State),
}

impl<T> Step<T> {
    /// True if this step succeeded
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(..))
    }
}

/// A parser: a cheaply clonable, pure function from [`State`] to [`Step`]
pub struct Parser<T> {
    run: Rc<dyn Fn(State) -> Step<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T> Parser<T> {
    /// Wrap a state-transition function as a parser.
    ///
    /// This is the extension point for custom primitives; everything in
    /// this crate is built on it.
    pub fn new(f: impl Fn(State) -> Step<T> + 'static) -> Self {
        Parser { run: Rc::new(f) }
    }

    /// Apply this parser to a state
    #[inline]
    pub fn apply(&self, state: State) -> Step<T> {
        (self.run)(state)
    }
}

impl<T: 'static> Parser<T> {
    /// Transform this parser's value; the function is never invoked on
    /// failure
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        crate::primitive::map(f, self)
    }

    /// Monadic sequencing: feed this parser's value to `f` and run the
    /// parser it returns
    pub fn and_then<U: 'static>(self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        crate::primitive::bind(self, f)
    }

    /// Try this parser, falling back to `other` on failure (backtracking)
    pub fn or(self, other: Parser<T>) -> Parser<T> {
        crate::combinator::choice(vec![self, other])
    }

    /// Replace any failure of this parser with `expected {text}`
    pub fn label(self, text: &str) -> Parser<T> {
        crate::primitive::label(self, text)
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser")
    }
}
