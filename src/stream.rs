//! Incremental (Streaming) Driver
//!
//! A [`StreamingParser`] re-invokes the synchronous driver on a growing
//! buffer as data arrives in chunks, delivering each fully-parsed value
//! through a callback. Between operations, suspended work is plain state in
//! the handle: the unconsumed buffer and the resume position. Line and
//! column numbers in later errors therefore reflect the full stream, not
//! just the current chunk.
//!
//! # Usage
//!
//! ```
//! use combinol::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let mut stream = StreamingParser::new(literal("foo"), move |outcome| {
//!     if let Ok(value) = outcome {
//!         sink.borrow_mut().push(value);
//!     }
//! });
//! stream.data("fo").unwrap();
//! stream.data("ofoo").unwrap();
//! stream.done().unwrap();
//! assert_eq!(*seen.borrow(), vec!["foo", "foo"]);
//! ```

use std::fmt;

use crate::error::ParseError;
use crate::position::SourcePosition;
use crate::run::{run, ParseOptions};
use crate::state::Parser;

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

/// Errors produced by operations on a streaming handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The handle was already closed by `done()` or `error()`
    Closed,
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("streaming handle is closed"),
        }
    }
}

impl std::error::Error for StreamError {}

/// A stateful handle that drives a parser over chunked input.
///
/// Created open with an empty buffer; closes permanently on [`done`] or
/// [`error`]. Any operation on a closed handle returns
/// [`StreamError::Closed`] without invoking the callback or mutating state.
///
/// [`done`]: StreamingParser::done
/// [`error`]: StreamingParser::error
pub struct StreamingParser<T> {
    batch: Parser<Vec<T>>,
    callback: Box<dyn FnMut(Result<T, ParseError>)>,
    options: ParseOptions,
    buffer: String,
    closed: bool,
}

impl<T: 'static> StreamingParser<T> {
    /// Create a streaming handle with default options
    pub fn new(parser: Parser<T>, callback: impl FnMut(Result<T, ParseError>) + 'static) -> Self {
        Self::with_options(parser, callback, ParseOptions::default())
    }

    /// Create a streaming handle with explicit options.
    ///
    /// The handle owns a fresh options value: trailing input is always
    /// allowed (a chunk boundary must never require end-of-input), and the
    /// starting position is pinned so it can be carried across drains.
    pub fn with_options(
        parser: Parser<T>,
        callback: impl FnMut(Result<T, ParseError>) + 'static,
        options: ParseOptions,
    ) -> Self {
        let mut options = options;
        options.allow_trailing = true;
        if options.position.is_none() {
            options.position = Some(match &options.source_name {
                Some(name) => SourcePosition::start().named(name.as_str()),
                None => SourcePosition::start(),
            });
        }
        Self {
            batch: crate::combinator::repeat(parser, 1..),
            callback: Box::new(callback),
            options,
            buffer: String::new(),
            closed: false,
        }
    }

    /// True once the handle has been closed
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The currently buffered, not-yet-consumed input
    #[inline]
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Append a chunk of input and drain any now-complete values
    pub fn data(&mut self, chunk: &str) -> Result<&mut Self, StreamError> {
        self.ensure_open()?;
        self.buffer.push_str(chunk);
        self.drain();
        Ok(self)
    }

    /// Signal end of stream: close the handle, discard any unconsumed
    /// buffer, and drain
    pub fn done(&mut self) -> Result<&mut Self, StreamError> {
        self.ensure_open()?;
        self.closed = true;
        self.buffer.clear();
        self.drain();
        Ok(self)
    }

    /// Inject an external error: close the handle and report `error`
    /// through the callback once, without draining
    pub fn error(&mut self, error: ParseError) -> Result<&mut Self, StreamError> {
        self.ensure_open()?;
        self.closed = true;
        (self.callback)(Err(error));
        Ok(self)
    }

    fn ensure_open(&self) -> Result<(), StreamError> {
        if self.closed {
            Err(StreamError::Closed)
        } else {
            Ok(())
        }
    }

    /// One full pass extracting as many complete values as currently
    /// possible from the buffer.
    ///
    /// An end-of-input failure on an open handle means "need more data"
    /// and stops silently; any other failure is reported through the
    /// callback.
    fn drain(&mut self) {
        loop {
            if self.closed && self.buffer.is_empty() {
                return;
            }
            match run(&self.batch, &self.buffer, self.options.clone()) {
                Ok(success) => {
                    log_debug!(
                        "drain: {} value(s), {} byte(s) left over",
                        success.value.len(),
                        success.state.remaining().len()
                    );
                    self.options.position = Some(success.state.position().clone());
                    self.buffer = success.state.remaining().to_string();
                    for value in success.value {
                        (self.callback)(Ok(value));
                    }
                }
                Err(error) => {
                    if error.was_eof && !self.closed {
                        log_debug!("drain: incomplete input, waiting for more data");
                        return;
                    }
                    (self.callback)(Err(error));
                    return;
                }
            }
        }
    }
}

impl<T> fmt::Debug for StreamingParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingParser")
            .field("closed", &self.closed)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}
