//! Primitive Parser Algebra
//!
//! The minimal set of state transformers from which everything else in the
//! crate is derived. Each primitive is a pure function from [`State`] to
//! [`Step`], wrapped in a [`Parser`]. Failures are raised at the reporting
//! primitive's own (unmoved) input position and merged onto the accumulated
//! error channel; see [`crate::error::ParseError::merge`].

use crate::error::ErrorKind;
use crate::error::ParseError;
use crate::state::{Parser, Step};

/// A parser that always succeeds with `v` without consuming input
pub fn value<T: Clone + 'static>(v: T) -> Parser<T> {
    Parser::new(move |state| Step::Done(state, v.clone()))
}

/// Run `p`, then feed its value to `f` and run the parser `f` returns.
///
/// `f` is never invoked if `p` fails; the failure is forwarded unchanged.
pub fn bind<T: 'static, U: 'static>(
    p: Parser<T>,
    f: impl Fn(T) -> Parser<U> + 'static,
) -> Parser<U> {
    Parser::new(move |state| match p.apply(state) {
        Step::Done(next, v) => f(v).apply(next),
        Step::Fail(state) => Step::Fail(state),
    })
}

/// A parser that always fails with `message` without consuming input
pub fn fail<T: 'static>(message: impl Into<String>) -> Parser<T> {
    fail_with(message, ErrorKind::Failure, false)
}

/// [`fail`] with the default "parser error" message
pub fn fail_default<T: 'static>() -> Parser<T> {
    fail("parser error")
}

/// A parser that always fails with an explicit kind and replace flag
pub fn fail_with<T: 'static>(
    message: impl Into<String>,
    kind: ErrorKind,
    replace: bool,
) -> Parser<T> {
    let message = message.into();
    Parser::new(move |state| state.fail_here(message.clone(), kind, replace))
}

/// A parser that fails reporting that `descriptor` was expected, replacing
/// any previously accumulated messages
pub fn expected<T: 'static>(descriptor: &str) -> Parser<T> {
    fail_with(
        format!("expected {}", descriptor),
        ErrorKind::Expectation,
        true,
    )
}

/// Consume `count` characters (minimum 1), succeeding with the consumed
/// substring. Fails with an "unexpected eof" error, consuming nothing, if
/// fewer than `count` characters remain.
pub fn tokens(count: usize) -> Parser<String> {
    let count = count.max(1);
    Parser::new(move |state| {
        let rest = state.remaining();
        match rest.char_indices().nth(count - 1) {
            Some((idx, ch)) => {
                let consumed = rest[..idx + ch.len_utf8()].to_string();
                let next = state.advanced(&consumed);
                Step::Done(next, consumed)
            }
            None => state.fail_here("unexpected eof", ErrorKind::Eof, false),
        }
    })
}

/// Consume a single character from the input
pub fn token() -> Parser<String> {
    tokens(1)
}

/// Succeed with `true` (consuming nothing) iff there is no input left
pub fn eof() -> Parser<bool> {
    Parser::new(move |state| {
        if state.at_eof() {
            Step::Done(state, true)
        } else {
            state.fail_here("expected end of input", ErrorKind::Expectation, true)
        }
    })
}

/// Replace any failure of `p` with `expected {text}`.
///
/// The expectation is raised at `p`'s starting position; the reported
/// position remains the furthest one reached, per the merge rule.
pub fn label<T: 'static>(p: Parser<T>, text: &str) -> Parser<T> {
    let message = format!("expected {}", text);
    Parser::new(move |state| {
        let origin = state.clone();
        match p.apply(state) {
            done @ Step::Done(..) => done,
            Step::Fail(failed) => {
                let mut retry = origin;
                retry.error = ParseError::merge(retry.error.take(), failed.error, false);
                let position = retry.position.clone();
                retry.fail_at(position, message.clone(), ErrorKind::Expectation, true)
            }
        }
    })
}

/// Transform the value of a successful application of `p`.
///
/// `f` is never invoked if `p` fails.
pub fn map<T: 'static, U: 'static>(f: impl Fn(T) -> U + 'static, p: Parser<T>) -> Parser<U> {
    Parser::new(move |state| match p.apply(state) {
        Step::Done(next, v) => Step::Done(next, f(v)),
        Step::Fail(state) => Step::Fail(state),
    })
}

/// Run `p` for its value, reporting its success or failure, but leave the
/// cursor where it was
pub fn look_ahead<T: 'static>(p: Parser<T>) -> Parser<T> {
    Parser::new(move |state| {
        let origin = state.clone();
        match p.apply(state) {
            Step::Done(_, v) => Step::Done(origin, v),
            Step::Fail(failed) => {
                let mut restored = origin;
                restored.error = failed.error;
                Step::Fail(restored)
            }
        }
    })
}

/// Run `p`; succeed with its value only if `pred` accepts it.
///
/// On rejection the failure points at `p`'s starting position, but whatever
/// `p` consumed stays consumed (consumed-then-validated semantics).
pub fn filter<T: 'static>(pred: impl Fn(&T) -> bool + 'static, p: Parser<T>) -> Parser<T> {
    Parser::new(move |state| {
        let origin_pos = state.position.clone();
        match p.apply(state) {
            Step::Done(next, v) => {
                if pred(&v) {
                    Step::Done(next, v)
                } else {
                    next.fail_at(origin_pos, "parser error", ErrorKind::Failure, false)
                }
            }
            fail @ Step::Fail(_) => fail,
        }
    })
}

/// Consume one token and succeed with it iff `pred` accepts it
pub fn satisfy(pred: impl Fn(&str) -> bool + 'static) -> Parser<String> {
    filter(move |t: &String| pred(t), token())
}

/// Defer calling a parser constructor until parse time.
///
/// Required to express directly-recursive grammars without infinite
/// construction-time recursion.
pub fn delay<T: 'static>(ctor: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
    Parser::new(move |state| ctor().apply(state))
}
