//! Combinator Layer
//!
//! Sequencing, alternation and repetition, built purely on the primitive
//! algebra — no combinator here introduces a new primitive state
//! transition. Every combinator has exactly two terminal outcomes per
//! invocation: success (possibly advanced cursor, a value) or failure (an
//! error; the caller backtracks by discarding the failed state).
//!
//! Variable-arity operations take a homogeneous `Vec<Parser<T>>`;
//! heterogeneous sequencing is expressed with [`bind`](crate::primitive::bind)
//! or [`sequence`].

use std::ops::{Bound, RangeBounds};

use crate::error::{ErrorKind, ParseError};
use crate::primitive::map;
use crate::state::{Parser, State, Step};

/// Resolve range bounds into an inclusive `(min, max)` pair.
///
/// Panics if the resulting minimum exceeds the maximum; that is a
/// construction mistake, not a parse failure.
fn normalize_bounds(bounds: impl RangeBounds<usize>) -> (usize, usize) {
    let min = match bounds.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n + 1,
        Bound::Unbounded => 0,
    };
    let max = match bounds.end_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n.saturating_sub(1),
        Bound::Unbounded => usize::MAX,
    };
    assert!(
        min <= max,
        "minimum repetition count {} exceeds maximum {}",
        min,
        max
    );
    (min, max)
}

/// Run every parser in order; succeed with the **last** parser's value.
///
/// Fails at the first failing member, propagating its error untouched.
/// Panics if called with no parsers.
pub fn all<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    assert!(!parsers.is_empty(), "all() requires at least one parser");
    Parser::new(move |mut state| {
        for p in &parsers[..parsers.len() - 1] {
            match p.apply(state) {
                Step::Done(next, _) => state = next,
                fail @ Step::Fail(_) => return fail,
            }
        }
        parsers[parsers.len() - 1].apply(state)
    })
}

/// Try each parser in order against the original input state (true
/// backtracking); succeed with the first success.
///
/// Failures accumulate through the merge algorithm, so the final error
/// reports the furthest failure with every sibling expectation that reached
/// that point. Panics if called with no parsers.
pub fn choice<T: 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    assert!(!parsers.is_empty(), "choice() requires at least one parser");
    Parser::new(move |state| {
        let mut acc = state;
        for p in &parsers[..parsers.len() - 1] {
            match p.apply(acc.clone()) {
                done @ Step::Done(..) => return done,
                Step::Fail(failed) => {
                    acc.error = ParseError::merge(acc.error.take(), failed.error, false);
                }
            }
        }
        match parsers[parsers.len() - 1].apply(acc.clone()) {
            done @ Step::Done(..) => done,
            Step::Fail(mut failed) => {
                failed.error = ParseError::merge(acc.error.take(), failed.error.take(), false);
                Step::Fail(failed)
            }
        }
    })
}

/// Run `p`, succeeding with `Some(value)`; on failure succeed with `None`
/// without consuming input
pub fn maybe<T: 'static>(p: Parser<T>) -> Parser<Option<T>> {
    let some = map(Some, p);
    let none = Parser::new(|state| Step::Done(state, None));
    choice(vec![some, none])
}

/// Succeed with `true` (consuming nothing) iff `p` fails
pub fn not<T: 'static>(p: Parser<T>) -> Parser<bool> {
    Parser::new(move |state| match p.apply(state.clone()) {
        Step::Fail(_) => Step::Done(state, true),
        Step::Done(..) => state.fail_here("expected parser to fail", ErrorKind::Failure, false),
    })
}

/// Run the parsers like [`all`], but only if `guard` fails first
pub fn unless<G: 'static, T: 'static>(guard: Parser<G>, parsers: Vec<Parser<T>>) -> Parser<T> {
    let rest = all(parsers);
    let guard = not(guard);
    Parser::new(move |state| match guard.apply(state) {
        Step::Done(next, _) => rest.apply(next),
        Step::Fail(failed) => Step::Fail(failed),
    })
}

/// Opaque short-circuit token produced by a failing [`Seq::run`].
///
/// It cannot be constructed outside this module, so the only way a
/// [`sequence`] body can halt is through an actual parse failure.
#[derive(Debug)]
pub struct Halt {
    _priv: (),
}

/// Threads state through the steps of a [`sequence`] body
pub struct Seq {
    state: State,
    failed: bool,
}

impl Seq {
    /// Apply `p` to the threaded state, unwrapping its value.
    ///
    /// On failure, records the failing state and returns `Err(Halt)`;
    /// propagate it with `?` to short-circuit the rest of the body.
    pub fn run<T: 'static>(&mut self, p: &Parser<T>) -> Result<T, Halt> {
        match p.apply(self.state.clone()) {
            Step::Done(next, v) => {
                self.state = next;
                Ok(v)
            }
            Step::Fail(failed) => {
                self.state = failed;
                self.failed = true;
                Err(Halt { _priv: () })
            }
        }
    }
}

/// Do-notation: write multi-step sequential logic with intermediate named
/// values instead of nested [`bind`](crate::primitive::bind) chains.
///
/// The body receives a [`Seq`]; each `seq.run(&parser)?` applies a parser
/// and yields its value, short-circuiting the body on the first failure.
/// The body returns the final parser to apply.
///
/// ```
/// use combinol::prelude::*;
///
/// let pair = sequence(|s| {
///     let a = s.run(&token())?;
///     let b = s.run(&token())?;
///     Ok(value(format!("{}{}", b, a)))
/// });
/// assert_eq!(parse(&pair, "ab").unwrap(), "ba");
/// ```
pub fn sequence<T: 'static>(
    body: impl Fn(&mut Seq) -> Result<Parser<T>, Halt> + 'static,
) -> Parser<T> {
    Parser::new(move |state| {
        let mut seq = Seq {
            state,
            failed: false,
        };
        let outcome = body(&mut seq);
        if seq.failed {
            return Step::Fail(seq.state);
        }
        match outcome {
            Ok(final_parser) => final_parser.apply(seq.state),
            Err(_) => seq
                .state
                .fail_here("parser error", ErrorKind::Failure, false),
        }
    })
}

/// Succeed with `p`'s value, but only if `after` also succeeds following it.
///
/// Several trailing parsers compose as `followed_by(p, all(vec![...]))`.
pub fn followed_by<T: 'static, A: 'static>(p: Parser<T>, after: Parser<A>) -> Parser<T> {
    Parser::new(move |state| match p.apply(state) {
        Step::Done(next, v) => match after.apply(next) {
            Step::Done(last, _) => Step::Done(last, v),
            Step::Fail(failed) => Step::Fail(failed),
        },
        Step::Fail(failed) => Step::Fail(failed),
    })
}

/// Greedily apply `p`, collecting values, until it fails or the upper bound
/// is reached.
///
/// If fewer than the lower bound were collected, the result is the failing
/// state that stopped the loop — preserving the precise position and
/// message of why repetition fell short. Bounds are any `usize` range, e.g.
/// `1..`, `..=4`, `2..=3` or `..`. Panics if `min > max`.
pub fn repeat<T: 'static>(p: Parser<T>, bounds: impl RangeBounds<usize>) -> Parser<Vec<T>> {
    let (min, max) = normalize_bounds(bounds);
    Parser::new(move |state| {
        let mut current = state;
        let mut items = Vec::new();
        while items.len() < max {
            match p.apply(current.clone()) {
                Step::Done(next, v) => {
                    items.push(v);
                    current = next;
                }
                Step::Fail(failed) => {
                    if items.len() < min {
                        return Step::Fail(failed);
                    }
                    return Step::Done(current, items);
                }
            }
        }
        Step::Done(current, items)
    })
}

/// Collect exactly `n` results of `p`
pub fn exactly<T: 'static>(p: Parser<T>, n: usize) -> Parser<Vec<T>> {
    repeat(p, n..=n)
}

/// Succeed with `p`'s value sandwiched between `open` and `close`
pub fn between<O: 'static, C: 'static, T: 'static>(
    open: Parser<O>,
    close: Parser<C>,
    p: Parser<T>,
) -> Parser<T> {
    let inner = followed_by(p, close);
    Parser::new(move |state| match open.apply(state) {
        Step::Done(next, _) => inner.apply(next),
        Step::Fail(failed) => Step::Fail(failed),
    })
}

/// Apply `p` until it stops matching, discarding the results
pub fn skip<T: 'static>(p: Parser<T>) -> Parser<()> {
    map(|_| (), repeat(p, ..))
}

/// Collect results of `p` separated by `sep`.
///
/// Zero matches succeed with an empty vector unless the lower bound is at
/// least one, in which case one `p` is required, followed by
/// `min-1..=max-1` further separator-prefixed occurrences.
pub fn sep_by<T: 'static, S: 'static>(
    p: Parser<T>,
    sep: Parser<S>,
    bounds: impl RangeBounds<usize>,
) -> Parser<Vec<T>> {
    let (min, max) = normalize_bounds(bounds);
    if max == 0 {
        return Parser::new(|state| Step::Done(state, Vec::new()));
    }
    if min == 0 {
        let nonempty = sep_by_min_one(p, sep, 1, max);
        let empty = Parser::new(|state| Step::Done(state, Vec::new()));
        return choice(vec![nonempty, empty]);
    }
    sep_by_min_one(p, sep, min, max)
}

fn sep_by_min_one<T: 'static, S: 'static>(
    p: Parser<T>,
    sep: Parser<S>,
    min: usize,
    max: usize,
) -> Parser<Vec<T>> {
    let tail = {
        let p = p.clone();
        Parser::new(move |state| match sep.apply(state) {
            Step::Done(next, _) => p.apply(next),
            Step::Fail(failed) => Step::Fail(failed),
        })
    };
    let rest = repeat(tail, (min - 1)..=(max - 1));
    Parser::new(move |state| match p.apply(state) {
        Step::Done(next, first) => match rest.apply(next) {
            Step::Done(last, mut items) => {
                items.insert(0, first);
                Step::Done(last, items)
            }
            Step::Fail(failed) => Step::Fail(failed),
        },
        Step::Fail(failed) => Step::Fail(failed),
    })
}

/// Collect results of `p` separated — and, if `enforce_end`, terminated —
/// by `sep`. With `enforce_end` false the trailing separator is optional.
pub fn sep_end_by<T: 'static, S: 'static>(
    p: Parser<T>,
    sep: Parser<S>,
    bounds: impl RangeBounds<usize>,
    enforce_end: bool,
) -> Parser<Vec<T>> {
    let items = sep_by(p, sep.clone(), bounds);
    let ender: Parser<()> = if enforce_end {
        map(|_| (), sep)
    } else {
        map(|_| (), maybe(sep))
    };
    followed_by(items, ender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::SourcePosition;
    use crate::primitive::{fail, fail_default, token, value};

    fn initial(input: &str) -> State {
        State::new(input, SourcePosition::start())
    }

    #[test]
    fn test_all_returns_last_value() {
        let p = all(vec![token(), token()]);
        match p.apply(initial("ab")) {
            Step::Done(state, v) => {
                assert_eq!(v, "b");
                assert_eq!(state.offset(), 2);
            }
            Step::Fail(_) => panic!("all() failed"),
        }
    }

    #[test]
    #[should_panic(expected = "requires at least one parser")]
    fn test_all_rejects_empty() {
        let _ = all::<String>(vec![]);
    }

    #[test]
    fn test_choice_backtracks() {
        let p = choice(vec![fail("x"), value("y")]);
        match p.apply(initial("")) {
            Step::Done(state, v) => {
                assert_eq!(v, "y");
                assert_eq!(state.offset(), 0);
                assert_eq!(state.position().column, 1);
            }
            Step::Fail(_) => panic!("choice() failed"),
        }
    }

    #[test]
    fn test_choice_accumulates_messages() {
        let p: Parser<String> = choice(vec![fail("foo"), fail("bar"), fail("baz")]);
        match p.apply(initial("")) {
            Step::Fail(failed) => {
                let error = failed.into_error();
                assert_eq!(error.messages, vec!["foo", "bar", "baz"]);
            }
            Step::Done(..) => panic!("choice() of failures succeeded"),
        }
    }

    #[test]
    fn test_not_inverts() {
        assert!(not(token()).apply(initial("")).is_done());
        assert!(!not(value(1)).apply(initial("")).is_done());
    }

    #[test]
    fn test_maybe_recovers() {
        let p = maybe(fail_default::<String>());
        match p.apply(initial("a")) {
            Step::Done(state, v) => {
                assert_eq!(v, None);
                assert_eq!(state.offset(), 0);
            }
            Step::Fail(_) => panic!("maybe() failed"),
        }
    }

    #[test]
    fn test_repeat_respects_max() {
        let p = repeat(token(), 1..=4);
        match p.apply(initial("aaaaa")) {
            Step::Done(state, items) => {
                assert_eq!(items, vec!["a", "a", "a", "a"]);
                assert_eq!(state.offset(), 4);
            }
            Step::Fail(_) => panic!("repeat failed"),
        }
    }

    #[test]
    fn test_repeat_min_returns_stopping_failure() {
        let p = repeat(token(), 3..);
        match p.apply(initial("aa")) {
            Step::Fail(failed) => {
                let error = failed.into_error();
                assert_eq!(error.messages, vec!["unexpected eof"]);
                assert_eq!(error.position.column, 3);
            }
            Step::Done(..) => panic!("repeat met its minimum"),
        }
    }

    #[test]
    #[should_panic(expected = "exceeds maximum")]
    fn test_repeat_rejects_inverted_bounds() {
        #[allow(clippy::reversed_empty_ranges)]
        let _ = repeat(token(), 4..=1);
    }

    #[test]
    fn test_sequence_threads_state() {
        let p = sequence(|s| {
            let a = s.run(&token())?;
            let b = s.run(&token())?;
            Ok(value(format!("{}{}", b, a)))
        });
        match p.apply(initial("ab")) {
            Step::Done(_, v) => assert_eq!(v, "ba"),
            Step::Fail(_) => panic!("sequence failed"),
        }
    }

    #[test]
    fn test_sequence_short_circuits() {
        let p: Parser<String> = sequence(|s| {
            s.run(&token())?;
            s.run(&token())?;
            panic!("body continued past a failing step");
        });
        match p.apply(initial("a")) {
            Step::Fail(failed) => {
                let error = failed.into_error();
                assert_eq!(error.position.column, 2);
                assert!(error.was_eof);
            }
            Step::Done(..) => panic!("sequence succeeded"),
        }
    }

    #[test]
    fn test_followed_by_keeps_first_value() {
        let p = followed_by(value("pass"), token());
        match p.apply(initial("a")) {
            Step::Done(state, v) => {
                assert_eq!(v, "pass");
                assert_eq!(state.offset(), 1);
            }
            Step::Fail(_) => panic!("followed_by failed"),
        }
    }

    #[test]
    fn test_unless_guards() {
        let p = unless(fail_default::<String>(), vec![value("ok")]);
        assert!(p.apply(initial("")).is_done());
        let p = unless(value("oops"), vec![value("ok")]);
        assert!(!p.apply(initial("")).is_done());
    }

    #[test]
    fn test_sep_by_empty_is_identity() {
        let p = sep_by(token(), token(), ..);
        match p.apply(initial("")) {
            Step::Done(_, items) => assert!(items.is_empty()),
            Step::Fail(_) => panic!("sep_by failed on empty input"),
        }
    }

    #[test]
    fn test_between() {
        let p = between(token(), token(), token());
        match p.apply(initial("(x)")) {
            Step::Done(state, v) => {
                assert_eq!(v, "x");
                assert_eq!(state.offset(), 3);
            }
            Step::Fail(_) => panic!("between failed"),
        }
    }

    #[test]
    fn test_skip_discards() {
        let p = followed_by(skip(token()), crate::primitive::eof());
        assert!(p.apply(initial("aaa")).is_done());
    }
}
