//! String-Related Parsers
//!
//! Leaf parsers for characters and strings. Everything here is an ordinary
//! composition of the core primitives — nothing reaches into the engine's
//! internals beyond the public [`Parser::new`] contract, which the literal
//! and regex matchers use for efficiency.

use crate::combinator::{between, followed_by, maybe, repeat, skip};
use crate::error::ErrorKind;
use crate::primitive::{bind, label, map, satisfy};
use crate::regex_cache;
use crate::state::{Parser, State, Step};

use std::fmt::Display;
use std::ops::RangeBounds;

fn chars_match(a: char, b: char, fold_case: bool) -> bool {
    a == b || (fold_case && a.to_lowercase().eq(b.to_lowercase()))
}

fn literal_matcher(want: String, fold_case: bool) -> Parser<String> {
    Parser::new(move |state: State| {
        let start = state.offset();
        let mut current = state;
        for want_ch in want.chars() {
            let origin_pos = current.position().clone();
            let got = current.remaining().chars().next();
            match got {
                Some(got_ch) if chars_match(want_ch, got_ch, fold_case) => {
                    let mut buf = [0u8; 4];
                    let consumed: &str = got_ch.encode_utf8(&mut buf);
                    current = current.advanced(consumed);
                }
                Some(got_ch) => {
                    // consumed-then-validated: the bad character stays
                    // consumed, the error points at where it started
                    let mut buf = [0u8; 4];
                    let consumed: &str = got_ch.encode_utf8(&mut buf);
                    let next = current.advanced(consumed);
                    return next.fail_at(origin_pos, "parser error", ErrorKind::Failure, false);
                }
                None => return current.fail_here("unexpected eof", ErrorKind::Eof, false),
            }
        }
        let matched = current.input()[start..current.offset()].to_string();
        Step::Done(current, matched)
    })
}

/// Match `want` exactly, consuming it and succeeding with it
pub fn literal(want: &str) -> Parser<String> {
    let description = format!("string matching {{{}}}", want);
    label(literal_matcher(want.to_string(), false), &description)
}

/// Match `want` ignoring character case; the value is the consumed input
/// in its original case
pub fn literal_no_case(want: &str) -> Parser<String> {
    let description = format!("string matching {{{}}}", want);
    label(literal_matcher(want.to_string(), true), &description)
}

/// Succeed if the next token is one of the characters in `chars`
pub fn one_of(chars: &str) -> Parser<String> {
    let bag: Vec<char> = chars.chars().collect();
    let listing = bag
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let matcher = satisfy(move |t| t.chars().next().is_some_and(|c| bag.contains(&c)));
    label(matcher, &format!("one of {{{}}}", listing))
}

/// Succeed if the next token is none of the characters in `chars`
pub fn none_of(chars: &str) -> Parser<String> {
    let bag: Vec<char> = chars.chars().collect();
    let listing = bag
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let matcher = satisfy(move |t| t.chars().next().is_some_and(|c| !bag.contains(&c)));
    label(matcher, &format!("none of {{{}}}", listing))
}

fn char_class(pred: impl Fn(char) -> bool + 'static, description: &str) -> Parser<String> {
    label(
        satisfy(move |t| t.chars().next().is_some_and(&pred)),
        description,
    )
}

/// Match a single ASCII alphabetical character
pub fn alpha() -> Parser<String> {
    char_class(|c| c.is_ascii_alphabetic(), "alphabetical character")
}

/// Match a single uppercase ASCII alphabetical character
pub fn alpha_upper() -> Parser<String> {
    char_class(
        |c| c.is_ascii_uppercase(),
        "uppercase alphabetical character",
    )
}

/// Match a single lowercase ASCII alphabetical character
pub fn alpha_lower() -> Parser<String> {
    char_class(
        |c| c.is_ascii_lowercase(),
        "lowercase alphabetical character",
    )
}

/// Match a single digit in `base` (2 to 36)
pub fn digit(base: u32) -> Parser<String> {
    assert!(
        (2..=36).contains(&base),
        "digit() requires a base between 2 and 36, got {}",
        base
    );
    char_class(move |c| c.is_digit(base), "digit")
}

/// Match a single ASCII alphabetical character or digit in `base`
pub fn alphanum(base: u32) -> Parser<String> {
    assert!(
        (2..=36).contains(&base),
        "alphanum() requires a base between 2 and 36, got {}",
        base
    );
    char_class(
        move |c| c.is_ascii_alphabetic() || c.is_digit(base),
        "alphanum",
    )
}

/// Match one whitespace character
pub fn space() -> Parser<String> {
    char_class(|c| matches!(c, ' ' | '\t' | '\n' | '\r'), "space")
}

/// Match one or more whitespace characters, succeeding with a single space
/// regardless of what was matched
pub fn spaces() -> Parser<String> {
    let run = followed_by(map(|_| " ".to_string(), space()), skip(space()));
    label(run, "spaces")
}

/// Join the string results of `p` into one string
pub fn concat(p: Parser<Vec<String>>) -> Parser<String> {
    map(|parts: Vec<String>| parts.concat(), p)
}

/// Collect between `min` and `max` results of `p` into a single string;
/// [`repeat`] for strings
pub fn text(p: Parser<String>, bounds: impl RangeBounds<usize>) -> Parser<String> {
    concat(repeat(p, bounds))
}

/// Trim whitespace on both sides of `p`
pub fn trim<T: 'static>(p: Parser<T>) -> Parser<T> {
    between(maybe(spaces()), maybe(spaces()), p)
}

/// Trim leading whitespace before `p`
pub fn trim_left<T: 'static>(p: Parser<T>) -> Parser<T> {
    bind(maybe(spaces()), move |_| p.clone())
}

/// Trim trailing whitespace after `p`
pub fn trim_right<T: 'static>(p: Parser<T>) -> Parser<T> {
    followed_by(p, maybe(spaces()))
}

/// Succeed with `p`'s value if it falls within `[min, max]`
pub fn range<T>(min: T, max: T, p: Parser<T>) -> Parser<T>
where
    T: PartialOrd + Display + 'static,
{
    let description = format!("value between {{{}}} and {{{}}}", min, max);
    label(
        crate::primitive::filter(move |v: &T| *v >= min && *v <= max, p),
        &description,
    )
}

/// Match the regular expression `pattern` anchored at the cursor,
/// succeeding with the matched text.
///
/// The pattern is compiled once and cached; an invalid pattern is a usage
/// error and panics at construction.
pub fn pattern(pattern: &str) -> Parser<String> {
    let regex = match regex_cache::get_or_compile(pattern) {
        Some(regex) => regex,
        None => panic!("pattern() requires a valid regex, got {{{}}}", pattern),
    };
    let message = format!("expected match for {{{}}}", pattern);
    Parser::new(move |state: State| {
        let matched: Option<String> = regex
            .find(state.remaining())
            .filter(|m| m.start() == 0)
            .map(|m| m.as_str().to_string());
        match matched {
            Some(consumed) => {
                let next = state.advanced(&consumed);
                Step::Done(next, consumed)
            }
            None => state.fail_here(message.clone(), ErrorKind::Expectation, true),
        }
    })
}
