//! Number-Related Parsers
//!
//! Numeric leaf parsers built on the [`text`](crate::text) layer: an
//! unsigned natural, a signed integer (both with a configurable base) and a
//! decimal float with optional exponent notation.

use crate::combinator::{maybe, sequence};
use crate::primitive::{bind, fail, value};
use crate::state::Parser;
use crate::text::{digit, literal, literal_no_case, one_of, text};

/// Match a natural number — digits only, no sign — in `base`
pub fn natural(base: u32) -> Parser<i64> {
    let digits = text(digit(base), 1..);
    bind(digits, move |s| match i64::from_str_radix(&s, base) {
        Ok(n) => value(n),
        Err(_) => fail("number out of range"),
    })
}

/// Match an integer with an optional `+` or `-` sign in `base`
pub fn integer(base: u32) -> Parser<i64> {
    let sign = maybe(one_of("+-"));
    let magnitude = natural(base);
    sequence(move |s| {
        let sign = s.run(&sign)?;
        let n = s.run(&magnitude)?;
        Ok(value(if sign.as_deref() == Some("-") { -n } else { n }))
    })
}

/// Match a decimal floating point number with optional sign, fraction and
/// exponent (e-notation)
pub fn float() -> Parser<f64> {
    let sign = maybe(one_of("+-"));
    let digits = text(digit(10), 1..);
    let fraction = {
        let dot = literal(".");
        let digits = digits.clone();
        maybe(sequence(move |s| {
            s.run(&dot)?;
            let d = s.run(&digits)?;
            Ok(value(format!(".{}", d)))
        }))
    };
    let exponent = {
        let e = literal_no_case("e");
        let esign = maybe(one_of("+-"));
        let digits = digits.clone();
        maybe(sequence(move |s| {
            s.run(&e)?;
            let sign = s.run(&esign)?;
            let d = s.run(&digits)?;
            Ok(value(format!("e{}{}", sign.unwrap_or_default(), d)))
        }))
    };
    sequence(move |s| {
        let sign = s.run(&sign)?;
        let whole = s.run(&digits)?;
        let fraction = s.run(&fraction)?;
        let exponent = s.run(&exponent)?;
        let lexeme = format!(
            "{}{}{}{}",
            sign.unwrap_or_default(),
            whole,
            fraction.unwrap_or_default(),
            exponent.unwrap_or_default()
        );
        Ok(match lexeme.parse::<f64>() {
            Ok(v) => value(v),
            Err(_) => fail("malformed float"),
        })
    })
}
