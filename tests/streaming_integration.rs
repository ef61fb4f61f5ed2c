//! Integration tests for incremental (streaming) parsing
//!
//! These tests cover:
//! - Values delivered through the callback as chunks complete them
//! - "Need more data" silence on end-of-input failures
//! - Position continuity across chunks
//! - The closed-handle contract

use combinol::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type Seen<T> = Rc<RefCell<Vec<Result<T, ParseError>>>>;

fn collector<T: 'static>() -> (Seen<T>, impl FnMut(Result<T, ParseError>)) {
    let seen: Seen<T> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |outcome| sink.borrow_mut().push(outcome))
}

// ============================================================================
// Value delivery
// ============================================================================

#[test]
fn test_callback_runs_once_per_value() {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(token(), sink);
    stream.data("aa").unwrap();
    stream.done().unwrap();
    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|r| r.as_deref() == Ok("a")));
}

#[test]
fn test_values_complete_across_chunk_boundaries() {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(literal("foo"), sink);
    stream.data("fo").unwrap();
    assert!(seen.borrow().is_empty(), "partial input must stay silent");
    stream.data("ofoo").unwrap();
    assert_eq!(seen.borrow().len(), 2);
    stream.done().unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_stops_on_first_non_eof_error() {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(literal("foo"), sink);
    stream.data("fo").unwrap();
    stream.data("ofoo").unwrap();
    stream.data("foox").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    for ok in &seen[..3] {
        assert_eq!(ok.as_deref(), Ok("foo"));
    }
    let error = seen[3].as_ref().unwrap_err();
    assert_eq!(error.messages, vec!["expected string matching {foo}"]);
    assert_eq!(error.position.line, 1);
    assert_eq!(error.position.column, 10);
}

#[test]
fn test_position_continuity_across_lines() {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(literal("foo\n"), sink);
    stream.data("fo").unwrap();
    stream.data("o\nfoo").unwrap();
    stream.data("\nf").unwrap();
    stream.data("oo\nfoo\nbbbb").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen.iter().filter(|r| r.is_ok()).count(), 4);
    let error = seen[4].as_ref().unwrap_err();
    assert_eq!(error.messages, vec!["expected string matching {foo\n}"]);
    assert_eq!(error.position.line, 5);
    assert_eq!(error.position.column, 1);
}

#[test]
fn test_done_discards_partial_input() {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(literal("foo"), sink);
    stream.data("fo").unwrap();
    stream.done().unwrap();
    assert!(seen.borrow().is_empty());
    assert!(stream.is_closed());
    assert_eq!(stream.buffered(), "");
}

#[test]
fn test_operations_chain() -> Result<(), StreamError> {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(literal("ab"), sink);
    stream.data("ab")?.data("a")?.data("b")?.done()?;
    assert_eq!(seen.borrow().len(), 2);
    Ok(())
}

// ============================================================================
// Closed-handle contract
// ============================================================================

#[test]
fn test_closed_handle_rejects_all_operations() {
    let (seen, sink) = collector::<String>();
    let mut stream = StreamingParser::new(token(), sink);
    stream.done().unwrap();
    assert_eq!(stream.data("a").err(), Some(StreamError::Closed));
    assert_eq!(stream.done().err(), Some(StreamError::Closed));
    let late = ParseError::at(SourcePosition::start(), "late", ErrorKind::Failure);
    assert_eq!(stream.error(late).err(), Some(StreamError::Closed));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_error_injection_reports_once_and_closes() {
    let (seen, sink) = collector::<String>();
    let mut stream = StreamingParser::new(token(), sink);
    let injected = ParseError::at(SourcePosition::start(), "upstream died", ErrorKind::Failure);
    stream.error(injected).unwrap();
    assert!(stream.is_closed());
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].as_ref().unwrap_err().messages, vec!["upstream died"]);
}

#[test]
fn test_parse_failure_does_not_close_the_handle() {
    let (seen, sink) = collector();
    let mut stream = StreamingParser::new(literal("ab"), sink);
    stream.data("ax").unwrap();
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].is_err());
    assert!(!stream.is_closed());
    // the buffer is unchanged; later chunks retry from the same spot
    stream.data("y").unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_source_name_flows_into_streaming_errors() {
    let (seen, sink) = collector();
    let options = ParseOptions::new().source_name("socket");
    let mut stream = StreamingParser::with_options(literal("ab"), sink, options);
    stream.data("ax").unwrap();
    let seen = seen.borrow();
    let error = seen[0].as_ref().unwrap_err();
    assert_eq!(error.position.name.as_deref(), Some("socket"));
}
