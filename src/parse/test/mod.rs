#![cfg(test)]

use crate::parse::{from_str, tokenise_number, NumberScanner};
use crate::value::Value;

#[test]
fn empty_word_is_integer_zero() {
    assert_eq!(from_str("", false).unwrap(), Value::Integer(0));
}

#[test]
fn plain_digits_are_integer() {
    assert_eq!(from_str("123", false).unwrap(), Value::Integer(123));
    assert_eq!(from_str("-42", false).unwrap(), Value::Integer(-42));
}

#[test]
fn integer_overflow_falls_through_to_single() {
    match from_str("40000", false).unwrap() {
        Value::Single(s) => assert_eq!(s.to_value(), 40000.0),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn decimal_point_gives_single() {
    match from_str("1.5", false).unwrap() {
        Value::Single(s) => assert_eq!(s.to_value(), 1.5),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn d_exponent_gives_double() {
    match from_str("1.5D2", false).unwrap() {
        Value::Double(d) => assert_eq!(d.to_value(), 150.0),
        other => panic!("expected Double, got {other:?}"),
    }
}

#[test]
fn hash_sigil_forces_double() {
    match from_str("3#", false).unwrap() {
        Value::Double(d) => assert_eq!(d.to_value(), 3.0),
        other => panic!("expected Double, got {other:?}"),
    }
}

#[test]
fn trailing_percent_is_consumed_without_changing_type() {
    // a bare integer literal never reaches the float path, so feed it a
    // decimal point to exercise the sigil-stripping logic.
    match from_str("1.25%", false).unwrap() {
        Value::Single(s) => assert_eq!(s.to_value(), 1.25),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn hex_literal_parses() {
    assert_eq!(from_str("&HFF", false).unwrap(), Value::Integer(255));
}

#[test]
fn hex_literal_reinterprets_high_bit_as_negative() {
    assert_eq!(from_str("&HFFFF", false).unwrap(), Value::Integer(-1));
}

#[test]
fn octal_literal_with_o_prefix_parses() {
    assert_eq!(from_str("&O17", false).unwrap(), Value::Integer(15));
}

#[test]
fn octal_literal_without_o_prefix_parses() {
    assert_eq!(from_str("&17", false).unwrap(), Value::Integer(15));
}

#[test]
fn bad_syntax_is_a_syntax_error_unless_nonnum_allowed() {
    assert!(from_str("ABC", false).is_err());
    assert!(from_str("ABC", true).is_ok());
}

#[test]
fn tokenise_number_reads_a_decimal_literal_and_stops_before_trailing_text() {
    let mut scanner = NumberScanner::new("123.5+X");
    let value = tokenise_number(&mut scanner).unwrap().unwrap();
    match value {
        Value::Single(s) => assert_eq!(s.to_value(), 123.5),
        other => panic!("expected Single, got {other:?}"),
    }
    assert_eq!(scanner.position(), 5);
}

#[test]
fn tokenise_number_protects_else_from_being_read_as_an_exponent() {
    let mut scanner = NumberScanner::new("1ELSE");
    let value = tokenise_number(&mut scanner).unwrap().unwrap();
    assert_eq!(value, Value::Integer(1));
    // the 'E' must be left unconsumed for the keyword scanner.
    assert_eq!(scanner.position(), 1);
}

#[test]
fn tokenise_number_protects_eqv_from_being_read_as_an_exponent() {
    let mut scanner = NumberScanner::new("1EQV");
    let value = tokenise_number(&mut scanner).unwrap().unwrap();
    assert_eq!(value, Value::Integer(1));
    assert_eq!(scanner.position(), 1);
}

#[test]
fn tokenise_number_reads_hex_via_ampersand_h() {
    let mut scanner = NumberScanner::new("&H10");
    let value = tokenise_number(&mut scanner).unwrap().unwrap();
    assert_eq!(value, Value::Integer(16));
}

#[test]
fn tokenise_number_returns_none_on_non_numeric_start() {
    let mut scanner = NumberScanner::new("PRINT");
    assert!(tokenise_number(&mut scanner).unwrap().is_none());
    assert_eq!(scanner.position(), 0);
}
