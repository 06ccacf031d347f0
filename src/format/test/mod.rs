#![cfg(test)]

use super::*;
use crate::mbf::{Double, Single};

fn single(x: f64) -> Value {
    Value::Single(Single::from_value(x).0)
}

fn double(x: f64) -> Value {
    Value::Double(Double::from_value(x).0)
}

#[test]
fn integer_listing_style_has_no_leading_space_for_positive() {
    assert_eq!(number_to_str(&Value::Integer(5), false, false).unwrap(), "5");
}

#[test]
fn integer_screen_style_has_a_leading_space_for_positive() {
    assert_eq!(number_to_str(&Value::Integer(5), true, false).unwrap(), " 5");
}

#[test]
fn integer_negative_never_gets_a_leading_space() {
    assert_eq!(number_to_str(&Value::Integer(-5), true, false).unwrap(), "-5");
}

#[test]
fn single_zero_on_screen_renders_plain_zero() {
    assert_eq!(number_to_str(&single(0.0), true, false).unwrap(), " 0");
}

#[test]
fn single_zero_in_listing_style_carries_the_sigil() {
    assert_eq!(number_to_str(&single(0.0), false, false).unwrap(), "0!");
}

#[test]
fn double_sigil_is_a_hash() {
    match number_to_str(&double(0.0), false, false).unwrap().as_str() {
        "0#" => {}
        other => panic!("expected 0#, got {other}"),
    }
}

#[test]
fn string_values_are_rejected() {
    assert!(number_to_str(&Value::String(crate::string_space::StringDescriptor::EMPTY), true, false).is_err());
}

#[test]
fn get_digits_pads_and_truncates() {
    assert_eq!(get_digits(&BigInt::from(12), 5, false), "12000");
    assert_eq!(get_digits(&BigInt::from(12345), 3, false), "123");
}

#[test]
fn get_digits_strips_trailing_zeros_when_asked() {
    assert_eq!(get_digits(&BigInt::from(12000), 5, true), "12");
}

#[test]
fn decimal_notation_places_the_point_inside_the_digits() {
    assert_eq!(decimal_notation("120", 0, None, false), "1.20");
}

#[test]
fn decimal_notation_pads_zeros_after_an_integral_value() {
    assert_eq!(decimal_notation("123", 2, None, false), "12300");
}

#[test]
fn decimal_notation_pads_zeros_before_a_purely_fractional_value() {
    assert_eq!(decimal_notation("5", -2, None, false), ".005");
}

#[test]
fn print_using_fixed_point_pads_with_a_leading_space() {
    // `PRINT USING "##.##"` on 1.2 renders as " 1.20".
    let rendered = format_number(&single(1.2), "##.##", 2, 2).unwrap();
    assert_eq!(rendered, " 1.20");
}

#[test]
fn print_using_scientific_zero_uses_the_bare_exponent_quirk() {
    // `PRINT USING "#^^^^"` on a zero Single renders as " E+00", not "0E+00".
    let rendered = format_number(&single(0.0), "#^^^^", 1, 0).unwrap();
    assert_eq!(rendered, " E+00");
}

#[test]
fn print_using_scientific_zero_on_double_keeps_a_leading_zero_digit() {
    let rendered = format_number(&double(0.0), "#^^^^^", 1, 0).unwrap();
    assert_eq!(rendered, "0D+00");
}

#[test]
fn print_using_overflow_prefixes_a_percent_sign() {
    let rendered = format_number(&single(123.0), "##", 2, 0).unwrap();
    assert_eq!(rendered, "%123");
}

#[test]
fn print_using_star_fill_pads_with_asterisks() {
    let rendered = format_number(&single(1.2), "**.##", 2, 2).unwrap();
    assert_eq!(rendered, "*1.20");
}

#[test]
fn print_using_trailing_minus_shows_sign_for_negatives_only() {
    let positive = format_number(&single(5.0), "#-", 1, 0).unwrap();
    assert_eq!(positive, "5 ");
    let negative = format_number(&single(-5.0), "#-", 1, 0).unwrap();
    assert_eq!(negative, "5-");
}

#[test]
fn print_using_rejects_more_than_24_total_digits() {
    assert!(format_number(&single(1.0), "#", 20, 5).is_err());
}

#[test]
fn format_number_rejects_strings_and_integers() {
    assert!(format_number(&Value::Integer(5), "##", 2, 0).is_err());
}
