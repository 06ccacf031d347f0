#![cfg(test)]

use crate::mbf::{Double, Single};
use crate::string_space::SlabStringSpace;
use crate::value::{pass_number, pass_string, Value, Values};

fn engine() -> Values<SlabStringSpace> {
    Values::new(SlabStringSpace::new(), true)
}

fn single(x: f64) -> Value {
    Value::Single(Single::from_value(x).0)
}

fn double(x: f64) -> Value {
    Value::Double(Double::from_value(x).0)
}

#[test]
fn pass_functions_reject_the_wrong_kind() {
    assert!(pass_number(Value::Integer(1)).is_ok());
    assert!(pass_number(Value::String(crate::string_space::StringDescriptor::EMPTY)).is_err());
    assert!(pass_string(Value::String(crate::string_space::StringDescriptor::EMPTY)).is_ok());
    assert!(pass_string(Value::Integer(1)).is_err());
}

#[test]
fn add_promotes_integer_operands_to_single() {
    let v = engine();
    let result = v.add(Value::Integer(2), Value::Integer(3)).unwrap();
    match result {
        Value::Single(s) => assert_eq!(s.to_value(), 5.0),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn add_with_a_double_operand_computes_in_double() {
    let v = engine();
    let result = v.add(single(1.0), double(2.0)).unwrap();
    match result {
        Value::Double(d) => assert_eq!(d.to_value(), 3.0),
        other => panic!("expected Double, got {other:?}"),
    }
}

#[test]
fn subtract_is_add_of_the_negation() {
    let v = engine();
    let result = v.subtract(single(5.0), single(2.0)).unwrap();
    match result {
        Value::Single(s) => assert_eq!(s.to_value(), 3.0),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn divide_by_zero_substitutes_signed_max_without_erroring() {
    let v = engine();
    let result = v.divide(single(1.0), single(0.0)).unwrap();
    match result {
        Value::Single(s) => assert_eq!(s, Single::pos_max()),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn divide_int_by_zero_is_a_hard_error() {
    let v = engine();
    assert!(v.divide_int(Value::Integer(4), Value::Integer(0)).is_err());
}

#[test]
fn divide_int_truncates() {
    let v = engine();
    assert_eq!(v.divide_int(Value::Integer(7), Value::Integer(2)).unwrap(), Value::Integer(3));
}

#[test]
fn modulo_matches_remainder() {
    let v = engine();
    assert_eq!(v.modulo(Value::Integer(7), Value::Integer(2)).unwrap(), Value::Integer(1));
}

#[test]
fn power_with_integer_exponent_uses_repeated_squaring_path() {
    let v = engine();
    let result = v.power(single(2.0), Value::Integer(10)).unwrap();
    match result {
        Value::Single(s) => assert_eq!(s.to_value(), 1024.0),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn to_integer_rounds_half_to_even() {
    let v = engine();
    assert_eq!(v.to_integer(single(2.5), false).unwrap(), Value::Integer(2));
    assert_eq!(v.to_integer(single(3.5), false).unwrap(), Value::Integer(4));
}

#[test]
fn to_integer_overflow_is_an_error() {
    let v = engine();
    assert!(v.to_integer(single(40000.0), false).is_err());
}

#[test]
fn to_integer_unsigned_accepts_the_full_16_bit_range() {
    let v = engine();
    assert_eq!(v.to_integer(single(40000.0), true).unwrap(), Value::Integer(intop_from_unsigned(40000)));
}

fn intop_from_unsigned(n: u16) -> i16 {
    crate::intop::from_unsigned(n)
}

#[test]
fn sgn_reports_the_sign_of_each_numeric_type() {
    let v = engine();
    assert_eq!(v.sgn(Value::Integer(-5)).unwrap(), Value::Integer(-1));
    assert_eq!(v.sgn(Value::Integer(0)).unwrap(), Value::Integer(0));
    assert_eq!(v.sgn(single(3.0)).unwrap(), Value::Integer(1));
}

#[test]
fn floor_truncates_toward_negative_infinity() {
    let v = engine();
    match v.floor(single(-1.5)).unwrap() {
        Value::Single(s) => assert_eq!(s.to_value(), -2.0),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn fix_truncates_toward_zero() {
    let v = engine();
    match v.fix(single(-1.5)).unwrap() {
        Value::Single(s) => assert_eq!(s.to_value(), -1.0),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn bitwise_and_or_xor_operate_on_the_bit_pattern() {
    let v = engine();
    assert_eq!(v.bitwise_and(Value::Integer(0b1100), Value::Integer(0b1010)).unwrap(), Value::Integer(0b1000));
    assert_eq!(v.bitwise_or(Value::Integer(0b1100), Value::Integer(0b1010)).unwrap(), Value::Integer(0b1110));
    assert_eq!(v.bitwise_xor(Value::Integer(0b1100), Value::Integer(0b1010)).unwrap(), Value::Integer(0b0110));
}

#[test]
fn bitwise_not_is_arithmetic_negate_minus_one() {
    let v = engine();
    assert_eq!(v.bitwise_not(Value::Integer(0)).unwrap(), Value::Integer(-1));
}

#[test]
fn equals_and_gt_compare_numerics_after_promotion() {
    let v = engine();
    assert_eq!(v.equals(Value::Integer(2), single(2.0)).unwrap(), Value::Integer(-1));
    assert_eq!(v.gt(single(3.0), Value::Integer(2)).unwrap(), Value::Integer(-1));
    assert_eq!(v.lt(single(3.0), Value::Integer(2)).unwrap(), Value::Integer(0));
}

#[test]
fn string_concat_and_comparison() {
    let mut v = engine();
    let a = v.strings_mut().store(b"AB").unwrap();
    let b = v.strings_mut().store(b"CD").unwrap();
    let cat = v.concat(Value::String(a), Value::String(b)).unwrap();
    let bytes = v.strings().copy(match cat {
        Value::String(d) => d,
        other => panic!("expected String, got {other:?}"),
    });
    assert_eq!(bytes, b"ABCD".to_vec());

    assert_eq!(v.gt(Value::String(b), Value::String(a)).unwrap(), Value::Integer(-1));
}

#[test]
fn left_right_mid_and_instr_on_stored_strings() {
    let mut v = engine();
    let s = v.strings_mut().store(b"HELLO WORLD").unwrap();
    let s = Value::String(s);

    let left = v.left(s, Value::Integer(5)).unwrap();
    assert_eq!(v.strings().copy(as_desc(left)), b"HELLO".to_vec());

    let right = v.right(s, Value::Integer(5)).unwrap();
    assert_eq!(v.strings().copy(as_desc(right)), b"WORLD".to_vec());

    let mid = v.mid(s, Value::Integer(7), Some(Value::Integer(5))).unwrap();
    assert_eq!(v.strings().copy(as_desc(mid)), b"WORLD".to_vec());

    let needle = Value::String(v.strings_mut().store(b"WORLD").unwrap());
    assert_eq!(v.instr(1, s, needle).unwrap(), Value::Integer(7));
}

fn as_desc(v: Value) -> crate::string_space::StringDescriptor {
    match v {
        Value::String(d) => d,
        other => panic!("expected String, got {other:?}"),
    }
}

#[test]
fn character_and_space_build_short_strings() {
    let mut v = engine();
    let ch = v.character(Value::Integer(65)).unwrap();
    assert_eq!(v.strings().copy(as_desc(ch)), b"A".to_vec());

    let sp = v.space(Value::Integer(3)).unwrap();
    assert_eq!(v.strings().copy(as_desc(sp)), b"   ".to_vec());
}

#[test]
fn asc_on_empty_string_is_illegal_function_call() {
    let mut v = engine();
    let empty = Value::String(v.strings_mut().store(b"").unwrap());
    assert!(v.asc(empty).is_err());
}

#[test]
fn mki_mks_mkd_and_cv_round_trip() {
    let mut v = engine();
    let packed = v.mki(Value::Integer(1234)).unwrap();
    assert_eq!(v.cvi(packed).unwrap(), Value::Integer(1234));

    let packed = v.mks(single(2.5)).unwrap();
    match v.cvs(packed).unwrap() {
        Value::Single(s) => assert_eq!(s.to_value(), 2.5),
        other => panic!("expected Single, got {other:?}"),
    }
}

#[test]
fn val_parses_the_bytes_of_a_stored_string() {
    let mut v = engine();
    let s = Value::String(v.strings_mut().store(b"  42").unwrap());
    assert_eq!(v.val(s).unwrap(), Value::Integer(42));
}

#[test]
fn representation_renders_str_dollar_style_with_leading_space() {
    let mut v = engine();
    let s = v.representation(Value::Integer(5)).unwrap();
    assert_eq!(v.strings().copy(as_desc(s)), b" 5".to_vec());
}
