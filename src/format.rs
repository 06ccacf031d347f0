//! Numeric formatting: program listings, `STR$`/`PRINT`, and `PRINT USING`.
//!
//! Three code paths share the same digit-string machinery:
//! [`number_to_str`] for listings/`STR$`/`PRINT`, and [`format_number`] for
//! `PRINT USING`'s fixed and scientific token forms. All of it works from a
//! type's `(mantissa, exp10)` decimal view (see [`crate::mbf`]) rather than
//! from a host float, so the legacy rounding and digit-count quirks survive
//! bit-for-bit.

#[cfg(test)]
mod test;

use num_bigint::BigInt;

use crate::error::{Result, ValueError};
use crate::mbf::{Double, Single};
use crate::value::Value;

trait FloatValue: Copy {
    const NATIVE_DIGITS: u32;
    const EXP_LETTER: char;
    fn is_zero_value(&self) -> bool;
    fn is_negative_value(&self) -> bool;
    fn decimal(&self, digits: Option<u32>) -> (BigInt, i32);
    fn abs_value(&self) -> Self;
}

impl FloatValue for Single {
    const NATIVE_DIGITS: u32 = Single::NATIVE_DIGITS;
    const EXP_LETTER: char = Single::EXP_LETTER;
    fn is_zero_value(&self) -> bool {
        self.is_zero()
    }
    fn is_negative_value(&self) -> bool {
        self.is_negative()
    }
    fn decimal(&self, digits: Option<u32>) -> (BigInt, i32) {
        self.to_decimal(digits)
    }
    fn abs_value(&self) -> Self {
        self.iabs()
    }
}

impl FloatValue for Double {
    const NATIVE_DIGITS: u32 = Double::NATIVE_DIGITS;
    const EXP_LETTER: char = Double::EXP_LETTER;
    fn is_zero_value(&self) -> bool {
        self.is_zero()
    }
    fn is_negative_value(&self) -> bool {
        self.is_negative()
    }
    fn decimal(&self, digits: Option<u32>) -> (BigInt, i32) {
        self.to_decimal(digits)
    }
    fn abs_value(&self) -> Self {
        self.iabs()
    }
}

/// Digits of `num`, left-padded with zeros to `digits`, truncated to the
/// first `digits` characters, with trailing zeros optionally stripped.
fn get_digits(num: &BigInt, digits: u32, remove_trailing: bool) -> String {
    let digits = digits as usize;
    let magnitude = num.magnitude().to_string();
    let padded = if magnitude.len() < digits {
        format!("{}{magnitude}", "0".repeat(digits - magnitude.len()))
    } else {
        magnitude
    };
    let truncated: String = padded.chars().take(digits).collect();
    if remove_trailing {
        truncated.trim_end_matches('0').to_string()
    } else {
        truncated
    }
}

fn scientific_notation(digitstr: &str, exp10: i32, exp_sign: char, digits_to_dot: usize, force_dot: bool) -> String {
    let chars: Vec<char> = digitstr.chars().collect();
    let head: String = chars.iter().take(digits_to_dot).collect();
    let mut valstr = head;
    if chars.len() > digits_to_dot {
        valstr.push('.');
        valstr.extend(&chars[digits_to_dot..]);
    } else if chars.len() == digits_to_dot && force_dot {
        valstr.push('.');
    }
    let exponent = exp10 - digits_to_dot as i32 + 1;
    valstr.push(exp_sign);
    valstr.push(if exponent < 0 { '-' } else { '+' });
    valstr.push_str(&format!("{:02}", exponent.unsigned_abs()));
    valstr
}

fn decimal_notation(digitstr: &str, exp10: i32, type_sign: Option<char>, force_dot: bool) -> String {
    let exp10 = exp10 + 1;
    let chars: Vec<char> = digitstr.chars().collect();
    let mut valstr = String::new();
    if exp10 >= chars.len() as i32 {
        valstr.extend(&chars);
        valstr.push_str(&"0".repeat((exp10 - chars.len() as i32) as usize));
        if force_dot {
            valstr.push('.');
        }
        if !force_dot || type_sign == Some('#') {
            if let Some(c) = type_sign {
                valstr.push(c);
            }
        }
    } else if exp10 > 0 {
        let at = exp10 as usize;
        valstr.extend(&chars[..at]);
        valstr.push('.');
        valstr.extend(&chars[at..]);
        if type_sign == Some('#') {
            valstr.push('#');
        }
    } else {
        if force_dot {
            valstr.push('0');
        }
        valstr.push('.');
        valstr.push_str(&"0".repeat((-exp10) as usize));
        valstr.extend(&chars);
        if type_sign == Some('#') {
            valstr.push('#');
        }
    }
    valstr
}

fn float_to_str<T: FloatValue>(n: &T, leading_space: bool, type_sign: bool, sigil: char) -> String {
    if n.is_zero_value() {
        let space = if leading_space { " " } else { "" };
        let tail = if type_sign { sigil.to_string() } else { String::new() };
        return format!("{space}0{tail}");
    }
    let sign = if n.is_negative_value() {
        "-"
    } else if leading_space {
        " "
    } else {
        ""
    };
    let ndigits = T::NATIVE_DIGITS;
    let (num, exp10) = n.decimal(None);
    let digitstr = get_digits(&num, ndigits, true);
    let exp10 = exp10 + ndigits as i32 - 1;
    let digitstr_len = digitstr.chars().count() as i32;
    let valstr = if exp10 > ndigits as i32 - 1 || digitstr_len - exp10 > ndigits as i32 + 1 {
        scientific_notation(&digitstr, exp10, T::EXP_LETTER, 1, false)
    } else {
        let sign_char = if type_sign { Some(sigil) } else { None };
        decimal_notation(&digitstr, exp10, sign_char, false)
    };
    format!("{sign}{valstr}")
}

/// `STR$` / `PRINT` / program-listing rendering of a number.
///
/// `screen` selects `PRINT`/`STR$` style (leading space, no sigil); `write`
/// selects `WRITE#` style (neither). Both false is the default listing
/// style (no leading space, trailing sigil).
pub fn number_to_str(v: &Value, screen: bool, write: bool) -> Result<String> {
    let leading_space = screen && !write;
    let type_sign = !screen && !write;
    match v {
        Value::Integer(n) => Ok(integer_to_str(*n, leading_space)),
        Value::Single(s) => Ok(float_to_str(s, leading_space, type_sign, '!')),
        Value::Double(d) => Ok(float_to_str(d, leading_space, type_sign, '#')),
        Value::String(_) => Err(ValueError::TypeMismatch),
    }
}

fn integer_to_str(n: i16, leading_space: bool) -> String {
    if n < 0 {
        n.to_string()
    } else if leading_space {
        format!(" {n}")
    } else {
        n.to_string()
    }
}

fn format_float_scientific<T: FloatValue>(expr: &T, digits_before: u32, decimals: u32, force_dot: bool) -> String {
    let work_digits = T::NATIVE_DIGITS.min(digits_before + decimals);
    let (mut digitstr, mut exp10) = if expr.is_zero_value() {
        if !force_dot {
            return if T::EXP_LETTER == 'E' {
                "E+00".to_string()
            } else {
                "0D+00".to_string()
            };
        }
        ("0".repeat((digits_before + decimals) as usize), 0)
    } else {
        let lookup_digits = if work_digits == 0 { 1 } else { work_digits };
        let (num, exp10) = expr.decimal(Some(lookup_digits));
        let mut digitstr = get_digits(&num, work_digits, true);
        if (digitstr.chars().count() as u32) < digits_before + decimals {
            digitstr.push_str(&"0".repeat((digits_before + decimals) as usize - digitstr.chars().count()));
        }
        (digitstr, exp10)
    };
    if work_digits == 0 {
        exp10 += 1;
    }
    exp10 += digits_before as i32 + decimals as i32 - 1;
    if digitstr.is_empty() {
        digitstr.push('0');
    }
    scientific_notation(&digitstr, exp10, T::EXP_LETTER, digits_before as usize, force_dot)
}

fn format_float_fixed<T: FloatValue>(expr: &T, decimals: u32, force_dot: bool) -> String {
    let (mut num, mut exp10) = expr.decimal(None);
    if -exp10 > decimals as i32 {
        let nwork = (T::NATIVE_DIGITS as i32 - (-exp10 - decimals as i32)).max(1) as u32;
        let (n2, e2) = expr.decimal(Some(nwork));
        num = n2;
        exp10 = e2;
    }
    let digitstr_raw = num.magnitude().to_string();
    let nbefore = digitstr_raw.chars().count() as i32 + exp10;
    let pad = (decimals as i32 + exp10).max(0) as usize;
    let digitstr = format!("{digitstr_raw}{}", "0".repeat(pad));
    decimal_notation(&digitstr, nbefore - 1, None, force_dot)
}

fn format_number_generic<T: FloatValue>(value: &T, tokens: &str, digits_before: i32, decimals: i32) -> Result<String> {
    if digits_before + decimals > 24 {
        return Err(ValueError::IllegalFunctionCall);
    }
    let has_dollar = tokens.contains('$');
    let force_dot = tokens.contains('.');
    let neg = value.is_negative_value();
    let mut digits_before = digits_before;
    let mut valstr = String::new();
    let mut post_sign = String::new();
    let first = tokens.chars().next();
    let last = tokens.chars().last();
    if first == Some('+') {
        valstr.push(if neg { '-' } else { '+' });
    } else if last == Some('+') {
        post_sign.push(if neg { '-' } else { '+' });
    } else if last == Some('-') {
        post_sign.push(if neg { '-' } else { ' ' });
    } else {
        if neg {
            valstr.push('-');
        }
        if !has_dollar {
            digits_before -= 1;
            if digits_before < 0 {
                digits_before = 0;
            }
        }
    }
    let value = value.abs_value();
    if has_dollar {
        valstr.push('$');
    }
    if tokens.contains('^') {
        valstr.push_str(&format_float_scientific(&value, digits_before as u32, decimals as u32, force_dot));
    } else {
        valstr.push_str(&format_float_fixed(&value, decimals as u32, force_dot));
    }
    valstr.push_str(&post_sign);
    let token_width = tokens.chars().count();
    let value_width = valstr.chars().count();
    if value_width > token_width {
        log::debug!("PRINT USING overflow: {valstr:?} wider than token {tokens:?}");
        valstr = format!("%{valstr}");
    } else {
        let filler = if tokens.contains('*') { '*' } else { ' ' };
        valstr = format!("{}{valstr}", filler.to_string().repeat(token_width - value_width));
    }
    Ok(valstr)
}

/// `PRINT USING` rendering of a numeric value against a format token string.
pub fn format_number(value: &Value, tokens: &str, digits_before: i32, decimals: i32) -> Result<String> {
    match value {
        Value::Single(s) => format_number_generic(s, tokens, digits_before, decimals),
        Value::Double(d) => format_number_generic(d, tokens, digits_before, decimals),
        _ => Err(ValueError::TypeMismatch),
    }
}
