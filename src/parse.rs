//! Numeric literal parsing: free text (`VAL`, `INPUT`, immediate-mode
//! entry) and the program-stream numeric tokenizer.
//!
//! [`NumberScanner`] is a char-buffer read/unread cursor in the same idiom
//! the reference crate's own lexer uses, scoped here to the numeric-literal
//! grammar rather than a general-purpose token stream.

#[cfg(test)]
mod test;

use num_bigint::BigInt;

use crate::error::{Result, ValueError};
use crate::intop;
use crate::mbf::{Double, Single};
use crate::value::Value;

const BLANKS: [char; 2] = [' ', '\t'];

/// Parse free-form text into a value, per the reference source's `from_str`:
/// try Integer first, fall back to Single/Double on anything that isn't a
/// bare (possibly overflowing) integer literal.
pub fn from_str(word: &str, allow_nonnum: bool) -> Result<Value> {
    let word = word.trim_start_matches(|c| c == ' ' || c == '\n').to_ascii_uppercase();
    if word.is_empty() {
        return Ok(Value::Integer(0));
    }
    if let Some(rest) = word.strip_prefix("&H") {
        return integer_from_hex(rest);
    }
    if let Some(rest) = word.strip_prefix('&') {
        let digits = rest.strip_prefix('O').unwrap_or(rest);
        return integer_from_octal(digits);
    }
    if let Some(n) = integer_from_decimal(&word) {
        return Ok(Value::Integer(n));
    }
    let (is_double, mantissa, exp10) = str_to_decimal(&word, allow_nonnum)?;
    if is_double {
        Ok(Value::Double(Double::from_decimal(&mantissa, exp10).0))
    } else {
        Ok(Value::Single(Single::from_decimal(&mantissa, exp10).0))
    }
}

/// Strict `[+-]?[0-9]+` parse, fitting an `i16`. Anything else (a point, an
/// exponent, a sigil, or digits that overflow) falls through to the float
/// path, matching the legacy "integer literal overflow promotes to Single"
/// behaviour.
fn integer_from_decimal(word: &str) -> Option<i16> {
    let bytes = word.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let start = if bytes[0] == b'+' || bytes[0] == b'-' { 1 } else { 0 };
    if start >= bytes.len() || !bytes[start..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    word.parse::<i64>().ok().filter(|n| (-32768..=32767).contains(n)).map(|n| n as i16)
}

fn integer_from_hex(digits: &str) -> Result<Value> {
    let mut value: u32 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(16).ok_or(ValueError::SyntaxError)?;
        value = value * 16 + digit;
        if value > 0xFFFF {
            return Err(ValueError::Overflow);
        }
    }
    Ok(Value::Integer(intop::from_unsigned(value as u16)))
}

fn integer_from_octal(digits: &str) -> Result<Value> {
    let mut value: u32 = 0;
    for c in digits.chars() {
        if BLANKS.contains(&c) {
            continue;
        }
        let digit = c.to_digit(8).ok_or(ValueError::SyntaxError)?;
        value = value * 8 + digit;
        if value > 0xFFFF {
            return Err(ValueError::Overflow);
        }
    }
    Ok(Value::Integer(intop::from_unsigned(value as u16)))
}

/// General decimal grammar: optional sign, digit run, optional `.` and more
/// digits, optional `E`/`D` exponent with optional sign and digits,
/// optional trailing `!`/`#`/`%` sigil. Returns `(is_double, mantissa,
/// exp10)` with `value = mantissa * 10^exp10`. When `allow_nonnum` is
/// false, any unconsumed trailing character is a syntax error; when true,
/// the longest valid prefix is used.
fn str_to_decimal(word: &str, allow_nonnum: bool) -> Result<(bool, BigInt, i32)> {
    let chars: Vec<char> = word.chars().collect();
    let mut i = 0;
    let mut negative = false;
    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        negative = chars[i] == '-';
        i += 1;
    }
    let mut digits = String::new();
    while i < chars.len() && chars[i].is_ascii_digit() {
        digits.push(chars[i]);
        i += 1;
    }
    let mut int_digits = digits.len();
    if i < chars.len() && chars[i] == '.' {
        int_digits = digits.len();
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            digits.push(chars[i]);
            i += 1;
        }
    }
    if digits.is_empty() {
        if allow_nonnum {
            return Ok((false, BigInt::from(0), 0));
        }
        return Err(ValueError::SyntaxError);
    }
    let mut is_double = false;
    let mut exp_val: i32 = 0;
    if i < chars.len() && (chars[i] == 'E' || chars[i] == 'D') {
        is_double = chars[i] == 'D';
        let mark = i;
        i += 1;
        let mut exp_neg = false;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            exp_neg = chars[i] == '-';
            i += 1;
        }
        let exp_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            if !allow_nonnum {
                return Err(ValueError::SyntaxError);
            }
            // no exponent digits after all: back off and stop here.
            is_double = false;
            i = mark;
        } else {
            let exp_digits: String = chars[exp_start..i].iter().collect();
            exp_val = exp_digits.parse::<i32>().unwrap_or(0);
            if exp_neg {
                exp_val = -exp_val;
            }
        }
    }
    if i < chars.len() && (chars[i] == '!' || chars[i] == '#') {
        if chars[i] == '#' {
            is_double = true;
        }
        i += 1;
    } else if i < chars.len() && chars[i] == '%' {
        i += 1;
    }
    if i != chars.len() && !allow_nonnum {
        return Err(ValueError::SyntaxError);
    }
    let exp10 = exp_val - (digits.len() - int_digits) as i32;
    let mantissa: BigInt = digits.parse().unwrap_or_else(|_| BigInt::from(0));
    let mantissa = if negative { -mantissa } else { mantissa };
    Ok((is_double, mantissa, exp10))
}

/// Char-buffer cursor over program text, supporting single-character
/// lookahead and unread, the way the reference lexer's `Tokenizer` does.
pub struct NumberScanner {
    buffer: Vec<char>,
    pos: usize,
}

impl NumberScanner {
    pub fn new(text: &str) -> Self {
        NumberScanner { buffer: text.chars().collect(), pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.buffer.get(self.pos).copied()
    }

    fn read(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn unread(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
        }
    }
}

/// Scan one numeric literal token from the current position, leaving the
/// cursor just past it. Returns `None` (consuming nothing) when the
/// current character cannot start a number.
pub fn tokenise_number(scanner: &mut NumberScanner) -> Result<Option<Value>> {
    match scanner.peek() {
        None => Ok(None),
        Some('&') => {
            scanner.read();
            if matches!(scanner.peek(), Some(c) if c.eq_ignore_ascii_case(&'H')) {
                tokenise_hex(scanner).map(Some)
            } else {
                tokenise_oct(scanner).map(Some)
            }
        }
        Some(c) if c.is_ascii_digit() || c == '.' || c == '+' || c == '-' => tokenise_dec(scanner).map(Some),
        _ => Ok(None),
    }
}

fn tokenise_dec(scanner: &mut NumberScanner) -> Result<Value> {
    let mut have_exp = false;
    let mut have_point = false;
    let mut word = String::new();
    loop {
        let c = match scanner.read() {
            Some(c) => c.to_ascii_uppercase(),
            None => break,
        };
        if c == '.' && !have_point && !have_exp {
            have_point = true;
            word.push(c);
        } else if (c == 'E' || c == 'D') && !have_exp {
            // `E` immediately followed by `L`/`Q` protects ELSE/EQV: stop
            // before consuming it.
            if c == 'E' && matches!(scanner.peek(), Some(p) if p.eq_ignore_ascii_case(&'L') || p.eq_ignore_ascii_case(&'Q')) {
                scanner.unread();
                break;
            }
            have_exp = true;
            word.push(c);
        } else if (c == '+' || c == '-') && (word.is_empty() || matches!(word.chars().last(), Some('E') | Some('D'))) {
            word.push(c);
        } else if c.is_ascii_digit() || BLANKS.contains(&c) {
            word.push(c);
        } else if (c == '!' || c == '#') && !have_exp {
            word.push(c);
            break;
        } else if c == '%' {
            break;
        } else {
            scanner.unread();
            break;
        }
    }
    let trimmed_len = word.trim_end_matches(|c| BLANKS.contains(&c)).chars().count();
    for _ in 0..(word.chars().count() - trimmed_len) {
        scanner.unread();
    }
    let cleaned: String = word.chars().filter(|c| !BLANKS.contains(c)).collect();
    from_str(&cleaned, false)
}

fn tokenise_hex(scanner: &mut NumberScanner) -> Result<Value> {
    scanner.read(); // the 'H'
    let mut word = String::new();
    while let Some(c) = scanner.peek() {
        if c.is_ascii_hexdigit() {
            word.push(c);
            scanner.read();
        } else {
            break;
        }
    }
    integer_from_hex(&word)
}

fn tokenise_oct(scanner: &mut NumberScanner) -> Result<Value> {
    if matches!(scanner.peek(), Some(c) if c.eq_ignore_ascii_case(&'O')) {
        scanner.read();
    }
    let mut word = String::new();
    while let Some(c) = scanner.peek() {
        if c.is_digit(8) || BLANKS.contains(&c) {
            word.push(c);
            scanner.read();
        } else {
            break;
        }
    }
    integer_from_octal(&word)
}
