//! The `Value` tagged union and the `Values` facade that dispatches every
//! scalar operation (conversion, arithmetic, comparison, string handling)
//! across the four BASIC types.

#[cfg(test)]
mod test;

use crate::error::{Result, ValueError};
use crate::intop;
use crate::mbf::{Double, Single};
use crate::sigil::Sigil;
use crate::soft_error::SoftErrorHandler;
use crate::string_space::{StringDescriptor, StringSpace};

/// A BASIC scalar: `%` stores a plain 16-bit int, `!`/`#` an MBF float, `$`
/// a 3-byte descriptor into a [`StringSpace`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Integer(i16),
    Single(Single),
    Double(Double),
    String(StringDescriptor),
}

impl Value {
    pub fn sigil(&self) -> Sigil {
        match self {
            Value::Integer(_) => Sigil::Integer,
            Value::Single(_) => Sigil::Single,
            Value::Double(_) => Sigil::Double,
            Value::String(_) => Sigil::String,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_numeric(&self) -> bool {
        !self.is_string()
    }
}

pub fn pass_string(v: Value) -> Result<Value> {
    if v.is_string() {
        Ok(v)
    } else {
        Err(ValueError::TypeMismatch)
    }
}

pub fn pass_number(v: Value) -> Result<Value> {
    if v.is_numeric() {
        Ok(v)
    } else {
        Err(ValueError::TypeMismatch)
    }
}

fn as_integer(v: Value) -> Result<i16> {
    match v {
        Value::Integer(n) => Ok(n),
        _ => Err(ValueError::Internal("expected an Integer value".into())),
    }
}

fn as_single(v: Value) -> Result<Single> {
    match v {
        Value::Single(s) => Ok(s),
        _ => Err(ValueError::Internal("expected a Single value".into())),
    }
}

fn as_double(v: Value) -> Result<Double> {
    match v {
        Value::Double(d) => Ok(d),
        _ => Err(ValueError::Internal("expected a Double value".into())),
    }
}

fn as_string_descriptor(v: Value) -> Result<StringDescriptor> {
    match v {
        Value::String(d) => Ok(d),
        _ => Err(ValueError::TypeMismatch),
    }
}

fn value_eq(left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Single(a), Value::Single(b)) => a.eq(&b),
        (Value::Double(a), Value::Double(b)) => a.eq(&b),
        _ => false,
    }
}

fn value_gt(left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a > b,
        (Value::Single(a), Value::Single(b)) => a.gt(&b),
        (Value::Double(a), Value::Double(b)) => a.gt(&b),
        _ => false,
    }
}

fn range_check(lo: i64, hi: i64, v: i64) -> Result<()> {
    if v < lo || v > hi {
        Err(ValueError::IllegalFunctionCall)
    } else {
        Ok(())
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// The wire byte layout of a numeric value (Integer: 2-byte LE two's
/// complement; Single/Double: MBF). Strings are not representable here —
/// their bytes live in the string space, reached only through a
/// descriptor.
pub fn to_bytes(v: Value) -> Result<Vec<u8>> {
    match v {
        Value::Integer(n) => Ok(n.to_le_bytes().to_vec()),
        Value::Single(s) => Ok(s.to_bytes().to_vec()),
        Value::Double(d) => Ok(d.to_bytes().to_vec()),
        Value::String(_) => Err(ValueError::TypeMismatch),
    }
}

/// Inverse of [`to_bytes`], dispatching on length the way `MKI$`/`CVI` etc.
/// expect (2 -> Integer, 4 -> Single, 8 -> Double).
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    match bytes.len() {
        2 => Ok(Value::Integer(i16::from_le_bytes([bytes[0], bytes[1]]))),
        4 => Ok(Value::Single(Single::from_bytes(bytes)?)),
        8 => Ok(Value::Double(Double::from_bytes(bytes)?)),
        n => Err(ValueError::Internal(format!("no scalar type has a {n}-byte layout"))),
    }
}

/// The four-scalar-type dispatcher. Owns the collaborator string space and
/// the soft-error handler state; `double_math` mirrors the reference
/// source's constructor flag selecting whether transcendentals compute in
/// Double when given one.
pub struct Values<S: StringSpace> {
    strings: S,
    soft_errors: SoftErrorHandler,
    double_math: bool,
}

impl<S: StringSpace> Values<S> {
    pub fn new(strings: S, double_math: bool) -> Self {
        Values {
            strings,
            soft_errors: SoftErrorHandler::new(),
            double_math,
        }
    }

    pub fn pause_error_handling(&mut self, do_pause: bool) {
        self.soft_errors.pause(do_pause);
    }

    pub fn strings(&self) -> &S {
        &self.strings
    }

    pub fn strings_mut(&mut self) -> &mut S {
        &mut self.strings
    }

    ///////////////////////////////////////////////////////////////
    // conversions

    pub fn to_integer(&self, v: Value, unsigned: bool) -> Result<Value> {
        match pass_number(v)? {
            Value::Integer(n) => Ok(Value::Integer(n)),
            Value::Single(s) => {
                let (rounded, status) = s.iround();
                self.soft_errors.report("to_integer", status);
                Ok(Value::Integer(float_to_i16(rounded.to_value(), unsigned)?))
            }
            Value::Double(d) => {
                let (rounded, status) = d.iround();
                self.soft_errors.report("to_integer", status);
                Ok(Value::Integer(float_to_i16(rounded.to_value(), unsigned)?))
            }
            Value::String(_) => unreachable!("pass_number rejected strings"),
        }
    }

    /// `to_int` in the reference source: round and return a plain host
    /// integer already interpreted per `unsigned`.
    pub fn to_int(&self, v: Value, unsigned: bool) -> Result<i64> {
        let n = as_integer(self.to_integer(v, unsigned)?)?;
        Ok(if unsigned { intop::to_unsigned(n) as i64 } else { n as i64 })
    }

    pub fn to_single(&self, v: Value) -> Result<Value> {
        match pass_number(v)? {
            Value::Integer(n) => Ok(Value::Single(Single::from_value(n as f64).0)),
            Value::Single(s) => Ok(Value::Single(s)),
            Value::Double(d) => {
                let (s, status) = Single::from_value(d.to_value());
                self.soft_errors.report("to_single", status);
                Ok(Value::Single(s))
            }
            Value::String(_) => unreachable!("pass_number rejected strings"),
        }
    }

    pub fn to_double(&self, v: Value) -> Result<Value> {
        match pass_number(v)? {
            Value::Integer(n) => Ok(Value::Double(Double::from_value(n as f64).0)),
            Value::Single(s) => Ok(Value::Double(Double::from_value(s.to_value()).0)),
            Value::Double(d) => Ok(Value::Double(d)),
            Value::String(_) => unreachable!("pass_number rejected strings"),
        }
    }

    pub fn to_float(&self, v: Value, allow_double: bool) -> Result<Value> {
        if allow_double && v.sigil() == Sigil::Double {
            return Ok(v);
        }
        self.to_single(v)
    }

    pub fn to_most_precise(&self, left: Value, right: Value) -> Result<(Value, Value)> {
        let (lt, rt) = (left.sigil(), right.sigil());
        if lt == Sigil::Double || rt == Sigil::Double {
            Ok((self.to_double(left)?, self.to_double(right)?))
        } else if lt == Sigil::Single || rt == Sigil::Single {
            Ok((self.to_single(left)?, self.to_single(right)?))
        } else if lt == Sigil::Integer || rt == Sigil::Integer {
            Ok((pass_number(left)?, pass_number(right)?))
        } else {
            Err(ValueError::TypeMismatch)
        }
    }

    pub fn to_type(&self, sigil: Sigil, v: Value) -> Result<Value> {
        match sigil {
            Sigil::String => pass_string(v),
            Sigil::Integer => self.to_integer(v, false),
            Sigil::Single => self.to_single(v),
            Sigil::Double => self.to_double(v),
        }
    }

    pub fn from_bool(b: bool) -> Value {
        Value::Integer(if b { -1 } else { 0 })
    }

    pub fn is_zero(&self, v: Value) -> Result<bool> {
        Ok(match pass_number(v)? {
            Value::Integer(n) => n == 0,
            Value::Single(s) => s.is_zero(),
            Value::Double(d) => d.is_zero(),
            Value::String(_) => unreachable!("pass_number rejected strings"),
        })
    }

    pub fn to_bool(&self, v: Value) -> Result<bool> {
        Ok(!self.is_zero(v)?)
    }

    pub fn round(&self, v: Value) -> Result<Value> {
        match self.to_float(v, true)? {
            Value::Single(s) => {
                let (r, status) = s.iround();
                self.soft_errors.report("round", status);
                Ok(Value::Single(r))
            }
            Value::Double(d) => {
                let (r, status) = d.iround();
                self.soft_errors.report("round", status);
                Ok(Value::Double(r))
            }
            _ => Err(ValueError::TypeMismatch),
        }
    }

    pub fn sgn(&self, v: Value) -> Result<Value> {
        let n = match pass_number(v)? {
            Value::Integer(n) => n.signum(),
            Value::Single(s) => s.sign() as i16,
            Value::Double(d) => d.sign() as i16,
            Value::String(_) => unreachable!("pass_number rejected strings"),
        };
        Ok(Value::Integer(n))
    }

    /// `INT`: truncate toward negative infinity.
    pub fn floor(&self, v: Value) -> Result<Value> {
        match pass_number(v)? {
            Value::Integer(n) => Ok(Value::Integer(n)),
            Value::Single(s) => {
                let (r, status) = s.ifloor();
                self.soft_errors.report("floor", status);
                Ok(Value::Single(r))
            }
            Value::Double(d) => {
                let (r, status) = d.ifloor();
                self.soft_errors.report("floor", status);
                Ok(Value::Double(r))
            }
            Value::String(_) => unreachable!("pass_number rejected strings"),
        }
    }

    /// `FIX`: truncate toward zero.
    pub fn fix(&self, v: Value) -> Result<Value> {
        match pass_number(v)? {
            Value::Integer(n) => Ok(Value::Integer(n)),
            Value::Single(s) => {
                let (r, status) = s.itrunc();
                self.soft_errors.report("fix", status);
                Ok(Value::Single(r))
            }
            Value::Double(d) => {
                let (r, status) = d.itrunc();
                self.soft_errors.report("fix", status);
                Ok(Value::Double(r))
            }
            Value::String(_) => unreachable!("pass_number rejected strings"),
        }
    }

    ///////////////////////////////////////////////////////////////
    // transcendentals: round-trip through host IEEE math

    fn call_unary(&self, v: Value, label: &str, f: impl Fn(f64) -> f64) -> Result<Value> {
        match self.to_float(v, self.double_math)? {
            Value::Single(s) => {
                let (r, status) = s.call_unary(f);
                self.soft_errors.report(label, status);
                Ok(Value::Single(r))
            }
            Value::Double(d) => {
                let (r, status) = d.call_unary(f);
                self.soft_errors.report(label, status);
                Ok(Value::Double(r))
            }
            _ => Err(ValueError::TypeMismatch),
        }
    }

    pub fn sqr(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "sqr", f64::sqrt)
    }

    pub fn exp(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "exp", f64::exp)
    }

    pub fn sin(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "sin", f64::sin)
    }

    pub fn cos(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "cos", f64::cos)
    }

    pub fn tan(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "tan", f64::tan)
    }

    pub fn atn(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "atn", f64::atan)
    }

    pub fn log(&self, v: Value) -> Result<Value> {
        self.call_unary(v, "log", f64::ln)
    }

    ///////////////////////////////////////////////////////////////
    // numeric operators

    pub fn add(&self, left: Value, right: Value) -> Result<Value> {
        let left = self.to_float(left, true)?;
        let (left, right) = self.to_most_precise(left, right)?;
        match (left, right) {
            (Value::Single(a), Value::Single(b)) => {
                let (r, status) = a.iadd(&b);
                self.soft_errors.report("add", status);
                Ok(Value::Single(r))
            }
            (Value::Double(a), Value::Double(b)) => {
                let (r, status) = a.iadd(&b);
                self.soft_errors.report("add", status);
                Ok(Value::Double(r))
            }
            _ => Err(ValueError::TypeMismatch),
        }
    }

    pub fn subtract(&self, left: Value, right: Value) -> Result<Value> {
        self.add(left, self.negate(right)?)
    }

    pub fn multiply(&self, left: Value, right: Value) -> Result<Value> {
        if left.sigil() == Sigil::Double || right.sigil() == Sigil::Double {
            let a = as_double(self.to_double(left)?)?;
            let b = as_double(self.to_double(right)?)?;
            let (r, status) = a.imul(&b);
            self.soft_errors.report("multiply", status);
            Ok(Value::Double(r))
        } else {
            let a = as_single(self.to_single(left)?)?;
            let b = as_single(self.to_single(right)?)?;
            let (r, status) = a.imul(&b);
            self.soft_errors.report("multiply", status);
            Ok(Value::Single(r))
        }
    }

    pub fn divide(&self, left: Value, right: Value) -> Result<Value> {
        if left.sigil() == Sigil::Double || right.sigil() == Sigil::Double {
            let a = as_double(self.to_double(left)?)?;
            let b = as_double(self.to_double(right)?)?;
            let (r, status) = a.idiv(&b);
            self.soft_errors.report("divide", status);
            Ok(Value::Double(r))
        } else {
            let a = as_single(self.to_single(left)?)?;
            let b = as_single(self.to_single(right)?)?;
            let (r, status) = a.idiv(&b);
            self.soft_errors.report("divide", status);
            Ok(Value::Single(r))
        }
    }

    pub fn divide_int(&self, left: Value, right: Value) -> Result<Value> {
        let a = as_integer(self.to_integer(left, false)?)?;
        let b = as_integer(self.to_integer(right, false)?)?;
        Ok(Value::Integer(intop::divide(a, b)?))
    }

    pub fn modulo(&self, left: Value, right: Value) -> Result<Value> {
        let a = as_integer(self.to_integer(left, false)?)?;
        let b = as_integer(self.to_integer(right, false)?)?;
        Ok(Value::Integer(intop::modulo(a, b)?))
    }

    pub fn power(&self, left: Value, right: Value) -> Result<Value> {
        if self.double_math && (left.sigil() == Sigil::Double || right.sigil() == Sigil::Double) {
            let a = as_double(self.to_double(left)?)?;
            let b = as_double(self.to_double(right)?)?;
            let (r, status) = a.pow(&b);
            self.soft_errors.report("power", status);
            return Ok(Value::Double(r));
        }
        if let Value::Integer(exponent) = right {
            let base = as_single(self.to_single(left)?)?;
            let (r, status) = base.ipow_int(exponent);
            self.soft_errors.report("power", status);
            return Ok(Value::Single(r));
        }
        let a = as_single(self.to_single(left)?)?;
        let b = as_single(self.to_single(right)?)?;
        let (r, status) = a.pow(&b);
        self.soft_errors.report("power", status);
        Ok(Value::Single(r))
    }

    pub fn abs(&self, v: Value) -> Result<Value> {
        if v.is_string() {
            return Ok(v);
        }
        match self.to_float(v, true)? {
            Value::Single(s) => Ok(Value::Single(s.iabs())),
            Value::Double(d) => Ok(Value::Double(d.iabs())),
            _ => Err(ValueError::TypeMismatch),
        }
    }

    pub fn negate(&self, v: Value) -> Result<Value> {
        if v.is_string() {
            return Ok(v);
        }
        match self.to_float(v, true)? {
            Value::Single(s) => Ok(Value::Single(s.ineg())),
            Value::Double(d) => Ok(Value::Double(d.ineg())),
            _ => Err(ValueError::TypeMismatch),
        }
    }

    ///////////////////////////////////////////////////////////////
    // bitwise operators

    pub fn bitwise_not(&self, v: Value) -> Result<Value> {
        let n = as_integer(self.to_integer(v, false)?)?;
        Ok(Value::Integer(intop::not(n)))
    }

    pub fn bitwise_and(&self, left: Value, right: Value) -> Result<Value> {
        self.bitwise(left, right, intop::and)
    }

    pub fn bitwise_or(&self, left: Value, right: Value) -> Result<Value> {
        self.bitwise(left, right, intop::or)
    }

    pub fn bitwise_xor(&self, left: Value, right: Value) -> Result<Value> {
        self.bitwise(left, right, intop::xor)
    }

    pub fn bitwise_eqv(&self, left: Value, right: Value) -> Result<Value> {
        self.bitwise(left, right, intop::eqv)
    }

    pub fn bitwise_imp(&self, left: Value, right: Value) -> Result<Value> {
        self.bitwise(left, right, intop::imp)
    }

    fn bitwise(&self, left: Value, right: Value, f: impl Fn(i16, i16) -> i16) -> Result<Value> {
        let a = as_integer(self.to_integer(left, false)?)?;
        let b = as_integer(self.to_integer(right, false)?)?;
        Ok(Value::Integer(f(a, b)))
    }

    ///////////////////////////////////////////////////////////////
    // comparisons

    fn bool_eq(&self, left: Value, right: Value) -> Result<bool> {
        if left.is_string() {
            let a = self.strings.copy(as_string_descriptor(pass_string(left)?)?);
            let b = self.strings.copy(as_string_descriptor(pass_string(right)?)?);
            Ok(a == b)
        } else {
            let (left, right) = self.to_most_precise(left, right)?;
            Ok(value_eq(left, right))
        }
    }

    fn bool_gt(&self, left: Value, right: Value) -> Result<bool> {
        if left.is_string() {
            let a = self.strings.copy(as_string_descriptor(pass_string(left)?)?);
            let b = self.strings.copy(as_string_descriptor(pass_string(right)?)?);
            let shortest = a.len().min(b.len());
            for i in 0..shortest {
                if a[i] > b[i] {
                    return Ok(true);
                } else if a[i] < b[i] {
                    return Ok(false);
                }
            }
            Ok(a.len() > b.len())
        } else {
            let (left, right) = self.to_most_precise(left, right)?;
            Ok(value_gt(left, right))
        }
    }

    pub fn equals(&self, left: Value, right: Value) -> Result<Value> {
        Ok(Self::from_bool(self.bool_eq(left, right)?))
    }

    pub fn not_equals(&self, left: Value, right: Value) -> Result<Value> {
        Ok(Self::from_bool(!self.bool_eq(left, right)?))
    }

    pub fn gt(&self, left: Value, right: Value) -> Result<Value> {
        Ok(Self::from_bool(self.bool_gt(left, right)?))
    }

    pub fn gte(&self, left: Value, right: Value) -> Result<Value> {
        Ok(Self::from_bool(!self.bool_gt(right, left)?))
    }

    pub fn lte(&self, left: Value, right: Value) -> Result<Value> {
        Ok(Self::from_bool(!self.bool_gt(left, right)?))
    }

    pub fn lt(&self, left: Value, right: Value) -> Result<Value> {
        Ok(Self::from_bool(self.bool_gt(right, left)?))
    }

    pub fn plus(&mut self, left: Value, right: Value) -> Result<Value> {
        if left.is_string() {
            self.concat(left, right)
        } else {
            self.add(left, right)
        }
    }

    ///////////////////////////////////////////////////////////////
    // string operations

    pub fn concat(&mut self, left: Value, right: Value) -> Result<Value> {
        let a = as_string_descriptor(pass_string(left)?)?;
        let b = as_string_descriptor(pass_string(right)?)?;
        let mut bytes = self.strings.copy(a);
        bytes.extend(self.strings.copy(b));
        Ok(Value::String(self.strings.store(&bytes)?))
    }

    pub fn from_str(&self, word: &str, allow_nonnum: bool) -> Result<Value> {
        crate::parse::from_str(word, allow_nonnum)
    }

    pub fn val(&mut self, v: Value) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(v)?)?;
        let bytes = self.strings.copy(desc);
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.from_str(&text, true)
    }

    pub fn representation(&mut self, v: Value) -> Result<Value> {
        let text = crate::format::number_to_str(&pass_number(v)?, true, false)?;
        Ok(Value::String(self.strings.store(text.as_bytes())?))
    }

    pub fn cvi(&self, v: Value) -> Result<Value> {
        self.cv(v, 2)
    }

    pub fn cvs(&self, v: Value) -> Result<Value> {
        self.cv(v, 4)
    }

    pub fn cvd(&self, v: Value) -> Result<Value> {
        self.cv(v, 8)
    }

    fn cv(&self, v: Value, min_len: usize) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(v)?)?;
        let bytes = self.strings.copy(desc);
        if bytes.len() < min_len {
            return Err(ValueError::IllegalFunctionCall);
        }
        from_bytes(&bytes[..min_len])
    }

    pub fn mki(&mut self, v: Value) -> Result<Value> {
        let i = self.to_integer(v, false)?;
        Ok(Value::String(self.strings.store(&to_bytes(i)?)?))
    }

    pub fn mks(&mut self, v: Value) -> Result<Value> {
        let s = self.to_single(v)?;
        Ok(Value::String(self.strings.store(&to_bytes(s)?)?))
    }

    pub fn mkd(&mut self, v: Value) -> Result<Value> {
        let d = self.to_double(v)?;
        Ok(Value::String(self.strings.store(&to_bytes(d)?)?))
    }

    pub fn character(&mut self, v: Value) -> Result<Value> {
        let n = self.to_int(v, false)?;
        range_check(0, 255, n)?;
        Ok(Value::String(self.strings.store(&[n as u8])?))
    }

    pub fn space(&mut self, v: Value) -> Result<Value> {
        let n = self.to_int(v, false)?;
        range_check(0, 255, n)?;
        Ok(Value::String(self.strings.store(&vec![b' '; n as usize])?))
    }

    pub fn octal(&mut self, v: Value) -> Result<Value> {
        let n = as_integer(self.to_integer(v, true)?)?;
        let text = format!("{:o}", intop::to_unsigned(n));
        Ok(Value::String(self.strings.store(text.as_bytes())?))
    }

    pub fn hexadecimal(&mut self, v: Value) -> Result<Value> {
        let n = as_integer(self.to_integer(v, true)?)?;
        let text = format!("{:X}", intop::to_unsigned(n));
        Ok(Value::String(self.strings.store(text.as_bytes())?))
    }

    pub fn length(&self, v: Value) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(v)?)?;
        Ok(Value::Integer(desc.length as i16))
    }

    pub fn asc(&self, v: Value) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(v)?)?;
        let bytes = self.strings.copy(desc);
        let first = bytes.first().copied().ok_or(ValueError::IllegalFunctionCall)?;
        Ok(Value::Integer(first as i16))
    }

    /// `INSTR(start, big, small)`: 1-based substring search. `start` is not
    /// range-checked below 1, matching the reference source.
    pub fn instr(&self, start: i64, big: Value, small: Value) -> Result<Value> {
        let big_desc = as_string_descriptor(pass_string(big)?)?;
        let small_desc = as_string_descriptor(pass_string(small)?)?;
        let haystack_full = self.strings.copy(big_desc);
        let needle = self.strings.copy(small_desc);
        if haystack_full.is_empty() || start > haystack_full.len() as i64 {
            return Ok(Value::Integer(0));
        }
        let offset = (start - 1).max(0) as usize;
        let haystack = &haystack_full[offset.min(haystack_full.len())..];
        match find_subslice(haystack, &needle) {
            Some(pos) => Ok(Value::Integer((start + pos as i64) as i16)),
            None => Ok(Value::Integer(0)),
        }
    }

    pub fn mid(&mut self, s: Value, start: Value, num: Option<Value>) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(s)?)?;
        let bytes = self.strings.copy(desc);
        let start = self.to_int(start, false)?;
        let num = match num {
            Some(v) => self.to_int(v, false)?,
            None => bytes.len() as i64,
        };
        range_check(1, 255, start)?;
        range_check(0, 255, num)?;
        if num == 0 || start > bytes.len() as i64 {
            return Ok(Value::String(self.strings.store(b"")?));
        }
        let begin = (start - 1) as usize;
        let end = ((begin as i64) + num).min(bytes.len() as i64) as usize;
        Ok(Value::String(self.strings.store(&bytes[begin..end])?))
    }

    pub fn left(&mut self, s: Value, stop: Value) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(s)?)?;
        let bytes = self.strings.copy(desc);
        let stop = self.to_int(stop, false)?;
        range_check(0, 255, stop)?;
        if stop == 0 {
            return Ok(Value::String(self.strings.store(b"")?));
        }
        let stop = (stop as usize).min(bytes.len());
        Ok(Value::String(self.strings.store(&bytes[..stop])?))
    }

    pub fn right(&mut self, s: Value, stop: Value) -> Result<Value> {
        let desc = as_string_descriptor(pass_string(s)?)?;
        let bytes = self.strings.copy(desc);
        let stop = self.to_int(stop, false)?;
        range_check(0, 255, stop)?;
        if stop == 0 {
            return Ok(Value::String(self.strings.store(b"")?));
        }
        let stop = (stop as usize).min(bytes.len());
        Ok(Value::String(self.strings.store(&bytes[bytes.len() - stop..])?))
    }
}

fn float_to_i16(value: f64, unsigned: bool) -> Result<i16> {
    let rounded = value.round();
    if unsigned {
        if !(0.0..=65535.0).contains(&rounded) {
            return Err(ValueError::Overflow);
        }
        Ok(intop::from_unsigned(rounded as u16))
    } else {
        if !(-32768.0..=32767.0).contains(&rounded) {
            return Err(ValueError::Overflow);
        }
        Ok(rounded as i16)
    }
}
