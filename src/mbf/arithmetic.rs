//! Arithmetic on the [`Decoded`] sign-mantissa-exponent view shared by
//! Single and Double. Every operation here is pure: it takes decoded
//! operands and returns a decoded result plus a [`SoftCondition`] describing
//! whether the result had to be clamped. The `Single`/`Double` wrapper
//! methods in `mbf::mod` re-encode the result to bytes; the facade in
//! `value.rs` decides how a non-`Normal` condition is surfaced.

use std::cmp::Ordering;

use super::{
    clamp_to_range, decoded_to_f64, f64_to_decoded, normalize, shift_round, shr_checked,
    signed_max, Decoded, SoftCondition,
};

fn magnitude_order(a: Decoded, b: Decoded) -> Ordering {
    // Both operands are normalised (or zero), so the binary-point position
    // `exp2 + mantissa_bits` orders magnitudes before the mantissa does.
    match (a.is_zero(), b.is_zero()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let a_bits = 128 - a.mantissa.leading_zeros() as i32;
    let b_bits = 128 - b.mantissa.leading_zeros() as i32;
    match (a.exp2 + a_bits).cmp(&(b.exp2 + b_bits)) {
        Ordering::Equal => {}
        other => return other,
    }
    // Same order of magnitude but possibly different bit widths (shouldn't
    // happen for values produced by `normalize`, but align defensively).
    if a.exp2 == b.exp2 {
        a.mantissa.cmp(&b.mantissa)
    } else if a.exp2 > b.exp2 {
        (a.mantissa << (a.exp2 - b.exp2).min(96)).cmp(&b.mantissa)
    } else {
        a.mantissa.cmp(&(b.mantissa << (b.exp2 - a.exp2).min(96)))
    }
}

pub(crate) fn iadd(a: Decoded, b: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if a.is_zero() {
        return clamp_to_range(b, mantissa_bits);
    }
    if b.is_zero() {
        return clamp_to_range(a, mantissa_bits);
    }
    let (hi, lo) = if a.exp2 >= b.exp2 { (a, b) } else { (b, a) };
    let shift = ((hi.exp2 - lo.exp2) as u32).min(126);
    let hi_mag = hi.mantissa << shift;
    let hi_signed: i128 = if hi.sign { -hi_mag } else { hi_mag };
    let lo_signed: i128 = if lo.sign { -lo.mantissa } else { lo.mantissa };
    let sum = hi_signed + lo_signed;
    if sum == 0 {
        return (Decoded::ZERO, SoftCondition::Normal);
    }
    let sign = sum < 0;
    let magnitude = sum.unsigned_abs() as i128;
    let (mantissa, exp2) = normalize(magnitude, lo.exp2, mantissa_bits);
    clamp_to_range(
        Decoded {
            sign,
            mantissa,
            exp2,
        },
        mantissa_bits,
    )
}

pub(crate) fn ineg(a: Decoded) -> Decoded {
    if a.is_zero() {
        a
    } else {
        Decoded {
            sign: !a.sign,
            ..a
        }
    }
}

pub(crate) fn iabs(a: Decoded) -> Decoded {
    Decoded {
        sign: false,
        ..a
    }
}

pub(crate) fn isub(a: Decoded, b: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    iadd(a, ineg(b), mantissa_bits)
}

pub(crate) fn imul(a: Decoded, b: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if a.is_zero() || b.is_zero() {
        return (Decoded::ZERO, SoftCondition::Normal);
    }
    let sign = a.sign != b.sign;
    let product = a.mantissa * b.mantissa;
    let exp2 = a.exp2 + b.exp2;
    let (mantissa, exp2) = normalize(product, exp2, mantissa_bits);
    clamp_to_range(
        Decoded {
            sign,
            mantissa,
            exp2,
        },
        mantissa_bits,
    )
}

pub(crate) fn idiv(a: Decoded, b: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if b.is_zero() {
        return (signed_max(a.sign, mantissa_bits), SoftCondition::DivisionByZero);
    }
    if a.is_zero() {
        return (Decoded::ZERO, SoftCondition::Normal);
    }
    let sign = a.sign != b.sign;
    // Widen the numerator by `mantissa_bits` guard bits so the integer
    // division below carries far more precision than the final rounding
    // step needs.
    let numerator = a.mantissa << mantissa_bits;
    let denominator = b.mantissa;
    let mut quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder * 2;
    let round_up = match twice.cmp(&denominator) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => quotient & 1 == 1,
    };
    if round_up {
        quotient += 1;
    }
    let exp2 = a.exp2 - b.exp2 - mantissa_bits as i32;
    let (mantissa, exp2) = normalize(quotient, exp2, mantissa_bits);
    clamp_to_range(
        Decoded {
            sign,
            mantissa,
            exp2,
        },
        mantissa_bits,
    )
}

pub(crate) fn ifloor(a: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if a.is_zero() || a.exp2 >= 0 {
        return clamp_to_range(a, mantissa_bits);
    }
    let k = -a.exp2;
    let truncated = shr_checked(a.mantissa, k);
    let mask = if k >= 127 { -1i128 } else { (1i128 << k) - 1 };
    let has_remainder = (a.mantissa & mask) != 0;
    let magnitude = if a.sign && has_remainder {
        truncated + 1
    } else {
        truncated
    };
    if magnitude == 0 {
        return (Decoded::ZERO, SoftCondition::Normal);
    }
    let (mantissa, exp2) = normalize(magnitude, 0, mantissa_bits);
    clamp_to_range(
        Decoded {
            sign: a.sign,
            mantissa,
            exp2,
        },
        mantissa_bits,
    )
}

pub(crate) fn itrunc(a: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if a.is_zero() || a.exp2 >= 0 {
        return clamp_to_range(a, mantissa_bits);
    }
    let k = -a.exp2;
    let magnitude = shr_checked(a.mantissa, k);
    if magnitude == 0 {
        return (Decoded::ZERO, SoftCondition::Normal);
    }
    let (mantissa, exp2) = normalize(magnitude, 0, mantissa_bits);
    clamp_to_range(
        Decoded {
            sign: a.sign,
            mantissa,
            exp2,
        },
        mantissa_bits,
    )
}

pub(crate) fn iround(a: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if a.is_zero() || a.exp2 >= 0 {
        return clamp_to_range(a, mantissa_bits);
    }
    let k = (-a.exp2) as u32;
    let magnitude = shift_round(a.mantissa, k);
    if magnitude == 0 {
        return (Decoded::ZERO, SoftCondition::Normal);
    }
    let (mantissa, exp2) = normalize(magnitude, 0, mantissa_bits);
    clamp_to_range(
        Decoded {
            sign: a.sign,
            mantissa,
            exp2,
        },
        mantissa_bits,
    )
}

/// The exact value 1.0 at the given precision.
pub(crate) fn one(mantissa_bits: u32) -> Decoded {
    Decoded {
        sign: false,
        mantissa: 1i128 << (mantissa_bits - 1),
        exp2: -(mantissa_bits as i32 - 1),
    }
}

/// Square-and-multiply integer power, matching `ipow_int`: the exponent is
/// a (signed) BASIC Integer, evaluated in the base's own precision.
pub(crate) fn ipow_int(base: Decoded, exponent: i32, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    if exponent == 0 {
        return (one(mantissa_bits), SoftCondition::Normal);
    }
    let negative_exponent = exponent < 0;
    let mut n = exponent.unsigned_abs();
    let mut result = one(mantissa_bits);
    let mut acc = base;
    let mut condition = SoftCondition::Normal;
    while n > 0 {
        if n & 1 == 1 {
            let (r, c) = imul(result, acc, mantissa_bits);
            result = r;
            if c.is_exceptional() {
                condition = c;
            }
        }
        n >>= 1;
        if n > 0 {
            let (a, c) = imul(acc, acc, mantissa_bits);
            acc = a;
            if c.is_exceptional() {
                condition = c;
            }
        }
    }
    if negative_exponent {
        let (r, c) = idiv(one(mantissa_bits), result, mantissa_bits);
        if c.is_exceptional() {
            condition = c;
        }
        (r, condition)
    } else {
        (result, condition)
    }
}

pub(crate) fn eq(a: Decoded, b: Decoded) -> bool {
    if a.is_zero() && b.is_zero() {
        return true;
    }
    a.sign == b.sign && a.mantissa == b.mantissa && a.exp2 == b.exp2
}

/// `a > b`, both already promoted to the same precision.
pub(crate) fn gt(a: Decoded, b: Decoded) -> bool {
    match (a.sign, b.sign, a.is_zero(), b.is_zero()) {
        (_, _, true, true) => false,
        (false, true, _, _) => true,
        (true, false, _, _) => false,
        (false, false, _, _) => magnitude_order(a, b) == Ordering::Greater,
        (true, true, _, _) => magnitude_order(a, b) == Ordering::Less,
    }
}

/// Round-trip a unary host-math function (`sqrt`, `exp`, `sin`, ...) through
/// `f64`: convert to IEEE double, apply, convert back. A non-finite result
/// (e.g. `sqrt` of a negative, `log` of zero) is translated to the signed
/// maximum of the attempted sign, per the reference source's
/// `_call_float_function` exception handling.
pub(crate) fn call_unary(a: Decoded, mantissa_bits: u32, f: impl Fn(f64) -> f64) -> (Decoded, SoftCondition) {
    let input = decoded_to_f64(a, mantissa_bits);
    let output = f(input);
    if !output.is_finite() {
        let sign = output.is_sign_negative();
        return (signed_max(sign, mantissa_bits), SoftCondition::Overflow);
    }
    let d = f64_to_decoded(output, mantissa_bits);
    clamp_to_range(d, mantissa_bits)
}

/// General `^` for non-integer or Double exponents: `a.powf(b)` via host
/// IEEE math, rounded back to `mantissa_bits`.
pub(crate) fn pow(a: Decoded, b: Decoded, mantissa_bits: u32) -> (Decoded, SoftCondition) {
    let base = decoded_to_f64(a, mantissa_bits);
    let exponent = decoded_to_f64(b, mantissa_bits);
    let output = base.powf(exponent);
    if !output.is_finite() {
        let sign = output.is_sign_negative();
        return (signed_max(sign, mantissa_bits), SoftCondition::Overflow);
    }
    let d = f64_to_decoded(output, mantissa_bits);
    clamp_to_range(d, mantissa_bits)
}
