//! Host number parsing and integer wrapping.
//!
//! Host values entering an integer slot are parsed the way the host's own
//! `parseInt` does, then wrapped to the slot's width with two's-complement
//! semantics: `300` into an `int8` is `44`, `3.9` into any integer is `3`.
//! Anything that parses to `NaN` becomes zero.

use crate::descriptor::Kind;
use crate::host::HostValue;

/// Host `ToInt32`: truncate, reduce modulo 2^32, reinterpret as signed.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    reason = "the value is reduced into u32 range first"
)]
pub fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc().rem_euclid(4_294_967_296.0);
    m as u32 as i32
}

/// Wrap `n` to the width of integer kind `kind`. `None` for other kinds.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "wrapping to the slot width is the point"
)]
pub fn wrap_int(kind: &Kind, n: f64) -> Option<i64> {
    let n = to_int32(n);
    Some(match kind {
        Kind::Int8 => i64::from(n as i8),
        Kind::Int16 => i64::from(n as i16),
        Kind::Int | Kind::Int32 => i64::from(n),
        Kind::Uint8 => i64::from(n as u8),
        Kind::Uint16 => i64::from(n as u16),
        Kind::Uint | Kind::Uint32 | Kind::Uintptr => i64::from(n as u32),
        _ => return None,
    })
}

/// Host `parseInt(v)`. Numbers are truncated toward zero; everything else
/// is parsed from its string form.
pub fn parse_int(host: &HostValue) -> f64 {
    match host {
        HostValue::Number(n) => n.trunc(),
        other => parse_int_str(&other.to_display_string()),
    }
}

/// Host `parseFloat(v)`.
pub fn parse_float(host: &HostValue) -> f64 {
    match host {
        HostValue::Number(n) => *n,
        other => parse_float_str(&other.to_display_string()),
    }
}

/// Host `Number(v)`.
pub fn to_number(host: &HostValue) -> f64 {
    match host {
        HostValue::Undefined => f64::NAN,
        HostValue::Null => 0.0,
        HostValue::Bool(b) => f64::from(u8::from(*b)),
        HostValue::Number(n) | HostValue::Date(n) => *n,
        HostValue::Str(s) => string_to_number(&String::from_utf16_lossy(s)),
        HostValue::Array(arr) if arr.is_empty() => 0.0,
        HostValue::Array(arr) if arr.len() == 1 => to_number(&arr.get(0)),
        _ => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return parse_radix(hex, 16).unwrap_or(f64::NAN);
    }
    match s {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if s.bytes().all(|b| b.is_ascii_digit() || b"+-.eE".contains(&b)) => {
            s.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Accumulate all of `digits` in `radix`; `None` if any is invalid or
/// there are none.
fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        acc = acc * f64::from(radix) + f64::from(c.to_digit(radix)?);
    }
    Some(acc)
}

fn parse_int_str(s: &str) -> f64 {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let end = s
        .char_indices()
        .find(|&(_, c)| !c.is_digit(radix))
        .map_or(s.len(), |(i, _)| i);
    match parse_radix(&s[..end], radix) {
        Some(n) if negative => -n,
        Some(n) => n,
        None => f64::NAN,
    }
}

fn parse_float_str(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

/// Host number into a 64-bit signed slot: truncated, saturating, `NaN`
/// to zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate"
)]
pub fn to_int64(n: f64) -> i64 {
    if n.is_nan() {
        return 0;
    }
    n.trunc() as i64
}

/// Host number into a 64-bit unsigned slot. Negative values wrap.
#[expect(clippy::cast_sign_loss, reason = "negative values wrap")]
pub fn to_uint64(n: f64) -> u64 {
    to_int64(n) as u64
}

#[cfg(test)]
mod tests;
