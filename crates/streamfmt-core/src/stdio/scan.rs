//! Token conversion and integer validation.
//!
//! Formatted reads extract one whitespace-delimited token and convert the
//! whole of it. A token that only partly converts (`12abc`) is a mismatch,
//! never a partial success.

use super::format::Base;

/// Outcome of an integer scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Success,
    /// No digits were found.
    NoDigits,
    /// Value exceeded `i64::MAX`; the result is clamped.
    Overflow,
    /// Value was below `i64::MIN`; the result is clamped.
    Underflow,
}

/// Length of a `0x`/`0X` prefix that is followed by a hex digit.
fn hex_prefix_len(s: &[u8]) -> usize {
    match s {
        [b'0', b'x' | b'X', d, ..] if d.is_ascii_hexdigit() => 2,
        _ => 0,
    }
}

/// Scan a `strtol`-style integer in `base` from the start of `s`.
///
/// Accepts leading whitespace, an optional sign, and in hex an optional
/// `0x` prefix. Returns `(value, consumed_bytes, status)`; `consumed_bytes`
/// is 0 when no digits were found.
#[must_use]
pub fn scan_integer(s: &[u8], base: Base) -> (i64, usize, ScanStatus) {
    let len = s.len();
    let mut i = 0;
    while i < len && s[i].is_ascii_whitespace() {
        i += 1;
    }

    let mut negative = false;
    if i < len && (s[i] == b'-' || s[i] == b'+') {
        negative = s[i] == b'-';
        i += 1;
    }
    if base == Base::Hex {
        i += hex_prefix_len(&s[i..]);
    }
    let radix = u64::from(base.radix());

    let limit = if negative {
        i64::MIN.unsigned_abs()
    } else {
        i64::MAX as u64
    };

    let mut acc: u64 = 0;
    let mut any_digits = false;
    let mut overflow = false;
    while i < len {
        let Some(digit) = (s[i] as char).to_digit(36).map(u64::from) else {
            break;
        };
        if digit >= radix {
            break;
        }
        any_digits = true;
        if !overflow {
            match acc.checked_mul(radix).and_then(|v| v.checked_add(digit)) {
                Some(v) if v <= limit => acc = v,
                _ => overflow = true,
            }
        }
        i += 1;
    }

    if !any_digits {
        return (0, 0, ScanStatus::NoDigits);
    }
    if overflow {
        return if negative {
            (i64::MIN, i, ScanStatus::Underflow)
        } else {
            (i64::MAX, i, ScanStatus::Overflow)
        };
    }
    let value = if negative {
        // acc <= |i64::MIN| here, so the wrapping negate is exact.
        (acc as i64).wrapping_neg()
    } else {
        acc as i64
    };
    (value, i, ScanStatus::Success)
}

/// Parse a whole token as an integer in `base`; `None` on any leftover
/// byte, missing digits, or overflow.
#[must_use]
pub fn parse_integer_token(token: &str, base: Base) -> Option<i64> {
    let bytes = token.as_bytes();
    if bytes.first().is_some_and(u8::is_ascii_whitespace) {
        return None;
    }
    match scan_integer(bytes, base) {
        (value, consumed, ScanStatus::Success) if consumed == bytes.len() => Some(value),
        _ => None,
    }
}

/// Types a formatted read can produce.
pub trait FromToken: Sized {
    /// Name used in mismatch errors.
    const EXPECTED: &'static str;

    fn from_token(token: &str) -> Option<Self>;

    /// Convert under a stream's integer base. Only integers look at it.
    fn from_token_in(token: &str, _base: Base) -> Option<Self> {
        Self::from_token(token)
    }
}

macro_rules! int_from_token {
    ($($t:ty),*) => {$(
        impl FromToken for $t {
            const EXPECTED: &'static str = stringify!($t);

            fn from_token(token: &str) -> Option<Self> {
                Self::from_token_in(token, Base::Dec)
            }

            fn from_token_in(token: &str, base: Base) -> Option<Self> {
                parse_integer_token(token, base).and_then(|v| <$t>::try_from(v).ok())
            }
        }
    )*};
}

int_from_token!(i16, i32, i64, u16, u32);

impl FromToken for u64 {
    const EXPECTED: &'static str = "u64";

    fn from_token(token: &str) -> Option<Self> {
        Self::from_token_in(token, Base::Dec)
    }

    fn from_token_in(token: &str, base: Base) -> Option<Self> {
        let digits = token.strip_prefix('+').unwrap_or(token);
        let digits = match base {
            Base::Hex => &digits[hex_prefix_len(digits.as_bytes())..],
            _ => digits,
        };
        if !digits.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return None;
        }
        u64::from_str_radix(digits, base.radix()).ok()
    }
}

/// Digits, a sign, or a point must start a floating-point token, so the
/// `inf`/`nan` spellings `str::parse` accepts are refused.
fn looks_numeric(token: &str) -> bool {
    token
        .strip_prefix(['+', '-'])
        .unwrap_or(token)
        .starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

macro_rules! float_from_token {
    ($($t:ty),*) => {$(
        impl FromToken for $t {
            const EXPECTED: &'static str = stringify!($t);

            /// Out-of-range values fail instead of becoming infinite.
            fn from_token(token: &str) -> Option<Self> {
                if !looks_numeric(token) {
                    return None;
                }
                token.parse::<$t>().ok().filter(|v| v.is_finite())
            }
        }
    )*};
}

float_from_token!(f32, f64);

impl FromToken for String {
    const EXPECTED: &'static str = "string";

    fn from_token(token: &str) -> Option<Self> {
        Some(token.to_string())
    }
}

/// Does `line` hold exactly one token that is a 32-bit signed integer?
#[must_use]
pub fn validate_integer(line: &str) -> bool {
    let mut tokens = line.split_ascii_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => i32::from_token(token).is_some(),
        _ => false,
    }
}
