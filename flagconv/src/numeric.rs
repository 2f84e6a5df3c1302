//! Literal formatting and parsing for the primitive kinds.

use crate::error::{Error, ErrorKind, Result};
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Formats `n` in `base` using lowercase digits.
///
/// ```
/// use flagconv::numeric::format_unsigned;
///
/// assert_eq!(format_unsigned(4232, 16), "1088");
/// assert_eq!(format_unsigned(5, 2), "101");
/// ```
pub fn format_unsigned(n: u64, base: u32) -> String {
    if base == 10 {
        return n.to_string();
    }

    let base = u64::from(base);
    let mut n = n;
    let mut buf = Vec::new();
    loop {
        buf.push(DIGITS[(n % base) as usize]);
        n /= base;
        if n == 0 {
            break;
        }
    }
    buf.reverse();
    buf.into_iter().map(char::from).collect()
}

/// Formats `n` in `base`: a `-` sign followed by the magnitude.
///
/// ```
/// use flagconv::numeric::format_signed;
///
/// assert_eq!(format_signed(-5823, 16), "-16bf");
/// assert_eq!(format_signed(i64::MIN, 16), "-8000000000000000");
/// ```
pub fn format_signed(n: i64, base: u32) -> String {
    let magnitude = format_unsigned(n.unsigned_abs(), base);
    if n < 0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

pub(crate) fn int_error(text: &str, err: &ParseIntError) -> Error {
    let kind = match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ErrorKind::OutOfRange,
        _ => ErrorKind::InvalidLiteral,
    };
    Error::new(kind, format!("parsing {text:?}: {err}"))
}

/// Parses a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(text: &str) -> Result<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::new(
            ErrorKind::InvalidLiteral,
            format!("invalid boolean literal {text:?}"),
        )),
    }
}

/// A floating point value that remembers its width, so that it formats with
/// the shortest text that parses back to the same value at that width.
///
/// Decimal exponents below -4 or from 21 up switch to exponent form with a
/// signed, at least two digit exponent. Infinities are `+Inf` and `-Inf`.
///
/// ```
/// use flagconv::numeric::Float;
///
/// assert_eq!(Float::F32(1.2).to_string(), "1.2");
/// assert_eq!(Float::F64(1e20).to_string(), "100000000000000000000");
/// assert_eq!(Float::F64(1e21).to_string(), "1e+21");
/// assert_eq!(Float::F64(-1.5e-7).to_string(), "-1.5e-07");
/// assert_eq!(Float::F64(0.0001).to_string(), "0.0001");
/// assert_eq!(Float::F64(f64::NEG_INFINITY).to_string(), "-Inf");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Float {
    F32(f32),
    F64(f64),
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Float::F32(v) if v.is_nan() => f.write_str("NaN"),
            Float::F64(v) if v.is_nan() => f.write_str("NaN"),
            Float::F32(v) if v.is_infinite() => write_infinity(f, v.is_sign_negative()),
            Float::F64(v) if v.is_infinite() => write_infinity(f, v.is_sign_negative()),
            Float::F32(v) => write_shortest(f, v),
            Float::F64(v) => write_shortest(f, v),
        }
    }
}

fn write_infinity(f: &mut fmt::Formatter<'_>, negative: bool) -> fmt::Result {
    f.write_str(if negative { "-Inf" } else { "+Inf" })
}

fn write_shortest<T>(f: &mut fmt::Formatter<'_>, v: T) -> fmt::Result
where
    T: fmt::Display + fmt::LowerExp,
{
    let scientific = format!("{v:e}");
    let parts = scientific
        .split_once('e')
        .and_then(|(mantissa, exp)| Some((mantissa, exp.parse::<i32>().ok()?)));

    match parts {
        Some((mantissa, exp)) if !(-4..21).contains(&exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => write!(f, "{v}"),
    }
}

pub(crate) fn float_error(text: &str) -> Error {
    Error::new(
        ErrorKind::InvalidLiteral,
        format!("parsing {text:?}: invalid float literal"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bases() {
        assert_eq!(format_unsigned(0, 16), "0");
        assert_eq!(format_unsigned(35, 36), "z");
        assert_eq!(format_unsigned(u64::MAX, 16), "ffffffffffffffff");
        assert_eq!(format_signed(-8, 8), "-10");
        assert_eq!(format_signed(0, 2), "0");
    }

    #[test]
    fn test_format_matches_radix_parse() {
        for base in 2..=36 {
            for n in [-1_000_003_i64, -1, 0, 7, 99_999] {
                let text = format_signed(n, base);
                assert_eq!(i64::from_str_radix(&text, base).unwrap(), n);
            }
        }
    }

    #[test]
    fn test_parse_bool_literals() {
        for text in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(text).unwrap());
        }
        for text in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(text).unwrap());
        }
        let err = parse_bool("yes").unwrap_err();
        assert_eq!(err.message(), "invalid boolean literal \"yes\"");
    }

    #[test]
    fn test_int_error_kinds() {
        let overflow = "300".parse::<u8>().unwrap_err();
        assert_eq!(int_error("300", &overflow).kind(), &ErrorKind::OutOfRange);

        let garbage = "x".parse::<u8>().unwrap_err();
        let err = int_error("x", &garbage);
        assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);
        assert_eq!(err.message(), "parsing \"x\": invalid digit found in string");
    }

    #[test]
    fn test_float_shortest_form() {
        assert_eq!(Float::F32(5.2).to_string(), "5.2");
        assert_eq!(Float::F64(-3.4).to_string(), "-3.4");
        assert_eq!(Float::F64(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn test_float_exponent_form() {
        assert_eq!(Float::F64(1e21).to_string(), "1e+21");
        assert_eq!(Float::F64(1e-7).to_string(), "1e-07");
        assert_eq!(Float::F64(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Float::F32(-2.5e-5).to_string(), "-2.5e-05");
        assert_eq!(Float::F64(123456789.0).to_string(), "123456789");
        assert_eq!(Float::F64(-0.0).to_string(), "-0");
    }

    #[test]
    fn test_float_special_values_parse_back() {
        for x in [f64::INFINITY, f64::NEG_INFINITY, 1e21, 1e-7, f64::MIN_POSITIVE] {
            let text = Float::F64(x).to_string();
            assert_eq!(text.parse::<f64>().unwrap(), x, "{text}");
        }
        assert_eq!(Float::F64(f64::NAN).to_string(), "NaN");
        assert!("NaN".parse::<f64>().unwrap().is_nan());
    }
}
