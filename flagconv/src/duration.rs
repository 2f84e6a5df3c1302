//! Elapsed-time literals such as `1h2m4s`, `-1.5s` or `300ms`.
//!
//! Two storage types carry this syntax: `std::time::Duration`, which is
//! non-negative, and `chrono::TimeDelta`, which is a signed elapsed time.
//! Both go through the same signed nanosecond scanner and formatter.

use crate::error::{Error, ErrorKind, Result};
use chrono::TimeDelta;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Formats a duration as hours, minutes and fractional seconds.
///
/// Durations under one second use the largest unit that keeps a non-zero
/// integer part (`ms`, `µs` or `ns`). Zero is `0s`.
///
/// ```
/// use std::time::Duration;
/// use flagconv::duration::format;
///
/// assert_eq!(format(Duration::from_secs(3724)), "1h2m4s");
/// assert_eq!(format(Duration::from_secs(60)), "1m0s");
/// assert_eq!(format(Duration::from_millis(1500)), "1.5s");
/// assert_eq!(format(Duration::from_nanos(1500)), "1.5µs");
/// assert_eq!(format(Duration::ZERO), "0s");
/// ```
pub fn format(d: Duration) -> String {
    format_magnitude(d.as_nanos())
}

/// Formats a signed nanosecond count; negative values get a leading `-`.
///
/// ```
/// use flagconv::duration::format_nanos;
///
/// assert_eq!(format_nanos(-3_724_000_000_000), "-1h2m4s");
/// assert_eq!(format_nanos(i64::MIN.into()), "-2562047h47m16.854775808s");
/// ```
pub fn format_nanos(nanos: i128) -> String {
    let magnitude = format_magnitude(nanos.unsigned_abs());
    if nanos < 0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Formats a signed `TimeDelta`.
pub fn format_delta(delta: TimeDelta) -> String {
    format_nanos(delta_nanos(delta))
}

pub(crate) fn delta_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * NANOS_PER_SEC as i128 + i128::from(delta.subsec_nanos())
}

fn format_magnitude(nanos: u128) -> String {
    if nanos < NANOS_PER_SEC {
        return match nanos {
            0 => "0s".to_string(),
            1..=999 => format!("{nanos}ns"),
            1_000..=999_999 => {
                let (frac, whole) = split_fraction(nanos, 3);
                format!("{whole}{frac}µs")
            }
            _ => {
                let (frac, whole) = split_fraction(nanos, 6);
                format!("{whole}{frac}ms")
            }
        };
    }

    let (frac, secs) = split_fraction(nanos, 9);
    let mut out = String::new();
    let minutes = secs / 60;
    if minutes > 0 {
        let hours = minutes / 60;
        if hours > 0 {
            out.push_str(&format!("{hours}h"));
        }
        out.push_str(&format!("{}m", minutes % 60));
    }
    out.push_str(&format!("{}{}s", secs % 60, frac));
    out
}

/// Splits `v` into `(".fraction", whole)` where the fraction has `prec`
/// digits with trailing zeros removed, or is empty when zero.
fn split_fraction(v: u128, prec: u32) -> (String, u128) {
    let scale = 10u128.pow(prec);
    let whole = v / scale;
    let frac = v % scale;
    if frac == 0 {
        return (String::new(), whole);
    }
    let digits = format!("{:0width$}", frac, width = prec as usize);
    (format!(".{}", digits.trim_end_matches('0')), whole)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a non-negative duration.
///
/// A `+` sign is allowed. A `-` sign is only allowed on a zero duration.
///
/// ```
/// use std::time::Duration;
/// use flagconv::duration::parse;
///
/// assert_eq!(parse("1h2m4s").unwrap(), Duration::from_secs(3724));
/// assert_eq!(parse("1.5ms").unwrap(), Duration::from_micros(1500));
/// assert_eq!(parse("0").unwrap(), Duration::ZERO);
/// assert!(parse("10").is_err());
/// assert!(parse("-1s").is_err());
/// ```
pub fn parse(text: &str) -> Result<Duration> {
    let nanos = parse_nanos(text)?;
    if nanos < 0 {
        return Err(Error::new(
            ErrorKind::InvalidDuration,
            format!("negative duration {text:?}"),
        ));
    }

    let nanos = nanos.unsigned_abs();
    let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| out_of_range(text))?;
    Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
}

/// Parses a signed duration that fits in 64 bits of nanoseconds.
///
/// ```
/// use chrono::TimeDelta;
/// use flagconv::duration::parse_delta;
///
/// assert_eq!(parse_delta("-1h2m4s").unwrap(), TimeDelta::seconds(-3724));
/// assert!(parse_delta("2562048h").is_err());
/// ```
pub fn parse_delta(text: &str) -> Result<TimeDelta> {
    let nanos = i64::try_from(parse_nanos(text)?).map_err(|_| out_of_range(text))?;
    Ok(TimeDelta::nanoseconds(nanos))
}

fn out_of_range(text: &str) -> Error {
    Error::new(
        ErrorKind::OutOfRange,
        format!("duration {text:?} out of range"),
    )
}

/// Parses a possibly signed sequence of decimal numbers, each with an
/// optional fraction and a unit suffix: `ns`, `us` (or `µs`), `ms`, `s`,
/// `m`, `h`.
///
/// ```
/// use flagconv::duration::parse_nanos;
///
/// assert_eq!(parse_nanos("-1.5s").unwrap(), -1_500_000_000);
/// assert_eq!(parse_nanos("+2m").unwrap(), 120_000_000_000);
/// ```
pub fn parse_nanos(text: &str) -> Result<i128> {
    let invalid = || {
        Error::new(
            ErrorKind::InvalidDuration,
            format!("invalid duration {text:?}"),
        )
    };

    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let int_digits = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_digits = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        if unit.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidDuration,
                format!("missing unit in duration {text:?}"),
            ));
        }
        let scale = unit_nanos(unit).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidDuration,
                format!("unknown unit {unit:?} in duration {text:?}"),
            )
        })?;

        let whole = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse::<u128>().map_err(|_| invalid())?
        };
        let mut component = whole.checked_mul(scale).ok_or_else(invalid)?;

        // Digits past nanosecond precision cannot change the result.
        let frac_digits = &frac_digits[..frac_digits.len().min(18)];
        if !frac_digits.is_empty() {
            let numerator = frac_digits.parse::<u128>().map_err(|_| invalid())?;
            let denominator = 10u128.pow(frac_digits.len() as u32);
            component += numerator * scale / denominator;
        }

        total = total.checked_add(component).ok_or_else(invalid)?;
    }

    let total = i128::try_from(total).map_err(|_| out_of_range(text))?;
    Ok(if negative { -total } else { total })
}
