//! Angle message parsing
//!
//! Numbers always use `.` as decimal separator and `-` as negative sign,
//! whatever the host locale says.

use crate::error::ParseError;

/// Parse a device line of the form `Angle=<signed decimal>`
///
/// Only the part after the first `=` is interpreted. Surrounding
/// whitespace (including the `\r` of a CRLF line ending) is ignored.
pub fn parse_angle(line: &str) -> Result<f32, ParseError> {
    let malformed = |reason| ParseError::MalformedMessage {
        line: line.to_string(),
        reason,
    };

    let (_, value) = line.split_once('=').ok_or_else(|| malformed("missing `=`"))?;
    let value = value.trim();

    if !is_plain_decimal(value) {
        return Err(malformed("not a plain decimal number"));
    }

    let angle: f32 = value.parse().map_err(|_| malformed("not a number"))?;
    if !angle.is_finite() {
        return Err(malformed("out of range"));
    }
    Ok(angle)
}

/// `-?digits[.digits]` with at least one digit overall
fn is_plain_decimal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (body, ""),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && all_digits(frac_part) && (int_part.len() + frac_part.len()) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_typical_reading() {
        assert_eq!(parse_angle("Angle=73.45").unwrap(), 73.45);
        assert_eq!(parse_angle("Angle=-12.5").unwrap(), -12.5);
        assert_eq!(parse_angle("Angle=0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_trims_line_endings() {
        assert_eq!(parse_angle("Angle=7.25\r").unwrap(), 7.25);
        assert_eq!(parse_angle("Angle= 3 ").unwrap(), 3.0);
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        // Anything after a second `=` makes the value malformed
        assert!(parse_angle("Angle=1=2").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_angle("garbage").unwrap_err();
        assert!(matches!(err, ParseError::MalformedMessage { .. }));

        let err = parse_angle("Angle=abc").unwrap_err();
        assert!(matches!(err, ParseError::MalformedMessage { .. }));
    }

    #[test]
    fn test_parse_is_locale_independent() {
        // Comma decimal separators are not accepted
        assert!(parse_angle("Angle=12,5").is_err());
        assert!(parse_angle("Angle=1,000.5").is_err());
    }

    #[test]
    fn test_parse_rejects_special_values() {
        assert!(parse_angle("Angle=").is_err());
        assert!(parse_angle("Angle=-").is_err());
        assert!(parse_angle("Angle=.").is_err());
        assert!(parse_angle("Angle=inf").is_err());
        assert!(parse_angle("Angle=NaN").is_err());
        assert!(parse_angle("Angle=1e3").is_err());
        assert!(parse_angle("Angle=+4").is_err());
    }

    #[test]
    fn test_parse_accepts_bare_fractions() {
        assert_eq!(parse_angle("Angle=.5").unwrap(), 0.5);
        assert_eq!(parse_angle("Angle=5.").unwrap(), 5.0);
    }

    proptest! {
        #[test]
        fn prop_round_trip(angle in proptest::num::f32::NORMAL | proptest::num::f32::ZERO) {
            let line = format!("Angle={}", angle);
            let parsed = parse_angle(&line).unwrap();
            prop_assert!((parsed - angle).abs() <= angle.abs() * 1e-6);
        }

        #[test]
        fn prop_never_panics(line in ".*") {
            let _ = parse_angle(&line);
        }
    }
}
