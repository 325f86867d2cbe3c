//! FCPXML time attribute parsing
//!
//! FCPXML writes times as rational seconds: `"1001/30000s"`, `"3600s"`, `"0s"`.

use crate::errors::{FcpxError, Result};
use crate::models::{FrameRate, RationalTime};

/// Split `"N/Ds"` or `"Ns"` into a raw (numerator, denominator) pair
fn split_rational(value: &str) -> Result<(i64, i64)> {
    let trimmed = value.trim();
    let body = trimmed.strip_suffix('s').unwrap_or(trimmed);

    let parse = |part: &str| {
        part.trim().parse::<i64>().map_err(|_| {
            FcpxError::invalid_time(value, "expected an integer or N/D rational in seconds")
        })
    };

    let (num, den) = match body.split_once('/') {
        Some((num, den)) => (parse(num)?, parse(den)?),
        None => (parse(body)?, 1),
    };

    if den == 0 {
        return Err(FcpxError::invalid_time(value, "denominator must be non-zero"));
    }
    Ok((num, den))
}

/// Parse a time attribute. Absent, empty, `"0"` and `"0s"` are all zero.
pub fn parse_time(value: Option<&str>) -> Result<RationalTime> {
    match value.map(str::trim) {
        None | Some("") | Some("0") | Some("0s") => Ok(RationalTime::ZERO),
        Some(text) => {
            let (num, den) = split_rational(text)?;
            Ok(RationalTime::new(num, den))
        }
    }
}

/// Parse a `frameDuration` (seconds per frame) into frames per second
pub fn parse_frame_duration(value: &str) -> Result<FrameRate> {
    let pair = split_rational(value)?;
    FrameRate::from_frame_duration(pair)
        .ok_or_else(|| FcpxError::invalid_time(value, "frame duration must be positive"))
}

/// `tcFormat`: "DF" is drop-frame, anything else (or nothing) is non-drop-frame
pub fn parse_non_drop_frame(value: Option<&str>) -> Option<bool> {
    value.map(|format| format.trim() != "DF")
}

/// `completed`: "1" is true, anything else false
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_forms() {
        for value in [None, Some("0s"), Some("0"), Some("")] {
            assert_eq!(parse_time(value).unwrap(), RationalTime::ZERO);
        }
    }

    #[test]
    fn test_rational_and_whole_seconds() {
        assert_eq!(parse_time(Some("1001/30000s")).unwrap(), RationalTime::new(1001, 30000));
        assert_eq!(parse_time(Some("3600s")).unwrap(), RationalTime::new(3600, 1));
        assert_eq!(parse_time(Some("86400/2400s")).unwrap(), RationalTime::new(36, 1));
    }

    #[test]
    fn test_unrecognized_shapes_fail() {
        for value in ["abc", "1.5s", "1/0s", "1/2/3s"] {
            assert!(
                matches!(parse_time(Some(value)), Err(FcpxError::InvalidTimeValue { .. })),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_frame_duration_is_reciprocal() {
        let rate = parse_frame_duration("1001/30000s").unwrap();
        assert_eq!((rate.numerator(), rate.denominator()), (30000, 1001));

        let rate = parse_frame_duration("100/2500s").unwrap();
        assert_eq!((rate.numerator(), rate.denominator()), (2500, 100));

        assert!(parse_frame_duration("0s").is_err());
    }

    #[test]
    fn test_tc_format() {
        assert_eq!(parse_non_drop_frame(Some("DF")), Some(false));
        assert_eq!(parse_non_drop_frame(Some("NDF")), Some(true));
        assert_eq!(parse_non_drop_frame(None), None);
    }
}
