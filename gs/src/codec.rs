//! Line codec for GPS points
//!
//! A point is stored as a single colon-delimited record:
//!
//! ```text
//! GPS:<name>:<x>:<y>:<z>:
//! ```
//!
//! Coordinates are written with the shortest representation that parses back
//! to the same `f64`, so `decode(&encode(p)) == p` holds bit-for-bit.

use crate::error::{ParseError, ParseReason};
use crate::point::Point;

/// Literal tag that leads every record
pub const TAG: &str = "GPS:";

/// Field separator
pub const DELIMITER: char = ':';

/// Encode a point as `GPS:<name>:<x>:<y>:<z>:`
pub fn encode(point: &Point) -> String {
    // `{:?}` keeps a decimal point on whole numbers (`1.0`) and round-trips exactly
    format!(
        "{TAG}{name}{d}{x:?}{d}{y:?}{d}{z:?}{d}",
        name = point.name(),
        x = point.x(),
        y = point.y(),
        z = point.z(),
        d = DELIMITER,
    )
}

/// Decode a single record, with or without the leading tag, trailing delimiter or newline
///
/// Only line terminators and delimiters are stripped from the ends, so a name
/// keeps its surrounding spaces whether or not the tag is present. Fields past
/// the fourth are ignored, so records carrying an extra colour field
/// (`GPS:Base:1:2:3:#FF75C9F1:`) still decode.
pub fn decode(text: &str) -> Result<Point, ParseError> {
    let body = text.trim_matches(|c| c == '\r' || c == '\n');
    let body = body.strip_prefix(TAG).unwrap_or(body);
    let body = body.trim_matches(DELIMITER);

    let fields: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split(DELIMITER).collect()
    };
    if fields.len() < 4 {
        return Err(ParseError::new(text, ParseReason::MissingFields { found: fields.len() }));
    }

    let x = parse_axis(text, 'x', fields[1])?;
    let y = parse_axis(text, 'y', fields[2])?;
    let z = parse_axis(text, 'z', fields[3])?;

    Point::new(fields[0], x, y, z).map_err(|e| ParseError::new(text, e.reason))
}

fn parse_axis(text: &str, axis: char, raw: &str) -> Result<f64, ParseError> {
    let invalid = || {
        ParseError::new(
            text,
            ParseReason::InvalidNumber {
                axis,
                value: raw.to_string(),
            },
        )
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Split a buffer of concatenated records on the tag
///
/// Yields each non-blank fragment with the tag removed, in input order. A name
/// ending in `GPS` is indistinguishable from a following tag and splits there.
pub fn split_records(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(TAG).filter(|fragment| !fragment.trim().is_empty())
}
