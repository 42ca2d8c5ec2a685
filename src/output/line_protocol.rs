//! InfluxDB line protocol encoding

use crate::error::{Error, Result};
use crate::points::{Point, Scalar};
use std::fmt::Write;

const MEASUREMENT_SPECIAL: &[char] = &[',', ' ', '\\'];
const KEY_SPECIAL: &[char] = &[',', '=', ' ', '\\'];
const STRING_FIELD_SPECIAL: &[char] = &['"', '\\'];

/// Encode a point as one line: `measurement,tags fields timestamp`.
///
/// Tags with an empty value are left out. Line breaks inside names and values
/// become spaces. Timestamps are in nanoseconds.
pub fn encode_point(point: &Point) -> Result<String> {
    if point.fields.is_empty() {
        return Err(Error::output(format!(
            "point for {} has no fields",
            point.measurement
        )));
    }
    let timestamp = point.time.timestamp_nanos_opt().ok_or_else(|| {
        Error::output(format!("timestamp {} out of range", point.time))
    })?;

    let mut line = escape(&point.measurement, MEASUREMENT_SPECIAL);
    for (key, value) in &point.tags {
        let value = value.to_string();
        if value.is_empty() {
            continue;
        }
        let _ = write!(
            line,
            ",{}={}",
            escape(key, KEY_SPECIAL),
            escape(&value, KEY_SPECIAL)
        );
    }

    let fields: Vec<String> = point
        .fields
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key, KEY_SPECIAL), field_value(value)))
        .collect();
    let _ = write!(line, " {} {timestamp}", fields.join(","));
    Ok(line)
}

/// Encode a batch, one point per line
pub fn encode_points(points: &[Point]) -> Result<String> {
    let lines = points.iter().map(encode_point).collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

fn field_value(value: &Scalar) -> String {
    match value {
        Scalar::Str(s) => format!("\"{}\"", escape(s, STRING_FIELD_SPECIAL)),
        Scalar::Int(i) => format!("{i}i"),
        Scalar::Float(x) => format!("{x}"),
        Scalar::Bool(b) => b.to_string(),
    }
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if matches!(c, '\n' | '\r') { ' ' } else { c };
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
