//! FILENAME: core/dataset/src/value.rs
//! PURPOSE: Defines the record type and the three ways its values are read.
//! CONTEXT: A record is an open-ended JSON object. The aggregation engine
//! reads values as numbers and as grouping keys, the export pipeline reads
//! them as display text. Keeping all three conversions here means both
//! engines agree on what "100", `100` and `null` turn into.

use serde_json::{Map, Value};

/// A single row of source data: field name -> arbitrary JSON value.
/// Field order follows insertion order.
pub type Record = Map<String, Value>;

/// Key text used for a missing or null grouping field.
pub const MISSING_KEY_TEXT: &str = "N/A";

// ============================================================================
// NUMBERS
// ============================================================================

/// Coerces a value to a finite number.
///
/// JSON numbers are taken as-is and strings are parsed after trimming.
/// Everything else (null, booleans, empty text, arrays, objects) is not a
/// number and yields `None` so callers can exclude it instead of treating it
/// as zero.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    if n.is_finite() {
        Some(n)
    } else {
        None
    }
}

/// Formats a number without unnecessary decimal places.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Returns the display text of a value as it appears in exported cells.
/// Missing and null values render as an empty string.
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if n.is_f64() {
                n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
            } else {
                n.to_string()
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        // Compact JSON for nested values
        Some(other) => other.to_string(),
    }
}

/// Returns the text used when a value takes part in a grouping key.
/// Missing and null values become [`MISSING_KEY_TEXT`].
pub fn key_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_KEY_TEXT.to_string(),
        some => display_text(some),
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Looks up a field in a record.
///
/// A direct key match always wins. Otherwise a dotted key such as
/// `"address.city"` is walked through nested objects.
pub fn lookup<'r>(record: &'r Record, key: &str) -> Option<&'r Value> {
    if let Some(value) = record.get(key) {
        return Some(value);
    }

    if !key.contains('.') {
        return None;
    }

    let mut parts = key.split('.');
    let first = parts.next()?;
    let mut current = record.get(first)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}
