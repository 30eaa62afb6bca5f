//! Boundary coercion for loosely typed table cells.
//!
//! Every numeric field the evaluators read goes through [`number_or`] (or
//! [`count_or`]), so a missing, null, blank or non-numeric cell degrades to a
//! zero default instead of failing the whole evaluation. The serde adapters
//! at the bottom apply the same functions while decoding JSON rows; the CSV
//! loader hands cells over as strings and calls the functions directly.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a cell as a number, falling back to `default` when it can't be read.
pub fn number_or(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match parsed {
        Some(n) if !n.is_nan() => n,
        _ => default,
    }
}

/// Read a cell as a whole count. Fractional values truncate toward zero.
pub fn count_or(value: Option<&Value>, default: i64) -> i64 {
    let n = number_or(value, default as f64);
    // `as` saturates on overflow and infinities
    n.trunc() as i64
}

/// Read a cell as an identifier. Null or absent cells stay `None`.
pub fn identifier(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

/// `deserialize_with` adapter for amounts, ratios and day counts.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(number_or(value.as_ref(), 0.0))
}

/// `deserialize_with` adapter for integer counts.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(count_or(value.as_ref(), 0))
}

/// `deserialize_with` adapter for identifier columns.
pub fn lenient_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(identifier(value.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_or_passes_numbers_through() {
        assert_eq!(number_or(Some(&json!(70)), 0.0), 70.0);
        assert_eq!(number_or(Some(&json!(0.93)), 0.0), 0.93);
        assert_eq!(number_or(Some(&json!(-4.5)), 0.0), -4.5);
    }

    #[test]
    fn test_number_or_defaults_unreadable_cells() {
        assert_eq!(number_or(None, 0.0), 0.0);
        assert_eq!(number_or(Some(&Value::Null), 0.0), 0.0);
        assert_eq!(number_or(Some(&json!("")), 0.0), 0.0);
        assert_eq!(number_or(Some(&json!("n/a")), 0.0), 0.0);
        assert_eq!(number_or(Some(&json!("NaN")), 7.0), 7.0);
        assert_eq!(number_or(Some(&json!([1, 2])), 3.0), 3.0);
    }

    #[test]
    fn test_number_or_parses_numeric_text() {
        assert_eq!(number_or(Some(&json!(" 45 ")), 0.0), 45.0);
        assert_eq!(number_or(Some(&json!("1e6")), 0.0), 1_000_000.0);
        assert_eq!(number_or(Some(&json!(true)), 0.0), 1.0);
    }

    #[test]
    fn test_count_or_truncates() {
        assert_eq!(count_or(Some(&json!(2.9)), 0), 2);
        assert_eq!(count_or(Some(&json!("3")), 0), 3);
        assert_eq!(count_or(Some(&json!(-1.5)), 0), -1);
        assert_eq!(count_or(None, 0), 0);
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier(Some(&json!("C1"))), Some("C1".to_string()));
        assert_eq!(identifier(Some(&json!(1042))), Some("1042".to_string()));
        assert_eq!(identifier(Some(&Value::Null)), None);
        assert_eq!(identifier(None), None);
    }
}
