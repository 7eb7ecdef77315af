//! Dynamic field values and the comparison semantics used by the query
//! executor
//!
//! Filter values arrive as untyped JSON and stored documents carry untyped
//! JSON fields; [`FieldValue`] is the typed meeting point. Conversion is
//! lossy on purpose: RFC 3339 strings become timestamps so that date
//! comparisons order chronologically, and numeric strings coerce to
//! numbers during comparison so `{"price": {"operator": ">", "value":
//! "100"}}` behaves the same as a JSON number.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::cmp::Ordering;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Convert a JSON value into a typed field value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => Self::from_text(s),
            // Arrays and objects have no scalar ordering
            _ => FieldValue::Null,
        }
    }

    /// Parse a raw string (an `in` element or `between` bound) into the
    /// most specific value it can represent.
    pub fn from_text(s: &str) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return FieldValue::DateTime(dt.with_timezone(&Utc));
        }
        if let Ok(i) = s.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return FieldValue::Float(f);
        }
        FieldValue::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Compare two values, coercing across representations where a
    /// meaningful order exists. `None` means the pair is unordered and
    /// every relational predicate on it is false.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Null, _) | (_, Null) => None,

            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Integer(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Float(a), Float(b)) => a.partial_cmp(b),

            (String(a), String(b)) => Some(a.cmp(b)),
            (String(a), Integer(_) | Float(_)) => {
                a.parse::<f64>().ok()?.partial_cmp(&other.as_f64()?)
            }
            (Integer(_) | Float(_), String(b)) => {
                self.as_f64()?.partial_cmp(&b.parse::<f64>().ok()?)
            }

            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            (DateTime(a), String(b)) => {
                let b = chrono::DateTime::parse_from_rfc3339(b).ok()?;
                Some(a.cmp(&b.with_timezone(&Utc)))
            }
            (String(a), DateTime(b)) => {
                let a = chrono::DateTime::parse_from_rfc3339(a).ok()?;
                Some(a.with_timezone(&Utc).cmp(b))
            }

            (Boolean(a), Boolean(b)) => {
                if a == b {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }

            _ => None,
        }
    }

    /// Equality under the same coercion rules as [`FieldValue::compare`].
    pub fn equals(&self, other: &FieldValue) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// SQL-style LIKE match, case-insensitive, `%` as the wildcard.
    pub fn like(&self, pattern: &str) -> bool {
        match self.as_like_text() {
            Some(text) => like_match(&text, pattern),
            None => false,
        }
    }

    /// The calendar date of a timestamp value, for `function=date` filters.
    pub fn date_part(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::DateTime(dt) => Some(dt.date_naive()),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn as_like_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
            FieldValue::Null => None,
        }
    }
}

/// Parse a `function=date` comparison value: a bare `YYYY-MM-DD` date or
/// any RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Case-insensitive LIKE with `%` wildcards. A pattern without `%` is an
/// exact (case-insensitive) match.
fn like_match(text: &str, pattern: &str) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();

    if !pattern.contains('%') {
        return text == pattern;
    }

    let segments: Vec<&str> = pattern.split('%').collect();
    let last = segments.len() - 1;
    let mut pos = 0usize;

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i == 0 {
            if !text.starts_with(segment) {
                return false;
            }
            pos = segment.len();
        } else if i == last {
            return text[pos..].ends_with(segment);
        } else {
            match text[pos..].find(segment) {
                Some(idx) => pos += idx + segment.len(),
                None => return false,
            }
        }
    }
    true
}
