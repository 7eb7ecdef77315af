//! Filter Parser: untyped filter payloads → typed clauses
//!
//! The filter payload is a JSON object mapping field names to either a
//! scalar (equality) or a clause object `{operator, value, function}`:
//!
//! ```text
//! filter={"status":"active"}
//! filter={"price":{"operator":">","value":100}}
//! filter={"created_at":{"function":"date","operator":">=","value":"2024-01-01"}}
//! filter={"status":{"function":"in","value":"active,archived"}}
//! filter={"price":{"function":"between","value":"10,100"}}
//! filter={"category.name":"electronics"}
//! ```
//!
//! Every identifier in the payload is validated against the record's
//! allow-lists; values never reach query text as identifiers, they travel
//! as data inside the clause variants. How malformed input is treated
//! depends on [`FilterMode`]: lenient drops it, strict rejects the
//! request. Unknown relation names and relation columns are rejected in
//! both modes.

use serde_json::Value;

use crate::config::FilterMode;
use crate::core::record::{Record, Relation};
use crate::error::ApiError;

/// Comparison operator of a filter clause. Defaults to `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    Ne,
    Like,
}

impl Operator {
    /// Parse the wire form; anything unrecognized falls back to `=`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Ge,
            "<=" => Operator::Le,
            "<>" | "!=" => Operator::Ne,
            s if s.eq_ignore_ascii_case("like") => Operator::Like,
            _ => Operator::Eq,
        }
    }
}

/// One typed constraint derived from request input.
///
/// Clauses combine by AND, in payload order; `Search` is internally an OR
/// across the record's searchable fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// `field <op> value`
    Compare {
        field: &'static str,
        op: Operator,
        value: Value,
    },

    /// `DATE(field) <op> value` — compares calendar dates
    Date {
        field: &'static str,
        op: Operator,
        value: String,
    },

    /// `field IN (values)`
    In {
        field: &'static str,
        values: Vec<String>,
    },

    /// `field BETWEEN low AND high` (inclusive)
    Between {
        field: &'static str,
        low: String,
        high: String,
    },

    /// `field LIKE %needle%`
    Like {
        field: &'static str,
        needle: String,
    },

    /// One-level join: keep records where any related record's column
    /// equals the value.
    Join {
        relation: &'static Relation,
        column: &'static str,
        value: Value,
    },

    /// Free-text search: substring match OR-combined across fields.
    Search {
        fields: &'static [&'static str],
        needle: String,
    },
}

/// Parse a raw filter payload plus an optional free-text search into an
/// ordered clause sequence for record type `T`.
pub fn parse<T: Record>(
    raw: Option<&str>,
    q: Option<&str>,
    mode: FilterMode,
) -> Result<Vec<FilterClause>, ApiError> {
    let mut clauses = Vec::new();

    // Free-text search comes first, then the JSON filter clauses.
    if let Some(needle) = q.map(str::trim).filter(|s| !s.is_empty())
        && !T::SEARCHABLE.is_empty()
    {
        clauses.push(FilterClause::Search {
            fields: T::SEARCHABLE,
            needle: needle.to_string(),
        });
    }

    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(clauses);
    };

    let filters = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            return match mode {
                FilterMode::Lenient => Ok(clauses),
                FilterMode::Strict => Err(ApiError::Validation(
                    "filter must be a JSON object".to_string(),
                )),
            };
        }
    };

    for (key, raw_value) in filters {
        // Dotted keys split at the first delimiter into relation.column.
        if let Some((relation_name, column)) = key.split_once('.') {
            let relation = T::relation(relation_name).ok_or_else(|| {
                ApiError::Validation(format!("unknown relation '{}'", relation_name))
            })?;
            let column = relation
                .columns
                .iter()
                .find(|c| **c == column)
                .copied()
                .ok_or_else(|| {
                    ApiError::Validation(format!(
                        "unknown column '{}' on relation '{}'",
                        column, relation_name
                    ))
                })?;
            match raw_value {
                Value::Object(_) | Value::Array(_) => match mode {
                    FilterMode::Lenient => continue,
                    FilterMode::Strict => {
                        return Err(ApiError::Validation(format!(
                            "relation filter '{}' accepts a scalar value",
                            key
                        )));
                    }
                },
                value => clauses.push(FilterClause::Join {
                    relation,
                    column,
                    value,
                }),
            }
            continue;
        }

        let field = match T::column(&key) {
            Some(field) => field,
            None => match mode {
                FilterMode::Lenient => continue,
                FilterMode::Strict => {
                    return Err(ApiError::Validation(format!(
                        "unknown filter column '{}'",
                        key
                    )));
                }
            },
        };

        match raw_value {
            Value::Object(spec) => {
                let op = spec
                    .get("operator")
                    .and_then(Value::as_str)
                    .map(Operator::parse)
                    .unwrap_or(Operator::Eq);
                let value = spec.get("value").cloned().unwrap_or(Value::Null);
                let function = spec.get("function").and_then(Value::as_str).unwrap_or("");

                match function {
                    "date" => clauses.push(FilterClause::Date {
                        field,
                        op,
                        value: scalar_to_string(&value),
                    }),
                    "in" => {
                        let values = scalar_to_string(&value)
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                        clauses.push(FilterClause::In { field, values });
                    }
                    "between" => {
                        let raw = scalar_to_string(&value);
                        let bounds: Vec<&str> = raw.split(',').map(str::trim).collect();
                        if let [low, high] = bounds.as_slice() {
                            clauses.push(FilterClause::Between {
                                field,
                                low: low.to_string(),
                                high: high.to_string(),
                            });
                        } else if mode == FilterMode::Strict {
                            return Err(ApiError::Validation(format!(
                                "between on '{}' requires exactly two comma-separated bounds",
                                field
                            )));
                        }
                        // Lenient: a malformed range drops the clause.
                    }
                    "like" => clauses.push(FilterClause::Like {
                        field,
                        needle: scalar_to_string(&value),
                    }),
                    // Unknown function falls through to the standard operator.
                    _ => clauses.push(FilterClause::Compare { field, op, value }),
                }
            }
            value => clauses.push(FilterClause::Compare {
                field,
                op: Operator::Eq,
                value,
            }),
        }
    }

    Ok(clauses)
}

/// Render a scalar the way it would appear in a query string.
pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
