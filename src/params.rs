//! Fail-fast validation of query parameters
//!
//! All routes share one table-driven gate: existence is checked for every
//! field in declared order, then parsing, then ranges. The first violation
//! decides the single error reported.

use std::collections::HashMap;

use crate::error::RequestError;

/// A declared query parameter: its key, the human label used in error
/// reasons, and its inclusive value range.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
}

impl Field {
    /// A 0-255 color channel.
    pub const fn channel(key: &'static str, label: &'static str) -> Self {
        Self { key, label, min: 0, max: 255 }
    }

    /// An asset id with an explicit range.
    pub const fn id(key: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        Self { key, label, min, max }
    }
}

/// Validate `query` against `fields`, returning the parsed values in
/// declaration order.
///
/// Parsing is a strict base-10 integer parse; non-numeric input is an
/// explicit invalid-parameter error, not a range accident.
pub fn validate(
    query: &HashMap<String, String>,
    fields: &[Field],
) -> Result<Vec<i64>, RequestError> {
    let mut raw = Vec::with_capacity(fields.len());
    for field in fields {
        match query.get(field.key) {
            Some(value) => raw.push(value.as_str()),
            None => return Err(RequestError::MissingParameter(field.label)),
        }
    }

    let mut values = Vec::with_capacity(fields.len());
    for (field, value) in fields.iter().zip(&raw) {
        match value.parse::<i64>() {
            Ok(n) => values.push(n),
            Err(_) => return Err(RequestError::InvalidParameter(field.label)),
        }
    }

    for (field, n) in fields.iter().zip(&values) {
        if *n < field.min || *n > field.max {
            return Err(RequestError::InvalidParameter(field.label));
        }
    }

    Ok(values)
}
