//! Equality used by the `test` operation.
//!
//! Documents arrive as decoded JSON while hosts hold typed data, so the
//! comparison is deliberately loose: numbers match numeric strings, `null`
//! matches empty values, and containers fall back to a key-sorted
//! projection.

use patchwork_util::{canonicalize, identical};
use serde_json::Number;

use crate::value::Value;

/// Whether host value `actual` satisfies the expected document value.
pub fn test_equal(actual: &Value, expected: &Value) -> bool {
    let expected = match expected.as_str() {
        Some("true") => Value::Bool(true),
        Some("false") => Value::Bool(false),
        _ => expected.clone(),
    };

    if let Value::Bool(b) = expected {
        return actual.as_bool() == Some(b);
    }

    if loose_eq(actual, &expected) {
        return true;
    }

    match expected {
        Value::List(_) | Value::Map(_) | Value::Collection(_) | Value::Record(_) => identical(
            &canonicalize(actual.to_json()),
            &canonicalize(expected.to_json()),
        ),
        _ => false,
    }
}

/// Truthiness: `null`, `false`, zero, `""`, `"0"` and empty containers are
/// false; shared values are always true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::List(items) => !items.is_empty(),
        Value::Map(map) => !map.is_empty(),
        Value::Collection(_) | Value::Record(_) => true,
    }
}

/// Loose equality between two values of possibly different types.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == truthy(other),
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match numeric(s) {
                Some(f) => n.as_f64() == Some(f),
                None => number_text(n) == *s,
            }
        }
        (Value::String(x), Value::String(y)) => match (numeric(x), numeric(y)) {
            (Some(p), Some(q)) => p == q,
            _ => x == y,
        },
        (Value::List(_) | Value::Map(_), Value::List(_) | Value::Map(_)) => {
            entries_loose_eq(&entries(a), &entries(b))
        }
        (Value::Collection(x), Value::Collection(y)) => {
            a == b || {
                let (x, y) = (x.borrow(), y.borrow());
                x.type_name() == y.type_name() && entries_loose_eq(&x.entries(), &y.entries())
            }
        }
        (Value::Record(x), Value::Record(y)) => {
            a == b || {
                let (x, y) = (x.borrow(), y.borrow());
                x.type_info().name() == y.type_info().name()
                    && entries_loose_eq(
                        &x.project().into_iter().collect::<Vec<_>>(),
                        &y.project().into_iter().collect::<Vec<_>>(),
                    )
            }
        }
        _ => false,
    }
}

fn entries(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => Vec::new(),
    }
}

/// Same keys, loosely equal values, any order.
fn entries_loose_eq(a: &[(String, Value)], b: &[(String, Value)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, left)| {
            b.iter()
                .find(|(k, _)| k == key)
                .is_some_and(|(_, right)| loose_eq(left, right))
        })
}

fn number_eq(x: &Number, y: &Number) -> bool {
    match (x.as_i64(), y.as_i64()) {
        (Some(p), Some(q)) => p == q,
        _ => match (x.as_u64(), y.as_u64()) {
            (Some(p), Some(q)) => p == q,
            _ => x.as_f64() == y.as_f64(),
        },
    }
}

/// Numeric value of a string such as `" 12"`, `"1.5e3"` or `"-4"`.
fn numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let trimmed = trimmed.trim_end_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let well_formed = !trimmed.is_empty()
        && trimmed.bytes().any(|b| b.is_ascii_digit())
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if well_formed {
        trimmed.parse().ok()
    } else {
        None
    }
}

/// Text form of a number as it compares against non-numeric strings.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}
