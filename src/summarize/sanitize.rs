//! Parameter bounds and the lenient coercions applied before forwarding.
//!
//! Numeric parameters never reject: anything that cannot be read as a number
//! collapses to the parameter's lower bound, and numbers outside the range
//! are pulled to the nearest edge.

use std::cmp::Ordering;

use serde_json::Value;

/// Inclusive range plus the value used when the parameter is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
    pub default: T,
}

pub const MAX_TOKENS: Bounds<i64> = Bounds {
    min: 32,
    max: 1024,
    default: 256,
};

pub const TEMPERATURE: Bounds<f64> = Bounds {
    min: 0.0,
    max: 2.0,
    default: 0.5,
};

pub const TOP_P: Bounds<f64> = Bounds {
    min: 0.0,
    max: 1.0,
    default: 0.9,
};

pub const TOP_K: Bounds<i64> = Bounds {
    min: 1,
    max: 200,
    default: 40,
};

pub const REPEAT_PENALTY: Bounds<f64> = Bounds {
    min: 0.5,
    max: 2.0,
    default: 1.1,
};

pub const BACK_TRANSLATE_DEFAULT: bool = true;

/// Upper limit on `text`, counted in chars.
pub const MAX_TEXT_CHARS: usize = 20_000;

/// Clamps into `[min, max]`. `None` and unordered values (NaN) yield `min`.
pub fn clamp_or_min<T>(value: Option<T>, bounds: &Bounds<T>) -> T
where
    T: PartialOrd + Copy,
{
    let Some(value) = value else {
        return bounds.min;
    };
    match (
        value.partial_cmp(&bounds.min),
        value.partial_cmp(&bounds.max),
    ) {
        (None, _) | (_, None) => bounds.min,
        (Some(Ordering::Less), _) => bounds.min,
        (_, Some(Ordering::Greater)) => bounds.max,
        _ => value,
    }
}

/// Reads an integer out of a JSON value. Floats truncate toward zero,
/// booleans count as 0/1, strings must hold a plain integer.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| !f.is_nan())
}

/// Truthiness: null, false, zero, and empty strings/arrays/objects are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
