//! Lenient accessors for engine parameters stored in a JSON object.
//!
//! A missing or mistyped key yields the default; range checks are the
//! engine's job once all values are read.

use crate::color::Rgba;
use crate::error::EngineError;
use serde_json::Value;

/// `params[name]` as `f64` (integers accepted), else `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer, else `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` parsed as a hex color.
///
/// A missing or non-string key yields `default`; a string that is not a
/// color is an error, since silently swapping the user's color would hide
/// a typo.
pub fn param_color(params: &Value, name: &str, default: Rgba) -> Result<Rgba, EngineError> {
    match params.get(name).and_then(Value::as_str) {
        Some(hex) => Rgba::from_hex(hex),
        None => Ok(default),
    }
}

/// Fails with `InvalidParam` unless `value` is finite and within `[min, max]`.
pub fn require_in_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), EngineError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::invalid_param(
            name,
            format!("{value} is outside [{min}, {max}]"),
        ))
    }
}
