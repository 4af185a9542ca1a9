//! Reusable field validators
//!
//! Each factory returns a closure that checks one raw form value and either
//! yields the coerced value or the message to show next to the field.

use std::str::FromStr;

/// Validator: field is present and not blank. Yields the trimmed value.
pub fn required(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    move |raw: Option<&str>| match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(message.to_string()),
    }
}

/// Coercion: read a value the way a number input does.
///
/// Missing or blank input coerces to `0`, so a later range check reports it.
/// Anything that does not parse, or parses to an infinity, is rejected.
pub fn coerce_number(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<f64, String> + Send + Sync + Clone {
    move |raw: Option<&str>| {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(num),
            _ => Err(message.to_string()),
        }
    }
}

/// Validator: number must be strictly greater than `min`
pub fn greater_than(
    min: f64,
    message: &'static str,
) -> impl Fn(f64) -> Result<f64, String> + Send + Sync + Clone {
    move |num: f64| {
        if num > min {
            Ok(num)
        } else {
            Err(message.to_string())
        }
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(
    max: f64,
    message: &'static str,
) -> impl Fn(f64) -> Result<f64, String> + Send + Sync + Clone {
    move |num: f64| {
        if num > max {
            Err(message.to_string())
        } else {
            Ok(num)
        }
    }
}

/// Validator: value must be exactly one of the spellings `T` accepts
pub fn one_of<T: FromStr>(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<T, String> + Send + Sync + Clone {
    move |raw: Option<&str>| {
        raw.and_then(|value| value.parse::<T>().ok())
            .ok_or_else(|| message.to_string())
    }
}
