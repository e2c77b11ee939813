//! Argument checks shared by every tool.
//!
//! Messages are shown verbatim to whoever called the tool, so they name the
//! field and the constraint it broke.

use serde_json::Value;
use thiserror::Error;

pub const MAX_QUERY_LENGTH: usize = 500;
pub const MAX_TITLE_LENGTH: usize = 500;
pub const MAX_CATEGORY_LENGTH: usize = 200;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Required, non-empty, bounded string without NUL bytes.
pub fn validate_string_input<'a>(
    value: Option<&'a Value>,
    max_length: usize,
    field: &str,
) -> ValidationResult<&'a str> {
    let Some(text) = value.and_then(Value::as_str) else {
        return Err(ValidationError::new(format!("{} must be a string", field)));
    };
    if text.is_empty() {
        return Err(ValidationError::new(format!("{} cannot be empty", field)));
    }
    check_text(text, max_length, field)?;
    Ok(text)
}

/// Optional freeform text; empty is fine, everything else as above.
pub fn validate_optional_text_input<'a>(
    value: &'a Value,
    max_length: usize,
    field: &str,
) -> ValidationResult<&'a str> {
    let text = value
        .as_str()
        .ok_or_else(|| ValidationError::new(format!("{} must be a string", field)))?;
    check_text(text, max_length, field)?;
    Ok(text)
}

fn check_text(text: &str, max_length: usize, field: &str) -> ValidationResult<()> {
    if text.chars().count() > max_length {
        return Err(ValidationError::new(format!(
            "{} exceeds maximum length of {}",
            field, max_length
        )));
    }
    if text.contains('\0') {
        return Err(ValidationError::new(format!(
            "{} contains invalid characters",
            field
        )));
    }
    Ok(())
}

/// Any JSON number inside `[min, max]`.
pub fn validate_number(value: &Value, min: f64, max: f64, field: &str) -> ValidationResult<f64> {
    let number = value.as_f64().ok_or_else(|| {
        ValidationError::new(format!(
            "{} must be a number between {} and {}",
            field,
            format_bound(min),
            format_bound(max)
        ))
    })?;

    if number < min || number > max {
        return Err(ValidationError::new(format!(
            "{} must be between {} and {}",
            field,
            format_bound(min),
            format_bound(max)
        )));
    }
    Ok(number)
}

/// A JSON integer (no fractional form such as `4.0`) inside `[min, max]`.
pub fn validate_integer(value: &Value, min: i64, max: i64, field: &str) -> ValidationResult<i64> {
    let integer: Option<i128> = match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        _ => None,
    };

    let integer = integer.ok_or_else(|| {
        ValidationError::new(format!(
            "{} must be an integer between {} and {}",
            field, min, max
        ))
    })?;

    if integer < i128::from(min) || integer > i128::from(max) {
        return Err(ValidationError::new(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    // Bounds are i64, so the value fits.
    Ok(integer as i64)
}

/// String that must be one of `allowed`.
pub fn validate_enum<'a>(
    value: &'a Value,
    allowed: &[&str],
    field: &str,
) -> ValidationResult<&'a str> {
    match value.as_str() {
        Some(v) if allowed.contains(&v) => Ok(v),
        _ => Err(ValidationError::new(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        ))),
    }
}

/// Optional integer limit, clamped into `[1, max]`.
pub fn clamp_limit(value: Option<&Value>, default: usize, max: usize) -> usize {
    value
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
        .clamp(1, max)
}

/// Render float bounds the way people write them: `0.5`, `8.0`.
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{:.1}", bound)
    } else {
        bound.to_string()
    }
}
