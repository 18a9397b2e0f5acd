use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

use crate::domain::pricing::round_amount;

pub mod media_objects;
pub mod products;
pub mod taxonomies;

pub const NOT_BLANK: &str = "This value should not be blank.";
pub const NOT_NULL: &str = "This value should not be null.";
pub const NOT_DECIMAL: &str = "This value is not a valid decimal number.";

/// A single failed validation rule, addressed by the property it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub property_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

/// Flatten `errors` into violations, ordered by `fields`.
///
/// `validator` keeps field errors in a map, so the declaration order of the
/// form has to be supplied by the caller.
pub fn ordered_violations(errors: &ValidationErrors, fields: &[&str]) -> Vec<Violation> {
    let field_errors = errors.field_errors();
    let mut violations = Vec::new();

    for field in fields {
        if let Some(list) = field_errors.get(*field) {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                violations.push(Violation::new(*field, message));
            }
        }
    }

    violations
}

pub(crate) fn violation_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

/// Blank means nothing is left once the value is sanitized.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if sanitize_inline_text(value).is_empty() {
        return Err(violation_error("not_blank", NOT_BLANK));
    }
    Ok(())
}

/// Parse a decimal and check it against `[min, max]` once rounded to two digits.
pub(crate) fn bounded_decimal(
    value: &str,
    min: Decimal,
    max: Decimal,
) -> Result<Decimal, ValidationError> {
    let parsed = value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| violation_error("decimal", NOT_DECIMAL))?;
    let rounded = round_amount(parsed);

    if rounded < min {
        return Err(violation_error(
            "range",
            format!("This value should be greater than or equal to {min}."),
        ));
    }
    if rounded > max {
        return Err(violation_error(
            "range",
            format!("This value should be less than or equal to {max}."),
        ));
    }

    Ok(rounded)
}

/// Accept JSON strings, numbers and booleans as text; `null` reads as absent.
pub fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found `{other}`"
        ))),
    }
}

/// Accept a resource reference: an IRI string, a numeric id or an object with `@id`.
pub fn reference_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Object(map)) => match map.get("@id") {
            Some(Value::String(iri)) => Ok(Some(iri.clone())),
            _ => Err(D::Error::custom("expected an object with an `@id` IRI")),
        },
        Some(other) => Err(D::Error::custom(format!(
            "expected an IRI, found `{other}`"
        ))),
    }
}

/// Like [`reference_text`] but keeps an explicit `null` apart from a missing field.
pub fn nullable_reference_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    reference_text(deserializer).map(Some)
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

fn sanitize_multiline_text(input: &str) -> String {
    let lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut previous_empty = true;
    for line in lines {
        let is_empty = line.is_empty();
        if is_empty && previous_empty {
            continue;
        }
        previous_empty = is_empty;
        result.push(line);
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(
            required(message = "This value should not be blank."),
            custom(function = "not_blank")
        )]
        #[serde(default, deserialize_with = "scalar_text")]
        first: Option<String>,
        #[validate(
            required(message = "This value should not be blank."),
            custom(function = "not_blank")
        )]
        #[serde(default, deserialize_with = "scalar_text")]
        second: Option<String>,
    }

    #[test]
    fn violations_follow_declared_order() {
        let sample: Sample =
            serde_json::from_str(r#"{"second": "", "first": null}"#).expect("valid json");
        let errors = sample.validate().expect_err("both fields are blank");

        let violations = ordered_violations(&errors, &["first", "second"]);

        assert_eq!(
            violations,
            vec![
                Violation::new("first", NOT_BLANK),
                Violation::new("second", NOT_BLANK),
            ]
        );
    }

    #[test]
    fn scalar_text_reads_numbers_as_text() {
        let sample: Sample =
            serde_json::from_str(r#"{"first": 200.25, "second": "x"}"#).expect("valid json");

        assert_eq!(sample.first.as_deref(), Some("200.25"));
        assert!(sample.validate().is_ok());
    }

    #[test]
    fn bounded_decimal_rounds_and_checks_range() {
        let max = Decimal::new(99_999, 2);

        assert_eq!(
            bounded_decimal(" 12.345 ", Decimal::ZERO, max)
                .ok()
                .map(|value| value.to_string()),
            Some("12.35".to_string())
        );
        assert!(bounded_decimal("abc", Decimal::ZERO, max).is_err());
        assert!(bounded_decimal("-1", Decimal::ZERO, max).is_err());
        assert!(bounded_decimal("1000", Decimal::ZERO, max).is_err());
    }

    #[test]
    fn not_blank_rejects_control_characters_only() {
        assert!(not_blank("\u{7}").is_err());
        assert!(not_blank(" \u{1}\t\n").is_err());
        assert!(not_blank("\u{7}a").is_ok());
    }

    #[test]
    fn sanitizers_collapse_whitespace() {
        assert_eq!(sanitize_inline_text("  Deluxe \t Product "), "Deluxe Product");
        assert_eq!(
            sanitize_multiline_text("\n First line.\n\n\n Second line.  \n\n"),
            "First line.\n\nSecond line."
        );
    }
}
