//! Shared validation helpers for inbound HTTP adapters.
//!
//! Payload DTOs model every field as optional so that missing or malformed
//! values surface as per-field client errors instead of opaque deserialization
//! failures. The helpers here build those errors in one consistent shape.

use serde_json::{Value, json};
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::domain::{
    CatalogValidationError, Error, LoginValidationError, RegistrationValidationError,
    UserValidationError,
};

/// Validation error codes attached to field-level failure details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    Required,
    Blank,
    MaxLength,
    MinLength,
    Invalid,
    Unique,
    MaxDigits,
    MaxDecimalPlaces,
}

impl FieldErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::MaxLength => "max_length",
            Self::MinLength => "min_length",
            Self::Invalid => "invalid",
            Self::Unique => "unique",
            Self::MaxDigits => "max_digits",
            Self::MaxDecimalPlaces => "max_decimal_places",
        }
    }
}

/// Build a `400` error annotated with the offending field and failure code.
pub(crate) fn field_error(
    field: &'static str,
    code: FieldErrorCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Error for a field that was absent from the payload.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(field, FieldErrorCode::Required, format!("{field} is required"))
}

/// Map catalog draft validation failures onto field-level errors.
pub(crate) fn map_catalog_validation_error(error: CatalogValidationError) -> Error {
    let field = error.field();
    let code = match error {
        CatalogValidationError::EmptyField { .. } => FieldErrorCode::Blank,
        CatalogValidationError::FieldTooLong { .. } => FieldErrorCode::MaxLength,
        CatalogValidationError::PriceTooManyDecimals { .. } => FieldErrorCode::MaxDecimalPlaces,
        CatalogValidationError::PriceOutOfRange { .. } => FieldErrorCode::MaxDigits,
    };
    field_error(field, code, error.to_string())
}

/// Map registration validation failures onto field-level errors.
pub(crate) fn map_registration_validation_error(error: RegistrationValidationError) -> Error {
    match error {
        RegistrationValidationError::Username(err) => {
            let code = match err {
                UserValidationError::EmptyUsername => FieldErrorCode::Blank,
                UserValidationError::UsernameTooLong { .. } => FieldErrorCode::MaxLength,
                UserValidationError::UsernameInvalidCharacters => FieldErrorCode::Invalid,
            };
            field_error("username", code, err.to_string())
        }
        RegistrationValidationError::PasswordTooShort { .. } => {
            field_error("password", FieldErrorCode::MinLength, error.to_string())
        }
    }
}

/// Map login validation failures onto field-level errors.
pub(crate) fn map_login_validation_error(error: LoginValidationError) -> Error {
    let field = match error {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, FieldErrorCode::Blank, error.to_string())
}

/// Parse a foreign-key reference supplied as a JSON number or numeric string.
///
/// The original API accepted form encodings, so `"3"` resolves like `3` and
/// an empty string fails the same way as an absent field.
pub(crate) fn parse_reference(value: Option<&Value>, field: &'static str) -> Result<i32, Error> {
    let value = match value {
        None | Some(Value::Null) => return Err(missing_field_error(field)),
        Some(value) => value,
    };
    match value {
        Value::Number(number) => number
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| invalid_reference_error(field)),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(field_error(
                    field,
                    FieldErrorCode::Blank,
                    format!("{field} must not be empty"),
                ));
            }
            trimmed
                .parse::<i32>()
                .map_err(|_| invalid_reference_error(field))
        }
        _ => Err(invalid_reference_error(field)),
    }
}

fn invalid_reference_error(field: &'static str) -> Error {
    field_error(
        field,
        FieldErrorCode::Invalid,
        format!("{field} must be a valid identifier"),
    )
}

/// Parse a price supplied as a JSON number or decimal string.
///
/// Numbers are round-tripped through their shortest decimal rendering so a
/// payload of `500.12` validates as two fraction digits rather than as the
/// binary expansion of the float.
pub(crate) fn parse_price(value: Option<&Value>) -> Result<BigDecimal, Error> {
    let value = match value {
        None | Some(Value::Null) => return Err(missing_field_error("price")),
        Some(value) => value,
    };
    let raw = match value {
        Value::Number(number) => number.to_string(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(field_error(
                    "price",
                    FieldErrorCode::Blank,
                    "price must not be empty",
                ));
            }
            trimmed.to_owned()
        }
        _ => return Err(invalid_price_error()),
    };
    BigDecimal::from_str(&raw).map_err(|_| invalid_price_error())
}

fn invalid_price_error() -> Error {
    field_error(
        "price",
        FieldErrorCode::Invalid,
        "price must be a valid decimal",
    )
}
