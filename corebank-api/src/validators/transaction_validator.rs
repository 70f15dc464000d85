use crate::domain::error::BankError;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x1f\x7f]").unwrap();
}

/// Largest representable amount: 10 significant digits, 2 of them fractional.
fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Parse and validate a transaction amount from raw request JSON.
///
/// Accepts a JSON string or number; the committed value must be a positive
/// decimal with at most 2 fractional digits and a bounded magnitude. Failures
/// here are input validation errors, distinct from the engine's domain errors.
pub fn validate_amount(value: Option<&serde_json::Value>) -> Result<Decimal, BankError> {
    let raw = match value {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(_) => return Err(BankError::validation("amount must be a decimal string or number")),
        None => return Err(BankError::validation("amount is required")),
    };

    let amount = Decimal::from_str(&raw)
        .map_err(|_| BankError::validation(format!("amount is not a valid decimal: {raw}")))?;

    if amount <= Decimal::ZERO {
        return Err(BankError::validation("amount must be positive"));
    }
    if amount.normalize().scale() > 2 {
        return Err(BankError::validation(
            "amount must have at most 2 fractional digits",
        ));
    }
    if amount > max_amount() {
        return Err(BankError::validation("amount exceeds the allowed maximum"));
    }

    Ok(amount)
}

/// Validate an optional opening balance for a new account. Unlike a
/// transaction amount, zero is acceptable here.
pub fn validate_opening_balance(
    value: Option<&serde_json::Value>,
) -> Result<Option<Decimal>, BankError> {
    let raw = match value {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(_) => return Err(BankError::validation("amount must be a decimal string or number")),
    };

    let amount = Decimal::from_str(&raw)
        .map_err(|_| BankError::validation(format!("amount is not a valid decimal: {raw}")))?;

    if amount < Decimal::ZERO {
        return Err(BankError::validation("opening balance must not be negative"));
    }
    if amount.normalize().scale() > 2 {
        return Err(BankError::validation(
            "amount must have at most 2 fractional digits",
        ));
    }
    if amount > max_amount() {
        return Err(BankError::validation("amount exceeds the allowed maximum"));
    }

    Ok(Some(amount))
}

/// Validate a transaction description: required, printable, at most 100 chars.
pub fn validate_description(value: Option<&str>) -> Result<String, BankError> {
    let description = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BankError::validation("description is required"))?;

    if description.chars().count() > 100 {
        return Err(BankError::validation(
            "description must be at most 100 characters",
        ));
    }
    if CONTROL_CHARS.is_match(description) {
        return Err(BankError::validation(
            "description contains control characters",
        ));
    }

    Ok(description.to_string())
}

/// Validate an account name: same shape as a description.
pub fn validate_account_name(value: Option<&str>) -> Result<String, BankError> {
    let name = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BankError::validation("account_name is required"))?;

    if name.chars().count() > 100 {
        return Err(BankError::validation(
            "account_name must be at most 100 characters",
        ));
    }
    if CONTROL_CHARS.is_match(name) {
        return Err(BankError::validation("account_name contains control characters"));
    }

    Ok(name.to_string())
}
