use crate::domain::error::BankError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub fn validate_name(field: &str, value: Option<&str>) -> Result<String, BankError> {
    let name = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BankError::validation(format!("{field} is required")))?;

    if name.chars().count() > 100 {
        return Err(BankError::validation(format!(
            "{field} must be at most 100 characters"
        )));
    }

    Ok(name.to_string())
}

pub fn validate_email(value: Option<&str>) -> Result<String, BankError> {
    let email = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BankError::validation("email is required"))?;

    if email.chars().count() > 255 || !EMAIL.is_match(email) {
        return Err(BankError::validation("email is not a valid address"));
    }

    Ok(email.to_string())
}

pub fn validate_phone_number(value: Option<&str>) -> Result<String, BankError> {
    let phone = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BankError::validation("phone_number is required"))?;

    if phone.chars().count() > 20 {
        return Err(BankError::validation(
            "phone_number must be at most 20 characters",
        ));
    }

    Ok(phone.to_string())
}

pub fn validate_password(value: Option<&str>) -> Result<String, BankError> {
    let password = value
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BankError::validation("password is required"))?;

    if password.chars().count() < 8 {
        return Err(BankError::validation(
            "password must be at least 8 characters",
        ));
    }

    Ok(password.to_string())
}
