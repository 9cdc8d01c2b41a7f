//! Field rules shared by the checkout, profile and course registration forms.

use super::errors::DomainError;

pub fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(format!("{field} is required")));
    }
    Ok(())
}

/// Column widths shared by the customer, profile and registration tables.
pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 32;
pub const CITY_MAX: usize = 120;
pub const POSTAL_CODE_MAX: usize = 20;
pub const ADDRESS_MAX: usize = 1_000;

/// Length in characters of the trimmed value, as it is stored.
pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().chars().count() > max {
        return Err(DomainError::invalid(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), DomainError> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::invalid("email is not a valid address"));
    }
    Ok(())
}

/// 10 to 15 digits; spaces, dashes and a leading `+` are tolerated.
pub fn phone(value: &str) -> Result<(), DomainError> {
    let value = value.trim();
    let body = value.strip_prefix('+').unwrap_or(value);
    if body.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return Err(DomainError::invalid("phone may only contain digits"));
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&digits) {
        return Err(DomainError::invalid("phone must have 10 to 15 digits"));
    }
    Ok(())
}
