use std::sync::LazyLock;

use regex::Regex;

use crate::contacts::{Category, ContactList};

/// Unanchored: a valid number embedded in a longer string still matches.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{3}-[0-9]{3}-[0-9]{4}").expect("phone pattern is a valid regex")
});

const NAME_MIN: usize = 1;
const NAME_MAX: usize = 100;

/// A rejected form submission. The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please choose a valid category.")]
    Category,

    #[error("Contact name must be between 1 and 100 characters.")]
    NameLength,

    #[error("Contact name must be unique.")]
    NameTaken,

    #[error("Please enter a valid 10 digit phone number in the format: XXX-XXX-XXXX.")]
    Phone,

    #[error("Please enter a valid email address.")]
    Email,

    #[error("Please enter a phone number or an email address to update.")]
    NothingToUpdate,
}

pub fn valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn valid_email(email: &str) -> bool {
    email.contains('@')
}

pub fn check_category(value: &str) -> Result<Category, ValidationError> {
    value.parse().map_err(|_| ValidationError::Category)
}

pub fn check_name_length(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength);
    }
    Ok(())
}

/// Check a new contact against the rules in order; the first failure wins.
pub fn validate_new_contact(
    category: Category,
    name: &str,
    phone: &str,
    email: &str,
    existing: &ContactList,
) -> Result<(), ValidationError> {
    check_name_length(name)?;
    if existing.contains(category, name) {
        return Err(ValidationError::NameTaken);
    }
    if !valid_phone(phone) {
        return Err(ValidationError::Phone);
    }
    if !valid_email(email) {
        return Err(ValidationError::Email);
    }
    Ok(())
}

/// Check an edit submission. Only fields that were submitted are validated;
/// phone is checked before email.
pub fn validate_update(phone: Option<&str>, email: Option<&str>) -> Result<(), ValidationError> {
    if phone.is_none() && email.is_none() {
        return Err(ValidationError::NothingToUpdate);
    }
    if let Some(phone) = phone
        && !valid_phone(phone)
    {
        return Err(ValidationError::Phone);
    }
    if let Some(email) = email
        && !valid_email(email)
    {
        return Err(ValidationError::Email);
    }
    Ok(())
}
