use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MAX_NOTES_LEN: usize = 1000;

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ()-]{5,19}$").expect("regex compiles"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date and time required")]
    MissingDateTime,
    #[error("phone number is not valid")]
    InvalidPhone,
    #[error("notes must be at most 1000 characters")]
    NotesTooLong,
    #[error("selected session is not offered for this class")]
    SessionNotOffered,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails<'a> {
    pub phone: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub fn validate_contact(contact: &ContactDetails<'_>) -> Result<(), ValidationError> {
    if let Some(phone) = contact.phone.map(str::trim).filter(|p| !p.is_empty())
        && !PHONE_REGEX.is_match(phone)
    {
        return Err(ValidationError::InvalidPhone);
    }
    if contact
        .notes
        .is_some_and(|notes| notes.chars().count() > MAX_NOTES_LEN)
    {
        return Err(ValidationError::NotesTooLong);
    }
    Ok(())
}
