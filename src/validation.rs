use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn require<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value)
}

pub fn email(field: &str, value: &str) -> AppResult<()> {
    require(field, value)?;
    if !is_valid_email(value) {
        return Err(AppError::validation(format!("{field} is not a valid email")));
    }
    Ok(())
}

pub fn password(field: &str, value: &str) -> AppResult<()> {
    require(field, value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_length_boundary() {
        assert!(password("password", "12345").is_err());
        assert!(password("password", "123456").is_ok());
        let err = password("new_password", "").unwrap_err();
        assert_eq!(err.to_string(), "new_password is required");
    }

    #[test]
    fn email_messages_name_the_field() {
        let err = email("email", "nope").unwrap_err();
        assert_eq!(err.to_string(), "email is not a valid email");
    }
}
