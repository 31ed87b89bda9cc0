//! Credential validation for account signup.
//!
//! Messages are user-facing and rendered next to the offending form field.

use thiserror::Error;
use validator::ValidateEmail;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value is empty.
    #[error("This field is required.")]
    Required,

    /// Username is too long.
    #[error("Ensure this value has at most {MAX_USERNAME_LENGTH} characters.")]
    UsernameTooLong,

    /// Username contains characters outside letters, digits and `@.+-_`.
    #[error("Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.")]
    UsernameInvalidChars,

    /// Username is already registered.
    #[error("A user with that username already exists.")]
    UsernameTaken,

    /// Email is too long.
    #[error("Ensure this value has at most {MAX_EMAIL_LENGTH} characters.")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("Enter a valid email address.")]
    EmailInvalidFormat,

    /// Password is too short.
    #[error("This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters.")]
    PasswordTooShort,

    /// Password is too long.
    #[error("This password is too long. It must contain at most {MAX_PASSWORD_LENGTH} characters.")]
    PasswordTooLong,

    /// Password consists only of digits.
    #[error("This password is entirely numeric.")]
    PasswordEntirelyNumeric,

    /// Password is the same as the username.
    #[error("The password is too similar to the username.")]
    PasswordSameAsUsername,

    /// Password confirmation does not match.
    #[error("The two password fields didn't match.")]
    PasswordMismatch,
}

/// Validate a username.
///
/// Requirements:
/// - Not empty, at most 150 characters
/// - Letters, digits and `@ . + - _` only
///
/// # Examples
///
/// ```
/// use corkboard::auth::validation::validate_username;
///
/// assert!(validate_username("john.doe+forum@home").is_ok());
/// assert!(validate_username("john doe").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Required);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required);
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if !email.validate_email() {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

/// Check a new password against the strength rules.
///
/// Every failing rule is reported, in a fixed order.
///
/// # Examples
///
/// ```
/// use corkboard::auth::validation::{validate_new_password, ValidationError};
///
/// assert!(validate_new_password("abcdef123456", "hari").is_empty());
/// assert_eq!(
///     validate_new_password("1234567", "hari"),
///     vec![ValidationError::PasswordTooShort, ValidationError::PasswordEntirelyNumeric],
/// );
/// ```
pub fn validate_new_password(password: &str, username: &str) -> Vec<ValidationError> {
    if password.is_empty() {
        return vec![ValidationError::Required];
    }

    let mut errors = Vec::new();
    if !username.is_empty() && password.to_lowercase() == username.to_lowercase() {
        errors.push(ValidationError::PasswordSameAsUsername);
    }
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooLong);
    }
    if password.chars().all(|c| c.is_numeric()) {
        errors.push(ValidationError::PasswordEntirelyNumeric);
    }
    errors
}

/// Check that the confirmation matches the password.
pub fn validate_password_confirmation(
    password1: &str,
    password2: &str,
) -> Result<(), ValidationError> {
    if password2.is_empty() {
        return Err(ValidationError::Required);
    }
    if password1 != password2 {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("john").is_ok());
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("a.b+c-d@e").is_ok());
        assert!(validate_username("jürgen").is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_username_required() {
        assert_eq!(validate_username(""), Err(ValidationError::Required));
    }

    #[test]
    fn test_validate_username_too_long() {
        assert_eq!(
            validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn test_validate_username_invalid_chars() {
        for name in ["john doe", "john!", "a/b", "<script>"] {
            assert_eq!(
                validate_username(name),
                Err(ValidationError::UsernameInvalidChars),
                "{name}"
            );
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("john@doe.com").is_ok());
        assert_eq!(validate_email(""), Err(ValidationError::Required));
        assert_eq!(
            validate_email("not-an-email"),
            Err(ValidationError::EmailInvalidFormat)
        );
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_validate_new_password_ok() {
        assert!(validate_new_password("abcdef123456", "hari").is_empty());
    }

    #[test]
    fn test_validate_new_password_required() {
        assert_eq!(
            validate_new_password("", "hari"),
            vec![ValidationError::Required]
        );
    }

    #[test]
    fn test_validate_new_password_same_as_username() {
        assert_eq!(
            validate_new_password("HariHari", "harihari"),
            vec![ValidationError::PasswordSameAsUsername]
        );
    }

    #[test]
    fn test_validate_new_password_too_long() {
        assert_eq!(
            validate_new_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1), "hari"),
            vec![ValidationError::PasswordTooLong]
        );
    }

    #[test]
    fn test_validate_new_password_numeric() {
        assert_eq!(
            validate_new_password("12345678", "hari"),
            vec![ValidationError::PasswordEntirelyNumeric]
        );
    }

    #[test]
    fn test_validate_password_confirmation() {
        assert!(validate_password_confirmation("abc", "abc").is_ok());
        assert_eq!(
            validate_password_confirmation("abc", ""),
            Err(ValidationError::Required)
        );
        assert_eq!(
            validate_password_confirmation("abc", "abd"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "The two password fields didn't match."
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "This password is too short. It must contain at least 8 characters."
        );
    }
}
