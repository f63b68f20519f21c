//! Client-side validation helpers shared by every form
//!
//! Email checks follow the loose pattern the backend accepts
//! (`something@something.something`, no whitespace) rather than RFC 5322.

use crate::errors::FieldErrors;
use regex_lite::Regex;
use std::sync::OnceLock;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Enter a valid email address";
pub const EMAIL_TAKEN: &str = "A contact with this email already exists";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

/// Check an address against the email pattern
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Validate a required email field, recording at most one message
pub fn check_required_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, EMAIL_REQUIRED);
    } else if !is_valid_email(value) {
        errors.insert(field, EMAIL_INVALID);
    }
}

/// Validate an optional email field: empty passes, anything else must match
pub fn check_optional_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !is_valid_email(value) {
        errors.insert(field, EMAIL_INVALID);
    }
}

/// Case-insensitive duplicate check against sibling records.
///
/// `siblings` yields `(id, email)` pairs; the record with id `editing` is
/// skipped so an unchanged address does not collide with itself.
pub fn email_taken<'a, I>(candidate: &str, siblings: I, editing: Option<i64>) -> bool
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    let candidate = candidate.trim().to_lowercase();
    if candidate.is_empty() {
        return false;
    }

    siblings
        .into_iter()
        .filter(|(id, _)| Some(*id) != editing)
        .any(|(_, email)| email.trim().to_lowercase() == candidate)
}

/// Record a required-text error when `value` is blank
pub fn check_required(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("ana@acme.io"));
        assert!(is_valid_email("a.b+c@sub.acme.co.uk"));
        assert!(!is_valid_email("ana@acme"));
        assert!(!is_valid_email("ana acme.io"));
        assert!(!is_valid_email("ana @acme.io"));
        assert!(!is_valid_email("@acme.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_required_email_messages() {
        let mut errors = FieldErrors::new();
        check_required_email(&mut errors, "email", "   ");
        assert_eq!(errors.get("email"), Some(EMAIL_REQUIRED));

        let mut errors = FieldErrors::new();
        check_required_email(&mut errors, "email", "not-an-email");
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));

        let mut errors = FieldErrors::new();
        check_optional_email(&mut errors, "email", "");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_taken_ignores_case_and_edited_record() {
        let siblings = [(1, "Ana@Acme.io"), (2, "bo@acme.io")];

        assert!(email_taken("ana@acme.IO", siblings, None));
        assert!(email_taken(" BO@acme.io ", siblings, Some(1)));
        assert!(!email_taken("ana@acme.io", siblings, Some(1)));
        assert!(!email_taken("cy@acme.io", siblings, None));
        assert!(!email_taken("", siblings, None));
    }
}
