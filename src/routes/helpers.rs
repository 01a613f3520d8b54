//! Shared validation helpers for route handlers.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ApiError;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_\-.]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$")
            .expect("Invalid email regex")
    })
}

pub fn email_is_valid(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Passwords need at least eight characters with an upper case letter, a
/// lower case letter, a digit, and a space or punctuation character.
pub fn password_is_valid(password: &str) -> bool {
    if password.chars().count() < 8 {
        return false;
    }

    let has_upper = password.chars().any(|ch| ch.is_ascii_uppercase());
    let has_lower = password.chars().any(|ch| ch.is_ascii_lowercase());
    let has_digit = password.chars().any(|ch| ch.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|ch| ch == ' ' || ch.is_ascii_punctuation());

    has_upper && has_lower && has_digit && has_special
}

/// Free-text fields (list names, item descriptions) must be longer than one
/// character.
pub fn text_is_valid(text: &str) -> bool {
    text.chars().count() > 1
}

pub fn parse_list_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest("Invalid Id format detected".to_string()))
}

pub fn parse_item_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest("item id cannot be null".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(email_is_valid("johnsmith@fakeemail.com"));
        assert!(email_is_valid("first.last@sub.domain.org"));
        assert!(email_is_valid("user_name-1@mail.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!email_is_valid(""));
        assert!(!email_is_valid("notanemail"));
        assert!(!email_is_valid("missing@tld"));
        assert!(!email_is_valid("@nodomain.com"));
        assert!(!email_is_valid("spaces in@address.com"));
        assert!(!email_is_valid("toolongtld@domain.abcde"));
    }

    #[test]
    fn accepts_passwords_meeting_every_rule() {
        assert!(password_is_valid("Sup3r secret"));
        assert!(password_is_valid("Abcdef1!"));
        assert!(password_is_valid("pass_WORD_42"));
    }

    #[test]
    fn rejects_passwords_missing_a_rule() {
        assert!(!password_is_valid("Ab1!"));
        assert!(!password_is_valid("alllower1!"));
        assert!(!password_is_valid("ALLUPPER1!"));
        assert!(!password_is_valid("NoDigits!"));
        assert!(!password_is_valid("NoSpecial1"));
    }

    #[test]
    fn text_needs_more_than_one_character() {
        assert!(text_is_valid("ok"));
        assert!(text_is_valid("groceries"));
        assert!(!text_is_valid(""));
        assert!(!text_is_valid("a"));
    }

    #[test]
    fn list_ids_parse_strictly() {
        assert_eq!(parse_list_id("17").expect("valid id"), 17);
        assert!(parse_list_id("abc").is_err());
        assert!(parse_list_id("12.5").is_err());
        assert!(parse_list_id("").is_err());
    }

    #[test]
    fn item_ids_use_their_own_message() {
        let err = parse_item_id("xyz").expect_err("invalid id");
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "item id cannot be null"));
    }
}
