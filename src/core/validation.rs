//! User input validation
//!
//! Phone numbers must be Belarusian: `+375` followed by exactly nine
//! digits. Free-text answers (names, descriptions, addresses) must be
//! non-empty and short enough to fit an order card into one Telegram
//! message.

use thiserror::Error;

/// Country prefix every accepted phone starts with
pub const PHONE_PREFIX: &str = "+375";

/// Total length of a normalized phone (`+375` and nine digits)
pub const PHONE_LEN: usize = 13;

/// Longest free-text answer accepted, in characters.
///
/// An order card carries both the description and the address, and the
/// whole card must stay under Telegram's 4096 character limit.
pub const MAX_ANSWER_CHARS: usize = 1000;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Phone does not match `+375XXXXXXXXX` after normalization
    #[error("Invalid phone number: '{0}'")]
    InvalidPhone(String),

    /// Free-text answer is empty after trimming
    #[error("Answer is empty")]
    EmptyAnswer,

    /// Free-text answer is longer than [`MAX_ANSWER_CHARS`]
    #[error("Answer is {0} characters long, at most {MAX_ANSWER_CHARS} allowed")]
    AnswerTooLong(usize),
}

/// Strips whitespace and dashes users tend to type inside phone numbers.
///
/// # Examples
/// ```
/// use brigadir::core::validation::normalize_phone;
///
/// assert_eq!(normalize_phone(" +375 29-123-45-67 "), "+375291234567");
/// ```
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

/// Validates and normalizes a phone number.
///
/// # Returns
/// * `Ok(String)` - the normalized phone, e.g. `+375291234567`
/// * `Err(ValidationError::InvalidPhone)` - anything else
///
/// # Examples
/// ```
/// use brigadir::core::validation::parse_phone;
///
/// assert!(parse_phone("+375 29 123 45 67").is_ok());
/// assert!(parse_phone("80291234567").is_err());
/// assert!(parse_phone("+3752912345").is_err());
/// ```
pub fn parse_phone(input: &str) -> Result<String, ValidationError> {
    let phone = normalize_phone(input);

    let valid = phone.len() == PHONE_LEN
        && phone.starts_with(PHONE_PREFIX)
        && phone[1..].chars().all(|c| c.is_ascii_digit());

    if valid {
        Ok(phone)
    } else {
        Err(ValidationError::InvalidPhone(input.trim().to_string()))
    }
}

/// Trims a free-text answer and checks it is usable.
///
/// # Examples
/// ```
/// use brigadir::core::validation::parse_answer;
///
/// assert_eq!(parse_answer("  ул. Ленина, 5 ").unwrap(), "ул. Ленина, 5");
/// assert!(parse_answer("   ").is_err());
/// ```
pub fn parse_answer(input: &str) -> Result<String, ValidationError> {
    let answer = input.trim();
    let chars = answer.chars().count();

    if chars == 0 {
        Err(ValidationError::EmptyAnswer)
    } else if chars > MAX_ANSWER_CHARS {
        Err(ValidationError::AnswerTooLong(chars))
    } else {
        Ok(answer.to_string())
    }
}
