use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email must not be empty")]
    Empty,
    #[error("Invalid email address: {0}")]
    Invalid(String),
}

/// Validated email address, used as the uniqueness key for user records.
///
/// Surrounding whitespace is trimmed; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmailError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }

        if !EMAIL_PATTERN.is_match(trimmed) {
            return Err(EmailError::Invalid(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = EmailError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_valid_email_is_accepted() {
        let email = Email::parse("a@x.com").unwrap();
        assert_eq!(email.as_str(), "a@x.com");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let email = Email::parse("  a@x.com\n").unwrap();
        assert_eq!(email.as_ref(), "a@x.com");
    }

    #[test]
    fn test_case_is_preserved() {
        let email = Email::parse("Alice@Example.com").unwrap();
        assert_eq!(email.to_string(), "Alice@Example.com");
    }

    #[test]
    fn test_empty_email_is_rejected() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_malformed_emails_are_rejected() {
        for raw in ["no-at-sign", "@x.com", "a@", "a@@x.com", "a b@x.com"] {
            assert!(
                matches!(Email::parse(raw), Err(EmailError::Invalid(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"a@x.com\"").unwrap();
        assert_eq!(ok.as_str(), "a@x.com");

        let err = serde_json::from_str::<Email>("\"not-an-email\"");
        assert!(err.is_err());
    }

    #[quickcheck]
    fn strings_without_at_sign_are_rejected(raw: String) -> bool {
        raw.contains('@') || Email::parse(raw).is_err()
    }

    #[quickcheck]
    fn numbered_addresses_round_trip(n: u32) -> bool {
        let raw = format!("user{n}@example.com");
        Email::parse(raw.clone()).map(String::from) == Ok(raw)
    }
}
