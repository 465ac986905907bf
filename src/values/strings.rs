//! String-backed domain values.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;
use stillwater::prelude::*;
use stillwater::Validation;

use crate::convert::TryConstruct;
use crate::error::ConstructError;
use crate::ConstructResult;

/// Longest address accepted, per RFC 5321's path limit.
const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid literal")
});

/// A trimmed, never-blank string.
///
/// Construction trims leading and trailing whitespace and rejects anything
/// left empty.
///
/// # Example
///
/// ```rust
/// use dragnet::values::NonEmptyString;
/// use dragnet::TryConstruct;
///
/// let name = NonEmptyString::try_construct("  Alice  ".to_string(), "name")
///     .into_result()
///     .unwrap();
/// assert_eq!(name.as_str(), "Alice");
///
/// assert!(NonEmptyString::try_construct("   ".to_string(), "name")
///     .is_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Returns the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryConstruct for NonEmptyString {
    type Raw = String;

    fn try_construct(raw: String, _field: &str) -> ConstructResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Validation::Failure(ConstructError::message("must not be empty"))
        } else {
            Validation::Success(Self(trimmed.to_string()))
        }
    }

    fn raw(&self) -> String {
        self.0.clone()
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized email address.
///
/// Construction trims, lowercases, and checks length and format. A value
/// that is both too long and malformed reports both violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the normalized address.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryConstruct for EmailAddress {
    type Raw = String;

    fn try_construct(raw: String, _field: &str) -> ConstructResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Validation::Failure(ConstructError::message("must not be empty"));
        }

        let mut violations = Vec::new();
        if normalized.chars().count() > MAX_EMAIL_LENGTH {
            violations.push(ConstructError::message(format!(
                "must be at most {} characters",
                MAX_EMAIL_LENGTH
            )));
        }
        if !EMAIL_FORMAT.is_match(&normalized) {
            violations.push(ConstructError::message("is not a valid email address"));
        }

        match violations.into_iter().reduce(Semigroup::combine) {
            None => Validation::Success(Self(normalized)),
            Some(error) => Validation::Failure(error),
        }
    }

    fn raw(&self) -> String {
        self.0.clone()
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn construct<T: TryConstruct>(raw: T::Raw) -> ConstructResult<T> {
        T::try_construct(raw, "field")
    }

    #[test]
    fn test_non_empty_string_trims() {
        let value: NonEmptyString = construct("  hi  ".to_string()).into_result().unwrap();
        assert_eq!(value.as_str(), "hi");
    }

    #[test]
    fn test_non_empty_string_rejects_blank() {
        for raw in ["", "   ", "\t\n"] {
            let result = construct::<NonEmptyString>(raw.to_string());
            let error = result.into_result().unwrap_err();
            assert_eq!(error.first().message, "must not be empty");
        }
    }

    #[test]
    fn test_email_normalizes() {
        let email: EmailAddress = construct("  Alice@Example.COM ".to_string())
            .into_result()
            .unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_bad_format() {
        for raw in ["not-an-email", "a@b", "a b@c.d", "@c.d"] {
            let result = construct::<EmailAddress>(raw.to_string());
            let error = result.into_result().unwrap_err();
            assert_eq!(error.first().message, "is not a valid email address");
        }
    }

    #[test]
    fn test_email_rejects_empty_with_single_message() {
        let error = construct::<EmailAddress>("  ".to_string())
            .into_result()
            .unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().message, "must not be empty");
    }

    #[test]
    fn test_email_accumulates_length_and_format() {
        let raw = "x".repeat(300);
        let error = construct::<EmailAddress>(raw).into_result().unwrap_err();

        let messages: Vec<_> = error.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["must be at most 254 characters", "is not a valid email address"]
        );
    }

    #[test]
    fn test_raw_round_trips() {
        let email: EmailAddress = construct("a@b.com".to_string()).into_result().unwrap();
        let again: EmailAddress = construct(email.raw()).into_result().unwrap();
        assert_eq!(email, again);
    }

    #[test]
    fn test_default_field_names() {
        assert_eq!(NonEmptyString::default_field_name(), "nonEmptyString");
        assert_eq!(EmailAddress::default_field_name(), "emailAddress");
    }
}
