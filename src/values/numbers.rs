//! Integer-backed domain values.

use std::fmt::{self, Display};

use stillwater::Validation;

use crate::convert::TryConstruct;
use crate::error::ConstructError;
use crate::ConstructResult;

/// A strictly positive integer.
///
/// # Example
///
/// ```rust
/// use dragnet::values::PositiveInt;
/// use dragnet::TryConstruct;
///
/// let count = PositiveInt::try_construct(3, "count").into_result().unwrap();
/// assert_eq!(count.get(), 3);
///
/// assert!(PositiveInt::try_construct(0, "count").is_failure());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositiveInt(i64);

impl PositiveInt {
    /// Returns the inner integer.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryConstruct for PositiveInt {
    type Raw = i64;

    fn try_construct(raw: i64, _field: &str) -> ConstructResult<Self> {
        if raw > 0 {
            Validation::Success(Self(raw))
        } else {
            Validation::Failure(ConstructError::message(format!(
                "must be positive, got {}",
                raw
            )))
        }
    }

    fn raw(&self) -> i64 {
        self.0
    }
}

impl Display for PositiveInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_positive() {
        let value = PositiveInt::try_construct(1, "count").into_result().unwrap();
        assert_eq!(value.get(), 1);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        for raw in [0, -1, i64::MIN] {
            let error = PositiveInt::try_construct(raw, "count")
                .into_result()
                .unwrap_err();
            assert_eq!(
                error.first().message,
                format!("must be positive, got {}", raw)
            );
        }
    }

    #[test]
    fn test_default_field_name() {
        assert_eq!(PositiveInt::default_field_name(), "positiveInt");
    }
}
