//! The required-variant validating converter.

use std::marker::PhantomData;

use serde_json::Value;
use stillwater::Validation;

use crate::convert::traits::{
    describe_token, record_construct_error, Converter, PipelineError, RawToken, TryConstruct,
    REQUIRED_MESSAGE,
};
use crate::scope::ScopeManager;

/// The validating converter for a required domain value.
///
/// `read` handles the three recoverable failure classes without ever
/// propagating them: a null token records "value is required"; a token of
/// the wrong primitive shape records a message naming the raw value and the
/// expected primitive; a domain construction failure records every entry of
/// the [`ConstructError`](crate::ConstructError). In all three cases the
/// result is `None` — the absence sentinel — so the surrounding object walk
/// continues with the remaining fields.
///
/// Errors are attributed to the scope's current field name when one is set
/// (by a name-aware wrapper), else to the type's documented default.
///
/// # Example
///
/// ```rust
/// use dragnet::{BasicConverter, Converter, ScopeManager};
/// use dragnet::values::PositiveInt;
/// use serde_json::json;
///
/// let converter = BasicConverter::<PositiveInt>::new();
/// let scope = ScopeManager::new();
/// let _guard = scope.begin_scope();
///
/// assert!(converter.read(&json!(3), &scope).is_some());
/// assert!(converter.read(&json!(-3), &scope).is_none());
/// assert!(scope.has_errors());
/// ```
pub struct BasicConverter<T> {
    // fn() -> T keeps the converter Send + Sync regardless of T.
    _marker: PhantomData<fn() -> T>,
}

impl<T> BasicConverter<T> {
    /// Creates the converter.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BasicConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BasicConverter<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: TryConstruct> Converter for BasicConverter<T> {
    type Output = T;

    fn read(&self, token: &Value, scope: &ScopeManager) -> Option<T> {
        let field = scope
            .current_field_name()
            .unwrap_or_else(T::default_field_name);

        if token.is_null() {
            scope.add_error(field, REQUIRED_MESSAGE);
            return None;
        }

        let Some(raw) = T::Raw::from_token(token) else {
            scope.add_error(
                field,
                format!(
                    "expected {}, got {}",
                    T::Raw::TYPE_NAME,
                    describe_token(token)
                ),
            );
            return None;
        };

        match T::try_construct(raw, &field) {
            Validation::Success(value) => Some(value),
            Validation::Failure(error) => {
                record_construct_error(scope, &field, error);
                None
            }
        }
    }

    fn write(&self, value: &T) -> Result<Value, PipelineError> {
        Ok(value.raw().into_token())
    }
}
