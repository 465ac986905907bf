//! The optional-variant validating converter.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::convert::traits::{
    describe_token, record_construct_error, Converter, PipelineError, RawToken, TokenConverter,
    TryConstruct,
};
use crate::scope::ScopeManager;

/// The validating converter for an optional domain value.
///
/// Differs from [`BasicConverter`](crate::BasicConverter) only on the null
/// marker: a null (or missing) token is a valid "no value" — `Some(None)`,
/// no error recorded. A present token must still have the right primitive
/// shape and pass domain construction; those failures record field errors
/// and return `None`, exactly like the required variant.
///
/// # Example
///
/// ```rust
/// use dragnet::{Converter, OptionalConverter, ScopeManager};
/// use dragnet::values::NonEmptyString;
/// use serde_json::json;
///
/// let converter = OptionalConverter::<NonEmptyString>::new();
/// let scope = ScopeManager::new();
/// let _guard = scope.begin_scope();
///
/// // Null is a valid no-value, not an error.
/// assert_eq!(converter.read(&json!(null), &scope), Some(None));
/// assert!(!scope.has_errors());
///
/// // A present but invalid value still records.
/// assert_eq!(converter.read(&json!("   "), &scope), None);
/// assert!(scope.has_errors());
/// ```
pub struct OptionalConverter<T> {
    // fn() -> T keeps the converter Send + Sync regardless of T.
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptionalConverter<T> {
    /// Creates the converter.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for OptionalConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for OptionalConverter<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: TryConstruct> Converter for OptionalConverter<T> {
    type Output = Option<T>;

    fn read(&self, token: &Value, scope: &ScopeManager) -> Option<Option<T>> {
        if token.is_null() {
            return Some(None);
        }

        let field = scope
            .current_field_name()
            .unwrap_or_else(T::default_field_name);

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
            Validation::Success(value) => Some(Some(value)),
            Validation::Failure(error) => {
                record_construct_error(scope, &field, error);
                None
            }
        }
    }

    fn write(&self, value: &Option<T>) -> Result<Value, PipelineError> {
        Ok(match value {
            Some(v) => v.raw().into_token(),
            None => Value::Null,
        })
    }
}

/// An erased optional adapter over a registered converter.
///
/// Used by the dispatch layer when the underlying type has a registry
/// entry: the entry's converter does the reading, this adapter supplies the
/// null-is-a-valid-no-value semantics and the `Option<T>` output shape.
/// Registration guarantees the inner converter's output is `T`, so the
/// rebox cannot miss.
pub(crate) struct OptionalTokenConverter<T> {
    inner: Arc<dyn TokenConverter>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptionalTokenConverter<T> {
    pub(crate) fn new(inner: Arc<dyn TokenConverter>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<T: Send + 'static> TokenConverter for OptionalTokenConverter<T> {
    fn read_token(&self, token: &Value, scope: &ScopeManager) -> Option<Box<dyn Any + Send>> {
        if token.is_null() {
            return Some(Box::new(None::<T>));
        }
        let boxed = self.inner.read_token(token, scope)?;
        boxed
            .downcast::<T>()
            .ok()
            .map(|v| Box::new(Some(*v)) as Box<dyn Any + Send>)
    }

    fn write_token(&self, value: &dyn Any) -> Result<Value, PipelineError> {
        let typed = value
            .downcast_ref::<Option<T>>()
            .ok_or(PipelineError::WriteType {
                expected: std::any::type_name::<Option<T>>(),
            })?;
        match typed {
            Some(v) => self.inner.write_token(v),
            None => Ok(Value::Null),
        }
    }
}
