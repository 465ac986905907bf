//! The property-name-aware converter decorators.
//!
//! A domain value type carries no knowledge of which DTO property it backs;
//! the same type may back several. These decorators fix a property name
//! around an inner converter: the read path saves the scope's current field
//! name, installs its own, delegates, and restores the saved name when the
//! guard drops — on success, on a recorded error, and on unwind alike. The
//! write path is pure delegation; serialization needs no name bookkeeping.
//!
//! [`NamedConverter`] decorates a typed [`Converter`];
//! [`NamedTokenConverter`] decorates an already erased
//! `Arc<dyn TokenConverter>` (the form registries hand out).

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use crate::convert::traits::{Converter, PipelineError, TokenConverter};
use crate::scope::ScopeManager;

/// A typed converter bound to a fixed property name.
///
/// # Example
///
/// ```rust
/// use dragnet::{BasicConverter, Converter, NamedConverter, ScopeManager};
/// use dragnet::values::NonEmptyString;
/// use serde_json::json;
///
/// // The same value type, bound to two different property names.
/// let first = NamedConverter::new("firstName", BasicConverter::<NonEmptyString>::new());
/// let last = NamedConverter::new("lastName", BasicConverter::<NonEmptyString>::new());
///
/// let scope = ScopeManager::new();
/// let _guard = scope.begin_scope();
/// first.read(&json!(""), &scope);
/// last.read(&json!(""), &scope);
///
/// let report = scope.report().unwrap();
/// assert!(report.field("firstName").is_some());
/// assert!(report.field("lastName").is_some());
/// ```
pub struct NamedConverter<C> {
    name: String,
    inner: C,
}

impl<C> NamedConverter<C> {
    /// Binds `inner` to a property name.
    pub fn new(name: impl Into<String>, inner: C) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Returns the bound property name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C: Converter> Converter for NamedConverter<C> {
    type Output = C::Output;

    fn read(&self, token: &Value, scope: &ScopeManager) -> Option<C::Output> {
        // Guard drop restores the previous name on every exit path.
        let _name = scope.push_field_name(self.name.as_str());
        self.inner.read(token, scope)
    }

    fn write(&self, value: &C::Output) -> Result<Value, PipelineError> {
        self.inner.write(value)
    }
}

/// An erased converter bound to a fixed property name.
///
/// Identical read/write behavior to [`NamedConverter`], for inner
/// converters that are already behind `Arc<dyn TokenConverter>`.
pub struct NamedTokenConverter {
    name: String,
    inner: Arc<dyn TokenConverter>,
}

impl NamedTokenConverter {
    /// Binds an erased converter to a property name.
    pub fn new(name: impl Into<String>, inner: Arc<dyn TokenConverter>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Returns the bound property name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TokenConverter for NamedTokenConverter {
    fn read_token(&self, token: &Value, scope: &ScopeManager) -> Option<Box<dyn Any + Send>> {
        let _name = scope.push_field_name(self.name.as_str());
        self.inner.read_token(token, scope)
    }

    fn write_token(&self, value: &dyn Any) -> Result<Value, PipelineError> {
        self.inner.write_token(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::basic::BasicConverter;
    use crate::values::{EmailAddress, NonEmptyString};
    use serde_json::json;

    #[test]
    fn test_errors_named_after_property_not_type() {
        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();
        let converter = NamedConverter::new("homeEmail", BasicConverter::<EmailAddress>::new());

        assert!(converter.read(&json!("nope"), &scope).is_none());
        let report = scope.report().unwrap();
        assert_eq!(report.first().field(), "homeEmail");
    }

    #[test]
    fn test_previous_name_restored_after_read() {
        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();
        let _outer = scope.push_field_name("parent");

        let converter = NamedConverter::new("child", BasicConverter::<NonEmptyString>::new());
        let _ = converter.read(&json!("ok"), &scope);

        assert_eq!(scope.current_field_name().as_deref(), Some("parent"));
    }

    #[test]
    fn test_previous_name_restored_after_error() {
        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();
        let _outer = scope.push_field_name("parent");

        let converter = NamedConverter::new("child", BasicConverter::<NonEmptyString>::new());
        assert!(converter.read(&json!(null), &scope).is_none());

        assert_eq!(scope.current_field_name().as_deref(), Some("parent"));
        let report = scope.report().unwrap();
        assert_eq!(report.first().field(), "child");
    }

    #[test]
    fn test_write_is_pure_delegation() {
        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();
        let converter = NamedConverter::new("name", BasicConverter::<NonEmptyString>::new());

        let value = converter.read(&json!("Alice"), &scope).unwrap();
        assert_eq!(converter.write(&value).unwrap(), json!("Alice"));
        // No name is left behind by the write path.
        assert_eq!(scope.current_field_name(), None);
    }

    #[test]
    fn test_erased_decorator_matches_typed_behavior() {
        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();

        let inner: Arc<dyn TokenConverter> = Arc::new(BasicConverter::<EmailAddress>::new());
        let converter = NamedTokenConverter::new("workEmail", inner);

        assert!(converter.read_token(&json!("nope"), &scope).is_none());
        let report = scope.report().unwrap();
        assert_eq!(report.first().field(), "workEmail");
    }
}
