//! Traits for the validating-converter contract.
//!
//! This module provides the primitive-token contract ([`RawToken`]), the
//! domain try-construct contract ([`TryConstruct`]), and the converter
//! traits: the typed [`Converter`] and its type-erased twin
//! [`TokenConverter`], connected by a blanket impl so any typed converter
//! can be stored behind `Arc<dyn TokenConverter>`.

use std::any::Any;

use serde_json::Value;

use crate::error::ConstructError;
use crate::scope::ScopeManager;
use crate::ConstructResult;

/// Message recorded for a null or missing required value.
pub(crate) const REQUIRED_MESSAGE: &str = "value is required";

/// A primitive representation the token stream can supply.
///
/// The token stream is `serde_json::Value`; each raw type knows how to
/// extract itself from a token, render itself back into one, and name
/// itself in shape-mismatch messages.
pub trait RawToken: Sized + Send + 'static {
    /// The name used in "expected X, got Y" messages.
    const TYPE_NAME: &'static str;

    /// Extracts the raw value from a token, or `None` on shape mismatch.
    fn from_token(token: &Value) -> Option<Self>;

    /// Renders the raw value back into a token.
    fn into_token(self) -> Value;
}

impl RawToken for String {
    const TYPE_NAME: &'static str = "string";

    fn from_token(token: &Value) -> Option<Self> {
        token.as_str().map(str::to_owned)
    }

    fn into_token(self) -> Value {
        Value::String(self)
    }
}

impl RawToken for i64 {
    const TYPE_NAME: &'static str = "integer";

    // Floats are rejected, not truncated.
    fn from_token(token: &Value) -> Option<Self> {
        token.as_i64()
    }

    fn into_token(self) -> Value {
        Value::from(self)
    }
}

impl RawToken for u64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_token(token: &Value) -> Option<Self> {
        token.as_u64()
    }

    fn into_token(self) -> Value {
        Value::from(self)
    }
}

impl RawToken for f64 {
    const TYPE_NAME: &'static str = "number";

    fn from_token(token: &Value) -> Option<Self> {
        token.as_f64()
    }

    fn into_token(self) -> Value {
        Value::from(self)
    }
}

impl RawToken for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_token(token: &Value) -> Option<Self> {
        token.as_bool()
    }

    fn into_token(self) -> Value {
        Value::Bool(self)
    }
}

/// The validating constructor a domain value type exposes to the pipeline.
///
/// `try_construct` receives the already-extracted primitive and the field
/// name currently being read (for validators that want it in attributions);
/// it returns `stillwater::Validation` and never panics for domain-invalid
/// input.
///
/// # Example
///
/// ```rust
/// use dragnet::{ConstructError, ConstructResult, TryConstruct};
/// use stillwater::Validation;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Percentage(i64);
///
/// impl TryConstruct for Percentage {
///     type Raw = i64;
///
///     fn try_construct(raw: i64, _field: &str) -> ConstructResult<Self> {
///         if (0..=100).contains(&raw) {
///             Validation::Success(Percentage(raw))
///         } else {
///             Validation::Failure(ConstructError::message(format!(
///                 "must be between 0 and 100, got {}",
///                 raw
///             )))
///         }
///     }
///
///     fn raw(&self) -> i64 {
///         self.0
///     }
/// }
/// ```
pub trait TryConstruct: Sized + Send + 'static {
    /// The primitive representation this type is built from.
    type Raw: RawToken;

    /// Attempts to build the domain value, accumulating violations into a
    /// [`ConstructError`] on failure.
    fn try_construct(raw: Self::Raw, field: &str) -> ConstructResult<Self>;

    /// Returns the raw primitive representation, for the write path.
    fn raw(&self) -> Self::Raw;

    /// The field name used for recorded errors when no name-aware wrapper
    /// has set one.
    ///
    /// The fallback is deterministic and stable: the final segment of the
    /// type path with its first letter lowercased (`EmailAddress` →
    /// `emailAddress`).
    fn default_field_name() -> String {
        derive_field_name(std::any::type_name::<Self>())
    }
}

/// A typed validating converter for one output type.
///
/// `read` never fails loudly for bad input: domain-invalid or malformed
/// tokens are recorded into the scope's current collector and surface as
/// `None`, the absence sentinel, so sibling fields keep being read.
/// `write` is the reverse direction and never touches the collector.
pub trait Converter: Send + Sync {
    /// The value produced by a successful read.
    type Output: Send + 'static;

    /// Reads a token, recording any failure into the current scope.
    fn read(&self, token: &Value, scope: &ScopeManager) -> Option<Self::Output>;

    /// Writes a value back to a token.
    ///
    /// The only error is a pipeline defect (a mis-typed erased write), not
    /// bad data; valid values always serialize.
    fn write(&self, value: &Self::Output) -> Result<Value, PipelineError>;
}

/// A type-erased converter, for storage in registries and object readers.
///
/// Every [`Converter`] is a `TokenConverter` through the blanket impl;
/// implement this trait directly only for decorators that wrap an already
/// erased converter.
pub trait TokenConverter: Send + Sync {
    /// Reads a token into a boxed output, or the absence sentinel.
    fn read_token(&self, token: &Value, scope: &ScopeManager) -> Option<Box<dyn Any + Send>>;

    /// Writes a boxed value back to a token.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::WriteType`] if the value is not this
    /// converter's output type — a programming error, not bad input.
    fn write_token(&self, value: &dyn Any) -> Result<Value, PipelineError>;
}

impl<C: Converter> TokenConverter for C {
    fn read_token(&self, token: &Value, scope: &ScopeManager) -> Option<Box<dyn Any + Send>> {
        self.read(token, scope)
            .map(|v| Box::new(v) as Box<dyn Any + Send>)
    }

    fn write_token(&self, value: &dyn Any) -> Result<Value, PipelineError> {
        let typed = value
            .downcast_ref::<C::Output>()
            .ok_or(PipelineError::WriteType {
                expected: std::any::type_name::<C::Output>(),
            })?;
        self.write(typed)
    }
}

/// A defect in the pipeline itself.
///
/// Bad user input never produces a `PipelineError` — it is recorded as
/// field errors instead. These variants indicate a mis-wired program
/// (asking a materialized field for the wrong type, or pushing the wrong
/// type through an erased converter) and intentionally propagate.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A materialized value was requested as a type it is not.
    #[error("materialized value for '{field}' is not a {expected}")]
    FieldType {
        /// The field that was asked for.
        field: String,
        /// The requested type.
        expected: &'static str,
    },

    /// An erased converter was handed a value of the wrong type to write.
    #[error("converter write expected a {expected}")]
    WriteType {
        /// The converter's output type.
        expected: &'static str,
    },
}

/// Returns the JSON type name for a value.
pub fn token_type_name(token: &Value) -> &'static str {
    match token {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Describes a token for shape-mismatch messages: type plus raw value for
/// scalars, type alone for composites.
pub(crate) fn describe_token(token: &Value) -> String {
    match token {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

/// Records every entry of a construct error into the current scope.
///
/// Field-qualified entries keep their own attribution; plain entries are
/// attributed to `field`.
pub(crate) fn record_construct_error(scope: &ScopeManager, field: &str, error: ConstructError) {
    for entry in error.into_entries() {
        match entry.field {
            Some(attributed) => scope.add_error(attributed, entry.message),
            None => scope.add_error(field, entry.message),
        }
    }
}

fn derive_field_name(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let base = base.rsplit("::").next().unwrap_or(base);
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => base.to_string(),
    }
}
