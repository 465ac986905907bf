//! Field error and aggregated report types.
//!
//! This module provides [`FieldError`] for one field's deduplicated messages
//! and [`ErrorReport`] for the aggregated set of field errors handed to the
//! boundary at the end of one logical operation.

use std::fmt::{self, Display};

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use stillwater::prelude::*;

/// Default report title, used unless overridden with [`ErrorReport::with_title`].
pub const DEFAULT_TITLE: &str = "one or more validation errors occurred";

/// Default machine-readable report code, overridable with [`ErrorReport::with_code`].
pub const DEFAULT_CODE: &str = "validation_failed";

/// One field's validation failures: a field name plus an ordered set of
/// messages.
///
/// Messages are deduplicated by case-sensitive exact match; insertion order
/// is preserved. A `FieldError` always carries at least one message.
///
/// # Example
///
/// ```rust
/// use dragnet::FieldError;
///
/// let error = FieldError::new("email", "bad format")
///     .with_message("too long")
///     .with_message("bad format"); // exact duplicate, dropped
///
/// assert_eq!(error.field(), "email");
/// assert_eq!(error.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: String,
    messages: IndexSet<String>,
}

impl FieldError {
    /// Creates a field error with a single message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut messages = IndexSet::new();
        messages.insert(message.into());
        Self {
            field: field.into(),
            messages,
        }
    }

    /// Adds a message and returns self for chaining. Duplicates are dropped.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.push_message(message);
        self
    }

    /// Adds a message, preserving insertion order.
    ///
    /// Returns `true` if the message was new, `false` if it was an exact
    /// duplicate of one already recorded.
    pub fn push_message(&mut self, message: impl Into<String>) -> bool {
        self.messages.insert(message.into())
    }

    /// Returns the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the messages in insertion order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Returns the number of distinct messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns false since a field error always carries at least one message.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub(crate) fn from_parts(field: String, messages: IndexSet<String>) -> Self {
        Self { field, messages }
    }

    pub(crate) fn into_parts(self) -> (String, IndexSet<String>) {
        (self.field, self.messages)
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.field)?;
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", message)?;
        }
        Ok(())
    }
}

// FieldError is Send + Sync since all fields are owned types. This is
// automatically derived, but we add these assertions to ensure it remains
// true if the types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FieldError>();
    assert_sync::<FieldError>();
};

/// The aggregated, non-empty set of field errors for one logical operation.
///
/// `ErrorReport` wraps a `NonEmptyVec<FieldError>` to guarantee at least one
/// field error is present: an operation with nothing to report produces *no*
/// report (see `ScopeManager::report`), never an empty one. Field order is
/// first-seen order; messages within a field keep insertion order.
///
/// # Combining Reports
///
/// `ErrorReport` implements `Semigroup`. Combining merges per field with the
/// same dedup rules as the collector; the left report's title and code win.
///
/// ```rust
/// use dragnet::{ErrorReport, FieldError};
/// use stillwater::prelude::*;
///
/// let a = ErrorReport::single(FieldError::new("name", "required"));
/// let b = ErrorReport::single(FieldError::new("email", "invalid format"));
///
/// let combined = a.combine(b);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    fields: NonEmptyVec<FieldError>,
    title: String,
    code: String,
}

impl ErrorReport {
    /// Creates a report containing a single field error.
    pub fn single(field: FieldError) -> Self {
        Self::from_non_empty(NonEmptyVec::singleton(field))
    }

    /// Creates a report from a `NonEmptyVec` of field errors with the
    /// default title and code.
    pub fn from_non_empty(fields: NonEmptyVec<FieldError>) -> Self {
        Self {
            fields,
            title: DEFAULT_TITLE.to_string(),
            code: DEFAULT_CODE.to_string(),
        }
    }

    /// Creates a report from a `Vec<FieldError>`.
    ///
    /// Use this when you're certain the vec contains at least one error.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(fields: Vec<FieldError>) -> Self {
        Self::from_non_empty(
            NonEmptyVec::from_vec(fields).expect("ErrorReport requires at least one field error"),
        )
    }

    /// Sets the report title and returns self for chaining.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the machine-readable code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Returns the report title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the machine-readable code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the number of fields in this report.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns false since a report is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the field errors in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.fields.iter()
    }

    /// Returns the first field error.
    pub fn first(&self) -> &FieldError {
        self.fields.head()
    }

    /// Returns the field error for the given field name, if present.
    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.fields.iter().find(|e| e.field() == name)
    }

    /// Converts this report into a `Vec<FieldError>`.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.fields.into_vec()
    }

    /// Renders the report as a `{field: [messages...]}` JSON mapping.
    ///
    /// The envelope around this mapping (status code, problem-details
    /// wrapper) is the boundary's business; the mapping itself is the only
    /// shape the core commits to.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dragnet::{ErrorReport, FieldError};
    /// use serde_json::json;
    ///
    /// let report = ErrorReport::single(
    ///     FieldError::new("email", "bad format").with_message("too long"),
    /// );
    ///
    /// assert_eq!(report.to_json(), json!({"email": ["bad format", "too long"]}));
    /// ```
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for error in self.iter() {
            let messages = error
                .messages()
                .map(|m| Value::String(m.to_string()))
                .collect();
            map.insert(error.field().to_string(), Value::Array(messages));
        }
        Value::Object(map)
    }
}

impl Semigroup for ErrorReport {
    fn combine(self, other: Self) -> Self {
        let mut merged: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for error in self
            .fields
            .into_vec()
            .into_iter()
            .chain(other.fields.into_vec())
        {
            let (field, messages) = error.into_parts();
            merged.entry(field).or_default().extend(messages);
        }
        let fields: Vec<FieldError> = merged
            .into_iter()
            .map(|(field, messages)| FieldError::from_parts(field, messages))
            .collect();
        Self {
            fields: NonEmptyVec::from_vec(fields)
                .expect("combining two non-empty reports yields at least one field"),
            title: self.title,
            code: self.code,
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]:", self.title, self.code)?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}

impl IntoIterator for ErrorReport {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_vec().into_iter()
    }
}

// ErrorReport is Send + Sync since it only contains FieldError and Strings.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ErrorReport>();
    assert_sync::<ErrorReport>();
};
