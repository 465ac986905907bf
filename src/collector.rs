//! The scoped error collector.
//!
//! This module provides [`ErrorCollector`], the mutable, lock-protected
//! aggregator of field errors that lives for the duration of one logical
//! operation. Collectors are created and discarded by `ScopeManager`; they
//! are never shared across operations and never persisted.

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;

use crate::error::{ErrorReport, FieldError};

/// A per-operation aggregator of field errors.
///
/// Field order is first-seen order; messages within a field are
/// deduplicated by exact match and keep insertion order. The internal lock
/// guards against concurrent mutation within a single operation (sibling
/// fields may be processed in parallel) — it is not a cross-operation
/// coordination point, since each operation owns its own collector.
///
/// # Example
///
/// ```rust
/// use dragnet::ErrorCollector;
///
/// let collector = ErrorCollector::new();
/// collector.add("email", "bad format");
/// collector.add("email", "bad format"); // duplicate, dropped
/// collector.add("name", "required");
///
/// let report = collector.report().unwrap();
/// assert_eq!(report.len(), 2);
/// assert_eq!(report.field("email").unwrap().len(), 1);
/// ```
pub struct ErrorCollector {
    fields: Mutex<IndexMap<String, IndexSet<String>>>,
}

impl ErrorCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self {
            fields: Mutex::new(IndexMap::new()),
        }
    }

    /// Records one message against one field.
    ///
    /// An exact duplicate of a message already recorded for the field is
    /// dropped.
    pub fn add(&self, field: impl Into<String>, message: impl Into<String>) {
        let mut fields = self.fields.lock();
        fields
            .entry(field.into())
            .or_default()
            .insert(message.into());
    }

    /// Merges every field/message pair from an existing report, with the
    /// same dedup rules as [`add`](Self::add).
    pub fn merge_report(&self, report: &ErrorReport) {
        let mut fields = self.fields.lock();
        for error in report.iter() {
            let entry = fields.entry(error.field().to_string()).or_default();
            for message in error.messages() {
                entry.insert(message.to_string());
            }
        }
    }

    /// Returns true if any field error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.fields.lock().is_empty()
    }

    /// Returns the number of fields with at least one recorded error.
    pub fn field_count(&self) -> usize {
        self.fields.lock().len()
    }

    /// Builds the aggregated report, or `None` if nothing was recorded.
    ///
    /// An empty collector yields no report, never an empty report.
    pub fn report(&self) -> Option<ErrorReport> {
        let fields = self.fields.lock();
        if fields.is_empty() {
            return None;
        }
        let mut out = Vec::with_capacity(fields.len());
        for (name, messages) in fields.iter() {
            let mut iter = messages.iter();
            let Some(first) = iter.next() else { continue };
            let mut error = FieldError::new(name.clone(), first.clone());
            for message in iter {
                error.push_message(message.clone());
            }
            out.push(error);
        }
        if out.is_empty() {
            None
        } else {
            Some(ErrorReport::from_vec(out))
        }
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}
