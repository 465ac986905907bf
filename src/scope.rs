//! Per-operation scope management.
//!
//! This module provides [`ScopeManager`], the context object that carries
//! the current error collector and the current field name through one
//! logical operation. One manager is created per operation (typically one
//! inbound request) and threaded by reference through the conversion
//! pipeline; two concurrent operations never share a manager, which is what
//! keeps their reports isolated without any thread-local state.
//!
//! Scopes and field names follow stack discipline. Both [`begin_scope`]
//! and [`push_field_name`] return guards that restore the previous state on
//! drop, on every exit path.
//!
//! [`begin_scope`]: ScopeManager::begin_scope
//! [`push_field_name`]: ScopeManager::push_field_name

use std::sync::Arc;

use parking_lot::Mutex;

use crate::collector::ErrorCollector;
use crate::error::ErrorReport;

/// The per-operation scope and field-name context.
///
/// Interior mutability is behind `parking_lot` mutexes so that sibling
/// fields of one operation may be processed in parallel while sharing one
/// manager.
///
/// # Example
///
/// ```rust
/// use dragnet::ScopeManager;
///
/// let scope = ScopeManager::new();
/// let _guard = scope.begin_scope();
///
/// scope.add_error("email", "bad format");
/// scope.add_error("email", "bad format"); // duplicate, dropped
///
/// let report = scope.report().unwrap();
/// assert_eq!(report.field("email").unwrap().len(), 1);
/// ```
pub struct ScopeManager {
    collectors: Mutex<Vec<Arc<ErrorCollector>>>,
    field_name: Mutex<Option<String>>,
}

impl ScopeManager {
    /// Creates a manager with no active scope.
    ///
    /// Until [`begin_scope`](Self::begin_scope) is called, error recording
    /// is a tolerated no-op.
    pub fn new() -> Self {
        Self {
            collectors: Mutex::new(Vec::new()),
            field_name: Mutex::new(None),
        }
    }

    /// Opens a new scope: installs a fresh collector as current, leaving
    /// the previous one (if any) captured underneath.
    ///
    /// Dropping the returned guard closes the scope and restores the
    /// previous collector. Scopes nest to arbitrary depth but never merge:
    /// errors recorded in an inner scope are discarded with it.
    ///
    /// Disposing guards out of order is a programming error the manager
    /// does not attempt to detect; the last scope registered is the one a
    /// drop removes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dragnet::ScopeManager;
    ///
    /// let scope = ScopeManager::new();
    /// let _outer = scope.begin_scope();
    /// scope.add_error("outer", "invalid");
    /// {
    ///     let _inner = scope.begin_scope();
    ///     scope.add_error("inner", "invalid");
    /// } // inner scope discarded here
    ///
    /// let report = scope.report().unwrap();
    /// assert!(report.field("outer").is_some());
    /// assert!(report.field("inner").is_none());
    /// ```
    #[must_use = "dropping the guard closes the scope"]
    pub fn begin_scope(&self) -> ScopeGuard<'_> {
        self.collectors.lock().push(Arc::new(ErrorCollector::new()));
        ScopeGuard { manager: self }
    }

    /// Returns the current collector, if a scope is open.
    pub fn current_collector(&self) -> Option<Arc<ErrorCollector>> {
        self.collectors.lock().last().cloned()
    }

    /// Records one message against one field in the current collector.
    ///
    /// A no-op when no scope is open — callers outside any scope are
    /// tolerated, not errors.
    pub fn add_error(&self, field: impl Into<String>, message: impl Into<String>) {
        if let Some(collector) = self.current_collector() {
            collector.add(field, message);
        }
    }

    /// Merges every field/message pair from an existing report into the
    /// current collector, with the usual dedup rules. No-op without a scope.
    pub fn add_report(&self, report: &ErrorReport) {
        if let Some(collector) = self.current_collector() {
            collector.merge_report(report);
        }
    }

    /// Returns true if the current scope has recorded any field error.
    pub fn has_errors(&self) -> bool {
        self.current_collector()
            .is_some_and(|c| c.has_errors())
    }

    /// Builds the current scope's aggregated report, or `None` if the
    /// collector is empty (or no scope is open).
    pub fn report(&self) -> Option<ErrorReport> {
        self.current_collector().and_then(|c| c.report())
    }

    /// Returns the current field name, if one is set.
    pub fn current_field_name(&self) -> Option<String> {
        self.field_name.lock().clone()
    }

    /// Sets the current field name, returning a guard that restores the
    /// previous value on drop.
    ///
    /// This is the save/set/restore slot used by name-aware converters: a
    /// nested value's read temporarily owns the slot, and the parent's name
    /// is restored once the guard drops — whether the read succeeded,
    /// recorded an error, or unwound.
    #[must_use = "dropping the guard restores the previous field name"]
    pub fn push_field_name(&self, name: impl Into<String>) -> FieldNameGuard<'_> {
        let previous = {
            let mut slot = self.field_name.lock();
            std::mem::replace(&mut *slot, Some(name.into()))
        };
        FieldNameGuard {
            manager: self,
            previous,
        }
    }
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for an open scope; dropping it discards the scope's collector and
/// restores the previous one.
#[must_use = "dropping the guard closes the scope"]
pub struct ScopeGuard<'a> {
    manager: &'a ScopeManager,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.manager.collectors.lock().pop();
    }
}

/// Guard for a field-name assignment; dropping it restores the saved
/// previous name.
#[must_use = "dropping the guard restores the previous field name"]
pub struct FieldNameGuard<'a> {
    manager: &'a ScopeManager,
    previous: Option<String>,
}

impl Drop for FieldNameGuard<'_> {
    fn drop(&mut self) {
        *self.manager.field_name.lock() = self.previous.take();
    }
}

// ScopeManager is shared by reference across the threads processing one
// operation's sibling fields.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ScopeManager>();
    assert_sync::<ScopeManager>();
};
