//! Error types for validation aggregation.
//!
//! This module provides [`FieldError`] and [`ErrorReport`] for the
//! aggregated per-operation report, and [`ConstructError`] for failures
//! reported by domain validating constructors.

mod construct;
mod report;

pub use construct::{ConstructEntry, ConstructError};
pub use report::{ErrorReport, FieldError, DEFAULT_CODE, DEFAULT_TITLE};
