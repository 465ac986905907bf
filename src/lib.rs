//! # Dragnet
//!
//! A validation aggregation pipeline for fail-slow deserialization:
//! instead of rejecting a payload at the first invalid field, dragnet keeps
//! reading, records every field-level failure into a scoped collector, and
//! hands the boundary one aggregated report per operation.
//!
//! ## Overview
//!
//! Each logical operation (typically one inbound request) owns a
//! [`ScopeManager`], threaded by reference through the conversion pipeline.
//! Converters attempt to build domain values from JSON tokens via each
//! type's [`TryConstruct`] capability; a failure is recorded under the
//! current property name and surfaces as `None`, the absence sentinel, so
//! sibling fields keep being read. After the whole object graph is walked,
//! the boundary asks the scope for the report and short-circuits if one is
//! present.
//!
//! ## Core Types
//!
//! - [`ScopeManager`]: per-operation scope and field-name context
//! - [`ErrorCollector`]: the lock-protected per-operation aggregator
//! - [`ErrorReport`] / [`FieldError`]: the aggregated result, `{field:
//!   [messages...]}`
//! - [`ConverterRegistry`]: pre-built conversion artifacts by type, with a
//!   direct-construction fallback
//! - [`ObjectReader`]: walks one JSON object, field by field
//!
//! ## Example
//!
//! ```rust
//! use dragnet::{ObjectReader, ScopeManager};
//! use dragnet::values::{EmailAddress, NonEmptyString};
//! use serde_json::json;
//!
//! let reader = ObjectReader::new()
//!     .field::<NonEmptyString>("name")
//!     .field::<EmailAddress>("email");
//!
//! let scope = ScopeManager::new();
//! let _guard = scope.begin_scope();
//! let values = reader.read(&json!({"name": "", "email": "not-an-email"}), &scope);
//!
//! // One report, both failures, named after the DTO properties.
//! let report = scope.report().unwrap();
//! assert_eq!(report.to_json(), json!({
//!     "name": ["must not be empty"],
//!     "email": ["is not a valid email address"],
//! }));
//!
//! // Nothing materialized for the failed fields.
//! assert!(values.get::<NonEmptyString>("name").unwrap().is_none());
//! ```

pub mod collector;
pub mod convert;
pub mod error;
pub mod reader;
pub mod registry;
pub mod scope;
pub mod values;

pub use collector::ErrorCollector;
pub use convert::{
    converter_for, named_for, optional_for, token_type_name, BasicConverter, Converter,
    NamedConverter, NamedTokenConverter, OptionalConverter, PipelineError, RawToken,
    TokenConverter, TryConstruct,
};
pub use error::{ConstructEntry, ConstructError, ErrorReport, FieldError};
pub use reader::{MaterializedObject, ObjectReader};
pub use registry::{ConverterRegistry, TryConstructFn, WrapperFactory};
pub use scope::{FieldNameGuard, ScopeGuard, ScopeManager};

/// Type alias for try-construct results carrying a [`ConstructError`].
pub type ConstructResult<T> = stillwater::Validation<T, ConstructError>;
