//! Validating converters and the dispatch policy over the registry.
//!
//! A converter turns one token into one domain value, recording every
//! failure into the current scope instead of propagating it. This module
//! provides the converter traits, the required/optional variants, the
//! property-name-aware decorators, and the dispatch functions that pick
//! between a registry's pre-built artifacts and direct construction.
//!
//! # Dispatch policy
//!
//! [`converter_for`], [`named_for`] and [`optional_for`] always try the
//! registry first; on a miss they build the artifact directly from the
//! type's [`TryConstruct`] capability. The two paths are behaviorally
//! identical — the registry only buys shared, pre-built instances and a
//! place to install custom converters at startup.
//!
//! # Example
//!
//! ```rust
//! use dragnet::{named_for, ConverterRegistry, ScopeManager};
//! use dragnet::values::EmailAddress;
//! use serde_json::json;
//!
//! let registry = ConverterRegistry::new();
//! // Not registered: named_for falls back to direct construction.
//! let converter = named_for::<EmailAddress>(&registry, "email");
//!
//! let scope = ScopeManager::new();
//! let _guard = scope.begin_scope();
//! assert!(converter.read_token(&json!("not-an-email"), &scope).is_none());
//! assert_eq!(scope.report().unwrap().first().field(), "email");
//! ```

mod basic;
mod named;
mod optional;
mod traits;

use std::sync::Arc;

pub use basic::BasicConverter;
pub use named::{NamedConverter, NamedTokenConverter};
pub use optional::OptionalConverter;
pub use traits::{token_type_name, Converter, PipelineError, RawToken, TokenConverter, TryConstruct};

pub(crate) use traits::{describe_token, REQUIRED_MESSAGE};

use crate::registry::ConverterRegistry;

/// Returns the basic converter for `T`: the registry's shared instance if
/// one is registered, else a freshly built [`BasicConverter`].
pub fn converter_for<T: TryConstruct>(registry: &ConverterRegistry) -> Arc<dyn TokenConverter> {
    registry
        .converter::<T>()
        .unwrap_or_else(|| Arc::new(BasicConverter::<T>::new()))
}

/// Returns the name-bound converter for `T`: built by the registry's
/// wrapper factory if `T` is registered, else by wrapping a fresh
/// [`BasicConverter`].
pub fn named_for<T: TryConstruct>(
    registry: &ConverterRegistry,
    name: &str,
) -> Arc<dyn TokenConverter> {
    match registry.wrapper_factory::<T>() {
        Some(factory) => factory(name),
        None => Arc::new(NamedTokenConverter::new(
            name,
            Arc::new(BasicConverter::<T>::new()),
        )),
    }
}

/// Returns the name-bound optional converter for an `Option<T>` field.
///
/// Optional lookups normalize to the underlying `T`: a registration for `T`
/// satisfies the lookup, and its converter does the reading with the
/// null-is-a-valid-no-value semantics layered on top. Without an entry, a
/// fresh [`OptionalConverter`] is built — behaviorally identical.
pub fn optional_for<T: TryConstruct>(
    registry: &ConverterRegistry,
    name: &str,
) -> Arc<dyn TokenConverter> {
    let inner: Arc<dyn TokenConverter> = match registry.converter::<T>() {
        Some(registered) => Arc::new(optional::OptionalTokenConverter::<T>::new(registered)),
        None => Arc::new(OptionalConverter::<T>::new()),
    };
    Arc::new(NamedTokenConverter::new(name, inner))
}
