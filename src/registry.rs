//! The type construction registry.
//!
//! This module provides [`ConverterRegistry`], the one structure shared
//! across all logical operations. It maps a domain value type to the three
//! artifacts the pipeline needs for it: the basic converter, the name-aware
//! wrapper factory, and the raw try-construct delegate.
//!
//! The registry is a pure performance/predictability optimization. Callers
//! attempt it first (one map lookup, shared `Arc`s); on a miss they fall
//! back to constructing the same artifacts directly from the type's
//! [`TryConstruct`] capability — see [`converter_for`](crate::converter_for)
//! and friends. Both paths produce behaviorally identical converters.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use stillwater::Validation;

use crate::convert::{
    BasicConverter, Converter, NamedTokenConverter, RawToken, TokenConverter, TryConstruct,
};
use crate::error::ConstructError;

/// The name-aware wrapper factory stored per registered type.
pub type WrapperFactory = Arc<dyn Fn(&str) -> Arc<dyn TokenConverter> + Send + Sync>;

/// The raw try-construct delegate stored per registered type: token in,
/// boxed domain value or construction failure out.
pub type TryConstructFn =
    Arc<dyn Fn(&Value, &str) -> Validation<Box<dyn Any + Send>, ConstructError> + Send + Sync>;

struct RegistryEntry {
    converter: Arc<dyn TokenConverter>,
    wrapper: WrapperFactory,
    construct: TryConstructFn,
}

/// Type alias for the entry storage map.
type EntryMap = Arc<RwLock<HashMap<TypeId, RegistryEntry>>>;

/// A thread-safe registry of pre-built conversion artifacts, keyed by type.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access: any number
/// of operations look artifacts up concurrently (read access) while warm-up
/// registration is serialized (write access). Registration is idempotent
/// with first-write-wins semantics, so concurrent initializers racing on
/// the same type are harmless. `Clone` shares the underlying storage.
///
/// # Optional values
///
/// Lookups normalize optional wrappers structurally: an `Option<T>` field
/// resolves through the entry registered for `T` — register the underlying
/// type, and [`optional_for`](crate::optional_for) layers the optional read
/// semantics on top. There is never a separate `Option<T>` entry.
///
/// # Example
///
/// ```rust
/// use dragnet::ConverterRegistry;
/// use dragnet::values::{EmailAddress, PositiveInt};
///
/// let registry = ConverterRegistry::new();
/// assert!(registry.register::<EmailAddress>());
/// assert!(registry.register::<PositiveInt>());
///
/// // A second registration for the same type is a no-op.
/// assert!(!registry.register::<EmailAddress>());
///
/// assert!(registry.has_converter::<EmailAddress>());
/// ```
pub struct ConverterRegistry {
    entries: EntryMap,
}

impl ConverterRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a type, deriving all three artifacts from its
    /// [`TryConstruct`] capability.
    ///
    /// Returns `true` if the entry was written, `false` if the type was
    /// already registered (first write wins).
    pub fn register<T: TryConstruct>(&self) -> bool {
        self.register_converter::<T, _>(BasicConverter::<T>::new())
    }

    /// Registers a type with an explicit converter; the wrapper factory and
    /// try-construct delegate are still derived.
    ///
    /// Returns `true` if the entry was written, `false` if the type was
    /// already registered (first write wins).
    pub fn register_converter<T, C>(&self, converter: C) -> bool
    where
        T: TryConstruct,
        C: Converter<Output = T> + 'static,
    {
        let mut entries = self.entries.write();
        if entries.contains_key(&TypeId::of::<T>()) {
            return false;
        }

        let converter: Arc<dyn TokenConverter> = Arc::new(converter);
        let wrapper: WrapperFactory = {
            let inner = Arc::clone(&converter);
            Arc::new(move |name: &str| {
                Arc::new(NamedTokenConverter::new(name, Arc::clone(&inner)))
                    as Arc<dyn TokenConverter>
            })
        };
        let construct: TryConstructFn = Arc::new(|token: &Value, field: &str| {
            match T::Raw::from_token(token) {
                Some(raw) => {
                    T::try_construct(raw, field).map(|v| Box::new(v) as Box<dyn Any + Send>)
                }
                None => Validation::Failure(ConstructError::message(format!(
                    "expected {}, got {}",
                    T::Raw::TYPE_NAME,
                    crate::convert::describe_token(token)
                ))),
            }
        });

        entries.insert(
            TypeId::of::<T>(),
            RegistryEntry {
                converter,
                wrapper,
                construct,
            },
        );
        true
    }

    /// Returns true if a converter is registered for `T`.
    pub fn has_converter<T: 'static>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the registered basic converter for `T`, if any.
    pub fn converter<T: 'static>(&self) -> Option<Arc<dyn TokenConverter>> {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .map(|e| Arc::clone(&e.converter))
    }

    /// Returns the registered name-aware wrapper factory for `T`, if any.
    pub fn wrapper_factory<T: 'static>(&self) -> Option<WrapperFactory> {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .map(|e| Arc::clone(&e.wrapper))
    }

    /// Returns the registered try-construct delegate for `T`, if any.
    pub fn try_construct_delegate<T: 'static>(&self) -> Option<TryConstructFn> {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .map(|e| Arc::clone(&e.construct))
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes every entry. Exists for test isolation only; steady-state
    /// code never deletes registrations.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConverterRegistry {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeManager;
    use crate::values::{EmailAddress, NonEmptyString, PositiveInt};
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let registry = ConverterRegistry::new();
        assert!(!registry.has_converter::<EmailAddress>());

        assert!(registry.register::<EmailAddress>());

        assert!(registry.has_converter::<EmailAddress>());
        assert!(registry.converter::<EmailAddress>().is_some());
        assert!(registry.wrapper_factory::<EmailAddress>().is_some());
        assert!(registry.try_construct_delegate::<EmailAddress>().is_some());
        assert!(!registry.has_converter::<PositiveInt>());
    }

    #[test]
    fn test_first_write_wins() {
        let registry = ConverterRegistry::new();
        assert!(registry.register::<PositiveInt>());
        assert!(!registry.register::<PositiveInt>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clone_shares_entries() {
        let registry = ConverterRegistry::new();
        let shared = registry.clone();

        registry.register::<NonEmptyString>();
        assert!(shared.has_converter::<NonEmptyString>());
    }

    #[test]
    fn test_clear_for_test_isolation() {
        let registry = ConverterRegistry::new();
        registry.register::<NonEmptyString>();
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.has_converter::<NonEmptyString>());
    }

    #[test]
    fn test_registered_converter_reads() {
        let registry = ConverterRegistry::new();
        registry.register::<PositiveInt>();

        let converter = registry.converter::<PositiveInt>().unwrap();
        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();

        assert!(converter.read_token(&json!(5), &scope).is_some());
        assert!(converter.read_token(&json!(-5), &scope).is_none());
        assert!(scope.has_errors());
    }

    #[test]
    fn test_wrapper_factory_binds_name() {
        let registry = ConverterRegistry::new();
        registry.register::<EmailAddress>();

        let factory = registry.wrapper_factory::<EmailAddress>().unwrap();
        let converter = factory("contactEmail");

        let scope = ScopeManager::new();
        let _guard = scope.begin_scope();
        assert!(converter.read_token(&json!("bad"), &scope).is_none());

        let report = scope.report().unwrap();
        assert_eq!(report.first().field(), "contactEmail");
    }

    #[test]
    fn test_try_construct_delegate() {
        let registry = ConverterRegistry::new();
        registry.register::<PositiveInt>();

        let construct = registry.try_construct_delegate::<PositiveInt>().unwrap();

        let ok = construct(&json!(5), "count");
        assert!(ok.is_success());
        let boxed = ok.into_result().unwrap();
        assert!(boxed.downcast_ref::<PositiveInt>().is_some());

        let shape = construct(&json!("x"), "count");
        assert!(shape.is_failure());

        let domain = construct(&json!(-5), "count");
        assert!(domain.is_failure());
    }

    #[test]
    fn test_concurrent_registration_is_idempotent() {
        use std::thread;

        let registry = ConverterRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    registry.register::<EmailAddress>();
                    registry.register::<PositiveInt>();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 2);
    }
}
