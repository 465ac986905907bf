//! The object-graph walker.
//!
//! This module provides [`ObjectReader`], which binds DTO property names to
//! name-aware converters and walks one JSON object per call, and
//! [`MaterializedObject`], the typed bag of values that survives the walk.
//!
//! The reader is the piece that turns per-field converters into one
//! aggregated report per payload: every field is visited regardless of how
//! many before it failed, each failure lands in the scope's collector under
//! its property name, and the boundary decides afterwards whether to
//! proceed or short-circuit with `scope.report()`.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::Value;

use crate::convert::{
    describe_token, named_for, optional_for, Converter, NamedTokenConverter, PipelineError,
    TokenConverter, TryConstruct, REQUIRED_MESSAGE,
};
use crate::registry::ConverterRegistry;
use crate::scope::ScopeManager;

/// Field name attributed to a payload that is not an object at all, when no
/// enclosing property name is current.
const ROOT_FIELD: &str = "$";

/// A walker over one JSON object, producing a [`MaterializedObject`] and
/// recording every field failure into the current scope.
///
/// Fields are visited in definition order. A missing key is treated exactly
/// like an explicit `null` (the absent marker). Fields that fail to
/// materialize are simply absent from the output — downstream code must
/// treat them as missing, never as zero-values.
///
/// # Example
///
/// ```rust
/// use dragnet::{ObjectReader, ScopeManager};
/// use dragnet::values::{EmailAddress, NonEmptyString};
/// use serde_json::json;
///
/// let reader = ObjectReader::new()
///     .field::<NonEmptyString>("name")
///     .field::<EmailAddress>("email");
///
/// let scope = ScopeManager::new();
/// let _guard = scope.begin_scope();
/// let values = reader.read(&json!({"name": "", "email": "not-an-email"}), &scope);
///
/// // Both failures are in one report, named after the properties.
/// let report = scope.report().unwrap();
/// assert_eq!(report.len(), 2);
/// assert!(report.field("name").is_some());
/// assert!(report.field("email").is_some());
/// assert!(values.get::<NonEmptyString>("name").unwrap().is_none());
/// ```
pub struct ObjectReader {
    fields: IndexMap<String, Arc<dyn TokenConverter>>,
    registry: ConverterRegistry,
}

impl ObjectReader {
    /// Creates a reader with an empty registry: every field resolves
    /// through direct construction.
    pub fn new() -> Self {
        Self::with_registry(ConverterRegistry::new())
    }

    /// Creates a reader that resolves field converters through `registry`
    /// first, falling back to direct construction.
    pub fn with_registry(registry: ConverterRegistry) -> Self {
        Self {
            fields: IndexMap::new(),
            registry,
        }
    }

    /// Binds a required field of domain type `T` to a property name.
    pub fn field<T: TryConstruct>(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let converter = named_for::<T>(&self.registry, &name);
        self.fields.insert(name, converter);
        self
    }

    /// Binds an optional field of domain type `Option<T>` to a property
    /// name. A missing or null value resolves to "no value" without error.
    pub fn optional<T: TryConstruct>(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let converter = optional_for::<T>(&self.registry, &name);
        self.fields.insert(name, converter);
        self
    }

    /// Binds a property name to an explicit converter, wrapped to attribute
    /// errors to that name.
    pub fn field_with(
        mut self,
        name: impl Into<String>,
        converter: Arc<dyn TokenConverter>,
    ) -> Self {
        let name = name.into();
        let named = Arc::new(NamedTokenConverter::new(name.clone(), converter));
        self.fields.insert(name, named);
        self
    }

    /// Binds a nested object field: the child reader's fields own the
    /// current field name while they are read, and this property's name is
    /// restored afterwards so the parent's remaining siblings attribute
    /// correctly.
    pub fn object(mut self, name: impl Into<String>, reader: ObjectReader) -> Self {
        let name = name.into();
        let nested = Arc::new(NamedTokenConverter::new(
            name.clone(),
            Arc::new(NestedObjectConverter { reader }) as Arc<dyn TokenConverter>,
        ));
        self.fields.insert(name, nested);
        self
    }

    /// Walks the payload sequentially, one field at a time.
    ///
    /// A non-object payload records a single shape error (attributed to the
    /// current field name, or `$` at the root) and yields an empty output.
    pub fn read(&self, token: &Value, scope: &ScopeManager) -> MaterializedObject {
        let Some(object) = token.as_object() else {
            self.record_shape_error(token, scope);
            return MaterializedObject::default();
        };

        let mut values = IndexMap::new();
        for (name, converter) in &self.fields {
            let field_token = object.get(name.as_str()).unwrap_or(&Value::Null);
            if let Some(value) = converter.read_token(field_token, scope) {
                values.insert(name.clone(), value);
            }
        }
        MaterializedObject { values }
    }

    /// Walks the payload with sibling fields in parallel.
    ///
    /// Each field runs against its own child scope; the child reports are
    /// merged into the caller's scope in definition order, so the report is
    /// identical to the sequential walk's.
    pub fn par_read(&self, token: &Value, scope: &ScopeManager) -> MaterializedObject {
        let Some(object) = token.as_object() else {
            self.record_shape_error(token, scope);
            return MaterializedObject::default();
        };

        let bindings: Vec<(&String, &Arc<dyn TokenConverter>)> = self.fields.iter().collect();
        let results: Vec<_> = bindings
            .into_par_iter()
            .map(|(name, converter)| {
                let child = ScopeManager::new();
                let guard = child.begin_scope();
                let field_token = object.get(name.as_str()).unwrap_or(&Value::Null);
                let value = converter.read_token(field_token, &child);
                let report = child.report();
                drop(guard);
                (name.clone(), value, report)
            })
            .collect();

        let mut values = IndexMap::new();
        for (name, value, report) in results {
            if let Some(report) = report {
                scope.add_report(&report);
            }
            if let Some(value) = value {
                values.insert(name, value);
            }
        }
        MaterializedObject { values }
    }

    /// Writes a materialized object back to a JSON object token.
    ///
    /// Absent fields serialize to the null marker.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] only on a mis-typed value — a pipeline
    /// defect, impossible for objects this reader materialized itself.
    pub fn write(&self, values: &MaterializedObject) -> Result<Value, PipelineError> {
        let mut object = serde_json::Map::new();
        for (name, converter) in &self.fields {
            let token = match values.values.get(name.as_str()) {
                Some(boxed) => converter.write_token(boxed.as_ref())?,
                None => Value::Null,
            };
            object.insert(name.clone(), token);
        }
        Ok(Value::Object(object))
    }

    /// Returns the number of bound fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are bound.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn record_shape_error(&self, token: &Value, scope: &ScopeManager) {
        let field = scope
            .current_field_name()
            .unwrap_or_else(|| ROOT_FIELD.to_string());
        scope.add_error(field, format!("expected object, got {}", describe_token(token)));
    }
}

impl Default for ObjectReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapts a child [`ObjectReader`] into a field converter for nesting.
struct NestedObjectConverter {
    reader: ObjectReader,
}

impl Converter for NestedObjectConverter {
    type Output = MaterializedObject;

    fn read(&self, token: &Value, scope: &ScopeManager) -> Option<MaterializedObject> {
        if token.is_null() {
            let field = scope
                .current_field_name()
                .unwrap_or_else(|| ROOT_FIELD.to_string());
            scope.add_error(field, REQUIRED_MESSAGE);
            return None;
        }
        if !token.is_object() {
            self.reader.record_shape_error(token, scope);
            return None;
        }
        Some(self.reader.read(token, scope))
    }

    fn write(&self, value: &MaterializedObject) -> Result<Value, PipelineError> {
        self.reader.write(value)
    }
}

/// The typed bag of values one object walk materialized.
///
/// Fields that failed validation are absent — the absence sentinel — and
/// must be treated as missing by downstream code. Asking for a field as a
/// type it is not is a pipeline defect and propagates as an error rather
/// than being swallowed.
#[derive(Default)]
pub struct MaterializedObject {
    values: IndexMap<String, Box<dyn Any + Send>>,
}

impl MaterializedObject {
    /// Returns a reference to a field's value.
    ///
    /// `Ok(None)` means the field was absent or failed validation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FieldType`] if the field holds a different
    /// type than requested.
    pub fn get<T: 'static>(&self, field: &str) -> Result<Option<&T>, PipelineError> {
        match self.values.get(field) {
            None => Ok(None),
            Some(boxed) => boxed
                .downcast_ref::<T>()
                .map(Some)
                .ok_or_else(|| PipelineError::FieldType {
                    field: field.to_string(),
                    expected: std::any::type_name::<T>(),
                }),
        }
    }

    /// Removes and returns a field's value.
    ///
    /// `Ok(None)` means the field was absent or failed validation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FieldType`] if the field holds a different
    /// type than requested; the value is left in place.
    pub fn take<T: 'static>(&mut self, field: &str) -> Result<Option<T>, PipelineError> {
        match self.values.get(field) {
            None => return Ok(None),
            Some(boxed) if !boxed.is::<T>() => {
                return Err(PipelineError::FieldType {
                    field: field.to_string(),
                    expected: std::any::type_name::<T>(),
                })
            }
            Some(_) => {}
        }
        Ok(self
            .values
            .shift_remove(field)
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed))
    }

    /// Returns true if the field materialized.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Returns the number of materialized fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing materialized.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for MaterializedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterializedObject")
            .field("fields", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
