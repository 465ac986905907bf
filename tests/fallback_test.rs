//! Tests for parity between the registry fast path and the
//! direct-construction fallback.

use dragnet::values::EmailAddress;
use dragnet::{
    named_for, ConstructError, ConstructResult, ConverterRegistry, ObjectReader, ScopeManager,
    TryConstruct,
};
use serde_json::json;
use stillwater::Validation;

/// A three-letter uppercase code, pre-registered in these tests.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegisteredCode(String);

/// The same rules as [`RegisteredCode`], never registered.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnregisteredCode(String);

fn check_code(raw: &str) -> Option<ConstructError> {
    if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_uppercase()) {
        None
    } else {
        Some(ConstructError::message(
            "must be exactly three uppercase letters",
        ))
    }
}

impl TryConstruct for RegisteredCode {
    type Raw = String;

    fn try_construct(raw: String, _field: &str) -> ConstructResult<Self> {
        match check_code(&raw) {
            None => Validation::Success(Self(raw)),
            Some(error) => Validation::Failure(error),
        }
    }

    fn raw(&self) -> String {
        self.0.clone()
    }
}

impl TryConstruct for UnregisteredCode {
    type Raw = String;

    fn try_construct(raw: String, _field: &str) -> ConstructResult<Self> {
        match check_code(&raw) {
            None => Validation::Success(Self(raw)),
            Some(error) => Validation::Failure(error),
        }
    }

    fn raw(&self) -> String {
        self.0.clone()
    }
}

fn report_for(reader: &ObjectReader, payload: &serde_json::Value) -> Option<dragnet::ErrorReport> {
    let scope = ScopeManager::new();
    let _guard = scope.begin_scope();
    reader.read(payload, &scope);
    scope.report()
}

#[test]
fn test_fast_path_and_fallback_report_identically() {
    let registry = ConverterRegistry::new();
    assert!(registry.register::<RegisteredCode>());

    let fast = ObjectReader::with_registry(registry.clone()).field::<RegisteredCode>("code");
    let fallback = ObjectReader::new().field::<UnregisteredCode>("code");

    for payload in [json!({"code": "abc"}), json!({"code": null}), json!({"code": 7})] {
        let fast_report = report_for(&fast, &payload).unwrap();
        let fallback_report = report_for(&fallback, &payload).unwrap();
        assert_eq!(fast_report.to_json(), fallback_report.to_json());
    }
}

#[test]
fn test_both_paths_accept_valid_input() {
    let registry = ConverterRegistry::new();
    registry.register::<RegisteredCode>();

    let fast = ObjectReader::with_registry(registry.clone()).field::<RegisteredCode>("code");
    let fallback = ObjectReader::new().field::<UnregisteredCode>("code");

    let payload = json!({"code": "USD"});
    assert!(report_for(&fast, &payload).is_none());
    assert!(report_for(&fallback, &payload).is_none());
}

#[test]
fn test_named_for_dispatches_by_registration() {
    let registry = ConverterRegistry::new();
    registry.register::<EmailAddress>();

    // Fast path for the registered type, fallback for the rest; the
    // resulting behavior is indistinguishable from the outside.
    let registered = named_for::<EmailAddress>(&registry, "email");
    let fallback = named_for::<UnregisteredCode>(&registry, "code");

    let scope = ScopeManager::new();
    let _guard = scope.begin_scope();
    assert!(registered.read_token(&json!("bad"), &scope).is_none());
    assert!(fallback.read_token(&json!("bad"), &scope).is_none());

    let report = scope.report().unwrap();
    assert_eq!(report.len(), 2);
    assert!(report.field("email").is_some());
    assert!(report.field("code").is_some());
}

#[test]
fn test_fallback_parity_for_optional_fields() {
    let registry = ConverterRegistry::new();
    registry.register::<RegisteredCode>();

    let fast = ObjectReader::with_registry(registry.clone()).optional::<RegisteredCode>("code");
    let fallback = ObjectReader::new().optional::<UnregisteredCode>("code");

    // Null resolves to no-value on both paths.
    let payload = json!({"code": null});
    assert!(report_for(&fast, &payload).is_none());
    assert!(report_for(&fallback, &payload).is_none());

    // Present-but-invalid records on both paths.
    let payload = json!({"code": "nope"});
    let fast_report = report_for(&fast, &payload).unwrap();
    let fallback_report = report_for(&fallback, &payload).unwrap();
    assert_eq!(fast_report.to_json(), fallback_report.to_json());
}
