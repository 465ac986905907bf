//! Tests for scope lifecycle: nesting, dedup, and guard discipline.

use dragnet::values::NonEmptyString;
use dragnet::{ErrorReport, FieldError, ObjectReader, ScopeManager};
use serde_json::json;

#[test]
fn test_dedup_idempotence() {
    let scope = ScopeManager::new();
    let _guard = scope.begin_scope();

    scope.add_error("email", "bad format");
    scope.add_error("email", "bad format");

    let report = scope.report().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.field("email").unwrap().len(), 1);
}

#[test]
fn test_nesting_restores_state() {
    let scope = ScopeManager::new();
    let _outer = scope.begin_scope();
    scope.add_error("outer", "invalid");

    {
        let _inner = scope.begin_scope();
        scope.add_error("inner", "invalid");
    }

    let report = scope.report().unwrap();
    assert_eq!(report.len(), 1);
    assert!(report.field("outer").is_some());
    assert!(report.field("inner").is_none());
}

#[test]
fn test_inner_scope_sees_only_its_own_errors() {
    let scope = ScopeManager::new();
    let _outer = scope.begin_scope();
    scope.add_error("outer", "invalid");

    let _inner = scope.begin_scope();
    assert!(!scope.has_errors());
    assert!(scope.report().is_none());
}

#[test]
fn test_errors_outside_any_scope_are_tolerated() {
    let scope = ScopeManager::new();
    scope.add_error("anything", "ignored");
    scope.add_report(&ErrorReport::single(FieldError::new("more", "ignored")));

    assert!(!scope.has_errors());
    assert!(scope.report().is_none());
}

#[test]
fn test_scope_survives_reuse_after_close() {
    let scope = ScopeManager::new();

    {
        let _guard = scope.begin_scope();
        scope.add_error("first", "invalid");
        assert!(scope.has_errors());
    }

    // A fresh scope on the same manager starts clean.
    let _guard = scope.begin_scope();
    assert!(!scope.has_errors());
    scope.add_error("second", "invalid");

    let report = scope.report().unwrap();
    assert!(report.field("first").is_none());
    assert!(report.field("second").is_some());
}

#[test]
fn test_reader_errors_confined_to_inner_scope() {
    let scope = ScopeManager::new();
    let _outer = scope.begin_scope();

    let reader = ObjectReader::new().field::<NonEmptyString>("name");

    {
        let _inner = scope.begin_scope();
        reader.read(&json!({"name": ""}), &scope);
        assert!(scope.has_errors());
    }

    // The outer scope never saw the inner walk's failures.
    assert!(scope.report().is_none());
}

#[test]
fn test_batch_merge_applies_dedup_rules() {
    let scope = ScopeManager::new();
    let _guard = scope.begin_scope();
    scope.add_error("email", "bad format");

    let incoming = ErrorReport::from_vec(vec![
        FieldError::new("email", "bad format").with_message("too long"),
        FieldError::new("name", "required"),
    ]);
    scope.add_report(&incoming);

    let report = scope.report().unwrap();
    assert_eq!(report.len(), 2);
    let email: Vec<_> = report.field("email").unwrap().messages().collect();
    assert_eq!(email, vec!["bad format", "too long"]);
}

#[test]
fn test_field_and_message_ordering() {
    let scope = ScopeManager::new();
    let _guard = scope.begin_scope();

    scope.add_error("zeta", "m1");
    scope.add_error("alpha", "m1");
    scope.add_error("zeta", "m2");

    let report = scope.report().unwrap();
    let fields: Vec<_> = report.iter().map(|e| e.field().to_string()).collect();
    assert_eq!(fields, vec!["zeta", "alpha"]);
    let zeta: Vec<_> = report.field("zeta").unwrap().messages().collect();
    assert_eq!(zeta, vec!["m1", "m2"]);
}
