//! Integration test: discover schema trees from several roots and validate
//! payloads against them through [`ValidationService`].
//!
//! Each test builds its schema roots in a temporary directory so the
//! on-disk layout (and therefore every derived identifier) is explicit.

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use vgate_schema::{
    DiscoveryError, DispatchError, RegistryError, SetupError, ValidationConfig,
    ValidationService,
};

/// Write `contents` to `root/rel`, creating parent directories.
fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn config(roots: &[PathBuf]) -> ValidationConfig {
    ValidationConfig {
        schema_paths: roots.to_vec(),
        ..ValidationConfig::default()
    }
}

fn app_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "user/create.schema.json",
        r#"{"type":"object","required":["name"]}"#,
    );
    write(
        dir.path(),
        "user/address.schema.yaml",
        "type: object\nrequired: [city]\nproperties:\n  city:\n    type: string\n",
    );
    write(
        dir.path(),
        "order/create.schema.json",
        r#"{
            "type": "object",
            "required": ["items", "ship_to"],
            "properties": {
                "items": {"type": "array", "minItems": 1},
                "ship_to": {"$ref": "../user/address"}
            }
        }"#,
    );
    write(dir.path(), "notes.txt", "not a schema");
    dir
}

#[test]
fn test_example_scenario() {
    let root = app_root();
    let svc = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap();

    assert!(svc.registry().contains("user/create"));

    let err = svc.validate("user/create", &json!({})).unwrap_err();
    let failure = err.as_failure().expect("expected a validation failure");
    assert_eq!(failure.code, 100);
    assert_eq!(failure.message, "validate error");
    assert_eq!(failure.errors.len(), 1);
    assert!(failure.errors[0].message.contains("name"));

    svc.validate("user/create", &json!({"name": "a"})).unwrap();
}

#[test]
fn test_every_schema_file_registered_under_relative_path() {
    let root = app_root();
    let svc = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap();

    let ids: Vec<&str> = svc.registry().ids().into_iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["order/create", "user/address", "user/create"]);
}

#[test]
fn test_ref_between_derived_identifiers() {
    let root = app_root();
    let svc = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap();

    svc.validate(
        "order/create",
        &json!({"items": [1], "ship_to": {"city": "Oslo"}}),
    )
    .unwrap();

    let err = svc
        .validate("order/create", &json!({"items": [1], "ship_to": {}}))
        .unwrap_err();
    let failure = err.as_failure().unwrap();
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(failure.errors[0].instance_path, "/ship_to");
}

#[test]
fn test_sibling_ref_resolves_within_directory() {
    let root = tempfile::tempdir().unwrap();
    write(
        root.path(),
        "user/address.schema.json",
        r#"{"type":"object","required":["city"]}"#,
    );
    write(
        root.path(),
        "user/create.schema.json",
        r#"{"type":"object","properties":{"home":{"$ref":"address"}}}"#,
    );

    let svc = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap();
    svc.validate("user/create", &json!({"home": {"city": "Oslo"}}))
        .unwrap();

    let err = svc
        .validate("user/create", &json!({"home": {}}))
        .unwrap_err();
    assert_eq!(err.as_failure().unwrap().errors[0].instance_path, "/home");
}

#[test]
fn test_root_relative_ref_from_nested_schema_rejected() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "user/address.schema.json", r#"{"type":"object"}"#);
    write(
        root.path(),
        "user/create.schema.json",
        r#"{"properties":{"home":{"$ref":"user/address"}}}"#,
    );

    let err = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap_err();
    assert!(
        matches!(err, SetupError::Registry(RegistryError::Compile { ref schema_id, .. }) if schema_id == "user/create"),
        "got: {err}"
    );
}

#[test]
fn test_multiple_roots_in_order() {
    let first = app_root();
    let second = tempfile::tempdir().unwrap();
    write(
        second.path(),
        "admin/login.schema.json",
        r#"{"type":"object","required":["token"]}"#,
    );

    let svc = ValidationService::from_config(&config(&[
        first.path().to_path_buf(),
        second.path().to_path_buf(),
    ]))
    .unwrap();

    assert_eq!(svc.registry().len(), 4);
    svc.validate("admin/login", &json!({"token": "t"})).unwrap();
}

#[test]
fn test_duplicate_identifier_across_roots_rejected() {
    let first = app_root();
    let second = tempfile::tempdir().unwrap();
    write(second.path(), "user/create.schema.json", r#"{"type":"object"}"#);

    let err = ValidationService::from_config(&config(&[
        first.path().to_path_buf(),
        second.path().to_path_buf(),
    ]))
    .unwrap_err();

    match err {
        SetupError::Discovery(DiscoveryError::Registry(RegistryError::DuplicateId {
            id,
            source_path,
            existing,
        })) => {
            assert_eq!(id, "user/create");
            assert!(source_path.starts_with(&second.path().display().to_string()));
            assert!(existing.starts_with(&first.path().display().to_string()));
        }
        other => panic!("expected DuplicateId, got: {other}"),
    }
}

#[test]
fn test_unparsable_file_aborts_startup() {
    let root = app_root();
    write(root.path(), "user/broken.schema.json", "{\"type\": ");

    let err = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap_err();
    let full = root.path().join("user/broken.schema.json");
    assert!(
        err.to_string().contains(&full.display().to_string()),
        "error should name {}: {err}",
        full.display()
    );
}

#[test]
fn test_invalid_schema_aborts_startup() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "bad.schema.json", r#"{"type":"objekt"}"#);

    let err = ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap_err();
    assert!(
        matches!(err, SetupError::Registry(RegistryError::Compile { ref schema_id, .. }) if schema_id == "bad"),
        "got: {err}"
    );
}

#[test]
fn test_missing_default_root_yields_empty_registry() {
    let root = tempfile::tempdir().unwrap();
    let svc =
        ValidationService::from_config(&config(&[root.path().join("app").join("validation")]))
            .unwrap();
    assert!(svc.registry().is_empty());
    assert!(matches!(
        svc.validate("anything", &json!({})),
        Err(DispatchError::SchemaNotDefined(_))
    ));
}

#[test]
fn test_invalid_fail_status_rejected_before_discovery() {
    let cfg = ValidationConfig {
        schema_paths: vec![PathBuf::from("/definitely/not/here")],
        fail_status: Some(1000),
        ..ValidationConfig::default()
    };
    assert!(matches!(
        ValidationService::from_config(&cfg),
        Err(SetupError::Config(_))
    ));
}

#[test]
fn test_concurrent_validation() {
    let root = app_root();
    let svc = std::sync::Arc::new(
        ValidationService::from_config(&config(&[root.path().to_path_buf()])).unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let svc = std::sync::Arc::clone(&svc);
            std::thread::spawn(move || {
                let data = if i % 2 == 0 {
                    json!({"name": format!("user-{i}")})
                } else {
                    json!({})
                };
                svc.validate("user/create", &data).is_ok()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, ok) in results.into_iter().enumerate() {
        assert_eq!(ok, i % 2 == 0);
    }
}
