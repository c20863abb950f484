//! Field collection tests
//!
//! Drives the collector with scripted answers against the built-in schemas.

mod common;

use common::ScriptedPrompter;
use hostbook_core::crud::FieldCollector;
use hostbook_core::profile::{fields, FieldSchema, FieldType, FieldValues, ProfileSchema};
use hostbook_core::{ProfileError, TypeCatalog};
use serde_json::{json, Value};

fn schema(profile_type: &str) -> ProfileSchema {
    TypeCatalog::with_builtins()
        .schema(profile_type)
        .cloned()
        .unwrap()
}

#[test]
fn test_http_full_answers() {
    let mut prompter = ScriptedPrompter::new()
        .typed("myhost:443")
        .typed("alice")
        .typed("secret")
        .picked(1)
        .typed("/api")
        .typed("");

    let values = FieldCollector::new(&mut prompter)
        .collect(&schema("http"), None)
        .unwrap();

    assert_eq!(values[fields::HOST], json!("myhost"));
    assert_eq!(values[fields::PORT], json!(443));
    assert_eq!(values[fields::USER], json!("alice"));
    assert_eq!(values[fields::PASSWORD], json!("secret"));
    assert_eq!(values[fields::REJECT_UNAUTHORIZED], json!(false));
    assert_eq!(values[fields::BASE_PATH], json!("/api"));
    assert_eq!(values[fields::PROTOCOL], Value::Null);

    // port was part of the host answer, so it was never asked
    assert_eq!(prompter.seen_inputs.len(), 5);
    assert!(prompter.seen_inputs[2].password);
}

#[test]
fn test_non_numeric_port_uses_schema_default() {
    let mut prompter = ScriptedPrompter::new()
        .typed("myhost")
        .typed("abc")
        .typed("")
        .typed("")
        .picked(0)
        .typed("")
        .typed("https");

    let values = FieldCollector::new(&mut prompter)
        .collect(&schema("http"), None)
        .unwrap();

    assert_eq!(values[fields::PORT], json!(443));
    assert_eq!(values[fields::USER], Value::Null);
    assert_eq!(values[fields::REJECT_UNAUTHORIZED], json!(true));
}

#[test]
fn test_zero_port_uses_schema_default() {
    let mut prompter = ScriptedPrompter::new()
        .typed("box")
        .typed("0")
        .typed("")
        .typed("")
        .typed("")
        .typed("")
        .typed("");

    let values = FieldCollector::new(&mut prompter)
        .collect(&schema("ssh"), None)
        .unwrap();

    assert_eq!(values[fields::PORT], json!(22));
}

#[test]
fn test_non_numeric_port_without_default_is_invalid() {
    let schema = ProfileSchema::new(
        "custom",
        vec![
            FieldSchema::new(fields::HOST, FieldType::String),
            FieldSchema::new(fields::PORT, FieldType::Number),
        ],
    );
    let mut prompter = ScriptedPrompter::new().typed("myhost").typed("http");

    let err = FieldCollector::new(&mut prompter)
        .collect(&schema, None)
        .unwrap_err();
    assert!(matches!(err, ProfileError::InvalidInput(_)));
}

#[test]
fn test_placeholder_host_skips_port() {
    let mut prompter = ScriptedPrompter::new()
        .typed("https://")
        .typed("")
        .typed("")
        .picked(0)
        .typed("")
        .typed("");

    let values = FieldCollector::new(&mut prompter)
        .collect(&schema("http"), None)
        .unwrap();

    assert_eq!(values[fields::HOST], json!(""));
    assert_eq!(values[fields::PORT], json!(0));
    assert_eq!(prompter.seen_inputs.len(), 5);
}

#[test]
fn test_dismissed_host_cancels() {
    let mut prompter = ScriptedPrompter::new().dismissed();

    let err = FieldCollector::new(&mut prompter)
        .collect(&schema("http"), None)
        .unwrap_err();
    assert!(matches!(err, ProfileError::OperationCancelled(_)));
}

#[test]
fn test_unparseable_host_is_invalid() {
    let mut prompter = ScriptedPrompter::new().typed("not a host");

    let err = FieldCollector::new(&mut prompter)
        .collect(&schema("http"), None)
        .unwrap_err();
    assert!(matches!(err, ProfileError::InvalidInput(_)));
}

#[test]
fn test_reject_unauthorized_requires_a_pick() {
    let mut prompter = ScriptedPrompter::new()
        .typed("myhost:443")
        .typed("")
        .typed("")
        .no_pick();

    let err = FieldCollector::new(&mut prompter)
        .collect(&schema("http"), None)
        .unwrap_err();
    assert!(matches!(err, ProfileError::OperationCancelled(_)));
}

#[test]
fn test_generic_number_and_boolean_fields() {
    let mut prompter = ScriptedPrompter::new()
        .typed("ftp.example.com:2121")
        .typed("bob")
        .typed("")
        .picked(1)
        .typed("soon");

    let values = FieldCollector::new(&mut prompter)
        .collect(&schema("ftp"), None)
        .unwrap();

    assert_eq!(values["secureFtp"], json!(false));
    // non-numeric falls back to the schema default
    assert_eq!(values["connectionTimeout"], json!(10_000));
    assert_eq!(values[fields::PASSWORD], Value::Null);
}

#[test]
fn test_number_without_default_stays_absent() {
    let mut prompter = ScriptedPrompter::new()
        .typed("box:22")
        .typed("")
        .typed("")
        .typed("~/.ssh/id_ed25519")
        .typed("")
        .typed("later");

    let values = FieldCollector::new(&mut prompter)
        .collect(&schema("ssh"), None)
        .unwrap();

    assert_eq!(values["privateKey"], json!("~/.ssh/id_ed25519"));
    assert!(!values.contains_key("handshakeTimeout"));
}

#[test]
fn test_generic_boolean_without_pick_cancels() {
    let mut prompter = ScriptedPrompter::new()
        .typed("ftp.example.com:21")
        .typed("")
        .typed("")
        .no_pick();

    let err = FieldCollector::new(&mut prompter)
        .collect(&schema("ftp"), None)
        .unwrap_err();
    assert!(matches!(err, ProfileError::OperationCancelled(_)));
}

#[test]
fn test_prior_values_prefill_prompts() {
    let mut prior = FieldValues::new();
    prior.insert(fields::HOST.into(), json!("a.example.com"));
    prior.insert(fields::PORT.into(), json!(8443));
    prior.insert(fields::USER.into(), json!("alice"));
    prior.insert(fields::REJECT_UNAUTHORIZED.into(), json!(false));

    let mut prompter = ScriptedPrompter::new()
        .typed("a.example.com:8443")
        .typed("alice")
        .typed("")
        .picked(1)
        .typed("")
        .typed("https");

    FieldCollector::new(&mut prompter)
        .collect(&schema("http"), Some(&prior))
        .unwrap();

    assert_eq!(
        prompter.seen_inputs[0].value.as_deref(),
        Some("a.example.com:8443")
    );
    assert_eq!(prompter.seen_inputs[1].value.as_deref(), Some("alice"));
    assert_eq!(prompter.seen_picks[0].selected, Some(1));
}
