//! Integration tests for object schemas: fields, unknown keys, shape
//! operations and cross-field refinement.

use serde_json::{json, Map, Value};
use vetter::{IssueCode, JsonPath, Schema, SchemaInfo, UnknownKeys, Validator};

fn user() -> vetter::ObjectSchema {
    Schema::object()
        .field("name", Schema::string().min(1))
        .field("age", Schema::number().integer().nonnegative())
        .field("email", Schema::string().email().optional())
}

#[test]
fn test_valid_object() {
    let parsed = user()
        .parse(&json!({"name": "Alice", "age": 30, "email": "alice@example.com"}))
        .unwrap();

    assert_eq!(parsed["name"], json!("Alice"));
    assert_eq!(parsed["age"], json!(30));
    assert_eq!(parsed["email"], json!("alice@example.com"));
}

#[test]
fn test_rejects_non_objects() {
    for value in [json!([]), json!("{}"), json!(null), json!(1)] {
        let error = user().parse(&value).unwrap_err();
        assert_eq!(error.issues.len(), 1);
        assert_eq!(error.first_issue().code, IssueCode::InvalidType);
        assert_eq!(error.expected.as_deref(), Some("object"));
        assert_eq!(error.field, "");
    }
}

#[test]
fn test_missing_required_field() {
    let error = user().parse(&json!({"name": "Alice"})).unwrap_err();

    assert_eq!(error.field, "age");
    assert_eq!(error.first_issue().code, IssueCode::InvalidType);
    assert_eq!(error.message, "expected number, received undefined");
    assert_eq!(error.actual.as_deref(), Some("undefined"));
}

#[test]
fn test_missing_optional_field_is_omitted() {
    let parsed = user().parse(&json!({"name": "Alice", "age": 30})).unwrap();
    assert!(!parsed.contains_key("email"));
}

#[test]
fn test_all_field_issues_accumulate() {
    let error = user()
        .parse(&json!({"name": "", "age": -1.5, "email": "nope"}))
        .unwrap_err();

    let summary: Vec<(String, IssueCode)> = error
        .issues
        .iter()
        .map(|i| (i.path.to_dotted(), i.code))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("name".to_string(), IssueCode::TooShort),
            ("age".to_string(), IssueCode::NotInteger),
            ("age".to_string(), IssueCode::TooSmall),
            ("email".to_string(), IssueCode::InvalidEmail),
        ]
    );
    assert_eq!(error.field, "name");
    assert_eq!(error.at_path(&JsonPath::root().push_field("age")).len(), 2);
    assert_eq!(error.with_code(IssueCode::InvalidEmail).len(), 1);
}

#[test]
fn test_nested_objects() {
    let schema = Schema::object().field(
        "address",
        Schema::object()
            .field("city", Schema::string())
            .field("zip", Schema::string().length(5)),
    );

    let error = schema
        .parse(&json!({"address": {"city": "Paris", "zip": "123"}}))
        .unwrap_err();
    assert_eq!(error.field, "address.zip");
    assert_eq!(error.first_issue().code, IssueCode::InvalidLength);
}

#[test]
fn test_custom_type_error() {
    let schema = Schema::object().error("payload must be an object");
    assert_eq!(
        schema.parse(&json!(1)).unwrap_err().message,
        "payload must be an object"
    );
}

// ====== Unknown Key Tests ======

#[test]
fn test_unknown_keys_ignored_by_default() {
    let parsed = user()
        .parse(&json!({"name": "Alice", "age": 30, "role": "admin"}))
        .unwrap();
    assert!(!parsed.contains_key("role"));
    assert_eq!(parsed.len(), 2);
    assert!(matches!(user().unknown_keys(), UnknownKeys::Strip));
}

#[test]
fn test_passthrough_keeps_unknown_keys() {
    let parsed = user()
        .passthrough()
        .parse(&json!({"name": "Alice", "age": 30, "role": "admin"}))
        .unwrap();
    assert_eq!(parsed["role"], json!("admin"));
    assert_eq!(parsed.len(), 3);

    // switching back to strip is allowed
    let stripped = user().passthrough().strip();
    assert!(matches!(stripped.unknown_keys(), UnknownKeys::Strip));
}

#[test]
fn test_strict_rejects_each_unknown_key() {
    let error = user()
        .strict()
        .parse(&json!({"name": "Alice", "age": 30, "role": "admin", "team": 1}))
        .unwrap_err();

    assert_eq!(error.issues.len(), 2);
    assert!(error
        .issues
        .iter()
        .all(|i| i.code == IssueCode::UnrecognizedKeys));
    let fields: Vec<String> = error.issues.iter().map(|i| i.path.to_dotted()).collect();
    assert_eq!(fields, vec!["role", "team"]);
    assert_eq!(error.message, "unrecognized key 'role'");
}

#[test]
fn test_strict_reports_field_issues_alongside_unknown_keys() {
    let error = user()
        .strict()
        .parse(&json!({"name": "", "age": 30, "extra": true}))
        .unwrap_err();

    let codes: Vec<IssueCode> = error.issues.iter().map(|i| i.code).collect();
    assert_eq!(codes, vec![IssueCode::TooShort, IssueCode::UnrecognizedKeys]);
}

#[test]
fn test_catchall_validates_unknown_values() {
    let schema = Schema::object()
        .field("id", Schema::number())
        .catchall(Schema::string().trim());

    let parsed = schema
        .parse(&json!({"id": 1, "note": "  hi  "}))
        .unwrap();
    assert_eq!(parsed["note"], json!("hi"));

    let error = schema.parse(&json!({"id": 1, "note": 5})).unwrap_err();
    assert_eq!(error.field, "note");
    assert_eq!(error.first_issue().code, IssueCode::InvalidType);
}

// ====== Shape Tests ======

#[test]
fn test_pick_leaves_parent_unchanged() {
    let full = Schema::object()
        .field("a", Schema::string())
        .field("b", Schema::number());
    let only_a = full.pick(&["a"]);

    let parsed = only_a.parse(&json!({"a": "x", "b": 7})).unwrap();
    let mut expected = Map::new();
    expected.insert("a".to_string(), json!("x"));
    assert_eq!(parsed, expected);

    let error = full.parse(&json!({"a": "x"})).unwrap_err();
    assert_eq!(error.field, "b");
    assert_eq!(full.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_omit() {
    let without_email = user().omit(&["email", "missing"]);
    assert_eq!(without_email.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    assert!(without_email.get("email").is_none());
    assert!(user().get("email").is_some());
}

#[test]
fn test_partial_accepts_empty_object() {
    let patch = user().partial();

    assert_eq!(patch.parse(&json!({})).unwrap().len(), 0);
    // present values are still validated
    let error = patch.parse(&json!({"age": -1})).unwrap_err();
    assert_eq!(error.field, "age");
    assert!(patch.get("name").unwrap().is_optional());
    assert!(!user().get("name").unwrap().is_optional());
}

#[test]
fn test_required_rejects_absent_optional_fields() {
    let schema = Schema::object()
        .field("nickname", Schema::string().optional())
        .field("role", Schema::string().with_default("user"));

    assert!(schema.parse(&json!({})).is_ok());

    let strict = schema.required();
    let error = strict.parse(&json!({})).unwrap_err();
    assert_eq!(error.issues.len(), 2);
    assert_eq!(error.first_issue().code, IssueCode::InvalidType);
    assert_eq!(error.message, "required");
    assert_eq!(error.actual.as_deref(), Some("undefined"));

    assert!(strict
        .parse(&json!({"nickname": "al", "role": "admin"}))
        .is_ok());
}

#[test]
fn test_extend_and_merge() {
    let base = Schema::object().field("id", Schema::number()).strict();
    let named = Schema::object()
        .field("name", Schema::string())
        .field("id", Schema::string().uuid())
        .passthrough();

    let extended = base.extend(&named);
    assert_eq!(extended.keys().collect::<Vec<_>>(), vec!["id", "name"]);
    assert!(matches!(extended.unknown_keys(), UnknownKeys::Strict));
    // the later declaration of "id" wins
    assert_eq!(
        extended
            .parse(&json!({"id": 1, "name": "a"}))
            .unwrap_err()
            .first_issue()
            .code,
        IssueCode::InvalidType
    );

    let merged = base.merge(&named);
    assert!(matches!(merged.unknown_keys(), UnknownKeys::Passthrough));
    assert_eq!(base.keys().count(), 1);
}

// ====== Cross-Field Tests ======

#[test]
fn test_refine_across_fields() {
    let order = Schema::object()
        .field("quantity", Schema::number().integer().positive())
        .field("unit_price", Schema::number().nonnegative())
        .field("total", Schema::number().nonnegative())
        .refine(
            |o: &Map<String, Value>| {
                let n = |k: &str| o.get(k).and_then(Value::as_f64).unwrap_or(0.0);
                n("quantity") * n("unit_price") == n("total")
            },
            "total must equal quantity * unit_price",
        );

    assert!(order
        .parse(&json!({"quantity": 2, "unit_price": 5, "total": 10}))
        .is_ok());

    let error = order
        .parse(&json!({"quantity": 2, "unit_price": 5, "total": 11}))
        .unwrap_err();
    assert_eq!(error.first_issue().code, IssueCode::CustomValidation);
    assert_eq!(error.message, "total must equal quantity * unit_price");
    assert_eq!(error.field, "");
}

#[test]
fn test_refine_runs_only_after_fields_pass() {
    let calls = std::sync::atomic::AtomicUsize::new(0);
    let range = Schema::object()
        .field("start", Schema::number())
        .field("end", Schema::number())
        .refine(
            |o| {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                o["start"].as_f64() <= o["end"].as_f64()
            },
            "start must not be after end",
        );

    let error = range.parse(&json!({"start": "a", "end": 1})).unwrap_err();
    assert_eq!(error.field, "start");
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

    assert!(range.parse(&json!({"start": 5, "end": 1})).is_err());
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn test_password_confirmation() {
    let signup = Schema::object()
        .field("password", Schema::string().min(8))
        .field("confirm", Schema::string())
        .refine(|o| o["password"] == o["confirm"], "passwords do not match");

    assert!(signup
        .parse(&json!({"password": "hunter22", "confirm": "hunter22"}))
        .is_ok());
    assert_eq!(
        signup
            .parse(&json!({"password": "hunter22", "confirm": "hunter23"}))
            .unwrap_err()
            .message,
        "passwords do not match"
    );
}
