//! Integration tests for array and record schema validation.

use serde_json::json;
use vetter::{IssueCode, JsonPath, PathSegment, Schema, Validator};

/// Helper to extract the success value from a Validation
fn unwrap_success<T, E: std::fmt::Debug>(v: stillwater::Validation<T, E>) -> T {
    v.into_result().unwrap()
}

/// Helper to extract the error value from a Validation
fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

#[test]
fn test_array_of_strings() {
    let schema = Schema::array(Schema::string().min(1));

    let items = schema.parse(&json!(["hello", "world"])).unwrap();
    assert_eq!(items, vec!["hello".to_string(), "world".to_string()]);

    assert_eq!(schema.parse(&json!([])).unwrap().len(), 0);
}

#[test]
fn test_rejects_non_arrays() {
    let schema = Schema::array(Schema::string());

    for value in [json!("a,b"), json!({"0": "a"}), json!(null)] {
        let error = schema.parse(&value).unwrap_err();
        assert_eq!(error.first_issue().code, IssueCode::InvalidType);
        assert_eq!(error.expected.as_deref(), Some("array"));
    }
}

#[test]
fn test_element_failure_reports_index() {
    let schema = Schema::array(Schema::number().positive());

    let errors = unwrap_failure(schema.validate(Some(&json!([1, -2, 3])), &JsonPath::root()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, IssueCode::NotPositive);
    assert_eq!(errors.first().path.to_string(), "[1]");
}

#[test]
fn test_every_element_is_checked() {
    let schema = Schema::array(Schema::string());
    let error = schema.parse(&json!([1, "ok", true, "fine", null])).unwrap_err();

    let paths: Vec<String> = error.issues.iter().map(|i| i.path.to_dotted()).collect();
    assert_eq!(paths, vec!["0", "2", "4"]);
}

#[test]
fn test_nested_paths() {
    let schema = Schema::object().field(
        "items",
        Schema::array(Schema::object().field("name", Schema::string())),
    );

    let error = schema
        .parse(&json!({"items": [{"name": "a"}, {"name": "b"}, {"name": 3}]}))
        .unwrap_err();

    assert_eq!(error.field, "items.2.name");
    assert_eq!(
        error.field_path.as_slice(),
        &[
            PathSegment::field("items"),
            PathSegment::index(2),
            PathSegment::field("name")
        ]
    );
    assert_eq!(error.first_issue().path.to_string(), "items[2].name");
}

// ====== Length Tests ======

#[test]
fn test_length_constraints() {
    let schema = Schema::array(Schema::number()).min(2).max(3);

    assert!(schema.parse(&json!([1, 2])).is_ok());
    assert!(schema.parse(&json!([1, 2, 3])).is_ok());

    let error = schema.parse(&json!([1])).unwrap_err();
    assert_eq!(error.first_issue().code, IssueCode::TooShort);
    assert_eq!(error.message, "must contain at least 2 items, got 1");
    assert_eq!(error.actual.as_deref(), Some("1 items"));

    let error = schema.parse(&json!([1, 2, 3, 4])).unwrap_err();
    assert_eq!(error.first_issue().code, IssueCode::TooLong);
}

#[test]
fn test_exact_length_and_nonempty() {
    let pair = Schema::array(Schema::number()).length(2);
    assert!(pair.parse(&json!([1, 2])).is_ok());
    assert_eq!(
        pair.parse(&json!([1])).unwrap_err().first_issue().code,
        IssueCode::InvalidLength
    );

    let some = Schema::array(Schema::number()).nonempty();
    assert_eq!(
        some.parse(&json!([])).unwrap_err().first_issue().code,
        IssueCode::TooShort
    );
}

#[test]
fn test_length_checked_only_after_elements_pass() {
    let schema = Schema::array(Schema::string()).min(3);
    let error = schema.parse(&json!([1])).unwrap_err();

    assert_eq!(error.issues.len(), 1);
    assert_eq!(error.first_issue().code, IssueCode::InvalidType);
    assert_eq!(error.field, "0");
}

#[test]
fn test_transformed_elements() {
    let schema = Schema::array(Schema::string().transform(|s| s.len()));
    assert_eq!(schema.parse(&json!(["a", "abc"])).unwrap(), vec![1, 3]);

    let wrapped = Schema::object().field("lengths", schema);
    let parsed = wrapped.parse(&json!({"lengths": ["ab"]})).unwrap();
    assert_eq!(parsed["lengths"], json!([2]));
}

/// Output that never renders as JSON.
struct Opaque;

impl serde::Serialize for Opaque {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("opaque value"))
    }
}

#[test]
fn test_render_failure_reported_at_element() {
    let schema = Schema::object().field(
        "items",
        Schema::array(Schema::string().transform(|s| if s == "bad" { Some(Opaque) } else { None })),
    );

    assert!(schema.parse(&json!({"items": ["ok", "fine"]})).is_ok());

    let error = schema
        .parse(&json!({"items": ["ok", "bad", "bad"]}))
        .unwrap_err();
    assert_eq!(error.issues.len(), 2);
    assert_eq!(error.first_issue().code, IssueCode::TransformationError);
    let fields: Vec<String> = error.issues.iter().map(|i| i.path.to_dotted()).collect();
    assert_eq!(fields, vec!["items.1", "items.2"]);

    // modifiers keep the element path
    let optional = Schema::object().field(
        "items",
        Schema::array(Schema::string().transform(|s| if s == "bad" { Some(Opaque) } else { None }))
            .optional(),
    );
    let error = optional.parse(&json!({"items": ["bad"]})).unwrap_err();
    assert_eq!(error.field, "items.0");
    assert!(optional.parse(&json!({})).is_ok());
}

#[test]
fn test_record_render_failure_reported_at_key() {
    let schema = Schema::record(Schema::boolean().transform(|b| if b { Some(Opaque) } else { None }));

    let error = unwrap_failure(
        schema.validate_to_value(Some(&json!({"on": true, "off": false})), &JsonPath::root()),
    );
    assert_eq!(error.len(), 1);
    assert_eq!(error.first().path, JsonPath::root().push_field("on"));
}

#[test]
fn test_element_accessor() {
    let schema = Schema::array(Schema::string().min(2));
    assert!(schema.element().parse(&json!("ab")).is_ok());
}

// ====== Record Tests ======

#[test]
fn test_record_validates_every_value() {
    let scores = Schema::record(Schema::number().min(0));

    let parsed = scores.parse(&json!({"alice": 10, "bob": 7})).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed["alice"], 10.0);

    let error = scores.parse(&json!({"alice": -1, "bob": "x"})).unwrap_err();
    assert_eq!(error.issues.len(), 2);
    let fields: Vec<String> = error.issues.iter().map(|i| i.path.to_dotted()).collect();
    assert!(fields.contains(&"alice".to_string()));
    assert!(fields.contains(&"bob".to_string()));
}

#[test]
fn test_record_rejects_non_objects() {
    let error = Schema::record(Schema::string())
        .parse(&json!(["a"]))
        .unwrap_err();
    assert_eq!(error.first_issue().code, IssueCode::InvalidType);
    assert_eq!(error.expected.as_deref(), Some("object"));
}

#[test]
fn test_record_empty_object() {
    let parsed = unwrap_success(
        Schema::record(Schema::boolean()).validate(Some(&json!({})), &JsonPath::root()),
    );
    assert!(parsed.is_empty());
}

#[test]
fn test_record_inside_object_renders_values() {
    let schema = Schema::object().field(
        "labels",
        Schema::record(Schema::string().uppercase()),
    );

    let parsed = schema.parse(&json!({"labels": {"env": "prod"}})).unwrap();
    assert_eq!(parsed["labels"], json!({"env": "PROD"}));
}
