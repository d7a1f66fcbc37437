//! Parameter Extractor Integration Tests

use drupal_agent::services::intent::{
    clean_project_name, extract_content_params, extract_for_intent, extract_media_params,
    extract_node_params, extract_query_params, extract_site_params, ExtractedParams,
};
use drupal_agent_core::{CoreError, Intent, Params};
use serde_json::{json, Value};

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[test]
fn test_query_limit_capped_at_100() {
    let p = params(json!({"query_type": "latest_nodes", "limit": 500}));
    assert_eq!(extract_query_params(&p).unwrap().limit, 100);
}

#[test]
fn test_query_limit_defaults_to_10() {
    let p = params(json!({"query_type": "latest_nodes"}));
    let query = extract_query_params(&p).unwrap();
    assert_eq!(query.limit, 10);
    assert_eq!(query.content_type, "article");
}

#[test]
fn test_query_limit_accepts_numeric_string() {
    let p = params(json!({"query_type": "latest_nodes", "limit": "25"}));
    assert_eq!(extract_query_params(&p).unwrap().limit, 25);
}

#[test]
fn test_query_limit_rejects_zero() {
    let p = params(json!({"query_type": "latest_nodes", "limit": 0}));
    let err = extract_query_params(&p).unwrap_err();
    assert!(matches!(err, CoreError::InvalidParameter { ref field, .. } if field == "limit"));
}

#[test]
fn test_media_requires_file_path() {
    let err = extract_media_params(&Params::new()).unwrap_err();
    assert!(matches!(err, CoreError::MissingParameter(ref f) if f == "file_path"));
}

#[test]
fn test_media_title_from_filename() {
    let p = params(json!({"file_path": "/uploads/team_photo-2025.jpg"}));
    let media = extract_media_params(&p).unwrap();
    assert_eq!(media.title, "Team Photo 2025");
    assert_eq!(media.alt_text, "");
}

#[test]
fn test_clean_project_name() {
    assert_eq!(clean_project_name("My Cool Site!"), "my-cool-site");
    assert_eq!(clean_project_name("  --Shop__2025-- "), "shop-2025");
}

#[test]
fn test_site_name_without_usable_characters() {
    let p = params(json!({"project_name": "!!!"}));
    let err = extract_site_params(&p).unwrap_err();
    assert!(err.is_parameter_error());
}

#[test]
fn test_content_title_from_topic() {
    let p = params(json!({"topic": "ai in drupal"}));
    let content = extract_content_params(&p).unwrap();
    assert_eq!(content.title.as_deref(), Some("Ai In Drupal"));
    assert_eq!(content.content_type, "article");
}

#[test]
fn test_content_body_wrapped_in_paragraphs() {
    let p = params(json!({"title": "Hello", "body": "First line\n\nSecond   line"}));
    let content = extract_content_params(&p).unwrap();
    assert_eq!(
        content.body.as_deref(),
        Some("<p>First line</p><p>Second line</p>")
    );
}

#[test]
fn test_node_id_must_be_integer() {
    let p = params(json!({"node_id": "forty-five"}));
    let err = extract_node_params(&p).unwrap_err();
    assert!(matches!(err, CoreError::InvalidParameter { ref field, .. } if field == "node_id"));
}

#[test]
fn test_unknown_passes_params_through() {
    let p = params(json!({"raw_command": "hello"}));
    let extracted = extract_for_intent(Intent::Unknown, &p).unwrap();
    assert_eq!(extracted, ExtractedParams::Raw(p));
}
