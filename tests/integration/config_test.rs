//! Configuration Integration Tests

use std::collections::HashMap;

use drupal_agent::models::AgentConfig;
use drupal_agent::AppError;
use drupal_agent_llm::ProviderType;

#[test]
fn test_load_file_then_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
drupal_base_url = "https://file.example"
default_ai_provider = "anthropic"
anthropic_api_key = "sk-from-file"
"#,
    )
    .unwrap();

    let mut config = AgentConfig::from_file(&path).unwrap();
    let env: HashMap<&str, &str> = [("DRUPAL_BASE_URL", "https://env.example/")].into();
    config
        .apply_env(|k| env.get(k).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.drupal_base_url, "https://env.example/");
    assert_eq!(config.graphql_url(), "https://env.example/graphql");
    assert!(config.validate().is_ok());

    let provider = config.provider_config(None).unwrap();
    assert_eq!(provider.provider, ProviderType::Anthropic);
    assert_eq!(provider.api_key.as_deref(), Some("sk-from-file"));
}

#[test]
fn test_invalid_toml_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "drupal_base_url = [").unwrap();

    let err = AgentConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, AppError::Toml(_)));
}

#[test]
fn test_unknown_default_provider() {
    let config = AgentConfig {
        default_ai_provider: "bard".to_string(),
        ..Default::default()
    };
    assert!(config.provider_config(None).is_err());
}
