//! # Configuration Tests
//!
//! Exercises the layered loading in `get_config`: YAML file with `${VAR}`
//! substitution, `PDFJSON_` overrides, the credential fallback chain and the
//! startup validation.

use pdfjson::prompts::INVOICE_EXTRACTION_PROMPT;
use pdfjson_server::config::{get_config, ConfigError};
use serial_test::serial;
use std::{env, fs};
use tempfile::{tempdir, TempDir};

/// Clears every environment variable `get_config` consults.
fn clear_env_vars() {
    for name in [
        "GOOGLE_API_KEY",
        "AI_API_KEY",
        "PORT",
        "PDFJSON_PORT",
        "PDFJSON_MAX_UPLOAD_MB",
        "PDFJSON_PROVIDER__PROVIDER",
        "PDFJSON_PROVIDER__MODEL_NAME",
        "PDFJSON_PROVIDER__API_KEY",
        "TEST_PDFJSON_KEY",
    ] {
        env::remove_var(name);
    }
}

/// Writes `content` to a `config.yml` inside a fresh temporary directory.
fn write_config(content: &str) -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, content).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
#[serial]
fn test_gemini_without_credential_fails() {
    clear_env_vars();
    let (_dir, path) = write_config("port: 9191\n");

    let err = get_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("GOOGLE_API_KEY")));
}

#[test]
#[serial]
fn test_defaults_with_google_api_key() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    let (_dir, path) = write_config("port: 9191\n");

    let config = get_config(Some(&path)).expect("config should load");

    assert_eq!(config.port, 9191);
    assert_eq!(config.max_upload_mb, 25);
    assert_eq!(config.provider.provider, "gemini");
    assert_eq!(config.provider.model_name, "gemini-1.5-flash");
    assert_eq!(config.provider.api_key.as_deref(), Some("google-key"));
    assert_eq!(config.prompt_template(), INVOICE_EXTRACTION_PROMPT);
    clear_env_vars();
}

#[test]
#[serial]
fn test_ai_api_key_is_second_fallback() {
    clear_env_vars();
    env::set_var("AI_API_KEY", "generic-key");
    let (_dir, path) = write_config("port: 9191\n");

    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.provider.api_key.as_deref(), Some("generic-key"));

    env::set_var("GOOGLE_API_KEY", "google-key");
    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.provider.api_key.as_deref(), Some("google-key"));
    clear_env_vars();
}

#[test]
#[serial]
fn test_file_substitutes_environment_variables() {
    clear_env_vars();
    env::set_var("TEST_PDFJSON_KEY", "from-substitution");
    let (_dir, path) = write_config(
        r#"
provider:
  provider: "gemini"
  api_key: "${TEST_PDFJSON_KEY}"
  model_name: "gemini-1.5-pro"
"#,
    );

    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.provider.api_key.as_deref(), Some("from-substitution"));
    assert_eq!(config.provider.model_name, "gemini-1.5-pro");
    clear_env_vars();
}

#[test]
#[serial]
fn test_unset_substitution_falls_back_to_environment_credential() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    let (_dir, path) = write_config(
        r#"
provider:
  api_key: "${TEST_PDFJSON_KEY}"
"#,
    );

    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.provider.api_key.as_deref(), Some("google-key"));
    clear_env_vars();
}

#[test]
#[serial]
fn test_prefixed_environment_overrides_file() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    env::set_var("PDFJSON_PROVIDER__MODEL_NAME", "gemini-2.0-flash");
    env::set_var("PDFJSON_MAX_UPLOAD_MB", "7");
    let (_dir, path) = write_config(
        r#"
max_upload_mb: 50
provider:
  model_name: "gemini-1.5-pro"
"#,
    );

    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.provider.model_name, "gemini-2.0-flash");
    assert_eq!(config.max_upload_mb, 7);
    clear_env_vars();
}

#[test]
#[serial]
fn test_template_without_placeholder_fails() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    let (_dir, path) = write_config("prompt_template: \"Extract the invoice.\"\n");

    let err = get_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("{pages_data}")));
    clear_env_vars();
}

#[test]
#[serial]
fn test_custom_template_is_used() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    let (_dir, path) = write_config("prompt_template: \"Extract: {pages_data}\"\n");

    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.prompt_template(), "Extract: {pages_data}");
    clear_env_vars();
}

#[test]
#[serial]
fn test_local_provider_requires_url() {
    clear_env_vars();
    let (_dir, path) = write_config(
        r#"
provider:
  provider: "local"
"#,
    );

    let err = get_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("api_url")));
}

#[test]
#[serial]
fn test_local_provider_needs_no_credential() {
    clear_env_vars();
    let (_dir, path) = write_config(
        r#"
provider:
  provider: "local"
  api_url: "http://localhost:1234/v1/chat/completions"
  model_name: "llama3"
"#,
    );

    let config = get_config(Some(&path)).expect("config should load");
    assert_eq!(config.provider.provider, "local");
    assert!(config.provider.api_key.is_none());
}

#[test]
#[serial]
fn test_unknown_provider_fails() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    let (_dir, path) = write_config(
        r#"
provider:
  provider: "mystery"
"#,
    );

    let err = get_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("mystery")));
    clear_env_vars();
}

#[test]
#[serial]
fn test_zero_upload_limit_fails() {
    clear_env_vars();
    env::set_var("GOOGLE_API_KEY", "google-key");
    let (_dir, path) = write_config("max_upload_mb: 0\n");

    let err = get_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("max_upload_mb")));
    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_override_file_fails() {
    clear_env_vars();
    let err = get_config(Some("/definitely/not/here/config.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}
