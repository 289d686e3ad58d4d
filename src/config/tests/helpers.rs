//! Shared fixtures and helper functions for config tests.

use crate::config::{AppConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_LEVEL};
use ortho_config::MergeComposer;
use rstest::fixture;
use std::sync::Arc;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        url = "https://api.sys.example.com"
        username = "deployer"
        password = "hunter2"
        org = "acme"
        space = "prod"

        [log]
        file = "/tmp/cf_apps.log"
        level = "debug"

        [http]
        timeout_secs = 10
        skip_ssl_validation = true
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        url = "https://api.sys.example.com"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` with every lookup parameter set.
#[fixture]
pub fn complete_app_config() -> AppConfig {
    AppConfig {
        url: Some(String::from("https://api.sys.example.com")),
        username: Some(String::from("deployer")),
        password: Some("hunter2".into()),
        org: Some(String::from("acme")),
        space: Some(String::from("prod")),
        ..AppConfig::default()
    }
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(config.url.is_none(), "url should be None");
    assert!(config.username.is_none(), "username should be None");
    assert!(config.password.is_none(), "password should be None");
    assert!(config.org.is_none(), "org should be None");
    assert!(config.space.is_none(), "space should be None");
    assert!(config.log.file.is_none(), "log.file should be None");
    assert_eq!(
        config.log.level, DEFAULT_LOG_LEVEL,
        "log.level should be the default"
    );
    assert_eq!(
        config.http.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS,
        "http.timeout_secs should be the default"
    );
    assert!(
        !config.http.skip_ssl_validation,
        "http.skip_ssl_validation should be false"
    );
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "org": "file-org",
            "space": "file-space"
        }),
        None,
    );

    composer.push_environment(json!({
        "org": "env-org"
    }));

    Ok(composer)
}
