//! Integration tests for env parsing and env-to-options merging.

use esbridge_config::{ConnectionEnv, EnvParseError, build_client_config, load_connection_options_from_path};
use esbridge_shared::ErrorCode;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let contents = fs::read_to_string(fixture_path(relative))?;
    Ok(serde_json::from_str(&contents)?)
}

#[test]
fn env_fixture_alone_builds_a_client_config() -> Result<(), Box<dyn Error>> {
    let env = ConnectionEnv::from_map(&read_env_map("env.valid.json")?)?;
    let options = load_connection_options_from_path(None, &env)?;
    let config = build_client_config(&options);

    assert_eq!(config.node, "https://env.internal:9400");
    assert_eq!(config.auth.username.as_deref(), Some("svc-reporting"));
    assert_eq!(
        config.auth.password.as_ref().map(|password| password.expose()),
        Some("from-env")
    );
    assert_eq!(config.residual.request_timeout_ms, Some(2500));
    assert_eq!(config.residual.name.as_deref(), Some("env-client"));
    Ok(())
}

#[test]
fn env_overrides_win_over_file_values() -> Result<(), Box<dyn Error>> {
    let env = ConnectionEnv::from_map(&read_env_map("env.valid.json")?)?;
    let path = fixture_path("options.valid.json");
    let options = load_connection_options_from_path(Some(&path), &env)?;

    assert_eq!(options.host.as_deref(), Some("env.internal"));
    assert_eq!(options.port, Some(9400));
    assert_eq!(options.username.as_deref(), Some("svc-reporting"));
    assert_eq!(options.name.as_deref(), Some("env-client"));
    // untouched by env
    assert_eq!(options.max_retries, Some(5));
    assert_eq!(options.ssl_validate, Some(false));
    Ok(())
}

#[test]
fn invalid_bool_is_rejected_with_metadata() -> Result<(), Box<dyn Error>> {
    let mut map = BTreeMap::new();
    map.insert("ESBRIDGE_SSL".to_owned(), "maybe".to_owned());

    let error = ConnectionEnv::from_map(&map).err();
    assert!(matches!(error, Some(EnvParseError::InvalidBool { .. })));

    let envelope: esbridge_shared::ErrorEnvelope =
        error.ok_or("expected env parse error")?.into();
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_bool"));
    assert_eq!(envelope.metadata.get("value").map(String::as_str), Some("maybe"));
    Ok(())
}
