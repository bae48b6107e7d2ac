//! Integration tests for parsing option fixtures and building client configs.

use esbridge_config::{
    ApiKey, Compression, ConnectionEnv, NodeFilter, NodeSelector, ResurrectStrategy, TlsSettings,
    build_client_config, load_connection_options_from_path, load_raw_options_from_path,
    parse_connection_options_json, parse_connection_options_toml,
};
use esbridge_shared::ErrorCode;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(fixture_path(relative))?)
}

#[test]
fn parses_valid_fixture_into_typed_options() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("options.valid.json")?;
    let options = parse_connection_options_json(&contents)?;

    assert_eq!(options.host.as_deref(), Some("search.internal"));
    assert_eq!(options.port, Some(9243));
    assert_eq!(options.ssl, Some(true));
    assert_eq!(options.ssl_ca.as_ref().map(Vec::len), Some(2));
    assert!(matches!(
        options.api_key,
        Some(ApiKey::Credentials { ref id, .. }) if id == "ingest"
    ));
    assert_eq!(options.resurrect_strategy, Some(ResurrectStrategy::Optimistic));
    assert_eq!(options.compression, Some(Compression::Gzip));
    assert_eq!(options.node_filter, Some(NodeFilter::Any));
    assert_eq!(options.node_selector, Some(NodeSelector::Random));
    Ok(())
}

#[test]
fn toml_fixture_matches_json_fixture() -> Result<(), Box<dyn Error>> {
    let from_json = parse_connection_options_json(&read_fixture("options.valid.json")?)?;
    let from_toml = parse_connection_options_toml(&read_fixture("options.valid.toml")?)?;
    assert_eq!(from_json, from_toml);
    Ok(())
}

#[test]
fn valid_fixture_builds_a_tls_client_config() -> Result<(), Box<dyn Error>> {
    let options = parse_connection_options_json(&read_fixture("options.valid.json")?)?;
    let config = build_client_config(&options);

    assert_eq!(config.node, "https://search.internal:9243");
    let TlsSettings::Enabled(tls) = &config.ssl else {
        return Err("expected TLS to be enabled".into());
    };
    assert!(!tls.ssl_validate);
    assert_eq!(tls.ssl_ca.as_ref().map(Vec::len), Some(2));

    assert_eq!(config.auth.username.as_deref(), Some("elastic"));
    assert_eq!(config.residual.max_retries, Some(5));
    assert_eq!(config.residual.name.as_deref(), Some("reporting"));
    assert_eq!(
        config.residual.present_option_names(),
        vec![
            "maxRetries",
            "requestTimeoutMS",
            "pingTimeoutMS",
            "resurrectStrategy",
            "suggestCompression",
            "compression",
            "nodeFilter",
            "nodeSelector",
            "name",
        ]
    );
    Ok(())
}

#[test]
fn url_fixture_ignores_host_and_port() -> Result<(), Box<dyn Error>> {
    let options = parse_connection_options_json(&read_fixture("options.url.json")?)?;
    let config = build_client_config(&options);
    assert_eq!(config.node, "https://cluster.example.com:9243");
    assert_eq!(config.ssl, TlsSettings::Disabled);
    Ok(())
}

#[test]
fn unknown_key_fixture_is_rejected_with_suggestion() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("options.unknown-key.json")?;
    let error = parse_connection_options_json(&contents)
        .err()
        .ok_or("expected unknown option error")?;

    assert_eq!(error.code, ErrorCode::new("config", "unknown_option"));
    assert_eq!(error.metadata.get("option").map(String::as_str), Some("ssl_ca"));
    assert_eq!(
        error.metadata.get("suggestion").map(String::as_str),
        Some("sslCA")
    );
    Ok(())
}

#[test]
fn raw_loading_keeps_unknown_keys_for_later_validation() -> Result<(), Box<dyn Error>> {
    let path = fixture_path("options.unknown-key.json");
    let raw = load_raw_options_from_path(Some(&path), &ConnectionEnv::default())?;
    assert!(raw.contains_key("ssl_ca"));

    let error = load_connection_options_from_path(Some(&path), &ConnectionEnv::default()).err();
    assert!(error.is_some());
    Ok(())
}

#[test]
fn missing_file_reports_not_found() {
    let path = fixture_path("does-not-exist.json");
    let error = load_connection_options_from_path(Some(&path), &ConnectionEnv::default()).err();
    assert!(matches!(
        error,
        Some(envelope) if envelope.code == ErrorCode::new("config", "options_file_not_found")
    ));
}

#[test]
fn redacted_dump_of_valid_fixture_has_no_secrets() -> Result<(), Box<dyn Error>> {
    let options = parse_connection_options_json(&read_fixture("options.valid.json")?)?;
    let rendered = build_client_config(&options).to_redacted_json().to_string();

    assert!(!rendered.contains("changeme"));
    assert!(!rendered.contains("c2VjcmV0"));
    assert!(!rendered.contains("MIIBroot"));
    assert!(rendered.contains("[REDACTED]"));
    Ok(())
}
