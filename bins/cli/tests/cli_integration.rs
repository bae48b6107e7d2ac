//! CLI integration tests.

use serde_json::Value;
use std::process::{Command, Output};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn cli_command(args: &[String]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_esbridge"));
    command.args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("ESBRIDGE_") {
            command.env_remove(key);
        }
    }
    command
}

async fn run_cli(
    args: &[&str],
    env: &[(&str, String)],
) -> Result<Output, Box<dyn std::error::Error>> {
    let args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
    let env: Vec<(String, String)> = env
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect();
    let output = tokio::task::spawn_blocking(move || {
        let mut command = cli_command(&args);
        command.envs(env);
        command.output()
    })
    .await??;
    Ok(output)
}

#[tokio::test]
async fn ping_reaches_the_node_with_basic_auth() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        // base64("svc:s3cret")
        .and(header("authorization", "Basic c3ZjOnMzY3JldA=="))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_cli(
        &["ping", "--format", "json", "--quiet"],
        &[
            ("ESBRIDGE_URL", server.uri()),
            ("ESBRIDGE_USERNAME", "svc".to_owned()),
            ("ESBRIDGE_PASSWORD", "s3cret".to_owned()),
        ],
    )
    .await?;

    assert_eq!(output.status.code(), Some(0));
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["node"], format!("{}/", server.uri()));
    Ok(())
}

#[tokio::test]
async fn ping_failure_exits_with_io_code() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let output = run_cli(
        &["ping", "--format", "json"],
        &[("ESBRIDGE_URL", server.uri())],
    )
    .await?;

    assert_eq!(output.status.code(), Some(3));
    let value: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["error"]["code"], "client:http_status");
    assert_eq!(value["error"]["retriable"], true);
    Ok(())
}

#[tokio::test]
async fn config_show_never_prints_the_password() -> TestResult {
    let output = run_cli(
        &["config", "show"],
        &[
            ("ESBRIDGE_HOST", "es.internal".to_owned()),
            ("ESBRIDGE_PASSWORD", "hunter2".to_owned()),
        ],
    )
    .await?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(!stdout.contains("hunter2"));
    assert!(stdout.contains("[REDACTED]"));
    Ok(())
}

#[tokio::test]
async fn unknown_subcommand_is_a_usage_error() -> TestResult {
    let output = run_cli(&["reindex"], &[]).await?;
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
