//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{Args, Parser, Subcommand};
use commands::{CommandContext, run_config_check, run_config_show, run_ping};
use error::{CliError, ExitCode};
use esbridge_config::UnknownOptionPolicy;
use format::{OutputArgs, OutputMode};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Env var holding the `tracing` filter directives.
const LOG_ENV: &str = "ESBRIDGE_LOG";
/// Prefix of the env vars that override connection options.
const ENV_PREFIX: &str = "ESBRIDGE_";

#[derive(Debug, Parser)]
#[command(
    name = "esbridge",
    version,
    about = "Check, show, and ping search connection options",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Connection option commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Connect, ping the node, and disconnect.
    Ping {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate option names and values.
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the resolved client config with secrets redacted.
    Show {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where options come from.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Options file (JSON/TOML). `ESBRIDGE_*` env vars override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Warn about unknown option names instead of failing.
    #[arg(long)]
    allow_unknown: bool,
}

impl SourceArgs {
    const fn policy(&self) -> UnknownOptionPolicy {
        if self.allow_unknown {
            UnknownOptionPolicy::Warn
        } else {
            UnknownOptionPolicy::Reject
        }
    }
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let mode = OutputMode::from_args(&cli.output);
    let env = collect_scoped_env(ENV_PREFIX);

    match run(&cli.command, mode, &env).await {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

async fn run(
    command: &Commands,
    mode: OutputMode,
    env: &BTreeMap<String, String>,
) -> Result<CliOutput, CliError> {
    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Check { source } => {
                run_config_check(&context(source, mode, env))
            },
            ConfigCommands::Show { source } => run_config_show(&context(source, mode, env)),
        },
        Commands::Ping { source } => run_ping(&context(source, mode, env)).await,
    }
}

fn context<'a>(
    source: &'a SourceArgs,
    mode: OutputMode,
    env: &'a BTreeMap<String, String>,
) -> CommandContext<'a> {
    CommandContext {
        env,
        config: source.config.as_deref(),
        policy: source.policy(),
        mode,
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

fn collect_scoped_env(prefix: &str) -> BTreeMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(prefix))
        .collect()
}
