// crates/saml-relay-cli/src/main.rs
// ============================================================================
// Module: SAML Relay CLI Entry Point
// Description: Command dispatcher for relay server and config validation.
// Purpose: Provide a small operator CLI for running and checking relays.
// Dependencies: clap, saml-relay-config, saml-relay-server, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The SAML relay CLI runs the HTTP relay server (`serve`) and validates
//! configuration files without binding a listener (`check-config`). All
//! fallible work returns errors to the dispatcher, which writes a single
//! diagnostic line to stderr and exits non-zero.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use saml_relay_config::RelayConfig;
use saml_relay_server::RelayServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "saml-relay", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the relay HTTP server.
    Serve(ServeCommand),
    /// Validate a configuration file and print the relay table.
    CheckConfig(CheckConfigCommand),
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `check-config` command.
#[derive(Args, Debug)]
struct CheckConfigCommand {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a single diagnostic message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("saml-relay {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::CheckConfig(command) => command_check_config(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = RelayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("configuration load failed: {err}")))?;
    let bind = config
        .bind_addr()
        .map_err(|err| CliError::new(format!("configuration invalid: {err}")))?;
    write_stderr_line(&format!("saml-relay listening on {bind}"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let server = RelayServer::from_config(config)
        .map_err(|err| CliError::new(format!("server startup failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server terminated: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Check-Config Command
// ============================================================================

/// Executes the `check-config` command.
fn command_check_config(command: &CheckConfigCommand) -> CliResult<ExitCode> {
    let config = RelayConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("configuration invalid: {err}")))?;
    let instances = config
        .instances()
        .map_err(|err| CliError::new(format!("configuration invalid: {err}")))?;
    for instance in &instances {
        write_stdout_line(&relay_summary_line(instance))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    write_stdout_line(&format!("configuration ok: {} relay(s)", instances.len()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Formats a one-line summary for a validated relay instance.
fn relay_summary_line(instance: &saml_relay_config::RelayInstance) -> String {
    format!(
        "{} -> {} ({}, expects {})",
        instance.path,
        instance.destination.url(),
        instance.destination.policy().label(),
        instance.expects.param_name(),
    )
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Writes an error line to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

/// Prints top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    let rendered = command.render_long_help().to_string();
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}
