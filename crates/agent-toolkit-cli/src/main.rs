// crates/agent-toolkit-cli/src/main.rs
// ============================================================================
// Module: Agent Toolkit CLI Entry Point
// Description: Command dispatcher for serving, listing, and invoking tools.
// Purpose: Provide a thin operator surface over the toolkit library.
// Dependencies: agent-toolkit-config, agent-toolkit-mcp, clap, tokio
// ============================================================================

//! ## Overview
//! The `agent-toolkit` binary wraps the library session: `serve` starts the
//! MCP server, `tools list` prints the permission-filtered catalog, `tools
//! call` invokes one tool, `meter record` reports usage, and `config
//! validate` checks a config file.
//!
//! Security posture: CLI inputs are untrusted; input files are read with a
//! hard size limit and the secret key is only read from the environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use agent_toolkit_config::ToolkitConfig;
use agent_toolkit_contract::ToolDefinition;
use agent_toolkit_mcp::CapabilityRegistry;
use agent_toolkit_mcp::Catalog;
use agent_toolkit_mcp::McpServer;
use agent_toolkit_mcp::MeterEvent;
use agent_toolkit_mcp::Toolkit;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a tool input payload.
const MAX_TOOL_INPUT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "agent-toolkit", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the MCP server.
    Serve(ServeCommand),
    /// Tool listing and invocation.
    Tools {
        /// Selected tools subcommand.
        #[command(subcommand)]
        command: ToolsCommand,
    },
    /// Usage metering.
    Meter {
        /// Selected meter subcommand.
        #[command(subcommand)]
        command: MeterCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to agent-toolkit.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Tools subcommands.
#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// List the tools available to the configured context.
    List(ToolsListCommand),
    /// Invoke a tool by name.
    Call(ToolsCallCommand),
}

/// Output formats for tool listings.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// JSON array of tool definitions.
    Json,
    /// One tool per line.
    Text,
}

/// Arguments for `tools list`.
#[derive(Args, Debug)]
struct ToolsListCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Arguments for `tools call`.
#[derive(Args, Debug)]
struct ToolsCallCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Tool name, for example `create_customer`.
    #[arg(long, value_name = "NAME")]
    name: String,
    /// Inline JSON arguments.
    #[arg(long, value_name = "JSON", conflicts_with = "input_file")]
    input: Option<String>,
    /// Path to a JSON arguments file.
    #[arg(long, value_name = "PATH")]
    input_file: Option<PathBuf>,
}

/// Meter subcommands.
#[derive(Subcommand, Debug)]
enum MeterCommand {
    /// Record a billing meter event.
    Record(MeterRecordCommand),
}

/// Arguments for `meter record`.
#[derive(Args, Debug)]
struct MeterRecordCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Meter event name.
    #[arg(long, value_name = "EVENT")]
    event: String,
    /// Customer the usage is billed to.
    #[arg(long, value_name = "CUSTOMER")]
    customer: String,
    /// Usage quantity.
    #[arg(long, value_name = "VALUE")]
    value: u64,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

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
        write_stdout_line(&format!("agent-toolkit {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Tools {
            command,
        } => match command {
            ToolsCommand::List(command) => command_tools_list(&command),
            ToolsCommand::Call(command) => command_tools_call(command).await,
        },
        Commands::Meter {
            command,
        } => match command {
            MeterCommand::Record(command) => command_meter_record(command).await,
        },
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let server = McpServer::from_config(&config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Tools Commands
// ============================================================================

/// Executes `tools list`.
///
/// Listing only needs the context, so no secret key is resolved.
fn command_tools_list(command: &ToolsListCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let context =
        config.context().map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let catalog =
        Catalog::standard().map_err(|err| CliError::new(format!("catalog invalid: {err}")))?;
    let registry = CapabilityRegistry::build(&catalog, &context);
    let rendered = render_tool_list(&registry.definitions(), command.format)?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `tools call`.
async fn command_tools_call(command: ToolsCallCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let args = resolve_tool_input(command.input.as_deref(), command.input_file.as_deref())?;
    let toolkit = Toolkit::from_config(&config)
        .map_err(|err| CliError::new(format!("toolkit init failed: {err}")))?;
    let output = toolkit
        .invoke(&command.name, args)
        .await
        .map_err(|err| CliError::new(format!("tool call failed: {err}")))?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Renders a tool listing in the requested format.
fn render_tool_list(definitions: &[ToolDefinition], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(definitions)
            .map_err(|err| CliError::new(format!("tool list encoding failed: {err}"))),
        OutputFormat::Text => {
            let lines: Vec<String> = definitions
                .iter()
                .map(|definition| {
                    let summary = definition.description.lines().next().unwrap_or_default();
                    format!("{}\t{}", definition.name.as_str(), summary.trim())
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

/// Resolves tool arguments from inline JSON or a file; absent means `{}`.
fn resolve_tool_input(inline: Option<&str>, file: Option<&Path>) -> CliResult<Value> {
    match (inline, file) {
        (Some(_), Some(_)) => {
            Err(CliError::new("--input and --input-file are mutually exclusive".to_string()))
        }
        (Some(text), None) => {
            if text.len() > MAX_TOOL_INPUT_BYTES {
                return Err(CliError::new(format!(
                    "tool input exceeds size limit ({MAX_TOOL_INPUT_BYTES} bytes)"
                )));
            }
            serde_json::from_str(text)
                .map_err(|err| CliError::new(format!("tool input is not valid json: {err}")))
        }
        (None, Some(path)) => {
            let bytes = read_bytes_with_limit(path, MAX_TOOL_INPUT_BYTES).map_err(|err| {
                match err {
                    ReadLimitError::Io(err) => CliError::new(format!(
                        "failed to read tool input {}: {err}",
                        path.display()
                    )),
                    ReadLimitError::TooLarge {
                        size,
                        limit,
                    } => CliError::new(format!(
                        "tool input {} is {size} bytes, limit is {limit}",
                        path.display()
                    )),
                }
            })?;
            serde_json::from_slice(&bytes).map_err(|err| {
                CliError::new(format!("tool input {} is not valid json: {err}", path.display()))
            })
        }
        (None, None) => Ok(Value::Object(serde_json::Map::new())),
    }
}

// ============================================================================
// SECTION: Meter Command
// ============================================================================

/// Executes `meter record`.
async fn command_meter_record(command: MeterRecordCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let toolkit = Toolkit::from_config(&config)
        .map_err(|err| CliError::new(format!("toolkit init failed: {err}")))?;
    let event = MeterEvent::new(command.event, command.customer, command.value);
    toolkit
        .create_meter_event(&event)
        .await
        .map_err(|err| CliError::new(format!("meter event failed: {err}")))?;
    write_stdout_line("meter event recorded")
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = ToolkitConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration, falling back to defaults when no file is present.
fn load_config(path: Option<&Path>) -> CliResult<ToolkitConfig> {
    ToolkitConfig::load_or_default(path)
        .map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

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

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
