//! Ward - sandboxed workspace file and command tools

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ward::tools::{default_tools, ToolCall, ToolExecutor, BASH_RUN, READ_FILE, WRITE_FILE};
use ward::types::config::ConfigFile;

#[derive(Parser, Debug)]
#[command(name = "ward")]
#[command(about = "Ward - sandboxed workspace file and command tools")]
#[command(version)]
struct Args {
    /// Workspace root. Falls back to the config file, then the current directory.
    #[arg(short = 'C', long, env = "WARD_WORKSPACE_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Config file (default: <config dir>/ward/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reject command arguments that point outside the workspace
    #[arg(long, global = true)]
    check_path_args: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a file with line numbers
    Read {
        path: String,
        #[arg(long)]
        start_line: Option<i64>,
        #[arg(long)]
        end_line: Option<i64>,
        #[arg(long)]
        max_output_chars: Option<usize>,
    },

    /// Replace a line range of an existing file
    Write {
        path: String,
        #[arg(long)]
        start_line: i64,
        #[arg(long)]
        end_line: i64,
        /// Replacement text, inserted verbatim
        #[arg(long, conflicts_with = "from_file", required_unless_present = "from_file")]
        content: Option<String>,
        /// Read the replacement text from a local file instead
        #[arg(long)]
        from_file: Option<PathBuf>,
    },

    /// Run an allow-listed command in the workspace
    Run {
        #[arg(long)]
        timeout_seconds: Option<u64>,
        #[arg(long)]
        max_output_chars: Option<usize>,
        /// Command line, e.g. `ward run -- ls -la stages`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Dispatch a raw tool call with JSON arguments
    Call {
        /// Tool name: read.file, write.file or bash.run
        tool: String,
        /// JSON object of arguments
        input: String,
    },

    /// Print the tool definitions as JSON
    Tools,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    // Tool output goes to stdout; logs stay on stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = args.config.clone().or_else(ConfigFile::default_path);
    let file = match &config_path {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let mut config = file.into_workspace_config(args.root.clone(), &cwd)?;
    if args.check_path_args {
        config = config.with_path_argument_check(true);
    }
    tracing::debug!(root = %config.root().display(), "Workspace configured");

    let call = match args.command {
        Commands::Tools => {
            let tools = default_tools(&config);
            println!("{}", serde_json::to_string_pretty(&tools)?);
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Read {
            path,
            start_line,
            end_line,
            max_output_chars,
        } => ToolCall::new(
            READ_FILE,
            json!({
                "path": path,
                "start_line": start_line,
                "end_line": end_line,
                "max_output_chars": max_output_chars,
            }),
        ),
        Commands::Write {
            path,
            start_line,
            end_line,
            content,
            from_file,
        } => {
            // clap guarantees exactly one of the two is set.
            let content = match from_file {
                Some(file) => std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?,
                None => content.unwrap_or_default(),
            };
            ToolCall::new(
                WRITE_FILE,
                json!({
                    "path": path,
                    "content": content,
                    "start_line": start_line,
                    "end_line": end_line,
                }),
            )
        }
        Commands::Run {
            timeout_seconds,
            max_output_chars,
            command,
        } => ToolCall::new(
            BASH_RUN,
            json!({
                "command": shell_words::join(&command),
                "timeout_seconds": timeout_seconds,
                "max_output_chars": max_output_chars,
            }),
        ),
        Commands::Call { tool, input } => {
            let input = serde_json::from_str(&input).context("Tool arguments must be JSON")?;
            ToolCall::new(tool, input)
        }
    };

    let executor = ToolExecutor::new(Arc::new(config));
    let result = executor.execute(call).await;
    println!("{}", result.text());

    Ok(if result.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
