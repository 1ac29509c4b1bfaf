//! Run the Clumio Terraform synthesis operations from the command line.
//!
//! Logs go to stderr (filter with `CLUMIO_TF_LOG`, default `warn`); results
//! go to stdout.
//!
//! # Examples
//!
//! ```sh
//! # List operations
//! clumio-tf tools
//!
//! # Argument schema of one operation
//! clumio-tf schema generate_policy
//!
//! # Run an operation with arguments from a file or stdin
//! clumio-tf call generate_policy --args policy.json
//! echo '{"config_text": ""}' | clumio-tf call validate_configuration --args -
//!
//! # Compose a bundle, refusing dangling references
//! clumio-tf --strict-references compose --bundle bundle.json > main.tf
//!
//! # Check a configuration
//! clumio-tf validate --file main.tf
//! ```

use clap::{Parser, Subcommand};
use clumio_tf::config::SynthConfig;
use clumio_tf::tools::{self, ToolSet};
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Generate and check Terraform configuration for Clumio.
#[derive(Parser)]
#[command(name = "clumio-tf", version)]
struct Cli {
    /// Skip JSON Schema validation of operation arguments
    #[arg(long, global = true)]
    no_arg_validation: bool,

    /// Refuse to compose bundles with dangling or cyclic references
    #[arg(long, global = true)]
    strict_references: bool,

    /// Largest result to print, in bytes
    #[arg(long, global = true, default_value_t = tools::DEFAULT_MAX_RESULT_BYTES)]
    max_result_bytes: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List operation names and their purposes
    Tools,
    /// Print the JSON Schema of an operation's arguments
    Schema {
        /// Operation name
        tool: String,
    },
    /// Run one operation with JSON arguments
    Call {
        /// Operation name
        tool: String,
        /// File holding the JSON arguments, or `-` for stdin
        #[arg(long)]
        args: Option<String>,
    },
    /// Compose a bundle into one document
    Compose {
        /// File holding the bundle JSON, or `-` for stdin
        #[arg(long)]
        bundle: String,
    },
    /// Check a Terraform configuration
    Validate {
        /// Configuration file, or `-` for stdin
        #[arg(long)]
        file: String,
    },
}

impl Cli {
    fn config(&self) -> SynthConfig {
        SynthConfig::default()
            .with_validate_args(!self.no_arg_validation)
            .with_strict_references(self.strict_references)
            .with_max_result_bytes(self.max_result_bytes)
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn read_input(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).map_err(|e| format!("failed to read '{source}': {e}"))
    }
}

/// First line of a description, without the trailing period.
fn purpose(description: &str) -> &str {
    let line = description.lines().next().unwrap_or_default();
    line.strip_suffix('.').unwrap_or(line)
}

fn list_tools(tool_set: &ToolSet) -> String {
    let defs = tool_set.definitions();
    let width = defs
        .iter()
        .map(|d| d.function.name.len())
        .max()
        .unwrap_or(0);
    defs.iter()
        .map(|d| {
            format!(
                "{:width$}  {}\n",
                d.function.name,
                purpose(&d.function.description)
            )
        })
        .collect()
}

fn schema(tool_set: &ToolSet, name: &str) -> Result<String, String> {
    let def = tool_set
        .definition(name)
        .ok_or_else(|| format!("unknown tool '{name}'"))?;
    serde_json::to_string_pretty(&def.function.parameters).map_err(|e| e.to_string())
}

/// Print an operation result; an `Error:` result goes to stderr and fails.
fn emit(output: String) -> Result<(), String> {
    if output.starts_with("Error:") {
        eprintln!("{output}");
        process::exit(1);
    }
    print!("{output}");
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), String> {
    let tool_set = cli.config().build_tool_set();
    match &cli.command {
        Command::Tools => {
            print!("{}", list_tools(&tool_set));
            Ok(())
        }
        Command::Schema { tool } => {
            println!("{}", schema(&tool_set, tool)?);
            Ok(())
        }
        Command::Call { tool, args } => {
            let arguments = match args {
                Some(source) => read_input(source)?,
                None => "{}".to_string(),
            };
            emit(tool_set.execute(tool, &arguments))
        }
        Command::Compose { bundle } => {
            let arguments = read_input(bundle)?;
            emit(tool_set.execute(tools::GENERATE_COMPLETE_SOLUTION, &arguments))
        }
        Command::Validate { file } => {
            let config_text = read_input(file)?;
            let arguments = serde_json::json!({ "config_text": config_text }).to_string();
            let output = tool_set.execute(tools::VALIDATE_CONFIGURATION, &arguments);
            let is_valid = serde_json::from_str::<serde_json::Value>(&output)
                .ok()
                .and_then(|v| v["is_valid"].as_bool())
                .unwrap_or(false);
            emit(output)?;
            if !is_valid {
                process::exit(1);
            }
            Ok(())
        }
    }
}

fn main() {
    let filter =
        EnvFilter::try_from_env("CLUMIO_TF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
