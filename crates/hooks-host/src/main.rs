// hooks-host: Entry point for out-of-process step execution.
//
// Usage:
//   hooks-host <step> [--payload <path>] [--pretty]
//   hooks-host --list
//
// The project payload JSON is read from `--payload` (stdin when `-`).
// The step result is written to stdout as JSON; diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hooks_sdk::{Payload, StepRegistry, StepResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the host process.
#[derive(Parser, Debug)]
#[command(name = "hooks-host", about = "Run a provisioning step against a project payload")]
struct Args {
    /// Name of the step to run (case-insensitive).
    #[arg(required_unless_present = "list")]
    step: Option<String>,

    /// File holding the project payload JSON, `-` for stdin.
    #[arg(long, env = "HOOKS_PAYLOAD", default_value = "-")]
    payload: PathBuf,

    /// Pretty-print the step result.
    #[arg(long, env = "HOOKS_PRETTY")]
    pretty: bool,

    /// Format of the diagnostics written to stderr.
    #[arg(long, value_enum, env = "HOOKS_LOG_FORMAT", default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print the registered step names and exit.
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Step registry
// ---------------------------------------------------------------------------

/// Build the registry of every step this host can run.
fn build_registry() -> Result<StepRegistry> {
    let mut registry = StepRegistry::new();
    hello_world_plugin::register(&mut registry)
        .with_context(|| format!("Failed to register plugin {}", hello_world_plugin::PLUGIN_NAME))?;
    Ok(registry)
}

// ---------------------------------------------------------------------------
// Payload input / result output
// ---------------------------------------------------------------------------

fn read_payload(path: &Path) -> Result<String> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .lock()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path.display()))?
    };

    let raw = raw.trim().to_string();
    if raw.is_empty() {
        anyhow::bail!("Payload must not be empty");
    }
    Ok(raw)
}

/// Registered step names, one per line.
fn list_steps(registry: &StepRegistry) -> String {
    registry
        .names()
        .iter()
        .map(|name| format!("{name}\n"))
        .collect()
}

fn step_name(args: &Args) -> Result<&str> {
    args.step
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("A step name is required"))
}

fn render(result: &StepResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        result.to_json_pretty()
    } else {
        result.to_json()
    };
    json.context("Failed to serialize step result")
}

/// Parse `raw_payload`, run `step` from `registry` and render its result.
async fn execute(
    registry: &StepRegistry,
    step: &str,
    raw_payload: &str,
    pretty: bool,
) -> Result<String> {
    let payload = Payload::from_json(raw_payload).context("Failed to deserialize payload")?;
    let result = registry.invoke(step, &payload).await?;

    tracing::info!(
        step,
        outcome = %result.status.result,
        error = result.error.is_some(),
        "Step completed"
    );
    if let Some(ref error) = result.error {
        tracing::warn!("Step '{step}' reported an error: {error}");
    }

    render(&result, pretty)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn env_filter() -> EnvFilter {
    build_env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// `directives` win; `info` applies when they are absent or empty.
fn build_env_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install tracing subscriber")
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_tracing(args.log_format) {
        eprintln!("{e:#}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let registry = build_registry()?;

    if args.list {
        print!("{}", list_steps(&registry));
        return Ok(());
    }

    let step = step_name(args)?;
    let raw_payload = read_payload(&args.payload)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let output = runtime.block_on(execute(&registry, step, &raw_payload, args.pretty))?;
    println!("{output}");
    Ok(())
}
