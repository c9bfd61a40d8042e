//! CLI binary for pitchdeck-analyzer.
//!
//! `serve` runs the HTTP endpoint; `analyze` plays the browser's part: it
//! selects a file, drives the session state machine against a server (or the
//! in-process pipeline) and prints the result card.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pitchdeck_analyzer::client::{AnalysisTransport, HttpTransport, LocalTransport, Orchestrator};
use pitchdeck_analyzer::config::{DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES};
use pitchdeck_analyzer::present::describe_file;
use pitchdeck_analyzer::{
    server, Analyzer, AnalyzerConfig, AppState, ResultCard, ServerConfig, SessionState,
    UploadedFile,
};
use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the HTTP endpoint on the default address
  pitchdeck serve

  # Analyse a deck in-process (no server needed)
  pitchdeck analyze deck.pdf

  # Analyse through a running server
  pitchdeck analyze deck.pdf --server http://127.0.0.1:3000

  # Machine-readable output
  pitchdeck analyze --json deck.pdf > result.json

  # Upload with curl
  curl -F file=@deck.pdf http://127.0.0.1:3000/api/analyze

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  PITCHDECK_PROVIDER      Override provider (openai, anthropic, gemini, ollama)
  PITCHDECK_MODEL         Override model ID (default gpt-4)
  RUST_LOG                Log filter, e.g. pitchdeck_analyzer=debug
"#;

/// Score startup pitch decks with a language model.
#[derive(Parser, Debug)]
#[command(
    name = "pitchdeck",
    version,
    about = "Score startup pitch decks (PDF) with a language model",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM model ID.
    #[arg(long, global = true, env = "PITCHDECK_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, global = true, env = "PITCHDECK_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, global = true, env = "PITCHDECK_TEMPERATURE")]
    temperature: Option<f32>,

    /// Model call timeout in seconds. No timeout when unset.
    #[arg(long, global = true, env = "PITCHDECK_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, global = true, env = "PITCHDECK_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PITCHDECK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, global = true, env = "PITCHDECK_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /api/analyze over HTTP.
    Serve(ServeArgs),
    /// Analyse one PDF and print the result.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "PITCHDECK_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Maximum request body size in bytes.
    #[arg(long, env = "PITCHDECK_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Pitch deck to analyse.
    file: PathBuf,

    /// Base URL of a running `pitchdeck serve`. Runs in-process when unset.
    #[arg(long, env = "PITCHDECK_SERVER")]
    server: Option<String>,

    /// Print the result as JSON instead of a card.
    #[arg(long)]
    json: bool,

    /// Also print the model's full reply.
    #[arg(long)]
    raw: bool,

    /// Disable ANSI colours in the result card (also honours NO_COLOR).
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // While the spinner is up, library INFO logs would tear through it.
    let spinner = matches!(&cli.command, Command::Analyze(a) if !a.json) && !cli.quiet;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;

    match &cli.command {
        Command::Serve(args) => serve(args, config).await,
        Command::Analyze(args) => analyze(args, config, spinner && !cli.verbose).await,
    }
}

async fn serve(args: &ServeArgs, config: AnalyzerConfig) -> Result<()> {
    let server_config =
        ServerConfig::new(args.bind, args.max_upload_bytes).context("Invalid server settings")?;
    let analyzer = Analyzer::from_config(config);
    server::run(AppState::new(analyzer), server_config)
        .await
        .with_context(|| format!("Server on {} failed", args.bind))
}

async fn analyze(args: &AnalyzeArgs, config: AnalyzerConfig, show_spinner: bool) -> Result<()> {
    let file = UploadedFile::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut session = Orchestrator::new();
    if let Err(rejected) = session.offer_file(file) {
        bail!("{} ({})", rejected.notice(), rejected.media_type);
    }

    let transport: Box<dyn AnalysisTransport> = match &args.server {
        Some(url) => Box::new(HttpTransport::new(url, None).context("Failed to build HTTP client")?),
        None => Box::new(LocalTransport::new(Arc::new(Analyzer::from_config(config)))),
    };

    let bar = show_spinner.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Analyzing");
        if let Some(f) = session.file() {
            bar.set_message(describe_file(f));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    session
        .analyze(transport.as_ref())
        .await
        .context("Could not start analysis")?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match session.state() {
        SessionState::Succeeded { file, result } => {
            if args.json {
                let json =
                    serde_json::to_string_pretty(result).context("Failed to serialise result")?;
                println!("{json}");
                return Ok(());
            }

            let color = !args.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && io::stdout().is_terminal();
            if show_spinner {
                eprintln!("{} {}", green("✔"), describe_file(file));
            }
            print!("{}", ResultCard::new(result).with_color(color));
            if args.raw {
                println!();
                println!("{}", if color { cyan("Full analysis") } else { "Full analysis".into() });
                println!("{}", result.raw_analysis);
            }
            Ok(())
        }
        SessionState::Failed { message, .. } => {
            eprintln!("{} {}", red("✘"), red(message));
            if let Some(server) = &args.server {
                eprintln!("   {}", dim(&format!("server: {server}")));
            }
            bail!("{message}")
        }
        other => bail!("Unexpected session state: {:?}", other.phase()),
    }
}

/// Map CLI flags to `AnalyzerConfig`.
async fn build_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut builder = AnalyzerConfig::builder();
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    builder.build().context("Invalid configuration")
}
