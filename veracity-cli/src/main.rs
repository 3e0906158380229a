//! veracity-cli - check article text for fake news markers from the terminal
//!
//! Runs the same scorer and history store as the server, against the local
//! key-value file, so both frontends share one history.
//!
//! # Subcommands
//! - `check [TEXT] [--file <path>] [--json] [--explain] [--no-delay]` - score text
//!   (reads stdin when neither TEXT nor --file is given)
//! - `history [--json]`                                              - list recent checks
//! - `clear-history`                                                 - drop all history

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use veracity_core::render::{history_report, result_report, DISCLAIMER};
use veracity_core::scorer::{find_markers, MarkerMatches};
use veracity_core::{
    App, CheckResult, FileStore, KeyValueStore, SystemClock, VeracityConfig, VeracityError,
};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "veracity-cli",
    version,
    about = "Check article credibility with a keyword heuristic"
)]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(long, env = "VERACITY_CONFIG", default_value = "veracity.toml")]
    config: String,

    /// Key-value store file (overrides storage.path)
    #[arg(long, env = "VERACITY_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score article text and add it to history
    Check {
        /// Article text; read from stdin when omitted
        text: Option<String>,

        /// Read article text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,

        /// Include the matched marker phrases
        #[arg(long)]
        explain: bool,

        /// Skip the simulated analysis delay
        #[arg(long)]
        no_delay: bool,
    },

    /// List recent checks, newest first
    History {
        /// Output history as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Remove all stored checks
    ClearHistory,
}

// ============================================================================
// Output Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MarkerReport {
    pub fake: Vec<&'static str>,
    pub reliable: Vec<&'static str>,
}

impl From<MarkerMatches> for MarkerReport {
    fn from(m: MarkerMatches) -> Self {
        Self {
            fake: m.fake,
            reliable: m.reliable,
        }
    }
}

/// `--json --explain` output: the result plus the matched phrases.
#[derive(Debug, Serialize)]
pub struct ExplainedResult<'a> {
    #[serde(flatten)]
    pub result: &'a CheckResult,
    pub markers: MarkerReport,
}

// ============================================================================
// Commands
// ============================================================================

/// Pick the article text: positional argument, then file, then stdin.
fn resolve_text(
    text: Option<String>,
    file: Option<PathBuf>,
    stdin: &mut dyn Read,
) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e));
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf)
}

fn render_explain(matches: &MarkerMatches) -> String {
    let list = |phrases: &[&str]| {
        if phrases.is_empty() {
            "(none)".to_string()
        } else {
            phrases.join(", ")
        }
    };
    format!(
        "Matched fake markers:     {}\nMatched reliable markers: {}\n",
        list(&matches.fake),
        list(&matches.reliable)
    )
}

async fn do_check(
    config: &VeracityConfig,
    store: Option<PathBuf>,
    text: String,
    json: bool,
    explain: bool,
) -> anyhow::Result<()> {
    let mut app = build_app(config, store)?;
    app.set_input(text.clone());
    let result = app.submit().await.map_err(VeracityError::from)?;

    if json {
        let out = if explain {
            serde_json::to_string_pretty(&ExplainedResult {
                result: &result,
                markers: find_markers(&text).into(),
            })?
        } else {
            serde_json::to_string_pretty(&result)?
        };
        println!("{}", out);
    } else {
        print!("{}", result_report(&result));
        if explain {
            println!();
            print!("{}", render_explain(&find_markers(&text)));
        }
        println!();
        println!("Disclaimer: {}", DISCLAIMER);
    }
    Ok(())
}

fn do_history(app: &App, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(app.history())?);
    } else {
        print!("{}", history_report(app.history()));
    }
    Ok(())
}

fn do_clear_history(mut app: App) -> anyhow::Result<()> {
    let removed = app.history().len();
    app.clear_history()?;
    println!("Cleared {} stored check(s).", removed);
    Ok(())
}

fn build_app(config: &VeracityConfig, store_override: Option<PathBuf>) -> anyhow::Result<App> {
    let path = store_override.unwrap_or_else(|| config.storage.resolved_path());
    tracing::debug!("Using store {}", path.display());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path));
    Ok(App::from_config(config, store, Arc::new(SystemClock))?)
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json stdout stays parseable.
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut config = match VeracityConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("veracity-cli: failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Check {
            text,
            file,
            json,
            explain,
            no_delay,
        } => {
            if no_delay {
                config.scorer.delay_ms = 0;
            }
            match resolve_text(text, file, &mut std::io::stdin()) {
                Ok(text) => do_check(&config, cli.store, text, json, explain).await,
                Err(e) => Err(e),
            }
        }
        Commands::History { json } => {
            build_app(&config, cli.store).and_then(|app| do_history(&app, json))
        }
        Commands::ClearHistory => build_app(&config, cli.store).and_then(do_clear_history),
    };

    if let Err(e) = result {
        eprintln!("veracity-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
