//! Scouting reports for Pokemon Showdown replays.
//!
//! Usage:
//!   scout replays/gen9ou-2172099392.html
//!   scout https://replay.pokemonshowdown.com/gen9ou-2172099392 --format json
//!   scout battle.log --output report.txt --verbose

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scout_replay::{ErrorKind, FetchConfig, ReplayError, ReplayLoader, ReplaySource, analyze};
use tracing::{debug, error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "scout", version, about = "Pokemon Showdown replay parser and battle simulator")]
struct Cli {
    /// Replay file path, replay URL, or raw log text
    source: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log pipeline progress to stderr
    #[arg(long)]
    verbose: bool,

    /// Skip the `.json` endpoint when a page has no embedded log
    #[arg(long)]
    no_json_fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit status per failure kind; anything else exits with 1
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<ReplayError>().map(ReplayError::kind) {
        Some(ErrorKind::Format) => 2,
        Some(ErrorKind::Fetch) => 3,
        Some(ErrorKind::IdentityResolution) => 4,
        None => 1,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = FetchConfig {
        json_fallback: !cli.no_json_fallback,
        ..Default::default()
    };
    let loader = ReplayLoader::http(&config).map_err(ReplayError::from)?;

    let source = ReplaySource::parse(&cli.source);
    info!(?source, "loading replay");

    let report = analyze(&loader, source).await?;
    debug!(pokemon = report.pokemon.len(), "simulation finished");

    let output = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render::render_text(&report)?,
    };

    match cli.output {
        Some(path) => {
            tokio::fs::write(&path, output)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        None => println!("{output}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "analysis failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_replay::SourceError;

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::parse_from(["scout", "battle.log", "--format", "json", "-o", "out.json"]);

        assert_eq!(cli.source, "battle.log");
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_default_format_is_text() {
        let cli = Cli::parse_from(["scout", "battle.log", "--verbose"]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.verbose);
    }

    #[test]
    fn test_exit_codes_differ_per_kind() {
        let format = anyhow::Error::from(ReplayError::from(SourceError::format("raw", "empty")));
        let fetch = anyhow::Error::from(ReplayError::from(SourceError::fetch("x", "timed out")));
        let other = anyhow::anyhow!("disk full");

        assert_eq!(exit_code(&format), 2);
        assert_eq!(exit_code(&fetch), 3);
        assert_eq!(exit_code(&other), 1);
    }
}
