use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use retopokit::{init_logging, replay::ReplayScript, BUILD_DATE, VERSION};
use retopokit_settings::Config;
use tracing::info;

/// Replays a recorded input script against a headless retopology session
#[derive(Parser)]
#[command(name = "retopokit")]
#[command(version)]
struct Cli {
    /// JSON script with sources, view and events
    script: PathBuf,

    /// Config file (JSON or TOML); defaults to the platform config location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON log lines instead of the pretty format
    #[arg(long)]
    json_log: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_log)?;
    info!(version = VERSION, built = BUILD_DATE, "retopokit");

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };
    let script = ReplayScript::load(&cli.script)?;
    let mut session = script.build_session(config)?;
    let summary = script.replay(&mut session);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
