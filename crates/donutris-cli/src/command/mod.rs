use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use donutris_engine::{GameConfig, PieceSeed};
use rand::Rng as _;

use crate::util;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write log records to this file (filter with `RUST_LOG`)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a game without input and print a JSON summary
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that starts a game.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Game configuration file (JSON); missing fields use the defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Seed for piece generation; random if omitted
    #[clap(long)]
    seed: Option<u64>,
}

impl GameArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<GameConfig> {
        let Some(path) = &self.config else {
            return Ok(GameConfig::default());
        };
        let config: GameConfig = util::read_json_file("config", path)?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub(crate) fn seed(&self) -> PieceSeed {
        self.seed
            .map_or_else(|| rand::rng().random(), PieceSeed::from)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));

    // The terminal UI owns stderr while playing
    let to_stderr = !matches!(mode, Mode::Play(_));
    util::init_logging(args.log_file.as_deref(), to_stderr)?;

    match mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
