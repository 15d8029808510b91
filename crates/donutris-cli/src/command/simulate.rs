use std::path::PathBuf;

use donutris_engine::{Command, GameSession, GameStats, PieceSeed, SessionState};
use log::{info, trace};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::GameArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    game: GameArg,
    /// Stop after this many ticks if the game is still running
    #[clap(long, default_value_t = 100_000)]
    max_ticks: u64,
    /// Output file path (prints to stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum FinalState {
    Active,
    GameOver,
}

impl From<SessionState> for FinalState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Active => FinalState::Active,
            SessionState::GameOver => FinalState::GameOver,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SimulationSummary {
    seed: PieceSeed,
    ticks: u64,
    /// Random player commands applied between ticks.
    commands: u64,
    /// Game time the ticks correspond to.
    survival_ms: u64,
    final_state: FinalState,
    #[serde(flatten)]
    stats: GameStats,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        game,
        max_ticks,
        output,
    } = arg;

    let config = game.load_config()?;
    let seed = game.seed();
    info!("simulating with seed {seed}");

    let mut session = GameSession::new(config, seed)?;
    let summary = simulate(&mut session, *max_ticks);
    info!(
        "simulation finished after {} ticks with score {}",
        summary.ticks,
        summary.stats.score()
    );

    Output::save_json(&summary, output.clone())?;
    Ok(())
}

/// Random player input derived from the session seed.
///
/// The seed bytes are taken in the opposite order from the piece generator
/// so the two streams differ.
fn input_rng(seed: PieceSeed) -> Pcg32 {
    Pcg32::from_seed(u128::from(seed).to_le_bytes())
}

/// Picks a shift, a rotation, or no input, each equally likely.
fn random_command<R>(rng: &mut R) -> Option<Command>
where
    R: Rng + ?Sized,
{
    match rng.random_range(0..4) {
        0 => Some(Command::ShiftLeft),
        1 => Some(Command::ShiftRight),
        2 => Some(Command::RotateCw),
        _ => None,
    }
}

/// Plays `session` with random commands until game over or `max_ticks`.
///
/// Each tick is preceded by at most one command, so equal seeds give equal
/// summaries.
fn simulate(session: &mut GameSession, max_ticks: u64) -> SimulationSummary {
    let mut rng = input_rng(session.seed());
    let mut commands = 0;
    while session.session_state().is_active() && session.ticks() < max_ticks {
        if let Some(command) = random_command(&mut rng) {
            trace!("applying {command:?}");
            session.apply(command);
            commands += 1;
        }
        session.tick();
    }
    SimulationSummary {
        seed: session.seed(),
        ticks: session.ticks(),
        commands,
        survival_ms: session
            .ticks()
            .saturating_mul(session.config().move_interval_ms),
        final_state: session.session_state().into(),
        stats: session.stats().clone(),
    }
}
