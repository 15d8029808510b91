use donutris_engine::GameSession;
use log::info;

use crate::{command::GameArg, tui::Runtime};

use self::app::PlayApp;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { game } = arg;

    let config = game.load_config()?;
    let seed = game.seed();
    info!("starting game with seed {seed}");

    let mut app = PlayApp::new(GameSession::new(config, seed)?);
    Runtime::new().run(&mut app)?;

    let session = app.session();
    info!(
        "quit after {} game(s), last score {}",
        session.games_played(),
        session.stats().score()
    );
    println!("Score: {} (seed {seed})", session.stats().score());
    Ok(())
}
