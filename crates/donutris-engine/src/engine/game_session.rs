use log::{info, trace};

use crate::{
    ConfigError,
    core::{Board, Piece, ShiftDirection},
};

use super::{
    GameConfig, GameStats,
    game_field::{GameField, InwardMove, TopOutReason},
    piece_generator::PieceSeed,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Active,
    GameOver,
}

/// Player intent, already decoded from whatever input device the host uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Command {
    ShiftLeft,
    ShiftRight,
    RotateCw,
    ForceMoveInward,
    Restart,
}

/// A game from the first piece to game over, and any restarts after it.
///
/// While the session is [`SessionState::GameOver`] every command except
/// [`Command::Restart`] is ignored, and a restart is only accepted then.
/// Each restart seeds its game from the session seed and the game number, so
/// replaying the same commands from the same seed reproduces every game.
///
/// # Example
///
/// ```
/// use donutris_engine::{Command, GameConfig, GameSession, PieceSeed};
///
/// let mut session = GameSession::new(GameConfig::default(), PieceSeed::from(1)).unwrap();
/// session.apply(Command::ShiftLeft);
/// while session.session_state().is_active() {
///     session.tick();
/// }
/// assert!(session.falling_piece().is_none());
///
/// session.apply(Command::Restart);
/// assert!(session.session_state().is_active());
/// assert_eq!(session.stats().score(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed: PieceSeed,
    field: GameField,
    stats: GameStats,
    session_state: SessionState,
    ticks: u64,
    games_played: u64,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = GameField::new(config.geometry(), config.catalog.clone(), seed);
        let session_state = if field.falling_piece().is_some() {
            SessionState::Active
        } else {
            SessionState::GameOver
        };
        Ok(Self {
            config,
            seed,
            field,
            stats: GameStats::new(),
            session_state,
            ticks: 0,
            games_played: 1,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Inward-move ticks applied in the current game, forced moves included.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of games started in this session, the current one included.
    #[must_use]
    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    pub fn apply(&mut self, command: Command) {
        if self.session_state.is_game_over() && !command.is_restart() {
            trace!("ignoring {command:?} after game over");
            return;
        }
        match command {
            Command::ShiftLeft => self.shift(ShiftDirection::Left),
            Command::ShiftRight => self.shift(ShiftDirection::Right),
            Command::RotateCw => {
                if self.field.try_rotate().is_err() {
                    trace!("rotation blocked");
                }
            }
            Command::ForceMoveInward => {
                self.tick();
            }
            Command::Restart => self.restart(),
        }
    }

    fn shift(&mut self, direction: ShiftDirection) {
        if self.field.try_shift(direction).is_err() {
            trace!("shift {direction:?} blocked");
        }
    }

    /// Advances the falling piece one ring, placing it if it cannot move.
    ///
    /// Returns `true` if the piece moved; `false` if it was placed or the
    /// game is already over.
    pub fn tick(&mut self) -> bool {
        if self.session_state.is_game_over() {
            return false;
        }
        let Some(result) = self.field.move_inward() else {
            return false;
        };
        self.ticks += 1;
        match result {
            InwardMove::Moved => true,
            InwardMove::Placed { cleared_rings } => {
                self.stats
                    .complete_piece_placement(cleared_rings, self.config.score_per_ring);
                false
            }
            InwardMove::ToppedOut {
                cleared_rings,
                reason,
            } => {
                self.stats
                    .complete_piece_placement(cleared_rings, self.config.score_per_ring);
                self.game_over(reason);
                false
            }
        }
    }

    fn game_over(&mut self, reason: TopOutReason) {
        info!(
            "game over ({reason}): score {}, {} rings cleared, {} pieces",
            self.stats.score(),
            self.stats.total_cleared_rings(),
            self.stats.completed_pieces()
        );
        self.session_state = SessionState::GameOver;
    }

    fn restart(&mut self) {
        if self.session_state.is_active() {
            trace!("ignoring restart while active");
            return;
        }
        let field = GameField::new(
            self.config.geometry(),
            self.config.catalog.clone(),
            self.seed.wrapping_add(self.games_played),
        );
        self.session_state = if field.falling_piece().is_some() {
            SessionState::Active
        } else {
            SessionState::GameOver
        };
        self.field = field;
        self.stats = GameStats::new();
        self.ticks = 0;
        self.games_played += 1;
        info!("restarted game #{}", self.games_played);
    }
}
