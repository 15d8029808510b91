//! Game rules and session state on top of the [`core`](crate::core) data types.
//!
//! - [`GameField`] - Board, falling piece and piece generator; one move at a time
//! - [`GameSession`] - Command dispatch, ticks, scoring and game over / restart
//! - [`GameStats`] - Score, placed pieces and cleared rings
//! - [`GameConfig`] - Board size, move interval, scoring and piece catalog
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. A piece spawns on the rim at one of four entry angles
//! 2. The player shifts it around the ring or rotates it
//! 3. Every tick moves it one ring towards the center
//! 4. When it cannot move further it is placed and full rings are cleared
//! 5. The game ends when a placed piece stays on the rim or a new piece has no
//!    room to spawn
//!
//! # Example
//!
//! ```
//! use donutris_engine::{Command, GameConfig, GameSession, PieceSeed};
//!
//! let mut session = GameSession::new(GameConfig::default(), PieceSeed::from(42)).unwrap();
//!
//! session.apply(Command::RotateCw);
//! session.apply(Command::ShiftRight);
//!
//! // Let gravity pull the piece in until it lands
//! while session.tick() {}
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{config::*, game_field::*, game_session::*, game_stats::*, piece_generator::*};

mod config;
mod game_field;
mod game_session;
mod game_stats;
mod piece_generator;
