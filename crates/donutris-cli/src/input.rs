use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use donutris_engine::Command;

use crate::view::widgets::KeyBinding;

/// What a key press means to the play screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum Input {
    Command(Command),
    Quit,
}

/// Maps a key press to an input; unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<Input> {
    let input = match key.code {
        KeyCode::Left => Command::ShiftLeft.into(),
        KeyCode::Right => Command::ShiftRight.into(),
        KeyCode::Up => Command::RotateCw.into(),
        KeyCode::Down => Command::ForceMoveInward.into(),
        KeyCode::Char(' ') => Command::Restart.into(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
        _ => return None,
    };
    Some(input)
}

pub const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Shift"),
    (&["↑"], "Rotate"),
    (&["↓"], "Move in"),
    (&["q"], "Quit"),
];

pub const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["Space"], "Restart"), (&["q"], "Quit")];
