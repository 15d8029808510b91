use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Called at the start of `Runtime::run()`. Use this to configure the tick
    /// interval and render mode.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen (called on each render event).
    fn draw(&self, frame: &mut Frame);

    /// Updates game logic (called on each tick).
    fn update(&mut self, runtime: &mut Runtime);
}
