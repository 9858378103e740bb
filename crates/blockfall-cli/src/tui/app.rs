use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;

/// A screen hosted by [`Tui::run`](super::Tui::run).
pub trait App {
    fn should_exit(&self) -> bool;

    /// Handles one key event. Releases and repeats are passed through as-is.
    fn handle_key(&mut self, key: KeyEvent);

    /// Advances state by the time since the previous frame.
    fn update(&mut self, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}
