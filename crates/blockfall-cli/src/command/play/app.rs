use std::time::Duration;

use blockfall_engine::{Command, GameSession, PieceSeed, SessionState};
use blockfall_evaluator::placement_planner::GreedyPlanner;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use super::{
    PlayArg,
    keymap::{self, Action},
};
use crate::{
    tui::App,
    view::widgets::{SessionDisplay, style},
};

#[derive(Debug)]
pub(super) struct PlayApp {
    session: GameSession,
    seed: Option<PieceSeed>,
    autoplay: bool,
    show_ghost: bool,
    is_exiting: bool,
}

fn new_session(seed: Option<PieceSeed>, autoplay: bool) -> GameSession {
    let planner = Box::new(GreedyPlanner::default());
    let mut session = match seed {
        Some(seed) => GameSession::with_seed(seed, planner),
        None => GameSession::new(planner),
    };
    if autoplay {
        session.handle_command(Command::ToggleAutoplay);
    }
    tracing::info!(seed = %session.seed(), autoplay, "session started");
    session
}

impl PlayApp {
    pub(super) fn new(arg: &PlayArg) -> Self {
        Self {
            session: new_session(arg.seed, arg.autoplay),
            seed: arg.seed,
            autoplay: arg.autoplay,
            show_ghost: arg.ghost,
            is_exiting: false,
        }
    }

    pub(super) fn session(&self) -> &GameSession {
        &self.session
    }

    fn restart(&mut self) {
        self.session = new_session(self.seed, self.autoplay);
    }

    fn help_text(&self) -> &'static str {
        match self.session.session_state() {
            SessionState::GameOver => keymap::HELP_GAME_OVER,
            SessionState::Playing if self.session.is_autoplay_enabled() => keymap::HELP_AUTOPLAY,
            SessionState::Playing => keymap::HELP_PLAYING,
        }
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match keymap::action_for(&key) {
            Some(Action::Game(command)) => self.session.handle_command(command),
            Some(Action::Restart) if self.session.is_game_over() => self.restart(),
            Some(Action::Quit) => self.is_exiting = true,
            Some(Action::Restart) | None => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session, self.show_ghost);
        let help_text = Text::styled(self.help_text(), style::DIMMED).centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, elapsed: Duration) {
        self.session.tick(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn app() -> PlayApp {
        PlayApp::new(&PlayArg {
            seed: Some(PieceSeed::from_bytes([7; 16])),
            ..PlayArg::default()
        })
    }

    #[test]
    fn test_keys_drive_session() {
        let mut app = app();
        let x = app.session().falling_piece().position().x();
        app.handle_key(key('a'));
        assert_eq!(app.session().falling_piece().position().x(), x - 1);

        app.handle_key(key(' '));
        assert_eq!(app.session().stats().completed_pieces(), 1);

        app.handle_key(key('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut app = app();
        app.handle_key(key(' '));
        app.handle_key(key('r'));
        assert_eq!(app.session().stats().completed_pieces(), 1);

        while !app.session().is_game_over() {
            app.handle_key(key(' '));
        }
        app.handle_key(key('r'));
        assert!(!app.session().is_game_over());
        assert_eq!(app.session().stats().completed_pieces(), 0);
        assert_eq!(app.session().seed(), PieceSeed::from_bytes([7; 16]));
    }

    #[test]
    fn test_update_advances_gravity() {
        let mut app = app();
        let y = app.session().falling_piece().position().y();
        let interval = app.session().fall_interval();
        app.update(interval);
        assert_eq!(app.session().falling_piece().position().y(), y + 1);
    }
}
