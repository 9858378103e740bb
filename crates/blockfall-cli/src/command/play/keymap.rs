use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the play screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub(super) enum Action {
    Game(Command),
    #[from(ignore)]
    Restart,
    #[from(ignore)]
    Quit,
}

/// Decodes a key press. Key releases are ignored.
pub(super) fn action_for(event: &KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return (event.code == KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match event.code {
        KeyCode::Left | KeyCode::Char('a' | 'A') => Command::MoveLeft.into(),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Command::MoveRight.into(),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Command::SoftDrop.into(),
        KeyCode::Up | KeyCode::Char('w' | 'W') => Command::Rotate.into(),
        KeyCode::Char(' ') => Command::HardDrop.into(),
        KeyCode::Char('t' | 'T') => Command::ToggleAutoplay.into(),
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Controls shown under the board.
pub(super) const HELP_PLAYING: &str = "←/A →/D Move | ↓/S Soft Drop | ↑/W Rotate | Space Hard Drop | T Auto-play | Q Quit";
pub(super) const HELP_AUTOPLAY: &str = "T Auto-play off | Q Quit";
pub(super) const HELP_GAME_OVER: &str = "R Restart | Q Quit";
