use blockfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{BoardDisplay, SessionStatsDisplay, color, style};

/// Board and stats panel side by side, with a popup once the game is over.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn height(&self) -> u16 {
        BoardDisplay::new(self.session.board())
            .block(Block::bordered())
            .height()
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::Playing if self.session.is_autoplay_enabled() => color::GREEN,
            SessionState::Playing => color::WHITE,
            SessionState::GameOver => color::RED,
        };

        let game_board = {
            let widget = BoardDisplay::new(self.session.board())
                .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
            match self.session.session_state() {
                // The piece that failed to spawn is not drawn over the stack.
                SessionState::GameOver => widget,
                SessionState::Playing if self.show_ghost => widget
                    .ghost(self.session.simulate_drop_position())
                    .falling_piece(*self.session.falling_piece()),
                SessionState::Playing => widget.falling_piece(*self.session.falling_piece()),
            }
        };
        let session_stats = SessionStatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [left_column, right_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(session_stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(left_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(right_column);

        let game_board_width = game_board.width();
        game_board.render(board_area, buf);
        session_stats.render(stats_area, buf);

        if self.session.session_state().is_game_over() {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(style);
            let text = Text::styled("GAME OVER", style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
