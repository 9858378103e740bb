use std::time::Instant;

use crossterm::event::{self, Event};

use super::{App, frame_clock::FrameClock};

/// Terminal host running an [`App`] at a fixed frame rate.
#[derive(Debug, Clone, Copy)]
pub struct Tui {
    fps: u16,
}

impl Tui {
    pub fn new(fps: u16) -> Self {
        Self { fps }
    }

    /// Runs `app` until [`App::should_exit`] returns true.
    ///
    /// Between frames the loop blocks on terminal input, never past the next
    /// frame deadline. Each frame calls [`App::update`] with the measured
    /// elapsed time and then [`App::draw`].
    pub fn run<A>(self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            let mut clock = FrameClock::new(self.fps, Instant::now());
            terminal.draw(|f| app.draw(f))?;
            while !app.should_exit() {
                if event::poll(clock.remaining(Instant::now()))?
                    && let Event::Key(key) = event::read()?
                {
                    app.handle_key(key);
                }
                if let Some(elapsed) = clock.advance(Instant::now()) {
                    app.update(elapsed);
                    terminal.draw(|f| app.draw(f))?;
                }
            }
            Ok(())
        })
    }
}
