//! Fixed-frame-rate terminal host.
//!
//! [`Tui::run`] drives an [`App`] one frame at a time: key input is delivered
//! as soon as it arrives, and once per frame the app is advanced by the
//! measured wall-clock time and redrawn.

mod app;
mod frame_clock;
mod runner;

pub use self::{app::App, runner::Tui};
