use std::time::{Duration, Instant};

/// Longest span a single frame reports.
///
/// A stalled or suspended terminal resumes with at most this much game time
/// instead of replaying every gravity step it missed.
pub(super) const MAX_FRAME_ELAPSED: Duration = Duration::from_millis(250);

/// Paces the host loop at a fixed frame rate and measures frame lengths.
#[derive(Debug, Clone, Copy)]
pub(super) struct FrameClock {
    frame: Duration,
    last_frame: Instant,
}

impl FrameClock {
    pub(super) fn new(fps: u16, now: Instant) -> Self {
        Self {
            frame: Duration::from_secs(1) / u32::from(fps.max(1)),
            last_frame: now,
        }
    }

    /// Time left until the next frame is due; zero when it is overdue.
    pub(super) fn remaining(&self, now: Instant) -> Duration {
        (self.last_frame + self.frame).saturating_duration_since(now)
    }

    /// Starts a new frame if one is due and returns its elapsed time.
    pub(super) fn advance(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.last_frame);
        if elapsed < self.frame {
            return None;
        }
        self.last_frame = now;
        Some(elapsed.min(MAX_FRAME_ELAPSED))
    }
}
