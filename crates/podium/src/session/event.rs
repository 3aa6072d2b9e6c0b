use std::time::{Duration, Instant};

use eframe::egui::{Pos2, Vec2};

use super::calibration::PageFit;
use super::keymap::Key;
use crate::media::web::WebPage;

pub const CLOCK_TICK: Duration = Duration::from_secs(1);
pub const ANIMATION_TICK: Duration = Duration::from_millis(50);

/// Discrete inputs delivered to the session. Handlers never block.
#[derive(Debug, Clone)]
pub enum Event {
    Key(Key),
    /// Primary click on the console's current slide, screen space.
    Click(Pos2),
    /// Pointer position over the console (None when it left).
    Hover(Option<Pos2>),
    /// Calibration drag, screen-space delta.
    Drag(Vec2),
    /// Calibration zoom anchored at the pointer.
    Zoom { anchor: Pos2, delta: f32 },
    /// Where the console's current slide was laid out this frame.
    Layout(PageFit),
    /// Clock tick.
    Tick,
    /// Feed animation tick with the strip and current text widths.
    AnimationTick { strip_width: f32, text_width: f32 },
    FeedLines(Vec<String>),
    WebCommitted(WebPage),
    WebFailed { url: String },
}

/// Wakeup cadence: once a second, plus the animation tick while the feed
/// overlay runs.
#[derive(Debug, Clone)]
pub struct Scheduler {
    animate: bool,
    last_tick: Instant,
    last_frame: Instant,
}

/// Ticks that fell due in one `poll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueTicks {
    pub clock: bool,
    pub animation: bool,
}

impl Scheduler {
    pub fn new(animate: bool, now: Instant) -> Self {
        Self {
            animate,
            last_tick: now,
            last_frame: now,
        }
    }

    pub fn poll(&mut self, now: Instant) -> DueTicks {
        let mut due = DueTicks::default();
        if now.saturating_duration_since(self.last_tick) >= CLOCK_TICK {
            self.last_tick = now;
            due.clock = true;
        }
        if self.animate && now.saturating_duration_since(self.last_frame) >= ANIMATION_TICK {
            self.last_frame = now;
            due.animation = true;
        }
        due
    }

    /// How long until the next tick is due.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        let clock = (self.last_tick + CLOCK_TICK).saturating_duration_since(now);
        if self.animate {
            clock.min((self.last_frame + ANIMATION_TICK).saturating_duration_since(now))
        } else {
            clock
        }
    }
}
