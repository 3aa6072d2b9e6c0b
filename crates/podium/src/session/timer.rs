use std::time::{Duration, Instant};

/// How long a freshly changed planned duration is shown instead of the
/// live countdown.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(1);

pub const MINUTE: i64 = 60;
pub const TEN_MINUTES: i64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Clock,
    Countdown,
}

/// What the console should show in the timer slot right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDisplay {
    /// Wall-clock time of day; formatting is left to the renderer.
    Clock,
    Remaining { remaining: Duration, overtime: bool },
    /// Confirmation of a just-changed planned duration.
    Planned(Duration),
}

/// Clock/countdown state machine.
///
/// `elapsed` holds folded time; while running, the live interval since
/// `running_since` is added on top.
#[derive(Debug, Clone)]
pub struct Timer {
    mode: TimerMode,
    planned: Duration,
    elapsed: Duration,
    running_since: Option<Instant>,
    last_change: Option<Instant>,
}

impl Timer {
    /// Starts in Countdown, running from `now`.
    pub fn new(planned: Duration, now: Instant) -> Self {
        Self {
            mode: TimerMode::Countdown,
            planned,
            elapsed: Duration::ZERO,
            running_since: Some(now),
            last_change: None,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn planned(&self) -> Duration {
        self.planned
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.elapsed + now.saturating_duration_since(since),
            None => self.elapsed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn toggle_mode(&mut self, now: Instant) {
        match self.mode {
            TimerMode::Countdown => {
                self.elapsed = self.elapsed(now);
                self.running_since = None;
                self.mode = TimerMode::Clock;
            }
            TimerMode::Clock => {
                self.running_since = Some(now);
                self.mode = TimerMode::Countdown;
            }
        }
    }

    /// Restart the stopwatch from zero. In Clock mode it stays stopped until
    /// the next switch back to Countdown.
    pub fn reset_origin(&mut self, now: Instant) {
        self.elapsed = Duration::ZERO;
        if self.mode == TimerMode::Countdown {
            self.running_since = Some(now);
        }
        self.last_change = Some(now);
    }

    /// Add `delta_secs` to the planned duration, clamping at zero.
    pub fn adjust_planned(&mut self, delta_secs: i64, now: Instant) {
        let delta = Duration::from_secs(delta_secs.unsigned_abs());
        self.planned = if delta_secs >= 0 {
            self.planned.saturating_add(delta)
        } else {
            self.planned.saturating_sub(delta)
        };
        self.reset_origin(now);
    }

    pub fn display(&self, now: Instant) -> TimerDisplay {
        let confirming = self
            .last_change
            .is_some_and(|at| now.saturating_duration_since(at) < CONFIRMATION_WINDOW);
        if confirming {
            return TimerDisplay::Planned(self.planned);
        }
        match self.mode {
            TimerMode::Clock => TimerDisplay::Clock,
            TimerMode::Countdown => {
                let elapsed = self.elapsed(now);
                TimerDisplay::Remaining {
                    remaining: self.planned.abs_diff(elapsed),
                    overtime: elapsed > self.planned,
                }
            }
        }
    }
}

/// `h:mm:ss` once an hour is reached, `mm:ss` below.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
