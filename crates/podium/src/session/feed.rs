use std::collections::VecDeque;
use std::time::Instant;

/// Scroll speed of the feed strip.
pub const PIXELS_PER_SECOND: f32 = 40.0;
pub const PLACEHOLDER: &str = "…";

/// Queue plus scroll position for the feed overlay strip.
///
/// A line enters at the right edge of the strip and scrolls left; once its
/// right edge has passed the left edge of the strip the next buffered line
/// takes over. With nothing buffered the placeholder scrolls instead.
#[derive(Debug)]
pub struct FeedTicker {
    queue: VecDeque<String>,
    current: Option<String>,
    started: Option<Instant>,
}

impl Default for FeedTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedTicker {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            current: None,
            started: None,
        }
    }

    /// Queue a line. Blank lines are kept and scroll by as a gap.
    pub fn push(&mut self, line: String) {
        self.queue.push_back(line);
    }

    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    pub fn text(&self) -> &str {
        self.current.as_deref().unwrap_or(PLACEHOLDER)
    }

    /// Left edge of the current text relative to the strip's left edge.
    pub fn offset(&self, strip_width: f32, now: Instant) -> f32 {
        match self.started {
            Some(start) => {
                strip_width - PIXELS_PER_SECOND * now.saturating_duration_since(start).as_secs_f32()
            }
            None => strip_width,
        }
    }

    /// Advance the animation. `text_width` is the laid-out width of `text()`.
    pub fn tick(&mut self, strip_width: f32, text_width: f32, now: Instant) {
        if self.started.is_none() || self.offset(strip_width, now) < -text_width {
            self.start_next(now);
        }
    }

    fn start_next(&mut self, now: Instant) {
        self.current = self.queue.pop_front();
        self.started = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_placeholder_when_empty() {
        let t0 = Instant::now();
        let mut ticker = FeedTicker::new();
        ticker.tick(400.0, 10.0, t0);
        assert_eq!(ticker.text(), PLACEHOLDER);
        assert_eq!(ticker.offset(400.0, t0 + Duration::from_secs(2)), 320.0);
    }

    #[test]
    fn test_lines_advance_after_scrolling_off() {
        let t0 = Instant::now();
        let mut ticker = FeedTicker::new();
        ticker.push("first".into());
        ticker.push("second".into());
        ticker.push(String::new());
        assert_eq!(ticker.buffered(), 3);

        ticker.tick(200.0, 40.0, t0);
        assert_eq!(ticker.text(), "first");

        // 200 px strip + 40 px text at 40 px/s: gone after 6 s.
        ticker.tick(200.0, 40.0, t0 + Duration::from_secs(5));
        assert_eq!(ticker.text(), "first");
        ticker.tick(200.0, 40.0, t0 + Duration::from_millis(6100));
        assert_eq!(ticker.text(), "second");
        assert_eq!(ticker.offset(200.0, t0 + Duration::from_millis(6100)), 200.0);

        // 200 px + 60 px from 6.1 s: the blank line takes over at 12.6 s.
        ticker.tick(200.0, 60.0, t0 + Duration::from_millis(12700));
        assert_eq!(ticker.text(), "");
        assert_eq!(ticker.buffered(), 0);

        // An empty line has no width: gone 5 s later.
        ticker.tick(200.0, 0.0, t0 + Duration::from_millis(17800));
        assert_eq!(ticker.text(), PLACEHOLDER);
    }

    #[test]
    fn test_lines_arriving_during_placeholder_wait_their_turn() {
        let t0 = Instant::now();
        let mut ticker = FeedTicker::new();
        ticker.tick(100.0, 10.0, t0);
        ticker.push("late".into());
        ticker.tick(100.0, 10.0, t0 + Duration::from_secs(1));
        assert_eq!(ticker.text(), PLACEHOLDER);
        ticker.tick(100.0, 10.0, t0 + Duration::from_millis(2800));
        assert_eq!(ticker.text(), "late");
    }
}
