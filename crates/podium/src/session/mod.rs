//! The presentation session: the single owner of navigation, view mode,
//! timer, calibration and feed state. The app feeds it [`Event`]s and acts on
//! the [`Effect`]s it returns; nothing else mutates presentation state.

pub mod action;
pub mod calibration;
pub mod event;
pub mod feed;
pub mod history;
pub mod keymap;
pub mod regions;
pub mod timer;
pub mod view_mode;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::annotations::{AnnotationIndex, AnnotationRef};
use action::Command;
use calibration::{Calibration, PageFit};
use event::Event;
use feed::FeedTicker;
use history::NavigationHistory;
use keymap::KeyMap;
use regions::InteractiveRegions;
use timer::Timer;
use view_mode::Multiplexer;

/// Window-level requests the session cannot carry out itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start fetching a URL for the web surface.
    LoadWeb(String),
    ToggleFullscreen,
    Quit,
}

pub struct Session {
    history: NavigationHistory,
    index: AnnotationIndex,
    mux: Multiplexer,
    timer: Timer,
    calibration: Calibration,
    regions: InteractiveRegions,
    feed: FeedTicker,
    keys: KeyMap,
    console_fit: Option<PageFit>,
    help: bool,
}

impl Session {
    pub fn new(
        page_count: usize,
        index: AnnotationIndex,
        planned: Duration,
        feed: bool,
        now: Instant,
    ) -> Self {
        Self {
            history: NavigationHistory::new(page_count),
            index,
            mux: Multiplexer::new(feed),
            timer: Timer::new(planned, now),
            calibration: Calibration::default(),
            regions: InteractiveRegions::default(),
            feed: FeedTicker::new(),
            keys: KeyMap::new(),
            console_fit: None,
            help: false,
        }
    }

    pub fn current_page(&self) -> usize {
        self.history.current()
    }

    /// The page after the current one, if any.
    pub fn next_page(&self) -> Option<usize> {
        let next = self.history.current() + 1;
        (next < self.history.page_count()).then_some(next)
    }

    #[cfg(test)]
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    pub fn notes(&self) -> &[String] {
        self.index.notes(self.history.current())
    }

    pub fn mux(&self) -> &Multiplexer {
        &self.mux
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn regions(&self) -> &InteractiveRegions {
        &self.regions
    }

    pub fn feed(&self) -> &FeedTicker {
        &self.feed
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    pub fn help_visible(&self) -> bool {
        self.help
    }

    pub fn handle(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        match event {
            Event::Key(key) => {
                let command = self.keys.lookup(key);
                self.apply(command, now)
            }
            Event::Click(pos) => match self.regions.hit(pos) {
                Some(target) => self.activate(target, now),
                None => Vec::new(),
            },
            Event::Hover(pos) => {
                self.regions.hover(pos, now);
                Vec::new()
            }
            Event::Drag(delta) => {
                if let Some(fit) = self.console_fit {
                    self.calibration.drag(fit, delta);
                    self.refresh_regions();
                }
                Vec::new()
            }
            Event::Zoom { anchor, delta } => {
                if let Some(fit) = self.console_fit {
                    self.calibration.zoom(fit, anchor, delta);
                    self.refresh_regions();
                }
                Vec::new()
            }
            Event::Layout(fit) => {
                self.console_fit = Some(fit);
                self.refresh_regions();
                Vec::new()
            }
            Event::Tick => Vec::new(),
            Event::AnimationTick {
                strip_width,
                text_width,
            } => {
                if self.mux.feed_enabled() {
                    self.feed.tick(strip_width, text_width, now);
                }
                Vec::new()
            }
            Event::FeedLines(lines) => {
                for line in lines {
                    self.feed.push(line);
                }
                Vec::new()
            }
            Event::WebCommitted(page) => {
                self.mux.web_committed(page, now);
                Vec::new()
            }
            Event::WebFailed { url } => {
                self.mux.web_failed(&url);
                Vec::new()
            }
        }
    }

    /// Resolve and apply the link annotation `target`.
    pub fn activate(&mut self, target: AnnotationRef, now: Instant) -> Vec<Effect> {
        let Some(entry) = self.index.link(target) else {
            return Vec::new();
        };
        let video = self.index.is_video(target).then_some(target);
        let command = action::resolve(&entry.link, video);
        debug!(page = target.page, annotation = target.index, ?command, "Link activated");
        self.apply(command, now)
    }

    pub fn apply(&mut self, command: Command, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match command {
            Command::Next => self.navigate(now, NavigationHistory::next),
            Command::Prev => self.navigate(now, NavigationHistory::prev),
            Command::Home => self.navigate(now, NavigationHistory::home),
            Command::End => self.navigate(now, NavigationHistory::end),
            Command::Back => self.navigate(now, NavigationHistory::back),
            Command::Forward => self.navigate(now, NavigationHistory::forward),
            Command::Goto(page) => self.navigate(now, |h| h.goto_page(page)),
            Command::ShowWeb(url) => {
                self.mux.request_web(&url);
                effects.push(Effect::LoadWeb(url));
            }
            Command::ShowVideo(target) => {
                if let Some(video) = self.index.video(target) {
                    self.mux.show_video(target, video.handle.clone(), now);
                }
            }
            Command::ToggleWeb => self.mux.toggle_web(now),
            Command::ToggleVideo => self.mux.toggle_video(now),
            Command::ToggleClock => self.timer.toggle_mode(now),
            Command::ResetTimer => self.timer.reset_origin(now),
            Command::AdjustPlanned(delta) => self.timer.adjust_planned(delta, now),
            Command::ResetCalibration => {
                self.calibration.reset();
                self.refresh_regions();
            }
            Command::ToggleFullscreen => effects.push(Effect::ToggleFullscreen),
            Command::ToggleHelp => self.help = !self.help,
            Command::Quit => effects.push(Effect::Quit),
            Command::None => {}
        }
        effects
    }

    fn navigate(&mut self, now: Instant, op: impl FnOnce(&mut NavigationHistory) -> bool) {
        if !op(&mut self.history) {
            return;
        }
        info!(page = self.history.current(), "Page changed");
        self.mux.show_slide(now);
        self.mux.cancel_pending_web();
        self.regions.invalidate();
        self.refresh_regions();
    }

    fn refresh_regions(&mut self) {
        if let Some(fit) = self.console_fit {
            self.regions
                .recompute(self.history.current(), self.calibration, fit, &self.index);
        }
    }
}
