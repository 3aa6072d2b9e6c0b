use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};

use crate::annotations::AnnotationIndex;
use crate::config::Config;
use crate::document::{Document, LoadedDocument, pdf};
use crate::media::feed::LineFeed;
use crate::media::video::SniffDecoder;
use crate::media::web::{FetchSurface, WebEvent, WebSurface};
use crate::render;
use crate::render::output::{FeedMetrics, Posters};
use crate::render::page_cache::PageCache;
use crate::session::event::{Event, Scheduler};
use crate::session::keymap::Key;
use crate::session::{Effect, Session};
use crate::theme::Theme;
use crate::update_check::{self, Notice};

/// Startup options after CLI flags and config are merged.
pub struct Options {
    pub file: PathBuf,
    /// Minutes; falls back to the configured default.
    pub duration: Option<u64>,
    pub feed: bool,
    pub fullscreen: bool,
}

fn output_viewport() -> egui::ViewportId {
    egui::ViewportId::from_hash_of("podium-output")
}

struct PresenterApp {
    document: LoadedDocument,
    session: Session,
    pages: PageCache,
    posters: Posters,
    theme: Theme,
    web: FetchSurface,
    feed: Option<LineFeed>,
    updates: Option<Receiver<Notice>>,
    notice: Option<String>,
    scheduler: Scheduler,
    fullscreen: bool,
    feed_metrics: Option<FeedMetrics>,
}

impl PresenterApp {
    /// Drain the background collaborators into session events.
    fn poll_sources(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for web_event in self.web.poll() {
            match web_event {
                WebEvent::Committed(page) => events.push(Event::WebCommitted(page)),
                WebEvent::Failed { url, reason } => {
                    warn!(%url, %reason, "Web page failed to load");
                    events.push(Event::WebFailed { url });
                }
            }
        }
        if let Some(feed) = self.feed.as_mut() {
            let lines = feed.poll();
            if !lines.is_empty() {
                events.push(Event::FeedLines(lines));
            }
        }
        if let Some(rx) = &self.updates {
            match rx.try_recv() {
                Ok(notice) => {
                    self.notice = Some(notice.message());
                    self.updates = None;
                }
                Err(TryRecvError::Disconnected) => self.updates = None,
                Err(TryRecvError::Empty) => {}
            }
        }
        events
    }

    fn handle_all(&mut self, events: Vec<Event>, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        for event in events {
            effects.extend(self.session.handle(event, now));
        }
        effects
    }

    fn apply_effects(&mut self, ctx: &egui::Context, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadWeb(url) => self.web.load(&url),
                Effect::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    ctx.send_viewport_cmd_to(
                        egui::ViewportId::ROOT,
                        egui::ViewportCommand::Fullscreen(self.fullscreen),
                    );
                }
                Effect::Quit => {
                    ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close)
                }
            }
        }
    }

    /// Audience window. Returns its key presses and whether it asked to close.
    fn show_output(&mut self, ctx: &egui::Context, now: Instant) -> (Vec<Key>, bool) {
        let title = format!("{} - Audience", self.document.title());
        let builder = egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([1280.0, 720.0])
            .with_fullscreen(self.fullscreen);
        let bg = self.theme.stage;

        ctx.show_viewport_immediate(output_viewport(), builder, |ctx, _class| {
            let keys = ctx.input(|i| session_keys(&i.events));
            let close = ctx.input(|i| i.viewport().close_requested());
            egui::CentralPanel::default()
                .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
                .show(ctx, |ui| {
                    self.feed_metrics = render::output::draw(
                        ui,
                        &self.session,
                        &self.document,
                        &mut self.pages,
                        &mut self.posters,
                        &self.theme,
                        now,
                    );
                });
            (keys, close)
        })
    }
}

impl eframe::App for PresenterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        let mut events = self.poll_sources();
        let due = self.scheduler.poll(now);
        if due.clock {
            events.push(Event::Tick);
        }
        if due.animation {
            if let Some(metrics) = self.feed_metrics {
                events.push(Event::AnimationTick {
                    strip_width: metrics.strip_width,
                    text_width: metrics.text_width,
                });
            }
        }
        // Keys are read first and handled after the closure returns
        // (mutating state inside ctx.input() holds its lock).
        let keys = ctx.input(|i| session_keys(&i.events));
        events.extend(keys.into_iter().map(Event::Key));
        let mut effects = self.handle_all(events, now);

        let bg = self.theme.background;
        let console_events = egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let events = render::console::draw(
                    ui,
                    &self.session,
                    &self.document,
                    &mut self.pages,
                    &self.theme,
                    now,
                );
                if self.session.help_visible() {
                    render::hud::draw_help(ui, &self.theme, self.session.keys(), ui.max_rect());
                }
                events
            })
            .inner;
        effects.extend(self.handle_all(console_events, now));

        if let Some(message) = &self.notice {
            if render::hud::draw_alert(ctx, &self.theme, message) {
                self.notice = None;
            }
        }

        let (output_keys, output_closed) = self.show_output(ctx, now);
        effects.extend(self.handle_all(output_keys.into_iter().map(Event::Key).collect(), now));
        if output_closed {
            effects.push(Effect::Quit);
        }

        self.apply_effects(ctx, effects);
        self.pages.trim(self.session.current_page());
        ctx.request_repaint_after(self.scheduler.next_wakeup(Instant::now()));
    }
}

/// Map toolkit input to session keys. Printable keys arrive as text so that
/// shifted symbols such as `+` resolve the same on every layout.
fn session_keys(events: &[egui::Event]) -> Vec<Key> {
    let mut keys = Vec::new();
    for event in events {
        match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } if !modifiers.command => {
                if let Some(key) = named_key(*key) {
                    keys.push(key);
                }
            }
            egui::Event::Text(text) => {
                keys.extend(text.chars().filter(|c| !c.is_whitespace()).map(Key::Char));
            }
            _ => {}
        }
    }
    keys
}

fn named_key(key: egui::Key) -> Option<Key> {
    let key = match key {
        egui::Key::ArrowUp => Key::Up,
        egui::Key::ArrowDown => Key::Down,
        egui::Key::ArrowLeft => Key::Left,
        egui::Key::ArrowRight => Key::Right,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::PageUp => Key::PageUp,
        egui::Key::PageDown => Key::PageDown,
        egui::Key::Space => Key::Space,
        egui::Key::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// Planned talk length; absurd minute counts saturate instead of overflowing.
fn planned_duration(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

pub fn run(options: Options) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let pdfium = pdf::bind(config.pdfium_path())?;
    let (document, rasterizer) = pdf::open(pdfium, &options.file)
        .with_context(|| format!("Failed to open {}", options.file.display()))?;
    let index = AnnotationIndex::build(&document, document.base_dir(), &SniffDecoder);

    let minutes = options.duration.unwrap_or_else(|| config.duration_minutes());
    let feed = options.feed || config.feed();
    let theme = Theme::from_name(config.theme_name());
    info!(
        file = %options.file.display(),
        pages = document.page_count(),
        minutes,
        feed,
        theme = %theme.name,
        "Starting presentation"
    );

    let now = Instant::now();
    let session = Session::new(
        document.page_count(),
        index,
        planned_duration(minutes),
        feed,
        now,
    );
    let updates = config.check_updates().then(update_check::spawn);
    let title = format!("{} - Console", document.title());
    let fullscreen = options.fullscreen;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title(&title)
            .with_fullscreen(fullscreen),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if theme.name == "light" {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            }
            Ok(Box::new(PresenterApp {
                document,
                session,
                pages: PageCache::new(Box::new(rasterizer)),
                posters: Posters::default(),
                theme,
                web: FetchSurface::new(),
                feed: feed.then(LineFeed::stdin),
                updates,
                notice: None,
                scheduler: Scheduler::new(feed, now),
                fullscreen,
                feed_metrics: None,
            }))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
