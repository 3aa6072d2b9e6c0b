use std::time::Instant;

use eframe::egui;

use super::page_cache::PageCache;
use super::{draw_page, fit_line};
use crate::document::{Document, LoadedDocument};
use crate::session::Session;
use crate::session::calibration::ZOOM_RATE;
use crate::session::event::Event;
use crate::session::timer::{TimerDisplay, format_duration};
use crate::session::view_mode::ViewMode;
use crate::theme::Theme;

const MARGIN: f32 = 16.0;
const HEADER_HEIGHT: f32 = 36.0;
const STATUS_HEIGHT: f32 = 28.0;
/// Share of the width given to the current slide.
const CURRENT_SHARE: f32 = 0.62;

/// Draw the presenter console and report pointer input on the current slide.
///
/// The first event is always the layout of the current slide (when it could
/// be drawn), so regions are up to date before any click is resolved.
pub fn draw(
    ui: &mut egui::Ui,
    session: &Session,
    document: &LoadedDocument,
    pages: &mut PageCache,
    theme: &Theme,
    now: Instant,
) -> Vec<Event> {
    let mut events = Vec::new();
    let rect = ui.max_rect().shrink(MARGIN);
    let current = session.current_page();

    draw_header(ui, session, document, theme, rect);

    let body = egui::Rect::from_min_max(
        egui::pos2(rect.left(), rect.top() + HEADER_HEIGHT),
        rect.max,
    );
    let split = body.left() + body.width() * CURRENT_SHARE;
    let slide_rect = egui::Rect::from_min_max(
        body.min,
        egui::pos2(split - MARGIN / 2.0, body.bottom() - STATUS_HEIGHT),
    );
    let status_rect = egui::Rect::from_min_max(
        egui::pos2(body.left(), slide_rect.bottom()),
        egui::pos2(slide_rect.right(), body.bottom()),
    );
    let column = egui::Rect::from_min_max(egui::pos2(split + MARGIN / 2.0, body.top()), body.max);

    let calibration = session.calibration();
    if let Some(fit) = draw_page(ui, document, pages, current, slide_rect, calibration, theme) {
        events.push(Event::Layout(fit));
        events.extend(pointer_events(ui, slide_rect));
    }
    draw_link_outlines(ui, session, theme, slide_rect);
    draw_status(ui, session, theme, status_rect);

    let next_height = (column.width() * 0.75).min(column.height() * 0.45);
    let next_rect = egui::Rect::from_min_size(column.min, egui::vec2(column.width(), next_height));
    match session.next_page() {
        Some(next) => {
            draw_page(ui, document, pages, next, next_rect, calibration, theme);
        }
        None => {
            let painter = ui.painter_at(next_rect);
            painter.rect_filled(next_rect, 0.0, theme.stage);
            painter.text(
                next_rect.center(),
                egui::Align2::CENTER_CENTER,
                "End of presentation",
                egui::FontId::proportional(theme.body_size),
                theme.muted,
            );
        }
    }

    let timer_rect = egui::Rect::from_min_size(
        egui::pos2(column.left(), next_rect.bottom() + MARGIN),
        egui::vec2(column.width(), theme.timer_size * 1.3),
    );
    draw_timer(ui, session, theme, timer_rect, now);

    let notes_rect = egui::Rect::from_min_max(
        egui::pos2(column.left(), timer_rect.bottom() + theme.body_size + MARGIN),
        column.max,
    );
    draw_notes(ui, session, theme, notes_rect);

    if let Some((text, anchor)) = session.regions().tooltip(now) {
        draw_tooltip(ui, theme, text, anchor);
    }

    events
}

fn pointer_events(ui: &egui::Ui, slide_rect: egui::Rect) -> Vec<Event> {
    let mut events = Vec::new();
    let response = ui.interact(
        slide_rect,
        ui.id().with("current-slide"),
        egui::Sense::click_and_drag(),
    );
    let (command, zoom) = ui.input(|i| (i.modifiers.command, i.zoom_delta()));

    if command {
        if response.dragged() {
            events.push(Event::Drag(response.drag_delta()));
        }
        if let Some(anchor) = response.hover_pos() {
            if zoom != 1.0 {
                events.push(Event::Zoom {
                    anchor,
                    delta: zoom.ln() / ZOOM_RATE,
                });
            }
        }
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(Event::Click(pos));
        }
    }
    events.push(Event::Hover(response.hover_pos()));
    events
}

fn draw_header(
    ui: &egui::Ui,
    session: &Session,
    document: &LoadedDocument,
    theme: &Theme,
    rect: egui::Rect,
) {
    let painter = ui.painter();
    let current = session.current_page();
    let label = format!(
        "{} ({}/{})",
        document.display_label(current),
        current + 1,
        document.page_count()
    );
    let label_galley = painter.layout_no_wrap(
        label,
        egui::FontId::proportional(theme.heading_size),
        theme.heading_color,
    );
    let label_width = label_galley.rect.width();
    painter.galley(
        egui::pos2(rect.right() - label_width, rect.top()),
        label_galley,
        theme.heading_color,
    );

    let title = fit_line(
        ui,
        &document.title(),
        egui::FontId::proportional(theme.heading_size),
        theme.muted,
        (rect.width() - label_width - MARGIN).max(0.0),
    );
    painter.galley(rect.left_top(), title, theme.muted);
}

fn draw_link_outlines(ui: &egui::Ui, session: &Session, theme: &Theme, slide_rect: egui::Rect) {
    let painter = ui.painter_at(slide_rect);
    for region in session.regions().regions() {
        let color = if session.index().is_video(region.target) {
            theme.overtime
        } else {
            theme.accent
        };
        painter.rect_stroke(
            region.rect,
            2.0,
            egui::Stroke::new(1.5, Theme::with_opacity(color, 0.7)),
            egui::StrokeKind::Outside,
        );
    }
}

fn draw_status(ui: &egui::Ui, session: &Session, theme: &Theme, rect: egui::Rect) {
    let mux = session.mux();
    let mut status = match mux.mode() {
        ViewMode::Slide => "Output: slide".to_string(),
        ViewMode::Web => format!(
            "Output: web: {}",
            mux.web_page().map(|p| p.title.as_str()).unwrap_or_default()
        ),
        ViewMode::Video => match mux.video() {
            Some(video) => format!("Output: video poster: {}", video.handle.title()),
            None => "Output: video".to_string(),
        },
    };
    if let Some(url) = mux.pending_web() {
        status.push_str(&format!("  \u{b7}  loading {url}\u{2026}"));
    }
    if mux.feed_enabled() {
        status.push_str(&format!("  \u{b7}  feed ({} queued)", session.feed().buffered()));
    }
    if !session.calibration().is_identity() {
        status.push_str("  \u{b7}  calibrated");
    }
    let galley = fit_line(
        ui,
        &status,
        egui::FontId::proportional(theme.body_size * 0.8),
        theme.muted,
        rect.width(),
    );
    ui.painter()
        .galley(egui::pos2(rect.left(), rect.top() + 6.0), galley, theme.muted);
}

fn draw_timer(ui: &egui::Ui, session: &Session, theme: &Theme, rect: egui::Rect, now: Instant) {
    let (text, color) = match session.timer().display(now) {
        TimerDisplay::Clock => (
            chrono::Local::now().format("%H:%M:%S").to_string(),
            theme.foreground,
        ),
        TimerDisplay::Remaining { remaining, overtime } => {
            let color = if overtime {
                theme.overtime
            } else {
                theme.heading_color
            };
            (format_duration(remaining), color)
        }
        TimerDisplay::Planned(planned) => (format_duration(planned), theme.accent),
    };
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::monospace(theme.timer_size),
        color,
    );

    let timer = session.timer();
    let caption = format!(
        "elapsed {}{}",
        format_duration(timer.elapsed(now)),
        if timer.is_running() { "" } else { " (paused)" }
    );
    ui.painter().text(
        egui::pos2(rect.center().x, rect.bottom()),
        egui::Align2::CENTER_TOP,
        caption,
        egui::FontId::proportional(theme.body_size * 0.7),
        theme.muted,
    );
}

fn draw_notes(ui: &egui::Ui, session: &Session, theme: &Theme, rect: egui::Rect) {
    if rect.height() <= 0.0 {
        return;
    }
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 8.0, theme.panel_background);
    let notes = session.notes();
    let (text, color) = if notes.is_empty() {
        ("No notes for this slide".to_string(), theme.muted)
    } else {
        (notes.join("\n\n"), theme.panel_foreground)
    };
    let inner = rect.shrink(MARGIN);
    let galley = painter.layout(
        text,
        egui::FontId::proportional(theme.notes_size),
        color,
        inner.width(),
    );
    painter.galley(inner.min, galley, color);
}

fn draw_tooltip(ui: &egui::Ui, theme: &Theme, text: &str, anchor: egui::Rect) {
    let painter = ui.painter();
    let galley = painter.layout(
        text.to_string(),
        egui::FontId::proportional(theme.body_size * 0.8),
        theme.panel_foreground,
        320.0,
    );
    let padding = 8.0;
    let rect = egui::Rect::from_min_size(
        anchor.left_bottom() + egui::vec2(0.0, 4.0),
        galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
    );
    painter.rect_filled(rect, 6.0, Theme::with_opacity(theme.panel_background, 0.95));
    painter.galley(rect.min + egui::vec2(padding, padding), galley, theme.panel_foreground);
}
