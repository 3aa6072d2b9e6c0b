use std::collections::HashMap;
use std::time::Instant;

use eframe::egui::{self, TextureHandle, TextureOptions};

use super::draw_page;
use super::page_cache::PageCache;
use crate::annotations::AnnotationRef;
use crate::document::LoadedDocument;
use crate::media::video::VideoHandle;
use crate::media::web::WebPage;
use crate::session::Session;
use crate::session::calibration::PageFit;
use crate::session::view_mode::ViewMode;
use crate::theme::Theme;

/// Sizes the feed ticker needs for its next animation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedMetrics {
    pub strip_width: f32,
    pub text_width: f32,
}

/// Poster frame textures, uploaded on first use.
#[derive(Default)]
pub struct Posters {
    textures: HashMap<AnnotationRef, Option<TextureHandle>>,
}

impl Posters {
    fn get(
        &mut self,
        ctx: &egui::Context,
        session: &Session,
        source: AnnotationRef,
    ) -> Option<TextureHandle> {
        self.textures
            .entry(source)
            .or_insert_with(|| {
                let poster = session.index().video(source)?.poster.clone()?;
                Some(ctx.load_texture(
                    format!("poster-{}-{}", source.page, source.index),
                    poster,
                    TextureOptions::LINEAR,
                ))
            })
            .clone()
    }
}

/// Draw the audience surface. Returns feed metrics while the overlay runs.
pub fn draw(
    ui: &mut egui::Ui,
    session: &Session,
    document: &LoadedDocument,
    pages: &mut PageCache,
    posters: &mut Posters,
    theme: &Theme,
    now: Instant,
) -> Option<FeedMetrics> {
    let rect = ui.max_rect();
    let mux = session.mux();
    match (mux.mode(), mux.web_page(), mux.video()) {
        (ViewMode::Web, Some(page), _) => draw_web(ui, page, theme, rect),
        (ViewMode::Video, _, Some(video)) => {
            let poster = posters.get(ui.ctx(), session, video.source);
            let has_poster = poster.is_some();
            draw_video(ui, &video.handle, poster, theme, rect);
            draw_video_caption(ui, &video_caption(&video.handle, has_poster), theme, rect);
        }
        _ => {
            draw_page(
                ui,
                document,
                pages,
                session.current_page(),
                rect,
                session.calibration(),
                theme,
            );
        }
    }

    if !mux.feed_enabled() {
        return None;
    }
    let feed = session.feed();
    Some(draw_feed(ui, feed.text(), feed.offset(rect.width(), now), theme, rect))
}

fn draw_web(ui: &mut egui::Ui, page: &WebPage, theme: &Theme, rect: egui::Rect) {
    ui.painter().rect_filled(rect, 0.0, theme.background);
    let inner = rect.shrink(48.0);
    ui.scope_builder(egui::UiBuilder::new().max_rect(inner), |ui| {
        ui.label(
            egui::RichText::new(&page.title)
                .size(theme.heading_size * 1.4)
                .color(theme.heading_color),
        );
        ui.label(
            egui::RichText::new(&page.url)
                .size(theme.body_size * 0.7)
                .color(theme.muted),
        );
        ui.add_space(16.0);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(&page.text)
                        .size(theme.body_size)
                        .color(theme.foreground),
                );
            });
    });
}

fn draw_video(
    ui: &egui::Ui,
    handle: &VideoHandle,
    poster: Option<TextureHandle>,
    theme: &Theme,
    rect: egui::Rect,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.stage);
    match poster {
        Some(texture) => {
            let fit = PageFit::contain(texture.size_vec2(), rect);
            let image_rect =
                egui::Rect::from_min_size(fit.origin, texture.size_vec2() * fit.scale);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                handle.title(),
                egui::FontId::proportional(theme.heading_size * 1.5),
                theme.foreground,
            );
            painter.text(
                rect.center() + egui::vec2(0.0, theme.heading_size * 1.5),
                egui::Align2::CENTER_CENTER,
                format!("{} \u{b7} no poster frame", handle.container.name()),
                egui::FontId::proportional(theme.body_size),
                theme.muted,
            );
        }
    }
}

/// The audience surface shows a still, never a running clip, so the caption
/// carries no playback position.
fn video_caption(handle: &VideoHandle, has_poster: bool) -> String {
    if has_poster {
        format!("Poster \u{b7} {}", handle.title())
    } else {
        handle.title()
    }
}

fn draw_video_caption(ui: &egui::Ui, text: &str, theme: &Theme, rect: egui::Rect) {
    let galley = ui.painter().layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(theme.body_size * 0.8),
        theme.foreground,
    );
    let padding = 8.0;
    let caption = egui::Rect::from_min_size(
        egui::pos2(rect.left() + 16.0, rect.top() + 16.0),
        galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
    );
    ui.painter()
        .rect_filled(caption, 6.0, Theme::with_opacity(theme.panel_background, 0.8));
    ui.painter().galley(
        caption.min + egui::vec2(padding, padding),
        galley,
        theme.foreground,
    );
}

fn draw_feed(
    ui: &egui::Ui,
    text: &str,
    offset: f32,
    theme: &Theme,
    rect: egui::Rect,
) -> FeedMetrics {
    let height = theme.feed_size * 1.6;
    let strip =
        egui::Rect::from_min_max(egui::pos2(rect.left(), rect.bottom() - height), rect.max);
    let painter = ui.painter_at(strip);
    painter.rect_filled(strip, 0.0, Theme::with_opacity(theme.panel_background, 0.85));

    let galley = painter.layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(theme.feed_size),
        theme.panel_foreground,
    );
    let text_width = galley.rect.width();
    let y = strip.center().y - galley.rect.height() / 2.0;
    painter.galley(egui::pos2(strip.left() + offset, y), galley, theme.panel_foreground);

    FeedMetrics {
        strip_width: strip.width(),
        text_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::video::Container;

    #[test]
    fn test_video_caption_has_no_playback_position() {
        let handle = VideoHandle {
            path: "talk/clip.mp4".into(),
            container: Container::IsoMedia,
        };
        assert_eq!(video_caption(&handle, true), "Poster \u{b7} clip.mp4");
        assert_eq!(video_caption(&handle, false), "clip.mp4");
    }
}
