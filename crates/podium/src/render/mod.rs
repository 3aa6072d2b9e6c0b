pub mod console;
pub mod hud;
pub mod output;
pub mod page_cache;

use std::sync::Arc;

use eframe::egui;

use crate::document::{Document, LoadedDocument};
use crate::session::calibration::{Calibration, PageFit};
use crate::theme::Theme;

use page_cache::PageCache;

/// Draw `page` fitted into `rect` with the calibration transform applied.
/// Returns the fit so callers can map page coordinates to the screen.
pub fn draw_page(
    ui: &egui::Ui,
    document: &LoadedDocument,
    pages: &mut PageCache,
    page: usize,
    rect: egui::Rect,
    calibration: Calibration,
    theme: &Theme,
) -> Option<PageFit> {
    let crop = document.page(page)?.crop;
    let fit = PageFit::contain(crop, rect);
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.stage);

    let page_rect =
        calibration.rect_to_screen(fit, egui::Rect::from_min_size(egui::Pos2::ZERO, crop));
    let pixel_size = page_rect.size() * ui.ctx().pixels_per_point();
    match pages.get(ui.ctx(), page, pixel_size) {
        Some(texture) => {
            painter.image(
                texture.id(),
                page_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(page_rect, 0.0, theme.panel_background);
            painter.text(
                page_rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("Page {} could not be rendered", page + 1),
                egui::FontId::proportional(theme.body_size),
                theme.muted,
            );
        }
    }
    Some(fit)
}

/// Single line of text, truncated to `max_width` with an ellipsis.
pub fn fit_line(
    ui: &egui::Ui,
    text: &str,
    font: egui::FontId,
    color: egui::Color32,
    max_width: f32,
) -> Arc<egui::Galley> {
    let mut job = egui::text::LayoutJob::simple_singleline(text.to_string(), font, color);
    job.wrap = egui::text::TextWrapping::truncate_at_width(max_width);
    ui.painter().layout_job(job)
}
