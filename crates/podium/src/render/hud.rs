use eframe::egui;

use crate::session::keymap::KeyMap;
use crate::theme::Theme;

const GESTURES: [(&str, &str); 4] = [
    ("Click link", "Follow link"),
    ("\u{2318}/Ctrl drag", "Move calibration"),
    ("\u{2318}/Ctrl wheel", "Scale calibration"),
    ("Hover link", "Show tooltip"),
];

/// Key reference overlay. Keys with several bindings share one row.
pub fn draw_help(ui: &egui::Ui, theme: &Theme, keys: &KeyMap, rect: egui::Rect) {
    let mut rows: Vec<(String, &'static str)> = Vec::new();
    for (key, command) in keys.entries() {
        let desc = command.describe();
        match rows.iter_mut().find(|(_, d)| *d == desc) {
            Some((label, _)) => {
                label.push_str(" / ");
                label.push_str(&key.label());
            }
            None => rows.push((key.label(), desc)),
        }
    }
    rows.extend(GESTURES.iter().map(|(k, d)| (k.to_string(), *d)));

    let bg = Theme::with_opacity(theme.panel_background, 0.92);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0;
    let line_height = 26.0;
    let hud_height = rows.len() as f32 * line_height + padding * 2.0 + 40.0;
    let hud_width = 420.0;
    let hud_rect = egui::Rect::from_center_size(
        rect.center(),
        egui::vec2(hud_width, hud_height.min(rect.height())),
    );
    let painter = ui.painter_at(hud_rect);
    painter.rect_filled(hud_rect, 12.0, bg);

    let title_galley = painter.layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0),
        Theme::with_opacity(theme.heading_color, 0.9),
    );
    painter.galley(
        egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding),
        title_galley,
        text_color,
    );

    let mut y = hud_rect.top() + padding + 40.0;
    for (key, desc) in &rows {
        let key_galley =
            painter.layout_no_wrap(key.clone(), egui::FontId::monospace(14.0), key_color);
        painter.galley(egui::pos2(hud_rect.left() + padding, y), key_galley, key_color);

        let desc_galley = painter.layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(14.0),
            text_color,
        );
        painter.galley(
            egui::pos2(hud_rect.left() + padding + 190.0, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

/// Informational alert with a dismiss button. Returns `true` once dismissed.
pub fn draw_alert(ctx: &egui::Context, theme: &Theme, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new("Podium")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 24.0))
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(theme.panel_background)
                .inner_margin(16.0),
        )
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(message).color(theme.panel_foreground));
            ui.add_space(8.0);
            if ui.button("Dismiss").clicked() {
                dismissed = true;
            }
        });
    dismissed
}
