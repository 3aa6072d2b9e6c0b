use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    /// Letterbox around slides on both surfaces.
    pub stage: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub overtime: Color32,
    pub panel_background: Color32,
    pub panel_foreground: Color32,
    pub timer_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub notes_size: f32,
    pub feed_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            stage: Color32::BLACK,
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            muted: Color32::from_rgb(0x80, 0x80, 0x80),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            overtime: Color32::from_rgb(0xFF, 0x6B, 0x5B),
            panel_background: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            panel_foreground: Color32::from_rgb(0xD4, 0xD4, 0xD4),
            timer_size: 64.0,
            heading_size: 28.0,
            body_size: 20.0,
            notes_size: 22.0,
            feed_size: 28.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            stage: Color32::from_rgb(0x20, 0x20, 0x20),
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            muted: Color32::from_rgb(0x70, 0x70, 0x78),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            overtime: Color32::from_rgb(0xC7, 0x3E, 0x1D),
            panel_background: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            panel_foreground: Color32::from_rgb(0x33, 0x33, 0x33),
            timer_size: 64.0,
            heading_size: 28.0,
            body_size: 20.0,
            notes_size: 22.0,
            feed_size: 28.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_dark() {
        assert_eq!(Theme::from_name("light").name, "light");
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("solarized").name, "dark");
    }

    #[test]
    fn test_with_opacity_sets_alpha() {
        assert_eq!(Theme::with_opacity(Color32::WHITE, 0.5).a(), 127);
        assert_eq!(Theme::with_opacity(Color32::WHITE, 1.0).a(), 255);
    }
}
