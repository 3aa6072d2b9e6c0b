use eframe::egui::{Pos2, Rect, Vec2, pos2};

/// Scroll-to-zoom response: `exp(delta * ZOOM_RATE)`.
pub const ZOOM_RATE: f32 = 0.002;
/// Calibration scale stays within this range on both axes.
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;

/// Shared corrective transform applied to every page drawing, in page units.
/// A page point `p` is drawn at `p * scale + offset` before fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            scale: Vec2::splat(1.0),
            offset: Vec2::ZERO,
        }
    }
}

/// Where a page sits inside a viewport: screen = origin + p * scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    pub origin: Pos2,
    pub scale: f32,
}

impl PageFit {
    /// Largest uniform fit of `page` into `area`, centered.
    pub fn contain(page: Vec2, area: Rect) -> Self {
        if page.x <= 0.0 || page.y <= 0.0 {
            return Self {
                origin: area.min,
                scale: 1.0,
            };
        }
        let scale = (area.width() / page.x).min(area.height() / page.y);
        let size = page * scale;
        Self {
            origin: area.center() - size / 2.0,
            scale,
        }
    }
}

impl Calibration {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&self, p: Pos2) -> Pos2 {
        pos2(p.x * self.scale.x, p.y * self.scale.y) + self.offset
    }

    /// Page point to screen point for a fitted page.
    pub fn to_screen(&self, fit: PageFit, p: Pos2) -> Pos2 {
        fit.origin + self.apply(p).to_vec2() * fit.scale
    }

    pub fn rect_to_screen(&self, fit: PageFit, rect: Rect) -> Rect {
        Rect::from_two_pos(self.to_screen(fit, rect.min), self.to_screen(fit, rect.max))
    }

    /// Translate by a screen-space drag delta.
    pub fn drag(&mut self, fit: PageFit, delta: Vec2) {
        if fit.scale > 0.0 {
            self.offset += delta / fit.scale;
        }
    }

    /// Scale about `anchor` (screen space) so the page point under it stays put.
    pub fn zoom(&mut self, fit: PageFit, anchor: Pos2, scroll_delta: f32) {
        if fit.scale <= 0.0 {
            return;
        }
        let a = (anchor - fit.origin) / fit.scale;
        let factor = (scroll_delta * ZOOM_RATE).exp();
        let fx = (self.scale.x * factor).clamp(MIN_SCALE, MAX_SCALE) / self.scale.x;
        let fy = (self.scale.y * factor).clamp(MIN_SCALE, MAX_SCALE) / self.scale.y;
        self.scale = Vec2::new(self.scale.x * fx, self.scale.y * fy);
        let from_anchor = a - self.offset;
        self.offset = a - Vec2::new(from_anchor.x * fx, from_anchor.y * fy);
    }
}
