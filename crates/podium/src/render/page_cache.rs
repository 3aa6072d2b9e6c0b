use std::collections::HashMap;

use eframe::egui::{self, TextureHandle, TextureOptions};
use tracing::{debug, warn};

use crate::document::PageRasterizer;

/// Widths are rounded up to this step so window resizes do not re-rasterize
/// on every frame.
const WIDTH_STEP: u32 = 256;
/// Pages further than this from the current page are dropped.
const KEEP_RADIUS: usize = 3;

/// GPU textures of rasterized pages, shared by both surfaces.
pub struct PageCache {
    rasterizer: Box<dyn PageRasterizer>,
    textures: HashMap<usize, Entry>,
}

struct Entry {
    width: u32,
    /// `None` after a failed rasterization; not retried at the same width.
    texture: Option<TextureHandle>,
}

impl PageCache {
    pub fn new(rasterizer: Box<dyn PageRasterizer>) -> Self {
        Self {
            rasterizer,
            textures: HashMap::new(),
        }
    }

    /// Texture for `page` at least `pixel_size.x` wide, capped so neither
    /// side exceeds the GPU's maximum texture side.
    pub fn get(
        &mut self,
        ctx: &egui::Context,
        page: usize,
        pixel_size: egui::Vec2,
    ) -> Option<TextureHandle> {
        let max_side = ctx.input(|i| i.max_texture_side) as u32;
        let width = bucket(pixel_size.x).min(width_limit(pixel_size, max_side));
        if let Some(entry) = self.textures.get(&page) {
            if entry.width >= width {
                return entry.texture.clone();
            }
        }
        let texture = match self.rasterizer.rasterize(page, width) {
            Ok(image) => {
                debug!(page, width, "Rasterized page");
                Some(ctx.load_texture(format!("page-{page}"), image, TextureOptions::LINEAR))
            }
            Err(e) => {
                warn!(page, "Could not rasterize page: {e:#}");
                None
            }
        };
        self.textures.insert(
            page,
            Entry {
                width,
                texture: texture.clone(),
            },
        );
        texture
    }

    /// Drop textures of pages far from `current`.
    pub fn trim(&mut self, current: usize) {
        self.textures
            .retain(|page, _| page.abs_diff(current) <= KEEP_RADIUS);
    }

    #[cfg(test)]
    fn cached_pages(&self) -> usize {
        self.textures.len()
    }
}

/// Widest raster whose height still fits in `max_side` at the page's aspect.
fn width_limit(pixel_size: egui::Vec2, max_side: u32) -> u32 {
    let max_side = max_side.max(1);
    if pixel_size.x <= 0.0 || pixel_size.y <= pixel_size.x {
        return max_side;
    }
    let limit = (max_side as f32 * pixel_size.x / pixel_size.y).floor() as u32;
    limit.clamp(1, max_side)
}

fn bucket(pixel_width: f32) -> u32 {
    let width = pixel_width.max(1.0).ceil() as u32;
    width.div_ceil(WIDTH_STEP) * WIDTH_STEP
}
