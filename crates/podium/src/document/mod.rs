pub mod named;
pub mod pdf;

use std::path::{Path, PathBuf};

use eframe::egui::{ColorImage, Rect, Vec2};

/// Read-only view of a paginated document.
pub trait Document {
    fn page_count(&self) -> usize;
    fn page(&self, index: usize) -> Option<&Page>;
}

/// Draws pages into RGBA images; the session never rasterizes itself.
pub trait PageRasterizer {
    fn rasterize(&self, index: usize, target_width: u32) -> anyhow::Result<ColorImage>;
}

/// One page as seen by the presenter: its label, crop size and annotations.
///
/// Annotation bounds are in page points with a top-left origin.
#[derive(Debug, Clone)]
pub struct Page {
    pub label: Option<String>,
    pub crop: Vec2,
    pub annotations: Vec<Annotation>,
}

impl Page {
    pub fn new(crop: Vec2) -> Self {
        Self {
            label: None,
            crop,
            annotations: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub bounds: Rect,
    pub kind: AnnotationKind,
}

#[derive(Debug, Clone)]
pub enum AnnotationKind {
    /// Speaker note, never shown on the output surface.
    Note { contents: String },
    Link(Link),
    Other,
}

/// A link annotation. Any combination of targets may be present; the action
/// resolver decides which one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    pub named: Option<NamedAction>,
    pub destination: Option<usize>,
    pub url: Option<String>,
    pub tooltip: Option<String>,
}

/// PDF named actions (`/S /Named /N ...`), read by [`named::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedAction {
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    GoBack,
    GoForward,
    Other(String),
}

/// A fully loaded document snapshot. Immutable once built.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    path: PathBuf,
    pages: Vec<Page>,
}

impl LoadedDocument {
    pub fn new(path: impl Into<PathBuf>, pages: Vec<Page>) -> Self {
        Self {
            path: path.into(),
            pages,
        }
    }

    /// Directory used to resolve relative link targets.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    pub fn title(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Label shown on the console: the page label when the document has one,
    /// otherwise the 1-based page number.
    pub fn display_label(&self, index: usize) -> String {
        self.pages
            .get(index)
            .and_then(|p| p.label.clone())
            .unwrap_or_else(|| (index + 1).to_string())
    }
}

impl Document for LoadedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use eframe::egui::{pos2, vec2};

    pub fn blank_pages(count: usize) -> Vec<Page> {
        (0..count).map(|_| Page::new(vec2(800.0, 600.0))).collect()
    }

    pub fn note(text: &str) -> Annotation {
        Annotation {
            bounds: Rect::from_min_size(pos2(0.0, 0.0), vec2(20.0, 20.0)),
            kind: AnnotationKind::Note {
                contents: text.to_string(),
            },
        }
    }

    pub fn link_at(x: f32, y: f32, link: Link) -> Annotation {
        Annotation {
            bounds: Rect::from_min_size(pos2(x, y), vec2(100.0, 40.0)),
            kind: AnnotationKind::Link(link),
        }
    }
}
