use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use eframe::egui;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use super::named::{self, NamedLink};
use super::{Annotation, AnnotationKind, Link, LoadedDocument, Page, PageRasterizer};

fn library_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "pdfium.dll"
    } else if cfg!(target_os = "macos") {
        "libpdfium.dylib"
    } else {
        "libpdfium.so"
    }
}

/// Bind the PDFium library. Looks in `library_dir` first, then next to the
/// executable, then the working directory, then the system search path.
pub fn bind(library_dir: Option<&Path>) -> Result<&'static Pdfium> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = library_dir {
        candidates.push(dir.to_path_buf());
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir);
    }
    candidates.push(PathBuf::from("."));

    for dir in candidates {
        let library = dir.join(library_file_name());
        if !library.is_file() {
            continue;
        }
        match Pdfium::bind_to_library(&library) {
            Ok(bindings) => {
                info!(path = %library.display(), "Bound PDFium");
                return Ok(Box::leak(Box::new(Pdfium::new(bindings))));
            }
            Err(e) => debug!(path = %library.display(), "Failed to bind PDFium: {e}"),
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        anyhow!(
            "Could not load the PDFium library ({e}). \
             Put {} next to podium or run `podium config set defaults.pdfium_path <dir>`.",
            library_file_name()
        )
    })?;
    info!("Bound system PDFium");
    // Documents borrow the library for the whole process lifetime.
    Ok(Box::leak(Box::new(Pdfium::new(bindings))))
}

/// Open `path` and snapshot every page once: label, crop size, annotations.
pub fn open(pdfium: &'static Pdfium, path: &Path) -> Result<(LoadedDocument, PdfRasterizer)> {
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| anyhow!("'{}' does not seem to be a pdf ({e})", path.display()))?;

    let named_links = named::scan(path).unwrap_or_else(|e| {
        debug!("Named link actions unavailable: {e:#}");
        Vec::new()
    });
    let pages: Vec<Page> = document
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| {
            snapshot(&page, named_links.get(index).map_or(&[][..], Vec::as_slice))
        })
        .collect();
    if pages.is_empty() {
        anyhow::bail!("'{}' has no pages", path.display());
    }
    info!(path = %path.display(), pages = pages.len(), "Opened document");

    Ok((
        LoadedDocument::new(path, pages),
        PdfRasterizer { document },
    ))
}

fn snapshot(page: &PdfPage, named_links: &[NamedLink]) -> Page {
    let height = page.height().value;
    let mut built = Page::new(egui::vec2(page.width().value, height));
    if let Some(label) = page.label() {
        built = built.with_label(label);
    }
    for annotation in page.annotations().iter() {
        let Ok(rect) = annotation.bounds() else {
            continue;
        };
        let (left, top) = (rect.left().value, rect.top().value);
        let (right, bottom) = (rect.right().value, rect.bottom().value);
        // PDF space has its origin bottom-left.
        let bounds = egui::Rect::from_min_max(
            egui::pos2(left, height - top),
            egui::pos2(right, height - bottom),
        );
        let kind = match &annotation {
            PdfPageAnnotation::Text(note) => match note.contents() {
                Some(contents) if !contents.trim().is_empty() => AnnotationKind::Note { contents },
                _ => AnnotationKind::Other,
            },
            PdfPageAnnotation::Link(link) => {
                let mut converted = convert_link(link);
                converted.named = named::find(named_links, [left, bottom, right, top]);
                AnnotationKind::Link(converted)
            }
            _ => AnnotationKind::Other,
        };
        built = built.with_annotation(Annotation { bounds, kind });
    }
    built
}

fn convert_link(annotation: &PdfPageLinkAnnotation) -> Link {
    let mut link = Link {
        tooltip: annotation.contents().filter(|t| !t.trim().is_empty()),
        ..Link::default()
    };
    let Ok(pdf_link) = annotation.link() else {
        return link;
    };
    if let Some(destination) = pdf_link.destination() {
        link.destination = destination.page_index().ok().map(|i| i as usize);
    }
    match pdf_link.action() {
        Some(PdfAction::LocalDestination(action)) => {
            if let Ok(destination) = action.destination() {
                link.destination = destination.page_index().ok().map(|i| i as usize);
            }
        }
        Some(PdfAction::Uri(action)) => {
            link.url = action.uri().ok();
        }
        _ => {}
    }
    link
}

/// Rasterizes pages of the open PDF for both surfaces.
pub struct PdfRasterizer {
    document: PdfDocument<'static>,
}

impl PageRasterizer for PdfRasterizer {
    fn rasterize(&self, index: usize, target_width: u32) -> Result<egui::ColorImage> {
        let page_index = PdfPageIndex::try_from(index).context("Page index out of range")?;
        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| anyhow!("Failed to load page {index}: {e}"))?;
        let config = PdfRenderConfig::new()
            .set_target_width(target_width.max(1) as i32)
            .render_annotations(false);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| anyhow!("Failed to render page {index}: {e}"))?;
        let size = [bitmap.width() as usize, bitmap.height() as usize];
        Ok(egui::ColorImage::from_rgba_unmultiplied(
            size,
            &bitmap.as_rgba_bytes(),
        ))
    }
}
