use std::collections::HashMap;
use std::path::Path;

use eframe::egui::{ColorImage, Rect};
use tracing::{debug, info};

use crate::document::{AnnotationKind, Document, Link};
use crate::media::video::{self, VideoDecoder, VideoHandle};

/// Identifies an annotation by page and position in that page's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationRef {
    pub page: usize,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct LinkEntry {
    pub target: AnnotationRef,
    pub bounds: Rect,
    pub link: Link,
}

#[derive(Debug, Clone)]
pub struct VideoEntry {
    pub handle: VideoHandle,
    pub poster: Option<ColorImage>,
}

/// Notes, links and video-bearing links of a document, gathered in a single
/// pass at load time. Read-only afterwards.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
    notes: Vec<Vec<String>>,
    links: Vec<Vec<LinkEntry>>,
    videos: HashMap<AnnotationRef, VideoEntry>,
}

impl AnnotationIndex {
    pub fn build(document: &dyn Document, base_dir: &Path, decoder: &dyn VideoDecoder) -> Self {
        let page_count = document.page_count();
        let mut index = Self {
            notes: vec![Vec::new(); page_count],
            links: vec![Vec::new(); page_count],
            videos: HashMap::new(),
        };

        for page_index in 0..page_count {
            let Some(page) = document.page(page_index) else {
                continue;
            };
            for (position, annotation) in page.annotations.iter().enumerate() {
                let target = AnnotationRef {
                    page: page_index,
                    index: position,
                };
                match &annotation.kind {
                    AnnotationKind::Note { contents } => {
                        index.notes[page_index].push(contents.clone());
                    }
                    AnnotationKind::Link(link) => {
                        if let Some(entry) = classify_video(link, base_dir, decoder) {
                            debug!(page = page_index, video = %entry.handle.path.display(), "Video link");
                            index.videos.insert(target, entry);
                        }
                        index.links[page_index].push(LinkEntry {
                            target,
                            bounds: annotation.bounds,
                            link: link.clone(),
                        });
                    }
                    AnnotationKind::Other => {}
                }
            }
        }

        info!(
            pages = page_count,
            notes = index.notes.iter().map(Vec::len).sum::<usize>(),
            links = index.links.iter().map(Vec::len).sum::<usize>(),
            videos = index.videos.len(),
            "Indexed annotations"
        );
        index
    }

    pub fn notes(&self, page: usize) -> &[String] {
        self.notes.get(page).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn links(&self, page: usize) -> &[LinkEntry] {
        self.links.get(page).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn link(&self, target: AnnotationRef) -> Option<&LinkEntry> {
        self.links(target.page).iter().find(|l| l.target == target)
    }

    pub fn video(&self, target: AnnotationRef) -> Option<&VideoEntry> {
        self.videos.get(&target)
    }

    pub fn is_video(&self, target: AnnotationRef) -> bool {
        self.videos.contains_key(&target)
    }
}

/// A link is video-bearing when its URL names a local file with a video
/// extension that the decoder can open.
fn classify_video(link: &Link, base_dir: &Path, decoder: &dyn VideoDecoder) -> Option<VideoEntry> {
    let url = link.url.as_deref()?;
    let path = video::local_file(url, base_dir)?;
    if !video::has_video_extension(&path) {
        return None;
    }
    let handle = decoder.open(&path)?;
    let poster = decoder.poster(&handle);
    Some(VideoEntry { handle, poster })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::LoadedDocument;
    use crate::document::test_support::*;
    use crate::media::video::Container;
    use std::cell::Cell;
    use std::path::PathBuf;

    /// Accepts every path under `/videos/` and counts open calls.
    #[derive(Default)]
    struct FakeDecoder {
        opened: Cell<usize>,
    }

    impl VideoDecoder for FakeDecoder {
        fn open(&self, path: &Path) -> Option<VideoHandle> {
            self.opened.set(self.opened.get() + 1);
            path.starts_with("/videos").then(|| VideoHandle {
                path: path.to_path_buf(),
                container: Container::IsoMedia,
            })
        }

        fn poster(&self, _handle: &VideoHandle) -> Option<ColorImage> {
            Some(ColorImage::filled([2, 2], eframe::egui::Color32::BLACK))
        }
    }

    fn url_link(url: &str) -> Link {
        Link {
            url: Some(url.to_string()),
            ..Link::default()
        }
    }

    #[test]
    fn test_notes_keep_document_order_and_absent_pages_are_empty() {
        let mut pages = blank_pages(3);
        pages[1] = pages[1]
            .clone()
            .with_annotation(note("first"))
            .with_annotation(link_at(0.0, 0.0, Link::default()))
            .with_annotation(note("second"));
        let doc = LoadedDocument::new("/talks/deck.pdf", pages);
        let index = AnnotationIndex::build(&doc, doc.base_dir(), &FakeDecoder::default());

        assert!(index.notes(0).is_empty());
        assert_eq!(index.notes(1), ["first", "second"]);
        assert!(index.notes(99).is_empty());
        assert_eq!(index.links(1).len(), 1);
        assert_eq!(index.links(1)[0].target, AnnotationRef { page: 1, index: 1 });
    }

    #[test]
    fn test_video_classification() {
        let mut pages = blank_pages(1);
        pages[0] = pages[0]
            .clone()
            .with_annotation(link_at(0.0, 0.0, url_link("file:///videos/demo.mp4")))
            .with_annotation(link_at(0.0, 50.0, url_link("https://example.com/demo.mp4")))
            .with_annotation(link_at(0.0, 100.0, url_link("file:///videos/notes.txt")))
            .with_annotation(link_at(0.0, 150.0, url_link("file:///elsewhere/clip.mov")));
        let doc = LoadedDocument::new("/talks/deck.pdf", pages);
        let decoder = FakeDecoder::default();
        let index = AnnotationIndex::build(&doc, doc.base_dir(), &decoder);

        let video = index.video(AnnotationRef { page: 0, index: 0 }).unwrap();
        assert_eq!(video.handle.path, PathBuf::from("/videos/demo.mp4"));
        assert!(video.poster.is_some());
        // Remote scheme and non-video extension never reach the decoder.
        assert_eq!(decoder.opened.get(), 2);
        assert!(!index.is_video(AnnotationRef { page: 0, index: 1 }));
        assert!(!index.is_video(AnnotationRef { page: 0, index: 2 }));
        // Decoder refused: stays an ordinary link.
        assert!(!index.is_video(AnnotationRef { page: 0, index: 3 }));
        assert_eq!(index.links(0).len(), 4);
    }
}
