use std::time::{Duration, Instant};

use eframe::egui::{Pos2, Rect};
use tracing::trace;

use super::calibration::{Calibration, PageFit};
use crate::annotations::{AnnotationIndex, AnnotationRef};

pub const TOOLTIP_DELAY: Duration = Duration::from_millis(500);

/// Inputs that determine where link regions sit on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RegionKey {
    page: usize,
    calibration: Calibration,
    fit: PageFit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub target: AnnotationRef,
    pub rect: Rect,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Hover {
    region: usize,
    since: Instant,
}

/// Screen-space link regions of the console's current slide.
///
/// Recomputed only when page, calibration or layout actually changed, so the
/// hover timer survives ordinary repaints.
#[derive(Debug, Default)]
pub struct InteractiveRegions {
    key: Option<RegionKey>,
    regions: Vec<Region>,
    hover: Option<Hover>,
}

impl InteractiveRegions {
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Returns `true` when the regions were rebuilt.
    pub fn recompute(
        &mut self,
        page: usize,
        calibration: Calibration,
        fit: PageFit,
        index: &AnnotationIndex,
    ) -> bool {
        let key = RegionKey {
            page,
            calibration,
            fit,
        };
        if self.key == Some(key) {
            return false;
        }
        self.regions = index
            .links(page)
            .iter()
            .map(|entry| Region {
                target: entry.target,
                rect: calibration.rect_to_screen(fit, entry.bounds),
                tooltip: entry.link.tooltip.clone(),
            })
            .collect();
        self.hover = None;
        self.key = Some(key);
        trace!(page, regions = self.regions.len(), "Recomputed link regions");
        true
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Topmost region under `pos`; later annotations are drawn above earlier ones.
    pub fn hit(&self, pos: Pos2) -> Option<AnnotationRef> {
        self.position(pos).map(|i| self.regions[i].target)
    }

    fn position(&self, pos: Pos2) -> Option<usize> {
        self.regions.iter().rposition(|r| r.rect.contains(pos))
    }

    /// Track the pointer. Moving onto a different region restarts the delay.
    pub fn hover(&mut self, pos: Option<Pos2>, now: Instant) {
        let region = pos.and_then(|p| self.position(p));
        self.hover = match (region, self.hover) {
            (Some(r), Some(h)) if h.region == r => Some(h),
            (Some(r), _) => Some(Hover {
                region: r,
                since: now,
            }),
            (None, _) => None,
        };
    }

    /// Tooltip of the hovered region once the pointer rested long enough.
    pub fn tooltip(&self, now: Instant) -> Option<(&str, Rect)> {
        let hover = self.hover?;
        if now.saturating_duration_since(hover.since) < TOOLTIP_DELAY {
            return None;
        }
        let region = self.regions.get(hover.region)?;
        region.tooltip.as_deref().map(|t| (t, region.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::test_support::*;
    use crate::document::{Link, LoadedDocument};
    use crate::media::video::SniffDecoder;
    use eframe::egui::{pos2, vec2};

    fn index() -> AnnotationIndex {
        let mut pages = blank_pages(2);
        let tip = Link {
            destination: Some(1),
            tooltip: Some("Jump ahead".into()),
            ..Link::default()
        };
        pages[0] = pages[0]
            .clone()
            .with_annotation(link_at(0.0, 0.0, tip))
            .with_annotation(link_at(50.0, 20.0, Link::default()));
        let doc = LoadedDocument::new("/talks/deck.pdf", pages);
        AnnotationIndex::build(&doc, doc.base_dir(), &SniffDecoder)
    }

    fn fit() -> PageFit {
        PageFit {
            origin: pos2(10.0, 10.0),
            scale: 1.0,
        }
    }

    #[test]
    fn test_recompute_only_on_change() {
        let index = index();
        let mut regions = InteractiveRegions::default();
        let calibration = Calibration::default();
        assert!(regions.recompute(0, calibration, fit(), &index));
        assert!(!regions.recompute(0, calibration, fit(), &index));
        assert_eq!(regions.regions().len(), 2);
        assert_eq!(regions.regions()[0].rect.min, pos2(10.0, 10.0));

        let mut moved = calibration;
        moved.drag(fit(), vec2(5.0, 0.0));
        assert!(regions.recompute(0, moved, fit(), &index));
        assert_eq!(regions.regions()[0].rect.min, pos2(15.0, 10.0));

        assert!(regions.recompute(1, moved, fit(), &index));
        assert!(regions.regions().is_empty());

        regions.invalidate();
        assert!(regions.recompute(1, moved, fit(), &index));
    }

    #[test]
    fn test_hit_prefers_topmost() {
        let index = index();
        let mut regions = InteractiveRegions::default();
        regions.recompute(0, Calibration::default(), fit(), &index);
        // Overlap of both links.
        assert_eq!(regions.hit(pos2(70.0, 40.0)), Some(AnnotationRef { page: 0, index: 1 }));
        assert_eq!(regions.hit(pos2(20.0, 15.0)), Some(AnnotationRef { page: 0, index: 0 }));
        assert_eq!(regions.hit(pos2(500.0, 500.0)), None);
    }

    #[test]
    fn test_tooltip_after_delay_and_survives_repaint() {
        let index = index();
        let mut regions = InteractiveRegions::default();
        let t0 = Instant::now();
        regions.recompute(0, Calibration::default(), fit(), &index);
        regions.hover(Some(pos2(20.0, 15.0)), t0);
        assert!(regions.tooltip(t0 + Duration::from_millis(300)).is_none());

        // Same inputs on the next frame keep the hover timer.
        regions.recompute(0, Calibration::default(), fit(), &index);
        regions.hover(Some(pos2(22.0, 16.0)), t0 + Duration::from_millis(300));
        let (text, _) = regions.tooltip(t0 + Duration::from_millis(600)).unwrap();
        assert_eq!(text, "Jump ahead");

        regions.hover(None, t0 + Duration::from_millis(700));
        assert!(regions.tooltip(t0 + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn test_link_without_tooltip_shows_nothing() {
        let index = index();
        let mut regions = InteractiveRegions::default();
        let t0 = Instant::now();
        regions.recompute(0, Calibration::default(), fit(), &index);
        regions.hover(Some(pos2(140.0, 50.0)), t0);
        assert!(regions.tooltip(t0 + Duration::from_secs(1)).is_none());
    }
}
