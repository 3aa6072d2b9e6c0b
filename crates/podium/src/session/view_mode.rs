use std::time::Instant;

use tracing::debug;

use crate::annotations::AnnotationRef;
use crate::media::video::{Playback, VideoHandle};
use crate::media::web::WebPage;

/// What the output surface shows. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Slide,
    Web,
    Video,
}

#[derive(Debug, Clone)]
pub struct VideoBinding {
    pub source: AnnotationRef,
    pub handle: VideoHandle,
    pub playback: Playback,
}

/// Output-surface multiplexer.
///
/// Playback is driven only from here: entering Video resumes it, leaving
/// Video pauses it. The feed overlay is a separate flag and never takes part
/// in the mode switch.
#[derive(Debug, Default)]
pub struct Multiplexer {
    mode: ViewMode,
    pending_web: Option<String>,
    web: Option<WebPage>,
    video: Option<VideoBinding>,
    feed: bool,
}

impl Multiplexer {
    pub fn new(feed: bool) -> Self {
        Self {
            feed,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn feed_enabled(&self) -> bool {
        self.feed
    }

    pub fn web_page(&self) -> Option<&WebPage> {
        self.web.as_ref()
    }

    pub fn pending_web(&self) -> Option<&str> {
        self.pending_web.as_deref()
    }

    pub fn video(&self) -> Option<&VideoBinding> {
        self.video.as_ref()
    }

    pub fn show_slide(&mut self, now: Instant) {
        self.set_mode(ViewMode::Slide, now);
    }

    /// Record a load request. The mode does not change until the load commits.
    pub fn request_web(&mut self, url: &str) {
        debug!(%url, "Web load requested");
        self.pending_web = Some(url.to_string());
    }

    pub fn cancel_pending_web(&mut self) {
        self.pending_web = None;
    }

    /// Switch to Web if `page` answers the outstanding request. Stale or
    /// cancelled loads are ignored.
    pub fn web_committed(&mut self, page: WebPage, now: Instant) -> bool {
        if self.pending_web.as_deref() != Some(page.url.as_str()) {
            debug!(url = %page.url, "Ignoring stale web load");
            return false;
        }
        self.pending_web = None;
        self.web = Some(page);
        self.set_mode(ViewMode::Web, now);
        true
    }

    pub fn web_failed(&mut self, url: &str) {
        if self.pending_web.as_deref() == Some(url) {
            self.pending_web = None;
        }
    }

    /// Bind `handle` and show it. Rebinding the same annotation keeps the
    /// playback position; a different one starts from zero.
    pub fn show_video(&mut self, source: AnnotationRef, handle: VideoHandle, now: Instant) {
        let same = self.video.as_ref().is_some_and(|v| v.source == source);
        if !same {
            // Pause the outgoing clip before replacing it.
            self.set_mode(ViewMode::Slide, now);
            self.video = Some(VideoBinding {
                source,
                handle,
                playback: Playback::default(),
            });
        }
        self.set_mode(ViewMode::Video, now);
    }

    pub fn toggle_web(&mut self, now: Instant) {
        if self.mode == ViewMode::Web {
            self.set_mode(ViewMode::Slide, now);
        } else if self.web.is_some() {
            self.set_mode(ViewMode::Web, now);
        }
    }

    pub fn toggle_video(&mut self, now: Instant) {
        if self.mode == ViewMode::Video {
            self.set_mode(ViewMode::Slide, now);
        } else if self.video.is_some() {
            self.set_mode(ViewMode::Video, now);
        }
    }

    fn set_mode(&mut self, mode: ViewMode, now: Instant) {
        if self.mode == mode {
            return;
        }
        if let Some(video) = self.video.as_mut() {
            if mode == ViewMode::Video {
                video.playback.resume(now);
            } else {
                video.playback.pause(now);
            }
        }
        debug!(from = ?self.mode, to = ?mode, "View mode");
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::video::Container;
    use std::path::PathBuf;
    use std::time::Duration;

    fn handle(name: &str) -> VideoHandle {
        VideoHandle {
            path: PathBuf::from(name),
            container: Container::IsoMedia,
        }
    }

    fn page(url: &str) -> WebPage {
        WebPage {
            url: url.into(),
            title: "Title".into(),
            text: "Body".into(),
        }
    }

    fn clip(index: usize) -> AnnotationRef {
        AnnotationRef { page: 0, index }
    }

    #[test]
    fn test_web_switches_only_on_commit() {
        let now = Instant::now();
        let mut mux = Multiplexer::default();
        mux.request_web("https://a.example");
        assert_eq!(mux.mode(), ViewMode::Slide);

        mux.web_failed("https://a.example");
        assert_eq!(mux.mode(), ViewMode::Slide);
        assert!(!mux.web_committed(page("https://a.example"), now));
        assert_eq!(mux.mode(), ViewMode::Slide);

        mux.request_web("https://b.example");
        assert!(mux.web_committed(page("https://b.example"), now));
        assert_eq!(mux.mode(), ViewMode::Web);
        assert!(mux.pending_web().is_none());
    }

    #[test]
    fn test_cancelled_load_never_commits() {
        let now = Instant::now();
        let mut mux = Multiplexer::default();
        mux.request_web("https://slow.example");
        mux.cancel_pending_web();
        assert!(!mux.web_committed(page("https://slow.example"), now));
        assert_eq!(mux.mode(), ViewMode::Slide);
    }

    #[test]
    fn test_toggle_web_reshows_last_page() {
        let now = Instant::now();
        let mut mux = Multiplexer::default();
        mux.toggle_web(now);
        assert_eq!(mux.mode(), ViewMode::Slide);

        mux.request_web("https://a.example");
        mux.web_committed(page("https://a.example"), now);
        mux.toggle_web(now);
        assert_eq!(mux.mode(), ViewMode::Slide);
        mux.toggle_web(now);
        assert_eq!(mux.mode(), ViewMode::Web);
    }

    #[test]
    fn test_video_from_any_mode() {
        let now = Instant::now();
        let mut mux = Multiplexer::default();
        mux.request_web("https://a.example");
        mux.web_committed(page("https://a.example"), now);
        assert_eq!(mux.mode(), ViewMode::Web);

        mux.show_video(clip(0), handle("a.mp4"), now);
        assert_eq!(mux.mode(), ViewMode::Video);
        assert_eq!(mux.video().unwrap().handle.path, PathBuf::from("a.mp4"));
    }

    #[test]
    fn test_playback_follows_visibility() {
        let t0 = Instant::now();
        let mut mux = Multiplexer::default();
        mux.show_video(clip(0), handle("a.mp4"), t0);
        assert!(mux.video().unwrap().playback.is_playing());

        mux.show_slide(t0 + Duration::from_secs(4));
        let playback = &mux.video().unwrap().playback;
        assert!(!playback.is_playing());
        assert_eq!(playback.position(t0 + Duration::from_secs(9)), Duration::from_secs(4));

        mux.toggle_video(t0 + Duration::from_secs(9));
        assert!(mux.video().unwrap().playback.is_playing());
        mux.toggle_video(t0 + Duration::from_secs(10));
        assert_eq!(mux.mode(), ViewMode::Slide);
        assert_eq!(
            mux.video().unwrap().playback.position(t0 + Duration::from_secs(20)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_rebinding_resets_playback() {
        let t0 = Instant::now();
        let mut mux = Multiplexer::default();
        mux.show_video(clip(0), handle("a.mp4"), t0);
        mux.show_video(clip(1), handle("b.mp4"), t0 + Duration::from_secs(3));
        let binding = mux.video().unwrap();
        assert_eq!(binding.source, clip(1));
        assert_eq!(binding.playback.position(t0 + Duration::from_secs(3)), Duration::ZERO);
        assert_eq!(mux.mode(), ViewMode::Video);
    }

    #[test]
    fn test_feed_flag_is_independent() {
        let now = Instant::now();
        let mut mux = Multiplexer::new(true);
        mux.show_video(clip(0), handle("a.mp4"), now);
        mux.show_slide(now);
        assert!(mux.feed_enabled());
        assert!(!Multiplexer::default().feed_enabled());
    }
}
