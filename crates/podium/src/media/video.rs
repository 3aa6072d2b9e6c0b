use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use eframe::egui::ColorImage;
use tracing::debug;

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "webm", "mkv", "avi", "mpg", "mpeg", "ogv", "wmv", "flv", "3gp",
];
const POSTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Container formats recognised from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    IsoMedia,
    Matroska,
    Avi,
    MpegProgram,
    Ogg,
    Asf,
    Flash,
}

impl Container {
    pub fn name(self) -> &'static str {
        match self {
            Self::IsoMedia => "MPEG-4 / QuickTime",
            Self::Matroska => "Matroska / WebM",
            Self::Avi => "AVI",
            Self::MpegProgram => "MPEG",
            Self::Ogg => "Ogg",
            Self::Asf => "Windows Media",
            Self::Flash => "Flash Video",
        }
    }

    fn sniff(header: &[u8]) -> Option<Self> {
        if header.len() >= 8 && &header[4..8] == b"ftyp" {
            Some(Self::IsoMedia)
        } else if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            Some(Self::Matroska)
        } else if header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"AVI " {
            Some(Self::Avi)
        } else if header.starts_with(&[0x00, 0x00, 0x01, 0xBA]) {
            Some(Self::MpegProgram)
        } else if header.starts_with(b"OggS") {
            Some(Self::Ogg)
        } else if header.starts_with(&[0x30, 0x26, 0xB2, 0x75]) {
            Some(Self::Asf)
        } else if header.starts_with(b"FLV") {
            Some(Self::Flash)
        } else {
            None
        }
    }
}

/// An opened video the output surface can show.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoHandle {
    pub path: PathBuf,
    pub container: Container,
}

impl VideoHandle {
    pub fn title(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Video decoding collaborator.
pub trait VideoDecoder {
    /// Returns a handle when the file can be opened.
    fn open(&self, path: &Path) -> Option<VideoHandle>;
    /// Still frame for the non-interactive render path.
    fn poster(&self, handle: &VideoHandle) -> Option<ColorImage>;
}

/// Header-sniffing decoder. It does not decode frames: the poster is a still
/// next to the video with the same stem (`clip.mp4` -> `clip.png`), and the
/// audience surface is labelled as a poster.
#[derive(Debug, Default)]
pub struct SniffDecoder;

impl VideoDecoder for SniffDecoder {
    fn open(&self, path: &Path) -> Option<VideoHandle> {
        let mut header = [0u8; 16];
        let mut file = File::open(path).ok()?;
        let read = file.read(&mut header).ok()?;
        let container = Container::sniff(&header[..read]);
        debug!(path = %path.display(), ?container, "Sniffed video");
        container.map(|container| VideoHandle {
            path: path.to_path_buf(),
            container,
        })
    }

    fn poster(&self, handle: &VideoHandle) -> Option<ColorImage> {
        POSTER_EXTENSIONS
            .iter()
            .map(|ext| handle.path.with_extension(ext))
            .find(|p| p.is_file())
            .and_then(|p| load_color_image(&p))
    }
}

fn load_color_image(path: &Path) -> Option<ColorImage> {
    let img = image::open(path).ok()?.to_rgba8();
    let size = [
        usize::try_from(img.width()).ok()?,
        usize::try_from(img.height()).ok()?,
    ];
    Some(ColorImage::from_rgba_unmultiplied(size, &img.into_raw()))
}

/// Extension heuristic for video media types.
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Map a link URL to a local file: `file:` URLs and scheme-less paths
/// (relative ones against `base_dir`). Any other scheme yields `None`.
pub fn local_file(url: &str, base_dir: &Path) -> Option<PathBuf> {
    let raw = if let Some(rest) = url.strip_prefix("file://") {
        // file://localhost/path and file:///path
        rest.strip_prefix("localhost").unwrap_or(rest)
    } else if let Some(rest) = url.strip_prefix("file:") {
        rest
    } else if has_scheme(url) {
        return None;
    } else {
        url
    };
    let raw = raw.split(['#', '?']).next().unwrap_or_default();
    if raw.is_empty() {
        return None;
    }
    let path = PathBuf::from(percent_decode(raw));
    Some(if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    })
}

fn has_scheme(url: &str) -> bool {
    match url.split_once(':') {
        // A single letter is a Windows drive, not a scheme.
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Playback clock. Only the view-mode multiplexer drives it, from visibility;
/// it holds the position a player would resume from.
#[derive(Debug, Clone, Default)]
pub struct Playback {
    position: Duration,
    resumed_at: Option<Instant>,
}

impl Playback {
    pub fn resume(&mut self, now: Instant) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(start) = self.resumed_at.take() {
            self.position += now.saturating_duration_since(start);
        }
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.resumed_at.is_some()
    }

    #[cfg(test)]
    pub fn position(&self, now: Instant) -> Duration {
        match self.resumed_at {
            Some(start) => self.position + now.saturating_duration_since(start),
            None => self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_local_file_schemes() {
        let base = Path::new("/talks");
        assert_eq!(
            local_file("file:///tmp/clip.mp4", base),
            Some(PathBuf::from("/tmp/clip.mp4"))
        );
        assert_eq!(
            local_file("file://localhost/tmp/a%20b.mov", base),
            Some(PathBuf::from("/tmp/a b.mov"))
        );
        assert_eq!(
            local_file("media/clip.webm", base),
            Some(PathBuf::from("/talks/media/clip.webm"))
        );
        assert_eq!(local_file("https://example.com/clip.mp4", base), None);
        assert_eq!(local_file("mailto:someone@example.com", base), None);
    }

    #[test]
    fn test_video_extension_heuristic() {
        assert!(has_video_extension(Path::new("a/b/Clip.MP4")));
        assert!(has_video_extension(Path::new("clip.webm")));
        assert!(!has_video_extension(Path::new("slides.pdf")));
        assert!(!has_video_extension(Path::new("noext")));
    }

    #[test]
    fn test_sniff_accepts_known_containers() {
        let dir = tempfile::tempdir().unwrap();
        let mp4 = write_file(
            dir.path(),
            "clip.mp4",
            b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00",
        );
        let mkv = write_file(dir.path(), "clip.mkv", &[0x1A, 0x45, 0xDF, 0xA3, 0, 0]);
        let bogus = write_file(dir.path(), "fake.mp4", b"this is not a video");

        let decoder = SniffDecoder;
        assert_eq!(decoder.open(&mp4).unwrap().container, Container::IsoMedia);
        assert_eq!(decoder.open(&mkv).unwrap().container, Container::Matroska);
        assert!(decoder.open(&bogus).is_none());
        assert!(decoder.open(&dir.path().join("missing.mp4")).is_none());
    }

    #[test]
    fn test_poster_from_sibling_image() {
        let dir = tempfile::tempdir().unwrap();
        let clip = write_file(dir.path(), "clip.mp4", b"\x00\x00\x00\x18ftypisom");
        image::RgbaImage::new(4, 3)
            .save(dir.path().join("clip.png"))
            .unwrap();

        let decoder = SniffDecoder;
        let handle = decoder.open(&clip).unwrap();
        let poster = decoder.poster(&handle).unwrap();
        assert_eq!(poster.size, [4, 3]);
    }

    #[test]
    fn test_playback_accumulates_only_while_playing() {
        let t0 = Instant::now();
        let mut playback = Playback::default();
        playback.resume(t0);
        playback.pause(t0 + Duration::from_secs(3));
        assert!(!playback.is_playing());
        assert_eq!(playback.position(t0 + Duration::from_secs(10)), Duration::from_secs(3));

        playback.resume(t0 + Duration::from_secs(10));
        assert_eq!(playback.position(t0 + Duration::from_secs(12)), Duration::from_secs(5));
    }
}
