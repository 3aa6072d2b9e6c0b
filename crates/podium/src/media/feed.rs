use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{debug, info, warn};

/// Line-oriented external input for the feed overlay.
///
/// A reader thread blocks on the stream and forwards whole lines; the UI
/// thread only ever polls, so a quiet stream cannot stall the redraw cadence.
pub struct LineFeed {
    rx: Receiver<String>,
    closed: bool,
}

impl LineFeed {
    pub fn stdin() -> Self {
        Self::spawn(io::stdin())
    }

    pub fn spawn<R: Read + Send + 'static>(source: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(source);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        if tx.send(line.trim_end().to_string()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Feed input read failed: {e}");
                        break;
                    }
                }
            }
            debug!("Feed input closed");
        });
        info!("Feed overlay reading input lines");
        Self { rx, closed: false }
    }

    /// Lines that arrived since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while !self.closed {
            match self.rx.try_recv() {
                Ok(line) => lines.push(line),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.closed = true,
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_poll_returns_whole_lines() {
        let mut feed = LineFeed::spawn(io::Cursor::new("first\nsecond  \nthird"));
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut lines = Vec::new();
        while lines.len() < 3 && Instant::now() < deadline {
            lines.extend(feed.poll());
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_feed() {
        let input: &[u8] = b"ok\n\xff\xfe bad\r\n\nlast\n";
        let mut feed = LineFeed::spawn(io::Cursor::new(input.to_vec()));
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut lines = Vec::new();
        while lines.len() < 4 && Instant::now() < deadline {
            lines.extend(feed.poll());
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(lines, vec!["ok", "\u{fffd}\u{fffd} bad", "", "last"]);
    }

    #[test]
    fn test_poll_after_close_is_empty() {
        let mut feed = LineFeed::spawn(io::empty());
        thread::sleep(Duration::from_millis(50));
        assert!(feed.poll().is_empty());
        assert!(feed.poll().is_empty());
    }
}
