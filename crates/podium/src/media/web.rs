use std::sync::LazyLock;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("podium/", env!("CARGO_PKG_VERSION"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Wide enough that html2text never hard-wraps; the surface wraps itself.
const TEXT_WIDTH: usize = 10_000;

/// Web content the output surface shows once a load commits.
#[derive(Debug, Clone, PartialEq)]
pub struct WebPage {
    pub url: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebEvent {
    Committed(WebPage),
    Failed { url: String, reason: String },
}

/// Embedded web-content collaborator. `load` starts a fetch; `poll` hands
/// back load events on the UI thread and never blocks.
pub trait WebSurface {
    fn load(&mut self, url: &str);
    fn poll(&mut self) -> Vec<WebEvent>;
}

/// Fetches pages on a background thread and reduces them to readable text.
pub struct FetchSurface {
    tx: Sender<WebEvent>,
    rx: Receiver<WebEvent>,
}

impl FetchSurface {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Default for FetchSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSurface for FetchSurface {
    fn load(&mut self, url: &str) {
        let tx = self.tx.clone();
        let url = url.to_string();
        debug!(%url, "Loading web content");
        thread::spawn(move || {
            let event = match fetch(&url) {
                Ok(page) => WebEvent::Committed(page),
                Err(e) => {
                    warn!(%url, "Web load failed: {e:#}");
                    WebEvent::Failed {
                        url,
                        reason: format!("{e:#}"),
                    }
                }
            };
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(event);
        });
    }

    fn poll(&mut self) -> Vec<WebEvent> {
        self.rx.try_iter().collect()
    }
}

fn fetch(url: &str) -> anyhow::Result<WebPage> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();
    let html = agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()?
        .body_mut()
        .read_to_string()?;
    Ok(page_from_html(url, &html))
}

/// Reduce an HTML document to a title and readable text.
pub fn page_from_html(url: &str, html: &str) -> WebPage {
    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| to_text(m.as_str()).trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());

    WebPage {
        url: url.to_string(),
        title,
        text: to_text(html).trim().to_string(),
    }
}

fn to_text(html: &str) -> String {
    match html2text::from_read(html.as_bytes(), TEXT_WIDTH) {
        Ok(text) => text,
        Err(e) => {
            warn!("html2text failed: {e}");
            html.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_html_extracts_title_and_text() {
        let html = r#"<html><head><title> Rust &amp; Friends </title></head>
            <body><h1>Hello</h1><p>First paragraph</p><p>Second</p></body></html>"#;
        let page = page_from_html("https://example.com", html);
        assert_eq!(page.title, "Rust & Friends");
        assert!(page.text.contains("Hello"));
        assert!(page.text.contains("First paragraph"));
        assert!(page.text.contains("Second"));
        assert!(!page.text.contains("<p>"));
    }

    #[test]
    fn test_numeric_and_named_entities_are_decoded() {
        let page = page_from_html("u", "<p>It&#8217;s caf&eacute; &mdash; &#x27;x&#x27;</p>");
        assert!(page.text.contains("It\u{2019}s caf\u{e9} \u{2014} 'x'"));
        assert!(!page.text.contains('&'));
    }

    #[test]
    fn test_page_without_title_uses_url() {
        let page = page_from_html("https://example.com/x", "<p>plain</p>");
        assert_eq!(page.title, "https://example.com/x");
        assert_eq!(page.text, "plain");
    }
}
