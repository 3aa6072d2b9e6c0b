use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

const RELEASES_URL: &str = "https://api.github.com/repos/mklab-se/podium/releases/latest";
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome worth telling the user about. Being up to date is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UpdateAvailable { latest: String, url: String },
    CheckFailed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Self::UpdateAvailable { latest, url } => format!(
                "podium {latest} is available (you have {}).\n{url}",
                env!("CARGO_PKG_VERSION")
            ),
            Self::CheckFailed(reason) => format!("Could not check for updates: {reason}"),
        }
    }
}

/// Run the check once on a background thread. The receiver yields at most one
/// notice; nothing is sent when the installed version is current.
pub fn spawn() -> Receiver<Notice> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let notice = match latest_release() {
            Ok((latest, url)) => {
                let current = env!("CARGO_PKG_VERSION");
                if parse_version_tuple(&latest) > parse_version_tuple(current) {
                    info!(%latest, %current, "Update available");
                    Some(Notice::UpdateAvailable { latest, url })
                } else {
                    debug!(%latest, %current, "Up to date");
                    None
                }
            }
            Err(e) => {
                debug!("Update check failed: {e:#}");
                Some(Notice::CheckFailed(format!("{e:#}")))
            }
        };
        if let Some(notice) = notice {
            let _ = tx.send(notice);
        }
    });
    rx
}

fn latest_release() -> Result<(String, String)> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(CHECK_TIMEOUT))
        .build()
        .into();
    let response: serde_json::Value = agent
        .get(RELEASES_URL)
        .header("User-Agent", concat!("podium/", env!("CARGO_PKG_VERSION")))
        .call()
        .context("Release request failed")?
        .body_mut()
        .read_json()
        .context("Invalid release payload")?;

    let latest = response["tag_name"]
        .as_str()
        .or_else(|| response["name"].as_str())
        .ok_or_else(|| anyhow::anyhow!("Release payload has no version"))?
        .to_string();
    let url = response["html_url"]
        .as_str()
        .unwrap_or("https://github.com/mklab-se/podium/releases")
        .to_string();
    Ok((latest, url))
}

/// `v1.2.3-beta` -> `(1, 2, 3)`. Missing or garbled parts count as zero.
pub fn parse_version_tuple(version: &str) -> (u32, u32, u32) {
    let normalized = version.trim().trim_start_matches(['v', 'V']);
    let mut parts = normalized.split('.').map(|token| {
        token
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse::<u32>()
            .unwrap_or(0)
    });
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_tuple() {
        assert_eq!(parse_version_tuple("v1.2.3"), (1, 2, 3));
        assert_eq!(parse_version_tuple("0.10.0-rc.1"), (0, 10, 0));
        assert_eq!(parse_version_tuple("2"), (2, 0, 0));
        assert_eq!(parse_version_tuple("garbage"), (0, 0, 0));
    }

    #[test]
    fn test_version_ordering() {
        assert!(parse_version_tuple("v0.10.0") > parse_version_tuple("0.9.9"));
        assert!(parse_version_tuple("1.0.0") > parse_version_tuple("0.99.99"));
        assert!(parse_version_tuple("0.3.0") <= parse_version_tuple(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_notice_messages() {
        let notice = Notice::UpdateAvailable {
            latest: "v9.0.0".into(),
            url: "https://example.com/r".into(),
        };
        assert!(notice.message().contains("v9.0.0"));
        assert!(notice.message().contains("https://example.com/r"));
        assert!(
            Notice::CheckFailed("timeout".into())
                .message()
                .ends_with("timeout")
        );
    }
}
