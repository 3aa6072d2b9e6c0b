use tracing::debug;

use crate::annotations::AnnotationRef;
use crate::document::{Link, NamedAction};

/// Everything the session can be asked to do, from keys and from links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Home,
    End,
    Back,
    Forward,
    Goto(usize),
    ShowWeb(String),
    ShowVideo(AnnotationRef),
    ToggleWeb,
    ToggleVideo,
    ToggleClock,
    ResetTimer,
    /// Change the planned duration by this many seconds.
    AdjustPlanned(i64),
    ResetCalibration,
    ToggleFullscreen,
    ToggleHelp,
    Quit,
    None,
}

impl Command {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Next => "Next page",
            Self::Prev => "Previous page",
            Self::Home => "First page",
            Self::End => "Last page",
            Self::Back => "Back in history",
            Self::Forward => "Forward in history",
            Self::Goto(_) => "Go to page",
            Self::ShowWeb(_) => "Show web page",
            Self::ShowVideo(_) => "Show video",
            Self::ToggleWeb => "Toggle web view",
            Self::ToggleVideo => "Toggle video view",
            Self::ToggleClock => "Switch clock / countdown",
            Self::ResetTimer => "Restart countdown",
            Self::AdjustPlanned(d) if *d >= 600 => "+10 minutes",
            Self::AdjustPlanned(d) if *d > 0 => "+1 minute",
            Self::AdjustPlanned(d) if *d <= -600 => "-10 minutes",
            Self::AdjustPlanned(_) => "-1 minute",
            Self::ResetCalibration => "Reset calibration",
            Self::ToggleFullscreen => "Toggle fullscreen",
            Self::ToggleHelp => "Toggle help",
            Self::Quit => "Quit",
            Self::None => "",
        }
    }
}

/// Turn an activated link into exactly one command.
///
/// Order: video-bearing, named action, page destination, URL. `video` is the
/// link's own reference when the annotation index classified it as video.
pub fn resolve(link: &Link, video: Option<AnnotationRef>) -> Command {
    if let Some(target) = video {
        return Command::ShowVideo(target);
    }
    if let Some(named) = &link.named {
        return match named {
            NamedAction::NextPage => Command::Next,
            NamedAction::PrevPage => Command::Prev,
            NamedAction::FirstPage => Command::Home,
            NamedAction::LastPage => Command::End,
            NamedAction::GoBack => Command::Back,
            NamedAction::GoForward => Command::Forward,
            NamedAction::Other(name) => {
                debug!(%name, "Ignoring unsupported named action");
                Command::None
            }
        };
    }
    if let Some(page) = link.destination {
        return Command::Goto(page);
    }
    if let Some(url) = &link.url {
        return Command::ShowWeb(url.clone());
    }
    Command::None
}
