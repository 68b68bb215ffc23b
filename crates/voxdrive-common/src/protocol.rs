use serde::{Deserialize, Serialize};

/// Result of classifying one raw command line.
///
/// Parsing is total: input that matches nothing falls into `Unrecognized`
/// carrying the original text, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedAction {
    /// One of the fixed canned commands (hello, time, help).
    Static(StaticCommand),
    /// An `ai:` query; the remainder may be empty.
    AiQuery(String),
    /// A `browser:` automation command.
    Browser(BrowserCommand),
    /// Anything the grammar does not cover.
    Unrecognized(String),
}

/// The fixed static-command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticCommand {
    Hello,
    Time,
    Help,
}

/// Commands executed by the browser automation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BrowserCommand {
    Start {
        headless: bool,
    },
    Close,
    JoinMeeting {
        url: String,
        platform: MeetingPlatform,
    },
    Click {
        selector: String,
    },
    Scroll {
        direction: ScrollDirection,
        /// None means the configured default amount.
        pixels: Option<u32>,
    },
    Type {
        text: String,
    },
    Navigate {
        url: String,
    },
    Screenshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
}

impl ScrollDirection {
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// Meeting platform, derived from the meeting URL host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingPlatform {
    Zoom,
    GoogleMeet,
    Teams,
    /// Catch-all for unknown hosts; join performs only the navigate step.
    Generic,
}

impl MeetingPlatform {
    /// Classify a meeting URL by its host. Unknown hosts are `Generic`.
    pub fn from_host(host: &str) -> Self {
        let host = host.to_ascii_lowercase();
        if host == "zoom.us" || host.ends_with(".zoom.us") {
            Self::Zoom
        } else if host == "meet.google.com" {
            Self::GoogleMeet
        } else if host == "teams.microsoft.com" {
            Self::Teams
        } else {
            Self::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zoom => "Zoom",
            Self::GoogleMeet => "Google Meet",
            Self::Teams => "Teams",
            Self::Generic => "Generic",
        }
    }
}

/// Which execution path produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Static,
    Ai,
    Browser,
    Error,
}

/// Outcome of a navigation, as reported by the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}
