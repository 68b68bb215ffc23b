//! Free-text command classification.
//!
//! `parse` turns one raw command line into exactly one [`ParsedAction`]. It is
//! total: input the grammar does not cover yields `Unrecognized`, never an
//! error, so the dispatcher can handle every outcome with a single match.

use url::Url;
use voxdrive_common::protocol::{
    BrowserCommand, MeetingPlatform, ParsedAction, ScrollDirection, StaticCommand,
};

/// Classify one raw command line.
pub fn parse(input: &str) -> ParsedAction {
    let trimmed = input.trim();

    if let Some(cmd) = parse_static(trimmed) {
        return ParsedAction::Static(cmd);
    }

    if let Some(rest) = strip_prefix_ci(trimmed, "ai:") {
        return ParsedAction::AiQuery(rest.trim().to_string());
    }

    if let Some(rest) = strip_prefix_ci(trimmed, "browser:") {
        return parse_browser(rest.trim(), input);
    }

    ParsedAction::Unrecognized(input.to_string())
}

fn parse_static(input: &str) -> Option<StaticCommand> {
    if input.eq_ignore_ascii_case("hello") {
        Some(StaticCommand::Hello)
    } else if input.eq_ignore_ascii_case("time") {
        Some(StaticCommand::Time)
    } else if input.eq_ignore_ascii_case("help") {
        Some(StaticCommand::Help)
    } else {
        None
    }
}

/// Case-insensitive prefix strip. Returns the remainder on match.
fn strip_prefix_ci<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    if input.len() >= prefix.len() && input[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}

/// The `browser:` sub-grammar.
///
/// `rest` is the text after the prefix; `raw` is the original line, carried
/// into `Unrecognized` untouched. Multi-word phrases ("join meeting") are
/// checked before single keywords so `join` alone cannot mis-trigger.
fn parse_browser(rest: &str, raw: &str) -> ParsedAction {
    // ASCII lowering keeps byte offsets aligned with `rest` for slicing.
    let lower = rest.to_ascii_lowercase();

    for phrase in ["join meeting", "join call"] {
        if let Some(idx) = lower.find(phrase) {
            let after = &rest[idx + phrase.len()..];
            return match find_url_token(after) {
                Some(url) => {
                    let platform = url
                        .host_str()
                        .map(MeetingPlatform::from_host)
                        .unwrap_or(MeetingPlatform::Generic);
                    ParsedAction::Browser(BrowserCommand::JoinMeeting {
                        url: url.into(),
                        platform,
                    })
                }
                None => ParsedAction::Unrecognized(raw.to_string()),
            };
        }
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    match words.as_slice() {
        ["start", "browser"] => {
            return ParsedAction::Browser(BrowserCommand::Start { headless: false });
        }
        ["start", "browser", "headless"] => {
            return ParsedAction::Browser(BrowserCommand::Start { headless: true });
        }
        ["close", "browser"] => return ParsedAction::Browser(BrowserCommand::Close),
        ["screenshot"] => return ParsedAction::Browser(BrowserCommand::Screenshot),
        _ => {}
    }

    if let Some(arg) = strip_keyword(rest, &lower, "navigate to") {
        return match Url::parse(arg) {
            Ok(_) => ParsedAction::Browser(BrowserCommand::Navigate {
                url: arg.to_string(),
            }),
            Err(_) => ParsedAction::Unrecognized(raw.to_string()),
        };
    }

    if let Some(selector) = strip_keyword(rest, &lower, "click") {
        if selector.is_empty() {
            return ParsedAction::Unrecognized(raw.to_string());
        }
        // Selector is kept verbatim; any element-locator string is allowed.
        return ParsedAction::Browser(BrowserCommand::Click {
            selector: selector.to_string(),
        });
    }

    if strip_keyword(rest, &lower, "scroll").is_some() {
        return parse_scroll(&words, raw);
    }

    if let Some(text) = strip_keyword(rest, &lower, "type") {
        if text.is_empty() {
            return ParsedAction::Unrecognized(raw.to_string());
        }
        return ParsedAction::Browser(BrowserCommand::Type {
            text: text.to_string(),
        });
    }

    ParsedAction::Unrecognized(raw.to_string())
}

/// `scroll <direction> [<amount> pixels]`.
fn parse_scroll(words: &[&str], raw: &str) -> ParsedAction {
    let direction = match words.get(1).and_then(|w| ScrollDirection::from_word(w)) {
        Some(d) => d,
        None => return ParsedAction::Unrecognized(raw.to_string()),
    };

    let pixels = match &words[2..] {
        [] => None,
        [amount, unit] if *unit == "pixels" || *unit == "pixel" => match amount.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => return ParsedAction::Unrecognized(raw.to_string()),
        },
        _ => return ParsedAction::Unrecognized(raw.to_string()),
    };

    ParsedAction::Browser(BrowserCommand::Scroll { direction, pixels })
}

/// Strip a leading keyword phrase, matching on the lowered copy but returning
/// the original-case argument. The keyword must end at a word boundary.
fn strip_keyword<'a>(rest: &'a str, lower: &str, keyword: &str) -> Option<&'a str> {
    if !lower.starts_with(keyword) {
        return None;
    }
    let tail = &rest[keyword.len()..];
    if tail.is_empty() {
        return Some("");
    }
    if !tail.starts_with(char::is_whitespace) {
        return None;
    }
    Some(tail.trim())
}

/// First whitespace-separated token that parses as an http(s) URL.
fn find_url_token(text: &str) -> Option<Url> {
    text.split_whitespace()
        .filter_map(|token| Url::parse(token).ok())
        .find(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser(input: &str) -> BrowserCommand {
        match parse(input) {
            ParsedAction::Browser(cmd) => cmd,
            other => panic!("expected browser command, got {:?}", other),
        }
    }

    #[test]
    fn static_commands_case_insensitive() {
        assert_eq!(parse("hello"), ParsedAction::Static(StaticCommand::Hello));
        assert_eq!(parse("TIME"), ParsedAction::Static(StaticCommand::Time));
        assert_eq!(parse("  Help  "), ParsedAction::Static(StaticCommand::Help));
    }

    #[test]
    fn ai_prefix() {
        assert_eq!(
            parse("ai: What is 2+2?"),
            ParsedAction::AiQuery("What is 2+2?".to_string())
        );
        assert_eq!(parse("ai:"), ParsedAction::AiQuery(String::new()));
        assert_eq!(
            parse("AI:  trailing  "),
            ParsedAction::AiQuery("trailing".to_string())
        );
    }

    #[test]
    fn join_meeting_platforms() {
        assert_eq!(
            browser("browser: join meeting https://zoom.us/j/123456789"),
            BrowserCommand::JoinMeeting {
                url: "https://zoom.us/j/123456789".to_string(),
                platform: MeetingPlatform::Zoom,
            }
        );
        assert_eq!(
            browser("browser: join call https://meet.google.com/abc-defg-hij"),
            BrowserCommand::JoinMeeting {
                url: "https://meet.google.com/abc-defg-hij".to_string(),
                platform: MeetingPlatform::GoogleMeet,
            }
        );
        assert_eq!(
            browser("browser: join meeting https://teams.microsoft.com/l/meetup-join/xyz"),
            BrowserCommand::JoinMeeting {
                url: "https://teams.microsoft.com/l/meetup-join/xyz".to_string(),
                platform: MeetingPlatform::Teams,
            }
        );
        assert_eq!(
            browser("browser: join meeting https://webinar.example.com/room/1"),
            BrowserCommand::JoinMeeting {
                url: "https://webinar.example.com/room/1".to_string(),
                platform: MeetingPlatform::Generic,
            }
        );
    }

    #[test]
    fn join_without_url_is_unrecognized() {
        assert!(matches!(
            parse("browser: join meeting"),
            ParsedAction::Unrecognized(_)
        ));
        assert!(matches!(
            parse("browser: join meeting my standup"),
            ParsedAction::Unrecognized(_)
        ));
    }

    #[test]
    fn start_and_close() {
        assert_eq!(
            browser("browser: start browser"),
            BrowserCommand::Start { headless: false }
        );
        assert_eq!(
            browser("browser: start browser headless"),
            BrowserCommand::Start { headless: true }
        );
        assert_eq!(browser("browser: close browser"), BrowserCommand::Close);
    }

    #[test]
    fn click_selector_verbatim() {
        assert_eq!(
            browser("browser: click button.login-btn"),
            BrowserCommand::Click {
                selector: "button.login-btn".to_string(),
            }
        );
        // Selector keeps its case and embedded whitespace.
        assert_eq!(
            browser("browser: click button[data-testid='Join-Button']"),
            BrowserCommand::Click {
                selector: "button[data-testid='Join-Button']".to_string(),
            }
        );
        assert!(matches!(
            parse("browser: click"),
            ParsedAction::Unrecognized(_)
        ));
    }

    #[test]
    fn scroll_with_and_without_amount() {
        assert_eq!(
            browser("browser: scroll down 300 pixels"),
            BrowserCommand::Scroll {
                direction: ScrollDirection::Down,
                pixels: Some(300),
            }
        );
        assert_eq!(
            browser("browser: scroll up"),
            BrowserCommand::Scroll {
                direction: ScrollDirection::Up,
                pixels: None,
            }
        );
        assert_eq!(
            browser("browser: scroll bottom"),
            BrowserCommand::Scroll {
                direction: ScrollDirection::Bottom,
                pixels: None,
            }
        );
        assert!(matches!(
            parse("browser: scroll sideways"),
            ParsedAction::Unrecognized(_)
        ));
        assert!(matches!(
            parse("browser: scroll down fast"),
            ParsedAction::Unrecognized(_)
        ));
    }

    #[test]
    fn type_text_verbatim() {
        assert_eq!(
            browser("browser: type Hello World"),
            BrowserCommand::Type {
                text: "Hello World".to_string(),
            }
        );
        assert!(matches!(
            parse("browser: type"),
            ParsedAction::Unrecognized(_)
        ));
    }

    #[test]
    fn navigate_requires_valid_url() {
        assert_eq!(
            browser("browser: navigate to https://google.com"),
            BrowserCommand::Navigate {
                url: "https://google.com".to_string(),
            }
        );
        assert!(matches!(
            parse("browser: navigate to not a url"),
            ParsedAction::Unrecognized(_)
        ));
    }

    #[test]
    fn screenshot() {
        assert_eq!(browser("browser: screenshot"), BrowserCommand::Screenshot);
    }

    #[test]
    fn unknown_input_is_unrecognized() {
        assert_eq!(
            parse("foo bar"),
            ParsedAction::Unrecognized("foo bar".to_string())
        );
        assert!(matches!(
            parse("browser: dance"),
            ParsedAction::Unrecognized(_)
        ));
        // `type` must end at a word boundary: "typeset" is not a type command.
        assert!(matches!(
            parse("browser: typeset text"),
            ParsedAction::Unrecognized(_)
        ));
    }
}
