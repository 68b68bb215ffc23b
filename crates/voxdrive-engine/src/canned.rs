//! Deterministic canned replies for the static command table.

use chrono::Local;
use voxdrive_common::protocol::StaticCommand;

const HELP_TEXT: &str = "I can help you with:\n\
- Basic commands: hello, time, help\n\
- AI responses: ai: your question\n\
- Browser control: browser: start browser, join meeting, click, scroll, type, navigate to, screenshot, close browser";

/// Produce the response for a static command. `time` reads the wall clock at
/// call time; the rest are fixed text.
pub fn respond(cmd: StaticCommand) -> String {
    match cmd {
        StaticCommand::Hello => "Hello! How can I assist you today?".to_string(),
        StaticCommand::Time => {
            format!("The current time is {}", Local::now().format("%H:%M:%S"))
        }
        StaticCommand::Help => HELP_TEXT.to_string(),
    }
}
