//! Command dispatch pipeline: classify -> route -> time -> record.
//!
//! A failure inside an accepted command (AI or browser) becomes a response
//! message plus an `Error`-flagged transcript entry; it never aborts the
//! dispatch call or leaves the session unusable. Only request-level failures
//! (unknown/inactive session, blank input) propagate to the caller, and those
//! write no transcript entry because no command executed.

use crate::ai::CompletionProvider;
use crate::canned;
use crate::config::BrowserConfig;
use crate::controller::BrowserController;
use crate::driver::BrowserDriver;
use crate::parser;
use crate::session::SessionManager;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use voxdrive_common::error::DispatchError;
use voxdrive_common::protocol::{ActionKind, ParsedAction};
use voxdrive_common::transcript::{CommandLogEntry, SessionRecord, TranscriptView};

const NOT_UNDERSTOOD: &str =
    "I'm not sure how to respond to that yet. Try saying 'help' for available commands.";
const AI_UNAVAILABLE: &str = "The AI service is currently unavailable. Please try again later.";

pub struct Dispatcher {
    sessions: SessionManager,
    browser: Arc<BrowserController>,
    ai: Arc<dyn CompletionProvider>,
}

impl Dispatcher {
    pub fn new(
        browser_config: BrowserConfig,
        driver: Box<dyn BrowserDriver>,
        ai: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(),
            browser: Arc::new(BrowserController::new(driver, browser_config)),
            ai,
        }
    }

    pub fn start_session(&self) -> SessionRecord {
        self.sessions.start()
    }

    pub fn transcript(&self, session_id: Uuid) -> Result<TranscriptView, DispatchError> {
        Ok(self.sessions.transcript_view(session_id)?)
    }

    /// End a session. If this call deactivates the session and the browser
    /// resource is open, the browser is closed synchronously before returning.
    pub async fn end_session(&self, session_id: Uuid) -> Result<(), DispatchError> {
        let transitioned = self.sessions.end(session_id)?;
        if transitioned && self.browser.is_open().await {
            info!(session_id = %session_id, "Session end forces browser cleanup");
            self.browser.close().await;
        }
        Ok(())
    }

    /// Process one command for a session, returning the response text.
    ///
    /// Commands for the same session run one at a time in arrival order; the
    /// per-session lock is held for the whole call.
    pub async fn send_command(
        &self,
        session_id: Uuid,
        command_text: &str,
    ) -> Result<String, DispatchError> {
        let lock = self.sessions.command_lock(session_id)?;
        let _guard = lock.lock().await;
        self.sessions.require_active(session_id)?;

        let command = command_text.trim();
        if command.is_empty() {
            return Err(DispatchError::Validation(
                "Command cannot be empty".to_string(),
            ));
        }

        let started = Instant::now();
        let action = parser::parse(command);
        let (response, action_kind, is_ai_response) = self.route(action).await;
        let processing_time_ms = started.elapsed().as_millis() as u64;

        self.sessions.append_entry(
            session_id,
            CommandLogEntry {
                timestamp: Utc::now(),
                command: command.to_string(),
                response: response.clone(),
                is_ai_response,
                processing_time_ms,
                action_kind,
            },
        )?;

        info!(
            session_id = %session_id,
            elapsed_ms = processing_time_ms,
            kind = ?action_kind,
            "Processed command"
        );
        Ok(response)
    }

    async fn route(&self, action: ParsedAction) -> (String, ActionKind, bool) {
        match action {
            ParsedAction::Static(cmd) => (canned::respond(cmd), ActionKind::Static, false),
            ParsedAction::AiQuery(query) => match self.ai.complete(&query).await {
                Ok(text) => (text, ActionKind::Ai, true),
                // Degraded but still an AI exchange; one attempt only.
                Err(e) => {
                    warn!("AI completion failed: {}", e);
                    (AI_UNAVAILABLE.to_string(), ActionKind::Error, true)
                }
            },
            ParsedAction::Browser(cmd) => match self.browser.execute(cmd).await {
                Ok(msg) => (msg, ActionKind::Browser, false),
                Err(e) => {
                    warn!("Browser command failed: {}", e);
                    (e.to_string(), ActionKind::Error, false)
                }
            },
            ParsedAction::Unrecognized(_) => {
                (NOT_UNDERSTOOD.to_string(), ActionKind::Error, false)
            }
        }
    }
}
