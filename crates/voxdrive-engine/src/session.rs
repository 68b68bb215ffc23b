//! Session identity, activity state, and per-session command serialization.

use crate::transcript::Transcript;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;
use uuid::Uuid;
use voxdrive_common::error::SessionError;
use voxdrive_common::transcript::{CommandLogEntry, SessionRecord, TranscriptView};

struct Slot {
    record: SessionRecord,
    transcript: Transcript,
    /// Held for the duration of one dispatch; keeps transcript ordering
    /// deterministic under concurrent callers.
    command_lock: Arc<AsyncMutex<()>>,
}

/// Registry of all sessions. Sessions are only ever deactivated, never
/// deleted, so transcripts of ended sessions stay readable.
#[derive(Default)]
pub struct SessionManager {
    sessions: StdMutex<HashMap<Uuid, Slot>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> SessionRecord {
        let record = SessionRecord::new();
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            record.session_id,
            Slot {
                record: record.clone(),
                transcript: Transcript::new(),
                command_lock: Arc::new(AsyncMutex::new(())),
            },
        );
        info!(session_id = %record.session_id, "Created new session");
        record
    }

    pub fn get(&self, id: Uuid) -> Result<SessionRecord, SessionError> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(&id)
            .map(|slot| slot.record.clone())
            .ok_or(SessionError::NotFound(id))
    }

    /// The per-session serialization lock. Callers acquire it before
    /// `require_active`, so a session ended while a command was queued is
    /// still rejected.
    pub fn command_lock(&self, id: Uuid) -> Result<Arc<AsyncMutex<()>>, SessionError> {
        let sessions = self.sessions.lock().unwrap();
        sessions
            .get(&id)
            .map(|slot| Arc::clone(&slot.command_lock))
            .ok_or(SessionError::NotFound(id))
    }

    pub fn require_active(&self, id: Uuid) -> Result<(), SessionError> {
        let record = self.get(id)?;
        if record.is_active {
            Ok(())
        } else {
            Err(SessionError::Inactive(id))
        }
    }

    /// Deactivate a session. Returns whether this call made the transition;
    /// ending an already-ended session is a no-op success.
    pub fn end(&self, id: Uuid) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.lock().unwrap();
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        if !slot.record.is_active {
            return Ok(false);
        }
        slot.record.is_active = false;
        slot.record.ended_at = Some(Utc::now());
        info!(session_id = %id, "Ended session");
        Ok(true)
    }

    pub fn append_entry(&self, id: Uuid, entry: CommandLogEntry) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().unwrap();
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        slot.transcript.append(entry);
        Ok(())
    }

    pub fn transcript_view(&self, id: Uuid) -> Result<TranscriptView, SessionError> {
        let sessions = self.sessions.lock().unwrap();
        let slot = sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        Ok(TranscriptView {
            session_id: slot.record.session_id,
            started_at: slot.record.started_at,
            ended_at: slot.record.ended_at,
            is_active: slot.record.is_active,
            total_commands: slot.transcript.len(),
            commands: slot.transcript.snapshot(),
        })
    }
}
