use crate::protocol::ActionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A session's identity and activity state.
///
/// Sessions are created active, deactivated exactly once, and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            is_active: true,
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// One command/response exchange. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandLogEntry {
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub response: String,
    pub is_ai_response: bool,
    pub processing_time_ms: u64,
    pub action_kind: ActionKind,
}

/// Full ordered transcript for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptView {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub total_commands: usize,
    pub commands: Vec<CommandLogEntry>,
}
