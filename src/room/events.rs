use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Action carried by a record command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    Start,
    Stop,
}

/// Event pushed to every live subscription.
///
/// This is the wire format seen by clients: one JSON object per SSE
/// message, tagged by `kind`. The `name-change` payload is a full
/// snapshot of the participant mapping, not a delta; clients replace
/// their entire view on each event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RoomEvent {
    /// The recording catalog changed; clients should re-query it.
    FilesUpdated,

    /// Begin or end local capture. The timestamp is the server-assigned
    /// reference time and is only present on start.
    RecordCommand {
        action: RecordAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Full current id -> name mapping.
    NameChange { participants: HashMap<String, String> },
}
