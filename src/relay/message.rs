use crate::room::events::{RecordAction, RoomEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Message carried on the cross-process relay bus.
///
/// Closed union with one variant per topic; the pump decodes it
/// exhaustively at the single consumption point. The JSON wire format
/// is `{"kind": "<TOPIC>", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayMessage {
    /// The recording catalog changed.
    FilesUpdated,

    /// Start or stop recording; start carries the server-assigned
    /// reference timestamp.
    RecordCommand {
        action: RecordAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Full current participant snapshot.
    NameChange { participants: HashMap<String, String> },
}

impl RelayMessage {
    /// Subject suffix identifying this message's topic on the bus.
    pub fn topic(&self) -> &'static str {
        match self {
            RelayMessage::FilesUpdated => "files-updated",
            RelayMessage::RecordCommand { .. } => "record-command",
            RelayMessage::NameChange { .. } => "name-change",
        }
    }

    /// The fanout event this message becomes at the consumption point.
    pub fn into_event(self) -> RoomEvent {
        match self {
            RelayMessage::FilesUpdated => RoomEvent::FilesUpdated,
            RelayMessage::RecordCommand { action, timestamp } => {
                RoomEvent::RecordCommand { action, timestamp }
            }
            RelayMessage::NameChange { participants } => RoomEvent::NameChange { participants },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_per_topic() {
        let json = serde_json::to_string(&RelayMessage::FilesUpdated).unwrap();
        assert_eq!(json, r#"{"kind":"FILES_UPDATED"}"#);

        let json = serde_json::to_string(&RelayMessage::RecordCommand {
            action: RecordAction::Start,
            timestamp: Some(1712000000000),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"kind":"RECORD_COMMAND","payload":{"action":"start","timestamp":1712000000000}}"#
        );

        let json = serde_json::to_string(&RelayMessage::NameChange {
            participants: HashMap::from([("u1".to_string(), "Alice".to_string())]),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"kind":"NAME_CHANGE","payload":{"participants":{"u1":"Alice"}}}"#
        );
    }

    #[test]
    fn stop_command_omits_timestamp() {
        let json = serde_json::to_string(&RelayMessage::RecordCommand {
            action: RecordAction::Stop,
            timestamp: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"RECORD_COMMAND","payload":{"action":"stop"}}"#);
    }

    #[test]
    fn round_trip() {
        let messages = [
            RelayMessage::FilesUpdated,
            RelayMessage::RecordCommand {
                action: RecordAction::Start,
                timestamp: Some(7),
            },
            RelayMessage::NameChange {
                participants: HashMap::from([("u2".to_string(), "Bob".to_string())]),
            },
        ];
        for message in messages {
            let json = serde_json::to_vec(&message).unwrap();
            let back: RelayMessage = serde_json::from_slice(&json).unwrap();
            assert_eq!(back, message);
        }
    }

    #[test]
    fn topics_are_stable() {
        assert_eq!(RelayMessage::FilesUpdated.topic(), "files-updated");
        assert_eq!(
            RelayMessage::RecordCommand {
                action: RecordAction::Stop,
                timestamp: None,
            }
            .topic(),
            "record-command"
        );
        assert_eq!(
            RelayMessage::NameChange {
                participants: HashMap::new(),
            }
            .topic(),
            "name-change"
        );
    }
}
