use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A participant known to the room.
///
/// Identity is generated client-side and persisted there; the registry
/// only ever sees the opaque id. Uniqueness is by id, not name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// Process-wide mapping of participant id to display name.
///
/// Entries are created on first name broadcast and never removed; the
/// registry lives as long as the process. Last write wins per id, and
/// concurrent upserts for distinct ids commute.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: RwLock<HashMap<String, Participant>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a participant's display name and return the full current
    /// id -> name snapshot. No validation on `name` (empty is allowed)
    /// and no uniqueness constraint across ids.
    pub async fn set_name(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> HashMap<String, String> {
        let id = id.into();
        let name = name.into();
        let mut participants = self.participants.write().await;
        participants.insert(id.clone(), Participant { id, name });
        participants
            .values()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect()
    }

    /// Read-only full copy of the id -> name mapping.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        let participants = self.participants.read().await;
        participants
            .values()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect()
    }
}
