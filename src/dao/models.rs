use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Player record as written inside an archived session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Display name, stored verbatim.
    pub name: String,
    /// Final score of the player.
    pub score: i32,
}

/// Archived game session, one element of the persisted archive payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Moment the game was played.
    pub date: SystemTime,
    /// Participating players in seating order.
    pub players: Vec<PlayerEntity>,
    /// Name of the winning player once the session is resolved.
    #[serde(default)]
    pub winner_name: Option<String>,
    /// Whether the session was still in progress when written.
    pub is_active: bool,
}
