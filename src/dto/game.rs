use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{format_system_time, validation::validate_player_name},
    state::game::{GameSession, Player},
};

/// Payload seating a new player in the current game.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPlayerRequest {
    #[validate(custom(function = "validate_player_name"))]
    pub name: String,
}

/// Payload replacing a player's score outright.
#[derive(Debug, Deserialize)]
pub struct SetScoreRequest {
    pub score: i32,
}

/// Payload adding or removing points relative to the current score.
#[derive(Debug, Deserialize, Validate)]
pub struct PointsRequest {
    #[validate(range(min = 1))]
    pub points: i32,
}

/// Player as shown while a game is running.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlayerView {
    pub id: Uuid,
    pub name: String,
    pub score: i32,
}

/// Snapshot of the game in progress.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GameView {
    pub id: Uuid,
    pub date: String,
    /// Players in seating order.
    pub players: Vec<PlayerView>,
    /// Player who would win if the game ended now.
    pub leader: Option<Uuid>,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            score: player.score,
        }
    }
}

impl From<&GameSession> for GameView {
    fn from(session: &GameSession) -> Self {
        Self {
            id: session.id,
            date: format_system_time(session.date),
            players: session.players.iter().map(Into::into).collect(),
            leader: session.winner().map(|player| player.id),
        }
    }
}
