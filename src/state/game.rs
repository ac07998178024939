use std::time::SystemTime;

use uuid::Uuid;

use crate::dao::models::{GameSessionEntity, PlayerEntity};

/// Player seated in a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier, assigned when the player joins.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Running score. Lower is better.
    pub score: i32,
}

impl Player {
    /// Build a player with a fresh identifier and a zero score.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
        }
    }
}

/// One played game, either in progress or resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    /// Primary key of the session.
    pub id: Uuid,
    /// Moment the game was played.
    pub date: SystemTime,
    /// Players in the order they joined.
    pub players: Vec<Player>,
    /// Set exactly once, when the session is resolved.
    pub winner_name: Option<String>,
    /// `true` until a winner has been called.
    pub is_active: bool,
}

impl GameSession {
    /// Build an empty, unresolved session played at `date`.
    pub fn new(date: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            players: Vec::new(),
            winner_name: None,
            is_active: true,
        }
    }

    /// Player holding the lowest score.
    ///
    /// Ties go to whoever joined first; an empty table has no winner.
    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().reduce(|best, candidate| {
            if candidate.score < best.score {
                candidate
            } else {
                best
            }
        })
    }

    /// Players ordered from lowest to highest score, keeping join order on ties.
    pub fn standings(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by_key(|player| player.score);
        ranked
    }

    /// Look up a seated player by identifier.
    pub fn player(&self, id: Uuid) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: Uuid) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
        }
    }
}

impl From<GameSessionEntity> for GameSession {
    fn from(value: GameSessionEntity) -> Self {
        Self {
            id: value.id,
            date: value.date,
            players: value.players.into_iter().map(Into::into).collect(),
            winner_name: value.winner_name,
            is_active: value.is_active,
        }
    }
}

impl From<GameSession> for GameSessionEntity {
    fn from(value: GameSession) -> Self {
        Self {
            id: value.id,
            date: value.date,
            players: value.players.into_iter().map(Into::into).collect(),
            winner_name: value.winner_name,
            is_active: value.is_active,
        }
    }
}
