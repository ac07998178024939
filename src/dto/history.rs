use serde::Serialize;
use uuid::Uuid;

use crate::{dto::format_system_time, state::game::GameSession};

/// One player line of an archived game, in standings order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HistoryPlayer {
    pub name: String,
    pub score: i32,
    pub is_winner: bool,
}

/// Archived game as listed in the history.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub date: String,
    pub winner_name: Option<String>,
    pub players: Vec<HistoryPlayer>,
}

/// Lifetime tally for one player name across the archive.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub games_played: usize,
    pub games_won: usize,
}

impl From<&GameSession> for HistoryEntry {
    fn from(session: &GameSession) -> Self {
        let winner = session.winner_name.as_deref();
        Self {
            id: session.id,
            date: format_system_time(session.date),
            winner_name: session.winner_name.clone(),
            players: session
                .standings()
                .into_iter()
                .map(|player| HistoryPlayer {
                    name: player.name.clone(),
                    score: player.score,
                    is_winner: Some(player.name.as_str()) == winner,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::state::game::Player;

    #[test]
    fn entry_lists_players_by_standing_and_flags_winner() {
        let mut session = GameSession::new(SystemTime::UNIX_EPOCH + Duration::from_secs(60));
        for (name, score) in [("A", 8), ("B", 2), ("C", 5)] {
            session.players.push(Player {
                score,
                ..Player::new(name)
            });
        }
        session.winner_name = Some("B".into());
        session.is_active = false;

        let entry = HistoryEntry::from(&session);

        assert_eq!(entry.date, "1970-01-01T00:01:00Z");
        let lines: Vec<(&str, i32, bool)> = entry
            .players
            .iter()
            .map(|p| (p.name.as_str(), p.score, p.is_winner))
            .collect();
        assert_eq!(lines, [("B", 2, true), ("C", 5, false), ("A", 8, false)]);
    }
}
