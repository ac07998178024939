use std::collections::{HashMap, HashSet};

use crate::{
    dto::history::{HistoryEntry, PlayerRecord},
    state::SharedState,
};

/// Archived games, most recent first.
pub async fn past_games(state: &SharedState) -> Vec<HistoryEntry> {
    let store = state.store().read().await;
    store.past_sessions().iter().map(HistoryEntry::from).collect()
}

/// Games played and won per player name, best record first.
///
/// Players are matched by name since identifiers are minted per game.
pub async fn player_records(state: &SharedState) -> Vec<PlayerRecord> {
    let store = state.store().read().await;
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();

    for session in store.past_sessions() {
        let names: HashSet<&str> = session.players.iter().map(|p| p.name.as_str()).collect();
        for name in names {
            tally.entry(name).or_default().0 += 1;
        }
        if let Some(winner) = session.winner_name.as_deref() {
            tally.entry(winner).or_default().1 += 1;
        }
    }

    let mut records: Vec<PlayerRecord> = tally
        .into_iter()
        .map(|(name, (games_played, games_won))| PlayerRecord {
            name: name.to_owned(),
            games_played,
            games_won,
        })
        .collect();
    records.sort_by(|a, b| {
        b.games_won
            .cmp(&a.games_won)
            .then_with(|| a.name.cmp(&b.name))
    });
    records
}
