use std::time::SystemTime;

use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        game::{AddPlayerRequest, GameView, PlayerView, PointsRequest, SetScoreRequest},
        history::HistoryEntry,
    },
    error::ServiceError,
    state::{GameStore, SharedState, StoreEvent},
};

/// Open a new game, optionally backdated to `played_at`.
pub async fn start_game(
    state: &SharedState,
    played_at: Option<SystemTime>,
) -> Result<GameView, ServiceError> {
    let mut store = state.store().write().await;
    if store.current_session().is_some() {
        return Err(ServiceError::InvalidState(
            "a game is already in progress".into(),
        ));
    }

    let event = store
        .start_new_game(played_at)
        .ok_or_else(|| ServiceError::InvalidState("game could not be started".into()))?;
    let view = current_view(&store)?;
    drop(store);

    state.events().broadcast(event);
    Ok(view)
}

/// Seat a new player with a zero score.
pub async fn add_player(
    state: &SharedState,
    request: AddPlayerRequest,
) -> Result<PlayerView, ServiceError> {
    request.validate()?;
    let name = request.name.trim().to_owned();

    let mut store = state.store().write().await;
    let event = store.add_player(name).ok_or_else(no_game)?;
    drop(store);

    let StoreEvent::PlayerAdded { ref player, .. } = event else {
        return Err(ServiceError::InvalidState("unexpected ledger event".into()));
    };
    let view = PlayerView::from(player);
    state.events().broadcast(event);
    Ok(view)
}

/// Replace a player's score; values under the floor are raised to it.
pub async fn set_score(
    state: &SharedState,
    player_id: Uuid,
    request: SetScoreRequest,
) -> Result<PlayerView, ServiceError> {
    let mut store = state.store().write().await;
    apply_score(state, &mut store, player_id, |_| request.score)
}

/// Add `points` to a player's score.
pub async fn add_points(
    state: &SharedState,
    player_id: Uuid,
    request: PointsRequest,
) -> Result<PlayerView, ServiceError> {
    request.validate()?;
    let mut store = state.store().write().await;
    apply_score(state, &mut store, player_id, |score| {
        score.saturating_add(request.points)
    })
}

/// Remove `points` from a player's score, never going under the floor.
pub async fn subtract_points(
    state: &SharedState,
    player_id: Uuid,
    request: PointsRequest,
) -> Result<PlayerView, ServiceError> {
    request.validate()?;
    let mut store = state.store().write().await;
    apply_score(state, &mut store, player_id, |score| {
        score.saturating_sub(request.points)
    })
}

/// Declare the lowest-scoring player the winner and archive the game.
pub async fn call_winner(state: &SharedState) -> Result<HistoryEntry, ServiceError> {
    let mut store = state.store().write().await;
    let session = store.current_session().ok_or_else(no_game)?;
    if session.players.is_empty() {
        return Err(ServiceError::InvalidState(
            "a winner needs at least one player".into(),
        ));
    }

    let event = store.call_winner().ok_or_else(no_game)?;
    let entry = store
        .past_sessions()
        .first()
        .map(HistoryEntry::from)
        .ok_or_else(|| ServiceError::InvalidState("resolved game missing from history".into()))?;
    drop(store);

    state.events().broadcast(event);
    Ok(entry)
}

/// Abandon the current game without recording it.
pub async fn cancel_game(state: &SharedState) -> Result<(), ServiceError> {
    let mut store = state.store().write().await;
    let event = store.cancel_game().ok_or_else(no_game)?;
    drop(store);

    state.events().broadcast(event);
    Ok(())
}

/// Snapshot of the game in progress, if any.
pub async fn current_game(state: &SharedState) -> Option<GameView> {
    let store = state.store().read().await;
    store.current_session().map(GameView::from)
}

fn apply_score(
    state: &SharedState,
    store: &mut GameStore,
    player_id: Uuid,
    next_score: impl FnOnce(i32) -> i32,
) -> Result<PlayerView, ServiceError> {
    let session = store.current_session().ok_or_else(no_game)?;
    let current = session
        .player(player_id)
        .map(|player| player.score)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;

    let event = store
        .update_score(player_id, next_score(current))
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;

    let view = store
        .current_session()
        .and_then(|session| session.player(player_id))
        .map(PlayerView::from)
        .ok_or_else(|| ServiceError::NotFound(format!("player `{player_id}` not found")))?;

    state.events().broadcast(event);
    Ok(view)
}

fn current_view(store: &GameStore) -> Result<GameView, ServiceError> {
    store
        .current_session()
        .map(GameView::from)
        .ok_or_else(no_game)
}

fn no_game() -> ServiceError {
    ServiceError::InvalidState("no game in progress".into())
}
