/// Game lifecycle operations over the shared ledger.
pub mod game_service;
/// Read-only views over the archive of past games.
pub mod history_service;
