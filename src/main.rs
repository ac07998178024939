//! Kaboo Ledger binary entrypoint: a terminal driver over the score ledger.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use kaboo_ledger::{
    config::AppConfig,
    console::{self, Command, HELP},
    dao::archive_store::ArchiveStore,
    dto::{
        game::{AddPlayerRequest, GameView, PointsRequest, SetScoreRequest},
        history::HistoryEntry,
    },
    error::ServiceError,
    services::{game_service, history_service},
    state::{AppState, SharedState, log_events},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let archive = archive_backend(&config);
    let state = AppState::new(config, archive);
    tokio::spawn(log_events(state.events().subscribe()));

    println!("Kaboo score ledger. Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt().await?;
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading command")?,
            _ = shutdown_signal() => None,
        };
        let Some(line) = line else {
            break;
        };

        let command = match console::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if let Err(err) = run_command(&state, command).await {
            println!("{err}");
        }
    }

    info!("leaving");
    Ok(())
}

/// Execute one parsed command against the shared ledger and print the outcome.
async fn run_command(state: &SharedState, command: Command) -> Result<(), ServiceError> {
    match command {
        Command::Start => {
            let game = game_service::start_game(state, None).await?;
            println!("New game started. Add players with `add <name>`.");
            print_game(&game);
        }
        Command::Add(name) => {
            let player = game_service::add_player(state, AddPlayerRequest { name }).await?;
            println!("{} joined with {} points.", player.name, player.score);
        }
        Command::Score { seat, score } => {
            let id = seat_to_player(state, seat).await?;
            let player =
                game_service::set_score(state, id, SetScoreRequest { score }).await?;
            println!("{} now has {} points.", player.name, player.score);
        }
        Command::Plus { seat, points } => {
            let id = seat_to_player(state, seat).await?;
            let player = game_service::add_points(state, id, PointsRequest { points }).await?;
            println!("{} now has {} points.", player.name, player.score);
        }
        Command::Minus { seat, points } => {
            let id = seat_to_player(state, seat).await?;
            let player =
                game_service::subtract_points(state, id, PointsRequest { points }).await?;
            println!("{} now has {} points.", player.name, player.score);
        }
        Command::Winner => {
            let entry = game_service::call_winner(state).await?;
            if let Some(winner) = entry.winner_name.as_deref() {
                println!("Winner: {winner}!");
            }
            print_history_entry(&entry);
        }
        Command::Cancel => {
            game_service::cancel_game(state).await?;
            println!("Game cancelled.");
        }
        Command::Show => match game_service::current_game(state).await {
            Some(game) => print_game(&game),
            None => println!("No game in progress. Type `start` to begin."),
        },
        Command::History => {
            let history = history_service::past_games(state).await;
            if history.is_empty() {
                println!("No past games yet.");
            }
            for entry in &history {
                print_history_entry(entry);
            }
        }
        Command::Records => {
            for record in history_service::player_records(state).await {
                println!(
                    "{:<20} {:>3} won / {:>3} played",
                    record.name, record.games_won, record.games_played
                );
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

async fn seat_to_player(state: &SharedState, seat: usize) -> Result<Uuid, ServiceError> {
    let game = game_service::current_game(state)
        .await
        .ok_or_else(|| ServiceError::InvalidState("no game in progress".into()))?;
    seat.checked_sub(1)
        .and_then(|index| game.players.get(index))
        .map(|player| player.id)
        .ok_or_else(|| ServiceError::NotFound(format!("no player in seat {seat}")))
}

fn print_game(game: &GameView) {
    println!("Game {} ({})", game.id, game.date);
    if game.players.is_empty() {
        println!("  no players yet");
    }
    for (index, player) in game.players.iter().enumerate() {
        let marker = if game.leader == Some(player.id) { "*" } else { " " };
        println!("{marker} {:>2}. {:<20} {:>5}", index + 1, player.name, player.score);
    }
}

fn print_history_entry(entry: &HistoryEntry) {
    let winner = entry.winner_name.as_deref().unwrap_or("-");
    println!("{}  winner: {winner}", entry.date);
    for player in &entry.players {
        let marker = if player.is_winner { "*" } else { " " };
        println!("  {marker} {:<20} {:>5} pts", player.name, player.score);
    }
}

async fn prompt() -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await.context("writing prompt")?;
    stdout.flush().await.context("flushing prompt")?;
    Ok(())
}

/// Pick the archive backend compiled into this binary.
fn archive_backend(config: &AppConfig) -> Arc<dyn ArchiveStore> {
    #[cfg(feature = "file-store")]
    {
        info!(dir = %config.archive_dir.display(), "using file archive");
        Arc::new(kaboo_ledger::dao::archive_store::FileArchiveStore::new(
            config.archive_dir.clone(),
        ))
    }

    #[cfg(not(feature = "file-store"))]
    {
        warn!(
            dir = %config.archive_dir.display(),
            "file store disabled; history will not outlive this process"
        );
        Arc::new(kaboo_ledger::dao::archive_store::MemoryArchiveStore::new())
    }
}

/// Configure tracing subscribers; logs go to stderr so they stay out of the prompt.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let Ok(mut term) = signal(SignalKind::terminate()) else {
            warn!("failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
