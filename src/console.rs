//! Line-oriented command parsing for the terminal driver.

use thiserror::Error;

/// A single instruction typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new game.
    Start,
    /// Seat a player under the given name.
    Add(String),
    /// Replace the score of the player at a 1-based seat.
    Score { seat: usize, score: i32 },
    /// Add points to the player at a 1-based seat.
    Plus { seat: usize, points: i32 },
    /// Remove points from the player at a 1-based seat.
    Minus { seat: usize, points: i32 },
    /// Declare the winner and archive the game.
    Winner,
    /// Abandon the current game.
    Cancel,
    /// Print the current game.
    Show,
    /// Print the archive.
    History,
    /// Print per-player records.
    Records,
    /// Print the command list.
    Help,
    /// Leave the program.
    Quit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`; type `help` for the list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a whole number")]
    NotANumber(String),
    #[error("seats are numbered from 1")]
    ZeroSeat,
}

/// Text printed by `help`.
pub const HELP: &str = "\
commands:
  start                 open a new game
  add <name>            seat a player
  score <seat> <value>  set a player's score
  plus <seat> <points>  add points to a player
  minus <seat> <points> remove points from a player
  winner                lowest score wins; archive the game
  cancel                abandon the current game
  show                  print the current game
  history               print past games
  records               print wins per player
  quit                  leave";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "start" | "new" => Command::Start,
        "add" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("add <name>"));
            }
            Command::Add(rest.to_owned())
        }
        "score" => {
            let (seat, score) = seat_and_number(rest, "score <seat> <value>")?;
            Command::Score { seat, score }
        }
        "plus" | "+" => {
            let (seat, points) = seat_and_number(rest, "plus <seat> <points>")?;
            Command::Plus { seat, points }
        }
        "minus" | "-" => {
            let (seat, points) = seat_and_number(rest, "minus <seat> <points>")?;
            Command::Minus { seat, points }
        }
        "winner" | "kaboo" => Command::Winner,
        "cancel" => Command::Cancel,
        "show" | "ls" => Command::Show,
        "history" => Command::History,
        "records" => Command::Records,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };

    Ok(Some(command))
}

fn seat_and_number(rest: &str, usage: &'static str) -> Result<(usize, i32), ParseError> {
    let mut parts = rest.split_whitespace();
    let (Some(seat), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::Usage(usage));
    };

    let seat: usize = seat
        .parse()
        .map_err(|_| ParseError::NotANumber(seat.to_owned()))?;
    if seat == 0 {
        return Err(ParseError::ZeroSeat);
    }
    let value: i32 = value
        .parse()
        .map_err(|_| ParseError::NotANumber(value.to_owned()))?;

    Ok((seat, value))
}
