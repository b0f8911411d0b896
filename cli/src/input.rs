use sapper_core::{CellCount, ClickMode, Coord, Coord2, GameConfig, GameError};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Click a cell, `None` uses the current mode
    Click {
        mode: Option<ClickMode>,
        coords: Coord2,
    },
    ToggleMode,
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("type a command, `?` for help")]
    Empty,
    #[error("unknown command `{0}`, `?` for help")]
    UnknownCommand(String),
    #[error("expected a row and a column")]
    MissingCoordinates,
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("({row}, {col}) is outside the {rows}x{cols} board")]
    OffBoard {
        row: usize,
        col: usize,
        rows: Coord,
        cols: Coord,
    },
    #[error("{0}")]
    Mines(#[from] GameError),
}

pub const HELP: &str = "\
commands:
  <row> <col>     click a cell in the current mode
  r <row> <col>   reveal a cell
  f <row> <col>   place or remove a flag
  m               switch between reveal and flag mode
  s               show the board again
  q               quit";

pub fn parse_command(line: &str, size: Coord2) -> Result<Command, InputError> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Err(InputError::Empty);
    };

    let mode = match first {
        "q" | "quit" => return Ok(Command::Quit),
        "m" | "mode" => return Ok(Command::ToggleMode),
        "s" | "show" => return Ok(Command::Show),
        "?" | "h" | "help" => return Ok(Command::Help),
        "r" | "reveal" => Some(ClickMode::Reveal),
        "f" | "flag" => Some(ClickMode::Flag),
        token if token.chars().all(|c| c.is_ascii_digit()) => None,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    let row = match mode {
        Some(_) => tokens.next(),
        None => Some(first),
    };
    let (Some(row), Some(col)) = (row, tokens.next()) else {
        return Err(InputError::MissingCoordinates);
    };

    let (row, col) = (parse_index(row)?, parse_index(col)?);
    let (rows, cols) = size;
    if row >= usize::from(rows) || col >= usize::from(cols) {
        return Err(InputError::OffBoard {
            row,
            col,
            rows,
            cols,
        });
    }

    Ok(Command::Click {
        mode,
        coords: (row as Coord, col as Coord),
    })
}

/// Reads a mine count and checks it fits a board of `size`.
pub fn parse_mine_count(line: &str, size: Coord2) -> Result<GameConfig, InputError> {
    let line = line.trim();
    let mines: CellCount = line.parse().map_err(|_| InputError::NotANumber(line.to_string()))?;
    Ok(GameConfig::new(size, mines)?)
}

/// `y`/`yes` answers, anything else is a no.
pub fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn parse_index(token: &str) -> Result<usize, InputError> {
    token
        .parse()
        .map_err(|_| InputError::NotANumber(token.to_string()))
}
