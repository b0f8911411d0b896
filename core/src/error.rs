use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates {coords:?} are outside of the {size:?} board")]
    OutOfBounds { coords: Coord2, size: Coord2 },
    #[error("Invalid mine count {requested}, expected 1 to {max}")]
    InvalidMineCount { requested: CellCount, max: CellCount },
    #[error("Board of {rows}x{cols} cells does not fit the coordinate range")]
    TooLarge { rows: usize, cols: usize },
    #[error("Invalid map format: {0}")]
    InvalidFormat(#[from] MapFormatError),
}

/// Reasons a persisted map could not be turned into a board.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapFormatError {
    #[error("map file could not be read")]
    Unreadable,
    #[error("map is empty")]
    Empty,
    #[error("line {line} contains a value that is not an integer")]
    NotAnInteger { line: usize },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} columns, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("value {value} at ({row}, {col}) is neither a mine marker nor a count")]
    ValueOutOfDomain { row: usize, col: usize, value: i64 },
    #[error("malformed JSON map")]
    Json,
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to write {}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;
