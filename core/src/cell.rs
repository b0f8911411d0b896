use serde::{Deserialize, Serialize};

/// Value persisted in map files for a mine cell.
pub const MINE_MARKER: i64 = -1;

/// Immutable content of a board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Mine,
    Safe(u8),
}

impl CellKind {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Map file representation: `-1` for mines, the adjacency count otherwise.
    pub const fn to_marker(self) -> i64 {
        match self {
            Self::Mine => MINE_MARKER,
            Self::Safe(count) => count as i64,
        }
    }

    pub fn from_marker(value: i64) -> Option<Self> {
        match value {
            MINE_MARKER => Some(Self::Mine),
            0..=8 => Some(Self::Safe(value as u8)),
            _ => None,
        }
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Safe(0)
    }
}

/// Per-game player-facing state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

/// What the presentation layer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    /// Mine shown after the game was lost
    Mine,
    /// The mine that lost the game
    Exploded,
}
