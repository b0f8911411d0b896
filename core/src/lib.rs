//! Game engine for a single-player mine-detection game.
//!
//! A [`Board`] holds the minefield, a [`GameSession`] tracks what the player revealed and
//! flagged, and [`new_game`] wires both together with map loading and best-time records.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use map_file::*;
pub use records::*;
pub use session::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod game;
mod generator;
mod map_file;
mod records;
mod session;
mod timer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that the board is not empty and that `0 < mines < rows * cols`.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let max = Self::max_mines(size);
        if size.0 == 0 || size.1 == 0 || mines == 0 || mines > max {
            return Err(GameError::InvalidMineCount {
                requested: mines,
                max,
            });
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// 10x10 board with the given mine count.
    pub fn classic(mines: CellCount) -> Result<Self> {
        Self::new(CLASSIC_SIZE, mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Largest mine count a board of `size` accepts, one cell always stays safe.
    pub const fn max_mines(size: Coord2) -> CellCount {
        mult(size.0, size.1).saturating_sub(1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Which action a click performs, toggled by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickMode {
    Reveal,
    Flag,
}

impl ClickMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Reveal => Self::Flag,
            Self::Flag => Self::Reveal,
        }
    }
}

impl Default for ClickMode {
    fn default() -> Self {
        Self::Reveal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_accepts_mines_below_cell_count() {
        assert_eq!(GameConfig::classic(1).unwrap().mines, 1);
        assert_eq!(GameConfig::classic(99).unwrap().mines, 99);
    }

    #[test]
    fn max_mines_leaves_one_safe_cell() {
        assert_eq!(GameConfig::max_mines(CLASSIC_SIZE), 99);
        assert_eq!(GameConfig::max_mines((1, 1)), 0);
        assert_eq!(GameConfig::max_mines((0, 5)), 0);
    }

    #[test]
    fn config_rejects_zero_and_full_boards() {
        let err = GameError::InvalidMineCount {
            requested: 0,
            max: 99,
        };
        assert_eq!(GameConfig::classic(0), Err(err));
        assert_eq!(
            GameConfig::classic(100),
            Err(GameError::InvalidMineCount {
                requested: 100,
                max: 99
            })
        );
        assert!(GameConfig::new((0, 10), 1).is_err());
    }

    #[test]
    fn click_mode_toggles() {
        assert_eq!(ClickMode::default(), ClickMode::Reveal);
        assert_eq!(ClickMode::Reveal.toggled(), ClickMode::Flag);
        assert_eq!(ClickMode::Flag.toggled(), ClickMode::Reveal);
    }
}
