use core::ops::Index;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// The minefield of one game: which cells are mines and the adjacency count of the others.
///
/// A board knows nothing about what the player has revealed or flagged, see [`GameSession`]
/// for that. Boards are serialized but never deserialized directly, [`Board::load_from_source`]
/// reads them back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    cells: Array2<CellKind>,
    mine_count: CellCount,
}

impl Board {
    /// Places `config.mines` mines uniformly at random using a fresh seed.
    pub fn generate_random(config: GameConfig) -> Self {
        RandomBoardGenerator::from_entropy().generate(config)
    }

    /// Builds a board from a mine mask, computing adjacency for every safe cell.
    ///
    /// Masks with a side longer than [`Coord::MAX`] are rejected with [`GameError::TooLarge`].
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let (Ok(row_count), Ok(col_count)) = (Coord::try_from(rows), Coord::try_from(cols)) else {
            return Err(GameError::TooLarge { rows, cols });
        };
        Ok(Self::from_sized_mask((row_count, col_count), mine_mask))
    }

    /// `size` must be the dimensions of `mine_mask`.
    pub(crate) fn from_sized_mask(size: Coord2, mine_mask: &Array2<bool>) -> Self {
        let cells = Array2::from_shape_fn(mine_mask.dim(), |(row, col)| {
            if mine_mask[(row, col)] {
                return CellKind::Mine;
            }
            let adjacent = Neighbors::new((row as Coord, col as Coord), size)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count();
            CellKind::Safe(adjacent as u8)
        });

        Self::from_cells(cells)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds { coords, size });
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_sized_mask(size, &mine_mask))
    }

    /// Takes persisted cell values verbatim, `-1` marks a mine and `0..=8` a count.
    ///
    /// Counts are not recomputed. A grid whose shape differs from `size` or that holds any other
    /// value is rejected with [`GameError::InvalidFormat`].
    pub fn load_from_source<R: AsRef<[i64]>>(size: Coord2, raw_grid: &[R]) -> Result<Self> {
        let (rows, cols) = (usize::from(size.0), usize::from(size.1));

        if raw_grid.len() != rows {
            return Err(MapFormatError::RowCount {
                expected: rows,
                found: raw_grid.len(),
            }
            .into());
        }

        let mut values = Vec::with_capacity(rows * cols);
        for (row, raw_row) in raw_grid.iter().enumerate() {
            let raw_row = raw_row.as_ref();
            if raw_row.len() != cols {
                return Err(MapFormatError::ColumnCount {
                    row,
                    expected: cols,
                    found: raw_row.len(),
                }
                .into());
            }
            for (col, &value) in raw_row.iter().enumerate() {
                let cell = CellKind::from_marker(value)
                    .ok_or(MapFormatError::ValueOutOfDomain { row, col, value })?;
                values.push(cell);
            }
        }

        let cells =
            Array2::from_shape_vec((rows, cols), values).map_err(|_| MapFormatError::Empty)?;
        let board = Self::from_cells(cells);
        if !board.is_consistent() {
            log::warn!("Loaded board counts do not match its mines, using them as stored");
        }
        Ok(board)
    }

    fn from_cells(cells: Array2<CellKind>) -> Self {
        let mine_count = count_mines(&cells);
        Self { cells, mine_count }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds { coords, size })
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    /// Mine count recorded when the board was built.
    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Mine count obtained by scanning every cell.
    pub fn mine_count_actual(&self) -> CellCount {
        count_mines(&self.cells)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellKind> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.size())
    }

    /// Positions of every mine in row-major order.
    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_mine())
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    /// Whether every stored count matches the mines around it.
    pub fn is_consistent(&self) -> bool {
        self.cells.indexed_iter().all(|((row, col), &cell)| match cell {
            CellKind::Mine => true,
            CellKind::Safe(count) => {
                let coords = (row as Coord, col as Coord);
                let adjacent = self.neighbors(coords).filter(|&pos| self[pos].is_mine()).count();
                usize::from(count) == adjacent
            }
        })
    }

    /// Rows of map file values, `-1` for mines.
    pub fn to_raw_grid(&self) -> Vec<Vec<i64>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|cell| cell.to_marker()).collect())
            .collect()
    }
}

impl Index<Coord2> for Board {
    type Output = CellKind;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

fn count_mines(cells: &Array2<CellKind>) -> CellCount {
    cells.iter().filter(|cell| cell.is_mine()).count() as CellCount
}
