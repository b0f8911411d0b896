/// Single coordinate axis, used for rows, columns and board dimensions.
pub type Coord = u8;

/// Count type used for mine counts and cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, 0-based.
pub type Coord2 = (Coord, Coord);

/// Board dimensions used by the classic game.
pub const CLASSIC_SIZE: Coord2 = (10, 10);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major offsets of the Moore neighborhood.
const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the up-to-8 neighbors of a cell, clipped at the board edges.
///
/// Holds no borrow of the board, so callers can mutate game state while walking it.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord2,
    next: usize,
}

impl Neighbors {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            next: 0,
        }
    }

    fn offset(&self, (d_row, d_col): (i8, i8)) -> Option<Coord2> {
        let (row, col) = self.center;
        let (rows, cols) = self.size;

        let row = row.checked_add_signed(d_row).filter(|&row| row < rows)?;
        let col = col.checked_add_signed(d_col).filter(|&col| col < cols)?;
        Some((row, col))
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = OFFSETS.get(self.next) {
            self.next += 1;
            if let Some(coords) = self.offset(delta) {
                return Some(coords);
            }
        }
        None
    }
}
