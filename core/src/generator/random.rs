use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Purely random mine placement, deterministic for a given seed.
///
/// No region is kept clear for the first click.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        let total_cells = usize::from(config.total_cells());
        let requested = usize::from(config.mines);

        let mines = if requested >= total_cells {
            log::warn!(
                "Board already full, requested {} mines but only {} fit",
                config.mines,
                total_cells
            );
            total_cells
        } else {
            requested
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        {
            let cells = mine_mask
                .as_slice_mut()
                .expect("freshly allocated array is in standard layout");
            // sampling without replacement, so no cell is picked twice
            for index in rand::seq::index::sample(&mut rng, total_cells, mines) {
                cells[index] = true;
            }
        }

        let board = Board::from_sized_mask(config.size, &mine_mask);
        log::debug!(
            "Generated {:?} board with {} mines from seed {}",
            config.size,
            board.mine_count(),
            self.seed
        );
        board
    }
}
