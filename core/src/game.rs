use std::path::PathBuf;
use std::sync::Arc;

use crate::*;

/// How to set up a new game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameOptions {
    pub config: GameConfig,
    /// Map file to load the board from, random generation is used when it cannot be loaded.
    pub map: Option<PathBuf>,
    /// Seed for random generation, a fresh one is drawn when absent.
    pub seed: Option<u64>,
}

impl GameOptions {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            map: None,
            seed: None,
        }
    }

    pub fn with_map(mut self, map: impl Into<PathBuf>) -> Self {
        self.map = Some(map.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Where the board of a new game came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardSource {
    File(PathBuf),
    Random { seed: u64 },
}

#[derive(Debug)]
pub struct NewGame {
    pub session: GameSession,
    pub source: BoardSource,
    /// Mines actually on the board, for a loaded map this wins over the requested count.
    pub actual_mines: CellCount,
}

/// Builds the board for a new game and wraps it in a session.
///
/// A map that cannot be read or parsed is not an error: the failure is logged and a random board
/// is generated instead.
pub fn new_game(options: &GameOptions, records: Arc<dyn RecordStore>) -> NewGame {
    let config = options.config;

    let loaded = options.map.as_ref().and_then(|path| match read_map(path, config.size) {
        Ok(board) => Some((board, BoardSource::File(path.clone()))),
        Err(err) => {
            log::warn!("Cannot load map {}: {err}, generating a random board", path.display());
            None
        }
    });

    let (board, source) = loaded.unwrap_or_else(|| {
        let generator = match options.seed {
            Some(seed) => RandomBoardGenerator::new(seed),
            None => RandomBoardGenerator::from_entropy(),
        };
        let seed = generator.seed();
        (generator.generate(config), BoardSource::Random { seed })
    });

    let actual_mines = board.mine_count_actual();
    if actual_mines != config.mines {
        log::info!(
            "Board holds {actual_mines} mines instead of the requested {}",
            config.mines
        );
    }

    NewGame {
        session: GameSession::new(board, records),
        source,
        actual_mines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_game_uses_requested_mines() {
        let options = GameOptions::new(GameConfig::classic(15).unwrap()).with_seed(3);

        let game = new_game(&options, Arc::new(MemoryRecordStore::default()));

        assert_eq!(game.source, BoardSource::Random { seed: 3 });
        assert_eq!(game.actual_mines, 15);
        assert_eq!(game.session.remaining_flags(), 15);
        assert_eq!(game.session.outcome(), Outcome::InProgress);
    }

    #[test]
    fn missing_map_falls_back_to_random() {
        let options = GameOptions::new(GameConfig::classic(10).unwrap())
            .with_map(std::env::temp_dir().join("sapper-missing-map.txt"))
            .with_seed(9);

        let game = new_game(&options, Arc::new(MemoryRecordStore::default()));

        assert_eq!(game.source, BoardSource::Random { seed: 9 });
        assert_eq!(game.actual_mines, 10);
    }

    #[test]
    fn session_loads_best_time() {
        let options = GameOptions::new(GameConfig::classic(10).unwrap());

        let game = new_game(&options, Arc::new(MemoryRecordStore::new(Some(77))));

        assert_eq!(game.session.best_time(), Some(77));
    }
}
