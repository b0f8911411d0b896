use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use sapper_core::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sapper-it-{}-{name}", std::process::id()))
}

#[test]
fn loads_board_from_map_file() {
    let board = Board::from_mine_coords(CLASSIC_SIZE, &[(0, 0), (0, 1), (5, 5)]).unwrap();
    let path = temp_path("saved-map.txt");
    write_map(&board, &path).unwrap();

    // the file's mine count wins over the requested one
    let options = GameOptions::new(GameConfig::classic(20).unwrap()).with_map(&path);
    let game = new_game(&options, Arc::new(MemoryRecordStore::default()));

    assert_eq!(game.source, BoardSource::File(path.clone()));
    assert_eq!(game.actual_mines, 3);
    assert_eq!(game.session.remaining_flags(), 3);
    assert_eq!(game.session.board(), &board);

    fs::remove_file(&path).unwrap();
}

#[test]
fn wrong_dimensions_fall_back_to_random() {
    let path = temp_path("small-map.txt");
    fs::write(&path, "0 0 0\n0 0 0\n0 0 0\n").unwrap();

    assert_eq!(
        read_map(&path, CLASSIC_SIZE),
        Err(GameError::InvalidFormat(MapFormatError::RowCount {
            expected: 10,
            found: 3
        }))
    );

    let options = GameOptions::new(GameConfig::classic(12).unwrap())
        .with_map(&path)
        .with_seed(5);
    let game = new_game(&options, Arc::new(MemoryRecordStore::default()));

    assert_eq!(game.source, BoardSource::Random { seed: 5 });
    assert_eq!(game.actual_mines, 12);
    assert_eq!(game.session.board().size(), CLASSIC_SIZE);

    fs::remove_file(&path).unwrap();
}

#[test]
fn out_of_domain_map_falls_back_to_random() {
    let path = temp_path("bad-value-map.txt");
    let mut text = String::new();
    for row in 0..10 {
        let value = if row == 4 { "0 0 0 0 0 0 0 0 0 42\n" } else { "0 0 0 0 0 0 0 0 0 0\n" };
        text.push_str(value);
    }
    fs::write(&path, text).unwrap();

    assert!(matches!(
        read_map(&path, CLASSIC_SIZE),
        Err(GameError::InvalidFormat(MapFormatError::ValueOutOfDomain {
            row: 4,
            col: 9,
            value: 42
        }))
    ));

    let options = GameOptions::new(GameConfig::classic(8).unwrap()).with_map(&path);
    let game = new_game(&options, Arc::new(MemoryRecordStore::default()));
    assert!(matches!(game.source, BoardSource::Random { .. }));

    fs::remove_file(&path).unwrap();
}

#[test]
fn best_time_persists_across_sessions() {
    let path = temp_path("best_time.txt");
    let records: Arc<dyn RecordStore> = Arc::new(FileRecordStore::new(&path));
    let board = Board::from_mine_coords((1, 3), &[(0, 0)]).unwrap();

    let mut first = GameSession::new(board.clone(), records.clone());
    assert_eq!(first.best_time(), None);
    for _ in 0..5 {
        first.tick();
    }
    first.reveal((0, 1)).unwrap();
    let win = first.reveal((0, 2)).unwrap().win.unwrap();
    assert!(win.new_record);
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "5");

    let mut second = GameSession::new(board, records.clone());
    assert_eq!(second.best_time(), Some(5));
    for _ in 0..5 {
        second.tick();
    }
    second.reveal((0, 1)).unwrap();
    let tie = second.reveal((0, 2)).unwrap().win.unwrap();
    assert!(!tie.new_record);
    assert_eq!(records.load(), Some(5));

    fs::remove_file(&path).unwrap();
}

#[test]
fn losing_never_wins() {
    for seed in 0..10 {
        let options = GameOptions::new(GameConfig::classic(30).unwrap()).with_seed(seed);
        let mut session = new_game(&options, Arc::new(MemoryRecordStore::default())).session;
        let mine = session.board().mine_coords().next().unwrap();

        let result = session.reveal(mine).unwrap();

        assert_eq!(result.outcome, Outcome::Lost);
        assert!(result.win.is_none());
        assert_eq!(result.cells.len(), 30);
        assert_ne!(session.revealed_count(), session.board().safe_cell_count());
    }
}
