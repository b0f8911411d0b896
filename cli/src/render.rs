use std::fmt::Write;

use sapper_core::{CellView, ClickMode, GameSession, Outcome, RevealResult};

fn cell_char(view: CellView) -> char {
    match view {
        CellView::Hidden => '.',
        CellView::Flagged => 'F',
        CellView::Open(0) => ' ',
        CellView::Open(count) => char::from(b'0' + count),
        CellView::Mine => '*',
        CellView::Exploded => 'X',
    }
}

/// Grid with row and column indices along the edges.
pub fn board(session: &GameSession) -> String {
    let (rows, cols) = session.size();
    let mut out = String::from("   ");
    for col in 0..cols {
        let _ = write!(out, "{:>2}", col);
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{:>2} ", row);
        for col in 0..cols {
            let view = session.cell_view((row, col)).unwrap_or(CellView::Hidden);
            let _ = write!(out, " {}", cell_char(view));
        }
        out.push('\n');
    }
    out
}

pub fn mode_label(mode: ClickMode) -> &'static str {
    match mode {
        ClickMode::Reveal => "REVEAL",
        ClickMode::Flag => "FLAG",
    }
}

/// Prompt shown before each command.
pub fn status(session: &GameSession, mode: ClickMode) -> String {
    format!(
        "[{} | {}s | flags left {}] > ",
        mode_label(mode),
        session.elapsed_secs(),
        session.remaining_flags()
    )
}

/// Closing message once a reveal ended the game, `None` while it goes on.
pub fn ending(result: &RevealResult) -> Option<String> {
    match result.outcome {
        Outcome::InProgress => None,
        Outcome::Lost => Some("You hit a mine. Game over.".to_string()),
        Outcome::Won => {
            let mut message = String::from("You found every safe cell!");
            if let Some(win) = &result.win {
                let _ = write!(message, " Time: {}s.", win.time);
                if win.new_record {
                    message.push_str(" New best time!");
                } else if let Some(best) = win.previous_best {
                    let _ = write!(message, " Best time: {best}s.");
                }
                if let Some(err) = &win.persist_error {
                    let _ = write!(message, "\n(best time could not be saved: {err})");
                }
            }
            Some(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sapper_core::{Board, MemoryRecordStore};

    use super::*;

    fn session(mines: &[(u8, u8)], best: Option<u32>) -> GameSession {
        let board = Board::from_mine_coords((3, 3), mines).unwrap();
        GameSession::new(board, Arc::new(MemoryRecordStore::new(best)))
    }

    #[test]
    fn renders_hidden_open_and_flagged_cells() {
        let mut game = session(&[(0, 0)], None);
        game.reveal((1, 1)).unwrap();
        game.toggle_flag((0, 0)).unwrap();

        let text = board(&game);

        assert_eq!(text, "    0 1 2\n 0  F . .\n 1  . 1 .\n 2  . . .\n");
    }

    #[test]
    fn renders_mines_after_loss() {
        let mut game = session(&[(0, 0), (2, 2)], None);
        game.reveal((2, 2)).unwrap();

        let text = board(&game);

        assert!(text.contains(" 0  * . ."));
        assert!(text.contains(" 2  . . X"));
    }

    #[test]
    fn status_shows_mode_time_and_flags() {
        let mut game = session(&[(0, 0)], None);
        game.tick();
        game.toggle_flag((2, 2)).unwrap();
        game.toggle_flag((2, 1)).unwrap();

        assert_eq!(status(&game, ClickMode::Flag), "[FLAG | 1s | flags left -1] > ");
    }

    #[test]
    fn ending_reports_record() {
        let mut game = session(&[(0, 0)], Some(50));
        assert!(ending(&game.reveal((1, 1)).unwrap()).is_none());

        // the zero corner floods the rest of the board
        let last = game.reveal((2, 2)).unwrap();

        let message = ending(&last).unwrap();
        assert!(message.contains("Time: 0s."), "{message}");
        assert!(message.contains("New best time!"), "{message}");
    }

    #[test]
    fn ending_reports_loss() {
        let mut game = session(&[(0, 0)], None);

        let message = ending(&game.reveal((0, 0)).unwrap()).unwrap();

        assert!(message.contains("mine"));
    }
}
