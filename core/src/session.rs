use core::fmt;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::*;

/// Process-unique identity of a game, carried by timer ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// A cell shown to the player by a single reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub coords: Coord2,
    pub value: CellKind,
}

/// How a won game compared against the best time.
#[derive(Debug)]
pub struct WinReport {
    pub time: u32,
    pub previous_best: Option<u32>,
    pub new_record: bool,
    /// Set when the new record could not be persisted, it still holds for this process.
    pub persist_error: Option<PersistenceError>,
}

#[derive(Debug)]
pub struct RevealResult {
    /// Cells revealed by this call, in flood order. After a loss, every mine.
    pub cells: Vec<RevealedCell>,
    pub outcome: Outcome,
    pub win: Option<WinReport>,
}

impl RevealResult {
    fn unchanged(outcome: Outcome) -> Self {
        Self {
            cells: Vec::new(),
            outcome,
            win: None,
        }
    }

    pub fn has_update(&self) -> bool {
        !self.cells.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagResult {
    pub outcome: MarkOutcome,
    pub is_flagged: bool,
    pub remaining_flags: i32,
}

#[derive(Debug)]
pub enum ClickResult {
    Reveal(RevealResult),
    Flag(FlagResult),
}

/// State of one game from the first click to a win or a loss.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    board: Board,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    remaining_flags: i32,
    elapsed_secs: u32,
    outcome: Outcome,
    triggered_mine: Option<Coord2>,
    best_time: u32,
    records: Arc<dyn RecordStore>,
    timer: Option<SessionTimer>,
}

impl GameSession {
    pub fn new(board: Board, records: Arc<dyn RecordStore>) -> Self {
        let size = board.size();
        let best_time = records.load().unwrap_or(NO_RECORD);
        let id = SessionId::next();
        log::debug!(
            "Session {id} started on {size:?} board with {} mines, best time {best_time}",
            board.mine_count()
        );

        Self {
            id,
            remaining_flags: i32::from(board.mine_count()),
            board,
            cells: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            elapsed_secs: 0,
            outcome: Outcome::InProgress,
            triggered_mine: None,
            best_time,
            records,
            timer: None,
        }
    }

    /// Starts the one-second timer for this session, ticks are sent to `ticks`.
    ///
    /// The timer is stopped when the game is won or lost, or when the session is dropped.
    pub fn start_timer(&mut self, ticks: UnboundedSender<Tick>) {
        if self.outcome.is_finished() {
            return;
        }
        self.timer = Some(SessionTimer::start(self.id, ticks));
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Mine count minus placed flags, negative when over-flagged.
    pub fn remaining_flags(&self) -> i32 {
        self.remaining_flags
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Fastest recorded win, `None` while there is no record.
    pub fn best_time(&self) -> Option<u32> {
        (self.best_time != NO_RECORD).then_some(self.best_time)
    }

    pub fn cell_state(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.board.validate_coords(coords)?;
        let kind = self.board[coords];

        Ok(match (self.cells[coords.to_nd_index()], kind) {
            (CellState::Revealed, CellKind::Safe(count)) => CellView::Open(count),
            _ if self.triggered_mine == Some(coords) => CellView::Exploded,
            (_, CellKind::Mine) if self.outcome == Outcome::Lost => CellView::Mine,
            (CellState::Flagged, _) => CellView::Flagged,
            _ => CellView::Hidden,
        })
    }

    pub fn click(&mut self, mode: ClickMode, coords: Coord2) -> Result<ClickResult> {
        match mode {
            ClickMode::Reveal => self.reveal(coords).map(ClickResult::Reveal),
            ClickMode::Flag => self.toggle_flag(coords).map(ClickResult::Flag),
        }
    }

    /// Reveals a hidden cell, flooding through zero cells.
    ///
    /// Revealed or flagged cells, and any cell once the game has ended, are left untouched and
    /// produce an empty result. Flags reached by the flood are cleared and their cells revealed.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.board.validate_coords(coords)?;

        if self.outcome.is_finished() || self.cells[coords.to_nd_index()] != CellState::Hidden {
            return Ok(RevealResult::unchanged(self.outcome));
        }

        if self.board[coords].is_mine() {
            return Ok(self.hit_mine(coords));
        }

        let cells = self.flood_reveal(coords);
        let win = if self.revealed_count == self.board.safe_cell_count() {
            self.finish(Outcome::Won);
            Some(self.settle_record())
        } else {
            None
        };

        Ok(RevealResult {
            cells,
            outcome: self.outcome,
            win,
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        use CellState::*;

        let coords = self.board.validate_coords(coords)?;
        let state = self.cells[coords.to_nd_index()];

        let outcome = match state {
            _ if self.outcome.is_finished() => MarkOutcome::NoChange,
            Hidden => {
                self.cells[coords.to_nd_index()] = Flagged;
                self.remaining_flags -= 1;
                MarkOutcome::Changed
            }
            Flagged => {
                self.cells[coords.to_nd_index()] = Hidden;
                self.remaining_flags += 1;
                MarkOutcome::Changed
            }
            Revealed => MarkOutcome::NoChange,
        };

        Ok(FlagResult {
            outcome,
            is_flagged: self.cells[coords.to_nd_index()] == Flagged,
            remaining_flags: self.remaining_flags,
        })
    }

    /// Counts one elapsed second while the game is running.
    pub fn tick(&mut self) -> Option<u32> {
        if self.outcome.is_finished() {
            return None;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        Some(self.elapsed_secs)
    }

    /// Applies a timer tick, discarding ticks for other sessions or after the game ended.
    pub fn apply_tick(&mut self, tick: Tick) -> Option<u32> {
        if tick.session != self.id {
            log::trace!("Discarding tick for session {} in session {}", tick.session, self.id);
            return None;
        }
        self.tick()
    }

    fn hit_mine(&mut self, coords: Coord2) -> RevealResult {
        log::debug!("Session {} hit mine at {coords:?}", self.id);
        self.triggered_mine = Some(coords);
        self.finish(Outcome::Lost);

        let cells = self
            .board
            .mine_coords()
            .map(|coords| RevealedCell {
                coords,
                value: CellKind::Mine,
            })
            .collect();

        RevealResult {
            cells,
            outcome: self.outcome,
            win: None,
        }
    }

    fn flood_reveal(&mut self, start: Coord2) -> Vec<RevealedCell> {
        let mut revealed = Vec::new();
        let mut visited = HashSet::new();
        let mut frontier = VecDeque::new();
        visited.insert(start);
        frontier.push_back(start);

        while let Some(coords) = frontier.pop_front() {
            let CellKind::Safe(count) = self.board[coords] else {
                continue;
            };
            match self.cells[coords.to_nd_index()] {
                CellState::Hidden => {}
                CellState::Flagged => {
                    log::trace!("Flood clears flag at {coords:?}");
                    self.remaining_flags += 1;
                }
                CellState::Revealed => continue,
            }

            self.cells[coords.to_nd_index()] = CellState::Revealed;
            self.revealed_count += 1;
            revealed.push(RevealedCell {
                coords,
                value: CellKind::Safe(count),
            });

            if count == 0 {
                for neighbor in self.board.neighbors(coords) {
                    if visited.insert(neighbor) {
                        frontier.push_back(neighbor);
                    }
                }
            }
        }

        log::trace!("Reveal at {start:?} opened {} cells", revealed.len());
        revealed
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_finished() {
            return;
        }
        self.outcome = outcome;
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
        log::debug!(
            "Session {} ended {:?} after {}s",
            self.id,
            outcome,
            self.elapsed_secs
        );
    }

    fn settle_record(&mut self) -> WinReport {
        let time = self.elapsed_secs;
        let previous_best = self.best_time();

        if time >= self.best_time {
            return WinReport {
                time,
                previous_best,
                new_record: false,
                persist_error: None,
            };
        }

        self.best_time = time;
        let persist_error = self.records.save(time).err();
        match &persist_error {
            Some(err) => log::warn!("New best time {time}s could not be saved: {err}"),
            None => log::debug!("New best time {time}s saved"),
        }

        WinReport {
            time,
            previous_best,
            new_record: true,
            persist_error,
        }
    }
}
