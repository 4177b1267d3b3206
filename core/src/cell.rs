use serde::{Deserialize, Serialize};

/// Adjacent-mine counter of a cell, or [`MINE_MARKER`] for the mine itself.
pub type Marker = u16;

/// Reserved marker value, out of range for any real count, denoting a mine.
pub const MINE_MARKER: Marker = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Closed,
    Open,
}

impl Default for CellState {
    fn default() -> Self {
        Self::Closed
    }
}

/// One grid cell. Once open it stays open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub state: CellState,
    pub marker: Marker,
}

impl Cell {
    pub const fn closed(marker: Marker) -> Self {
        Self {
            state: CellState::Closed,
            marker,
        }
    }

    pub const fn mine() -> Self {
        Self::closed(MINE_MARKER)
    }

    pub const fn is_open(self) -> bool {
        matches!(self.state, CellState::Open)
    }

    pub const fn is_mine(self) -> bool {
        self.marker == MINE_MARKER
    }

    /// Clear free cell: no adjacent mines.
    pub const fn is_free(self) -> bool {
        self.marker == 0
    }

    pub const fn is_bordering(self) -> bool {
        self.marker > 0 && self.marker < MINE_MARKER
    }

    pub(crate) fn open(&mut self) {
        self.state = CellState::Open;
    }
}
