#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use field::*;
pub use flood::*;
pub use generator::*;
pub use types::*;

mod cell;
mod error;
mod field;
mod flood;
mod generator;
mod types;

/// Size and mine count of a new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameSettings {
    pub const MIN_SIDE: Coord = 3;
    pub const MAX_SIDE: Coord = 26;

    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let settings = Self::new_unchecked(width, height, mines);
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings such as `{"width": 9, "height": 9, "mines": 10}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected game settings: {err}");
            GameError::MalformedSettings
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let sides = Self::MIN_SIDE..=Self::MAX_SIDE;
        if !sides.contains(&self.width) || !sides.contains(&self.height) {
            return Err(GameError::InvalidSize);
        }

        if self.mines == 0 {
            return Err(GameError::TooFewMines);
        }

        if self.mines > self.total_cells() {
            return Err(GameError::TooManyMines);
        }

        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }
}
