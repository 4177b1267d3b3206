use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;
use crate::field::count_adjacent_mines;

/// Generation strategy that lays all mines at the front of the flat cell sequence and shuffles
/// it, so every arrangement is equally likely for a given mine count.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledFieldGenerator {
    seed: u64,
}

impl ShuffledFieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl FieldGenerator for ShuffledFieldGenerator {
    fn generate(self, settings: GameSettings) -> Result<Field> {
        if settings.width == 0 || settings.height == 0 {
            return Err(GameError::InvalidSize);
        }
        let total_cells = settings.total_cells();
        if settings.mines > total_cells {
            return Err(GameError::TooManyMines);
        }

        let mines = settings.mines as usize;
        let mut cells: Vec<Cell> = (0..total_cells as usize)
            .map(|index| if index < mines { Cell::mine() } else { Cell::default() })
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        cells.shuffle(&mut rng);

        let shape = (usize::from(settings.height), usize::from(settings.width));
        let mut cells =
            Array2::from_shape_vec(shape, cells).map_err(|_| GameError::InvalidBoardShape)?;
        count_adjacent_mines(&mut cells);

        let field = Field::from_cells(cells);
        if field.mine_count() != settings.mines {
            log::warn!(
                "Generated field count mismatch, actual: {}, requested: {}",
                field.mine_count(),
                settings.mines
            );
        }
        log::debug!(
            "Generated {}x{} field with {} mines",
            settings.width,
            settings.height,
            field.mine_count()
        );
        Ok(field)
    }
}
