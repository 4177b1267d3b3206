use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Lost,
    Won,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Read-only access for consumers of a field, such as a renderer.
pub trait FieldView: Measurable {
    fn cell(&self, point: Point) -> Cell;
    fn state(&self) -> GameState;
}

/// Game field: cells stored row-major, plus the positions of every mine for revealing them all
/// at once.
///
/// Deserializing rebuilds the mine list and the open tally from the cells, so only the cells and
/// the state are taken from the input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord")]
pub struct Field {
    cells: Array2<Cell>,
    mine_indices: Vec<usize>,
    open_cells: Saturating<CellCount>,
    state: GameState,
}

impl Field {
    /// Builds a field from raw row-major markers, with every cell closed.
    pub fn from_markers(width: Coord, height: Coord, markers: Vec<Marker>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }

        if markers.iter().any(|&marker| marker > MINE_MARKER) {
            return Err(GameError::InvalidMarker);
        }

        let shape = (usize::from(height), usize::from(width));
        let cells: Vec<Cell> = markers.into_iter().map(Cell::closed).collect();
        let cells =
            Array2::from_shape_vec(shape, cells).map_err(|_| GameError::InvalidBoardShape)?;

        Ok(Self::from_cells(cells))
    }

    /// Places mines at `mine_coords` and derives the counters of every other cell.
    pub fn from_mine_coords(width: Coord, height: Coord, mine_coords: &[Point]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }

        let shape = (usize::from(height), usize::from(width));
        let mut cells = Array2::from_elem(shape, Cell::default());
        for &point in mine_coords {
            if point.x >= width || point.y >= height {
                return Err(GameError::InvalidCoords);
            }
            cells[point.to_nd_index()] = Cell::mine();
        }

        count_adjacent_mines(&mut cells);
        Ok(Self::from_cells(cells))
    }

    pub(crate) fn from_cells(cells: Array2<Cell>) -> Self {
        let mine_indices = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(index, _)| index)
            .collect();

        Self {
            cells,
            mine_indices,
            open_cells: Saturating(0),
            state: Default::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn cell(&self, point: Point) -> Cell {
        self.cells[point.to_nd_index()]
    }

    /// Number of open cells, not counting revealed mines.
    pub fn open_cells(&self) -> CellCount {
        self.open_cells.0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_indices.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count()
    }

    pub fn mines(&self) -> impl Iterator<Item = Point> + '_ {
        let width = self.width();
        self.mine_indices
            .iter()
            .map(move |&index| Point::from_flat_index(index, width))
    }

    pub fn validate_coords(&self, point: Point) -> Result<Point> {
        if point.x < self.width() && point.y < self.height() {
            Ok(point)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Plays one turn at `point` and returns the resulting game state.
    ///
    /// A mine loses the game, a counted cell opens alone, and a free cell opens its whole region
    /// with its border. Opening the last safe cell wins. Either ending reveals all mines.
    pub fn open_cell(&mut self, point: Point) -> Result<GameState> {
        let point = self.validate_coords(point)?;
        self.check_not_finished()?;

        let cell = self.cell(point);
        if cell.is_open() {
            return Ok(self.state);
        }

        if cell.is_mine() {
            log::debug!("Mine hit at {point:?}");
            self.reveal_mines();
            self.state = GameState::Lost;
            return Ok(self.state);
        }

        if cell.is_bordering() {
            self.fill(point);
        } else {
            let outcome = flood_fill(point, self);
            debug_assert_eq!(outcome, FillOutcome::Finished);
        }

        if self.open_cells() >= self.safe_cell_count() {
            log::debug!("All {} safe cells open", self.open_cells());
            self.state = GameState::Won;
            self.reveal_mines();
        }

        Ok(self.state)
    }

    fn reveal_mines(&mut self) {
        let cells = self
            .cells
            .as_slice_mut()
            .expect("cells should be in standard layout");
        for &index in &self.mine_indices {
            cells[index].open();
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn neighbors(&self, point: Point) -> NeighborIter {
        self.cells.iter_neighbors(point)
    }
}

/// Serialized shape of a [`Field`]; anything derived from the cells is recomputed.
#[derive(Deserialize)]
struct FieldRecord {
    cells: Array2<Cell>,
    #[serde(default)]
    state: GameState,
}

impl TryFrom<FieldRecord> for Field {
    type Error = GameError;

    fn try_from(record: FieldRecord) -> Result<Self> {
        let (rows, cols) = record.cells.dim();
        let max_side = usize::from(Coord::MAX);
        if rows == 0 || cols == 0 || rows > max_side || cols > max_side {
            return Err(GameError::InvalidSize);
        }

        if record.cells.iter().any(|cell| cell.marker > MINE_MARKER) {
            return Err(GameError::InvalidMarker);
        }

        let cells = record.cells.as_standard_layout().into_owned();
        let open_cells = cells
            .iter()
            .filter(|cell| cell.is_open() && !cell.is_mine())
            .count();

        let mut field = Self::from_cells(cells);
        field.open_cells = Saturating(open_cells.try_into().unwrap_or(CellCount::MAX));
        field.state = record.state;
        Ok(field)
    }
}

/// Sets the counter of every non-mine cell to the number of mines around it.
pub(crate) fn count_adjacent_mines(cells: &mut Array2<Cell>) {
    let (height, width) = cells.dim();
    let (width, height): (Coord, Coord) = (
        width.try_into().unwrap_or(Coord::MAX),
        height.try_into().unwrap_or(Coord::MAX),
    );

    for y in 0..height {
        for x in 0..width {
            let point = Point::new(x, y);
            if !cells[point.to_nd_index()].is_mine() {
                continue;
            }
            for neighbor in cells.iter_neighbors(point) {
                let cell = &mut cells[neighbor.to_nd_index()];
                if !cell.is_mine() {
                    cell.marker += 1;
                }
            }
        }
    }
}

impl Measurable for Field {
    fn width(&self) -> Coord {
        self.cells.ncols().try_into().unwrap_or(Coord::MAX)
    }

    fn height(&self) -> Coord {
        self.cells.nrows().try_into().unwrap_or(Coord::MAX)
    }
}

impl FloodableField for Field {
    fn is_fillable(&self, point: Point, is_first_cell: bool) -> bool {
        let cell = self.cell(point);
        if cell.is_open() || cell.is_mine() {
            return false;
        }

        // only the first cell of a session may claim a free region on its own, otherwise a free
        // cell next to an already revealed border would start a second region
        if cell.is_free() && is_first_cell {
            return true;
        }

        // a border touching two regions must only open from the one being revealed
        self.neighbors(point).any(|neighbor| {
            let neighbor = self.cell(neighbor);
            neighbor.is_free() && neighbor.is_open()
        })
    }

    fn fill(&mut self, point: Point) {
        self.cells[point.to_nd_index()].open();
        self.open_cells += 1;
    }
}

impl FieldView for Field {
    fn cell(&self, point: Point) -> Cell {
        Field::cell(self, point)
    }

    fn state(&self) -> GameState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn field(width: Coord, height: Coord, mines: &[(Coord, Coord)]) -> Field {
        let mines: Vec<_> = mines.iter().copied().map(Point::from).collect();
        Field::from_mine_coords(width, height, &mines).unwrap()
    }

    fn markers(field: &Field) -> Vec<Marker> {
        field.cells.iter().map(|cell| cell.marker).collect()
    }

    #[test]
    fn from_mine_coords_counts_neighbors() {
        let field = field(3, 3, &[(0, 0), (2, 1)]);

        #[rustfmt::skip]
        let expected = [
            MINE_MARKER, 2, 1,
            1, 2, MINE_MARKER,
            0, 1, 1,
        ];
        assert_eq!(markers(&field), expected);
        assert_eq!(field.mines().collect::<Vec<_>>(), [Point::new(0, 0), Point::new(2, 1)]);
        assert_eq!(field.safe_cell_count(), 7);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds_mine() {
        assert_eq!(
            Field::from_mine_coords(3, 3, &[Point::new(3, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn from_markers_rejects_bad_input() {
        assert_eq!(Field::from_markers(2, 2, vec![0; 3]), Err(GameError::InvalidBoardShape));
        assert_eq!(Field::from_markers(0, 2, vec![]), Err(GameError::InvalidSize));
        assert_eq!(
            Field::from_markers(2, 1, vec![0, MINE_MARKER + 1]),
            Err(GameError::InvalidMarker)
        );
    }

    #[test]
    fn first_cell_exemption_applies_to_free_cells_only() {
        let field = field(3, 1, &[(2, 0)]);

        assert!(field.is_fillable(Point::new(0, 0), true));
        assert!(!field.is_fillable(Point::new(0, 0), false));
        assert!(!field.is_fillable(Point::new(1, 0), true));
        assert!(!field.is_fillable(Point::new(2, 0), true));
    }

    #[test]
    fn counted_cell_needs_an_open_free_neighbor() {
        let mut field = field(4, 1, &[(3, 0)]);
        assert!(!field.is_fillable(Point::new(2, 0), false));

        field.fill(Point::new(1, 0));

        assert!(field.is_fillable(Point::new(2, 0), false));
        assert!(field.is_fillable(Point::new(0, 0), false));
        assert!(!field.is_fillable(Point::new(1, 0), true));
    }

    #[test]
    fn open_counted_cell_opens_only_that_cell() {
        let mut field = field(3, 3, &[(0, 0)]);

        assert!(field.cell(Point::new(1, 1)).is_bordering());
        assert_eq!(field.open_cell(Point::new(1, 1)), Ok(GameState::InProgress));
        assert_eq!(field.open_cells(), 1);
        assert!(field.cell(Point::new(1, 1)).is_open());
        assert!(!field.cell(Point::new(2, 2)).is_open());
    }

    #[test]
    fn open_free_cell_floods_and_wins() {
        let mut field = field(3, 3, &[(2, 2)]);

        assert_eq!(field.open_cell(Point::new(0, 0)), Ok(GameState::Won));
        assert_eq!(field.open_cells(), 8);
        assert!(field.cell(Point::new(2, 2)).is_open());
    }

    #[test]
    fn open_mine_loses_and_reveals_every_mine() {
        let mut field = field(4, 4, &[(0, 0), (3, 3), (1, 2)]);

        assert_eq!(field.open_cell(Point::new(3, 3)), Ok(GameState::Lost));
        assert!(field.mines().all(|mine| field.cell(mine).is_open()));
        assert_eq!(field.open_cells(), 0);
        assert_eq!(field.open_cell(Point::new(2, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn open_partial_region_keeps_game_going() {
        let mut field = field(5, 1, &[(2, 0)]);

        assert_eq!(field.open_cell(Point::new(0, 0)), Ok(GameState::InProgress));
        assert_eq!(field.open_cells(), 2);
        assert!(!field.cell(Point::new(3, 0)).is_open());

        assert_eq!(field.open_cell(Point::new(0, 0)), Ok(GameState::InProgress));
        assert_eq!(field.open_cells(), 2);

        assert_eq!(field.open_cell(Point::new(4, 0)), Ok(GameState::Won));
        assert_eq!(field.state(), GameState::Won);
    }

    #[test]
    fn open_cell_rejects_out_of_bounds() {
        let mut field = field(3, 3, &[(0, 0)]);

        assert_eq!(field.open_cell(Point::new(3, 1)), Err(GameError::InvalidCoords));
        assert_eq!(field.open_cell(Point::new(1, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn deserialize_recomputes_derived_state() {
        let mut field = field(4, 1, &[(3, 0)]);
        field.open_cell(Point::new(0, 0)).unwrap();
        assert_eq!(field.open_cells(), 3);

        let mut json = serde_json::to_value(&field).unwrap();
        json["mine_indices"] = serde_json::Value::from(vec![0, 1]);
        json["open_cells"] = serde_json::Value::from(0);

        let restored: Field = serde_json::from_value(json).unwrap();
        assert_eq!(restored, field);
        assert_eq!(restored.mines().collect::<Vec<_>>(), [Point::new(3, 0)]);
        assert_eq!(restored.open_cells(), 3);
    }

    #[test]
    fn deserialize_rejects_empty_and_bad_cells() {
        let field = field(2, 1, &[(0, 0)]);
        let json = serde_json::to_value(&field).unwrap();

        let mut empty = json.clone();
        empty["cells"]["dim"] = serde_json::Value::from(vec![0, 0]);
        empty["cells"]["data"] = serde_json::Value::Array(Vec::new());
        assert!(serde_json::from_value::<Field>(empty).is_err());

        let mut bad_marker = json;
        bad_marker["cells"]["data"][1]["marker"] = serde_json::Value::from(MINE_MARKER + 1);
        assert!(serde_json::from_value::<Field>(bad_marker).is_err());
    }

    #[test]
    fn view_reports_cells_and_state() {
        let mut field = field(2, 1, &[(0, 0)]);
        field.open_cell(Point::new(1, 0)).unwrap();

        let view: &dyn FieldView = &field;
        assert_eq!((view.width(), view.height()), (2, 1));
        assert_eq!(view.state(), GameState::Won);
        assert_eq!(view.cell(Point::new(1, 0)).marker, 1);
    }
}
