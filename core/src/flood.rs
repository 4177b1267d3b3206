use alloc::vec::Vec;

use crate::*;

/// Fixed dimensions of a field.
pub trait Measurable {
    fn width(&self) -> Coord;
    fn height(&self) -> Coord;
}

/// A field the scan-line fill can walk.
///
/// `is_fillable` decides whether a cell belongs to the reveal in progress and `fill` applies it,
/// so the fill itself stays agnostic of what a cell holds. Coordinates are always in bounds.
pub trait FloodableField: Measurable {
    fn is_fillable(&self, point: Point, is_first_cell: bool) -> bool;
    fn fill(&mut self, point: Point);
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillOutcome {
    Finished,
    NothingToFill,
}

/// Opens the region around `seed` with a non-recursive stack-based scan-line fill.
///
/// Returns [`FillOutcome::NothingToFill`] without touching the field when the seed itself does
/// not qualify. The seed must be within the field bounds.
pub fn flood_fill<F: FloodableField + ?Sized>(seed: Point, field: &mut F) -> FillOutcome {
    debug_assert!(
        seed.x < field.width() && seed.y < field.height(),
        "seed {seed:?} out of bounds"
    );

    let mut session = FillSession::new(field);
    if !session.is_fillable(seed.x, seed.y) {
        log::trace!("flood fill at {seed:?}: nothing to fill");
        return FillOutcome::NothingToFill;
    }

    session.stack.push(seed);
    while let Some(point) = session.stack.pop() {
        session.scan_line(point);
    }

    log::debug!("flood fill at {seed:?}: filled {} cells", session.filled);
    FillOutcome::Finished
}

/// Tracks whether a run of qualifying cells on a neighbouring row already has a pending entry.
#[derive(Default)]
struct Span {
    open: bool,
}

impl Span {
    /// Returns `point` when it starts a new run and must be pushed.
    fn track(&mut self, fillable: bool, point: Point) -> Option<Point> {
        if fillable && !self.open {
            self.open = true;
            Some(point)
        } else {
            if !fillable {
                self.open = false;
            }
            None
        }
    }
}

struct FillSession<'f, F: ?Sized> {
    field: &'f mut F,
    width: Coord,
    height: Coord,
    stack: Vec<Point>,
    is_first_cell: bool,
    filled: CellCount,
}

impl<'f, F: FloodableField + ?Sized> FillSession<'f, F> {
    fn new(field: &'f mut F) -> Self {
        Self {
            width: field.width(),
            height: field.height(),
            field,
            stack: Vec::new(),
            is_first_cell: true,
            filled: 0,
        }
    }

    fn is_fillable(&self, x: Coord, y: Coord) -> bool {
        self.field.is_fillable(Point::new(x, y), self.is_first_cell)
    }

    fn scan_line(&mut self, Point { x, y }: Point) {
        // a stale entry was opened after being pushed, its right neighbour may still be pending
        let start = if self.is_fillable(x, y) {
            let mut start = x;
            while start > 0 && self.is_fillable(start - 1, y) {
                start -= 1;
            }
            start
        } else {
            x + 1
        };

        let mut above = Span::default();
        let mut below = Span::default();

        // rows above and below are checked one column behind the fill, so a diagonal neighbour is
        // only judged once both cells of the row touching it are open
        let mut dx = start;
        while dx < self.width && self.is_fillable(dx, y) {
            self.field.fill(Point::new(dx, y));
            self.is_first_cell = false;
            self.filled += 1;

            if dx > 0 {
                self.scan_neighbor_rows(dx - 1, y, &mut above, &mut below);
            }
            dx += 1;
        }

        if dx == start {
            return;
        }

        self.scan_neighbor_rows(dx - 1, y, &mut above, &mut below);
        if dx < self.width {
            self.scan_neighbor_rows(dx, y, &mut above, &mut below);
        }

        // the left walk ran before anything on this row was open
        if start > 0 && self.is_fillable(start - 1, y) {
            self.stack.push(Point::new(start - 1, y));
        }
    }

    fn scan_neighbor_rows(&mut self, x: Coord, y: Coord, above: &mut Span, below: &mut Span) {
        if y > 0 {
            let fillable = self.is_fillable(x, y - 1);
            if let Some(point) = above.track(fillable, Point::new(x, y - 1)) {
                self.stack.push(point);
            }
        }

        if y + 1 < self.height {
            let fillable = self.is_fillable(x, y + 1);
            if let Some(point) = below.track(fillable, Point::new(x, y + 1)) {
                self.stack.push(point);
            }
        }
    }
}
