use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for field width, height, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional position `(x, y)`, `x` being the column and `y` the row.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn from_flat_index(index: usize, width: Coord) -> Self {
        let width = width as usize;
        Self::new((index % width) as Coord, (index / width) as Coord)
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Point {
    type Output = [usize; 2];

    /// Rows come first so that the standard layout matches `y * width + x`.
    fn to_nd_index(self) -> Self::Output {
        [self.y.into(), self.x.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Neighbour iteration over a row-major grid, as used by the field and its counters.
pub trait NeighborIterExt {
    fn iter_neighbors(&self, point: Point) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, point: Point) -> NeighborIter {
        let (rows, cols) = self.dim();
        let width = cols.try_into().unwrap_or(Coord::MAX);
        let height = rows.try_into().unwrap_or(Coord::MAX);
        NeighborIter::new(point, width, height)
    }
}

/// Walks the 3x3 block around `center`, clipped to the grid, row by row and skipping `center`.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Point,
    min_x: Coord,
    max_x: Coord,
    max_y: Coord,
    cursor: Option<Point>,
}

impl NeighborIter {
    pub(crate) fn new(center: Point, width: Coord, height: Coord) -> Self {
        let min_x = center.x.saturating_sub(1);
        let min_y = center.y.saturating_sub(1);
        let max_x = center.x.saturating_add(1).min(width.saturating_sub(1));
        let max_y = center.y.saturating_add(1).min(height.saturating_sub(1));
        let cursor = (width > 0 && height > 0).then(|| Point::new(min_x, min_y));

        Self {
            center,
            min_x,
            max_x,
            max_y,
            cursor,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let point = self.cursor?;
            self.cursor = if point.x < self.max_x {
                Some(Point::new(point.x + 1, point.y))
            } else if point.y < self.max_y {
                Some(Point::new(self.min_x, point.y + 1))
            } else {
                None
            };

            if point != self.center {
                return Some(point);
            }
        }
    }
}
