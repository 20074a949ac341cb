use crate::types::Direction;
use crate::LoadError;
use serde::{Deserialize, Serialize};

/// Dense row-major 2-D grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Builds a grid from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, LoadError> {
        let cols = rows.first().map_or(0, Vec::len);
        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * cols);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(LoadError::InvalidData(format!(
                    "Ragged grid: row {r} has {} cells, expected {cols}",
                    row.len()
                )));
            }
            data.extend(row);
        }
        Ok(Self {
            rows: num_rows,
            cols,
            data,
        })
    }

    /// Copy of the grid with each row reversed.
    pub fn mirrored(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks(self.cols.max(1)) {
            data.extend(row.iter().rev().cloned());
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a grid with every cell set to `T::default()`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

impl<T> Grid<T> {
    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.index(row, col).and_then(|idx| self.data.get(idx))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.index(row, col).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Writes `value` at `(row, col)`. Returns `false` when out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        match self.get_mut(row, col) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Grid of the same shape with `f` applied to every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Like [`Grid::map`], stopping at the first error.
    pub fn try_map<U, E>(&self, f: impl FnMut(&T) -> Result<U, E>) -> Result<Grid<U>, E> {
        Ok(Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect::<Result<_, E>>()?,
        })
    }

    /// Coordinates of the neighbor of `(row, col)` in `direction`, if inside the grid.
    pub fn neighbor(&self, row: usize, col: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = direction.offset();
        let nr = row.checked_add_signed(dr)?;
        let nc = col.checked_add_signed(dc)?;
        (nr < self.rows && nc < self.cols).then_some((nr, nc))
    }

    /// Value of the neighbor of `(row, col)` in `direction`, if inside the grid.
    pub fn neighbor_value(&self, row: usize, col: usize, direction: Direction) -> Option<&T> {
        self.neighbor(row, col, direction)
            .and_then(|(r, c)| self.get(r, c))
    }

    /// Iterates over the rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Iterates over `((row, col), value)` in scan order.
    pub fn iter_cells(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let cols = self.cols.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| ((i / cols, i % cols), v))
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_access_is_none() {
        let grid: Grid<u8> = Grid::new(2, 3);
        assert!(grid.get(1, 2).is_some());
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 3).is_none());
        assert_eq!(grid.neighbor(0, 0, Direction::Up), None);
        assert_eq!(grid.neighbor(0, 0, Direction::Left), None);
        assert_eq!(grid.neighbor(1, 2, Direction::DownRight), None);
        assert_eq!(grid.neighbor(0, 0, Direction::DownRight), Some((1, 1)));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let result = Grid::from_rows(vec![vec![1, 2], vec![3]]);
        match result {
            Err(LoadError::InvalidData(msg)) => assert!(msg.contains("Ragged grid"), "{msg}"),
            other => panic!("Expected InvalidData for ragged rows, got {other:?}"),
        }
    }

    #[test]
    fn mirrored_reverses_each_row() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let mirrored = grid.mirrored();
        let rows: Vec<&[i32]> = mirrored.iter_rows().collect();
        assert_eq!(rows, vec![&[3, 2, 1][..], &[6, 5, 4][..]]);
    }

    #[test]
    fn try_map_keeps_shape_and_stops_on_error() {
        let grid = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let doubled = grid.try_map(|&v| Ok::<_, ()>(v * 2)).unwrap();
        assert_eq!(doubled, grid.map(|&v| v * 2));
        assert_eq!((doubled.rows(), doubled.cols()), (2, 2));
        assert_eq!(doubled.get(1, 0), Some(&6));
        assert_eq!(grid.try_map(|&v| if v == 3 { Err(v) } else { Ok(v) }), Err(3));
    }
}
