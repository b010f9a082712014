//! Generic grid for per-cell layers

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

/// Dense 2D grid, row-major storage, addressed as `(x, y)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Build from column-major input (`columns[x][y]`).
    ///
    /// Returns `None` when the input is empty or ragged.
    pub fn from_columns(columns: Vec<Vec<T>>) -> Option<Self> {
        let width = columns.len();
        let height = columns.first().map(Vec::len)?;
        if height == 0 || columns.iter().any(|c| c.len() != height) {
            return None;
        }

        let mut slots: Vec<Option<T>> = Vec::with_capacity(width * height);
        slots.resize_with(width * height, || None);
        for (x, column) in columns.into_iter().enumerate() {
            for (y, value) in column.into_iter().enumerate() {
                slots[y * width + x] = Some(value);
            }
        }
        let data = slots.into_iter().collect::<Option<Vec<T>>>()?;

        Some(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Signed-coordinate variant used by neighborhood scans
    #[inline]
    pub fn contains_signed(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if self.contains(x, y) {
            Some(&mut self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Returns false (and changes nothing) when out of range
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Clamp a signed coordinate into the grid
    pub fn clamp(&self, x: i64, y: i64) -> GridPos {
        GridPos::new(
            x.clamp(0, self.width as i64 - 1) as usize,
            y.clamp(0, self.height as i64 - 1) as usize,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}
