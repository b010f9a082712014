//! Road layer: worn-in paths that speed up agent movement

use serde::{Deserialize, Serialize};

use crate::spatial::Grid;

/// Per-cell road quality, 0.0 = no path, 1.0 = fully established road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathingLayer {
    grid: Grid<f32>,
}

impl PathingLayer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
        }
    }

    /// Road quality at a cell; 0.0 outside the grid
    pub fn quality(&self, x: usize, y: usize) -> f32 {
        self.grid.get(x, y).copied().unwrap_or(0.0)
    }

    /// Wear the path in, saturating at 1.0
    pub fn reinforce(&mut self, x: usize, y: usize, amount: f32) {
        if let Some(q) = self.grid.get_mut(x, y) {
            *q = (*q + amount).min(1.0);
        }
    }

    /// Paths fade if not used
    pub fn decay(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        for q in self.grid.iter_mut() {
            *q = (*q - amount).max(0.0);
        }
    }
}
