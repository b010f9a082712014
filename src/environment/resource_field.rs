//! The shared resource field agents forage from
//!
//! Levels are unsigned, so the "never below zero" invariant is structural;
//! `consume` additionally caps every withdrawal at what the cell holds.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::spatial::Grid;

/// Aggregate numbers over the whole field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentStats {
    pub total_resources: u64,
}

/// Fixed-size grid of resource levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceField {
    grid: Grid<u32>,
}

impl ResourceField {
    /// Every cell uniformly in `0..=max_level`
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        max_level: u32,
        rng: &mut R,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut grid = Grid::new(width, height);
        for cell in grid.iter_mut() {
            *cell = rng.gen_range(0..=max_level);
        }
        Ok(Self { grid })
    }

    /// Every cell at the same level
    pub fn uniform(width: usize, height: usize, level: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            grid: Grid::filled(width, height, level),
        })
    }

    /// Caller-supplied field, indexed `columns[x][y]`
    pub fn from_columns(columns: Vec<Vec<u32>>) -> Result<Self> {
        let grid = Grid::from_columns(columns).ok_or_else(|| {
            SimError::InvalidConfig("resource field must be non-empty and rectangular".into())
        })?;
        Ok(Self { grid })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub(crate) fn grid(&self) -> &Grid<u32> {
        &self.grid
    }

    /// Resource level at a cell; 0 outside the grid
    pub fn get_resource(&self, x: usize, y: usize) -> u32 {
        self.try_get_resource(x, y).unwrap_or(0)
    }

    pub fn try_get_resource(&self, x: usize, y: usize) -> Option<u32> {
        self.grid.get(x, y).copied()
    }

    /// Take up to `preferred_amount`, never more than the cell holds.
    ///
    /// Returns the amount actually removed.
    pub fn consume(&mut self, x: usize, y: usize, preferred_amount: u32) -> u32 {
        match self.grid.get_mut(x, y) {
            Some(level) => {
                let taken = (*level).min(preferred_amount);
                *level -= taken;
                taken
            }
            None => 0,
        }
    }

    /// Overwrite a cell (editing hook for the presentation shell)
    pub fn set_resource(&mut self, x: usize, y: usize, level: u32) -> Result<()> {
        if self.grid.set(x, y, level) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    /// Per-frame physics hook. Resources do not regrow yet.
    pub fn step(&mut self) {}

    /// Recomputed on every call
    pub fn get_stats(&self) -> EnvironmentStats {
        EnvironmentStats {
            total_resources: self.grid.iter().map(|&level| level as u64).sum(),
        }
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SimError::InvalidConfig(format!(
            "resource field must be non-empty, got {width}x{height}"
        )));
    }
    Ok(())
}
