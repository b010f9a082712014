//! Periodic economy snapshots and their export

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Tick;

/// Column order of the tabular export
pub const CSV_HEADER: [&str; 6] = [
    "tick",
    "total_food",
    "ground_food",
    "population",
    "settlements",
    "avg_age",
];

/// One row of analytics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub tick: Tick,
    /// Ground food plus everything stockpiled
    pub total_food: u64,
    pub ground_food: u64,
    pub population: usize,
    pub settlements: usize,
    /// Mean agent age, rounded to a whole number; 0 with no agents
    pub avg_age: f64,
}

impl AnalyticsSnapshot {
    /// Build a snapshot from raw tallies
    pub fn from_tallies(
        tick: Tick,
        ground_food: u64,
        stockpiled: u64,
        settlements: usize,
        ages: impl IntoIterator<Item = u32>,
    ) -> Self {
        let (population, age_sum) = ages
            .into_iter()
            .fold((0usize, 0u64), |(n, sum), age| (n + 1, sum + age as u64));
        let avg_age = if population > 0 {
            (age_sum as f64 / population as f64).round()
        } else {
            0.0
        };

        Self {
            tick,
            total_food: ground_food + stockpiled,
            ground_food,
            population,
            settlements,
            avg_age,
        }
    }

    pub fn stockpiled_food(&self) -> u64 {
        self.total_food - self.ground_food
    }

    fn write_row<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            self.tick,
            self.total_food,
            self.ground_food,
            self.population,
            self.settlements,
            self.avg_age
        )
    }
}

/// Append-only, tick-ordered snapshot log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsHistory {
    snapshots: Vec<AnalyticsSnapshot>,
}

impl AnalyticsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, snapshot: AnalyticsSnapshot) {
        debug_assert!(self.latest().map_or(true, |last| last.tick < snapshot.tick));
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&AnalyticsSnapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[AnalyticsSnapshot] {
        &self.snapshots
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalyticsSnapshot> {
        self.snapshots.iter()
    }

    /// Header plus one row per snapshot
    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", CSV_HEADER.join(","))?;
        for snapshot in &self.snapshots {
            snapshot.write_row(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write the CSV file. An empty history writes nothing and returns false.
    pub fn save_csv(&self, path: &Path) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        let file = std::fs::File::create(path)?;
        let mut out = std::io::BufWriter::new(file);
        self.write_csv(&mut out)?;
        Ok(true)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshots)?)
    }
}
