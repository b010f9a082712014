//! Frame loop - advances the environment, every agent, and analytics
//!
//! One frame: environment hook, road decay, motion update for every agent
//! (state machine on the agents whose logic tick fired), compaction of dead
//! agents, then the periodic analytics snapshot.

use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::simulation::analytics::AnalyticsSnapshot;
use crate::simulation::events::SimulationEvent;
use crate::simulation::transitions::Economy;
use crate::simulation::world::Simulation;

impl Simulation {
    /// Advance one frame of `delta_time` seconds.
    ///
    /// Returns the economy events that happened during the frame.
    pub fn advance_frame(&mut self, delta_time: f32) -> Result<Vec<SimulationEvent>> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(SimError::InvalidDelta(delta_time));
        }

        self.environment.step();
        self.pathing.decay(self.config.roads.decay);

        let mut events = Vec::new();
        let mut economy = Economy {
            environment: &mut self.environment,
            settlements: &mut self.settlements,
            behavior: &self.config.behavior,
            tick: self.frame,
        };

        for agent in self.agents.iter_mut() {
            let road = self.pathing.quality(agent.grid_x, agent.grid_y);
            if !agent.update(delta_time, road, &self.motion) {
                continue;
            }

            if let Some(event) = economy.apply(agent, &mut self.rng) {
                events.push(event);
            }
            if !agent.is_expired() {
                self.pathing
                    .reinforce(agent.grid_x, agent.grid_y, self.config.roads.reinforce);
            }
        }

        // Mark-and-compact: expiry is only ever detected on a fired tick
        self.agents.retain(|agent| !agent.is_expired());

        self.collect_analytics();
        Ok(events)
    }

    /// Advance `frames` frames of equal length, collecting all events
    pub fn run(&mut self, frames: u64, delta_time: f32) -> Result<Vec<SimulationEvent>> {
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(self.advance_frame(delta_time)?);
        }
        Ok(events)
    }

    /// Current analytics numbers, without recording them
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot::from_tallies(
            self.frame,
            self.environment.get_stats().total_resources,
            self.stockpiled_food(),
            self.settlements.len(),
            self.agents.iter().map(|agent| agent.age),
        )
    }

    fn collect_analytics(&mut self) {
        if self.frame % self.config.analytics.snapshot_interval == 0 {
            let snapshot = self.snapshot();
            tracing::trace!(
                tick = snapshot.tick,
                total_food = snapshot.total_food,
                population = snapshot.population,
                settlements = snapshot.settlements,
                "Analytics snapshot"
            );
            self.history.record(snapshot);
        }
        self.frame += 1;
    }

    /// Shutdown hook: write the analytics history as CSV.
    ///
    /// Returns false when there was nothing to write.
    pub fn shutdown(&self, path: &Path) -> Result<bool> {
        let written = self.history.save_csv(path)?;
        if written {
            tracing::info!(
                path = %path.display(),
                rows = self.history.len(),
                "Analytics saved"
            );
        } else {
            tracing::warn!("No analytics recorded; nothing saved");
        }
        Ok(written)
    }

    pub fn summary(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "{} frames, {} agents alive, {} settlements\n\
             food: {} total ({} on the ground, {} stockpiled), avg age {}",
            self.frame,
            snapshot.population,
            snapshot.settlements,
            snapshot.total_food,
            snapshot.ground_food,
            snapshot.stockpiled_food(),
            snapshot.avg_age,
        )
    }
}
