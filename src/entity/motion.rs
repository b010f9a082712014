//! Dual clock: continuous visual motion vs. discrete logic ticks
//!
//! Every frame the visual position eases toward the center of the agent's
//! logical cell and the think timer advances. A logic tick fires only when
//! the agent has visually arrived AND its timer has elapsed, so a cell move
//! is always completed on screen before the next decision is taken.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::entity::agent::{cell_center, Agent};

/// Where an agent is in its motion/logic cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPhase {
    /// On the cell center, waiting for the think timer
    #[default]
    Idle,
    /// Still easing toward the cell center
    Arriving,
    /// Fired a logic tick this frame
    TickReady,
}

/// World-level constants the motion update needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub cell_dim: f32,
    pub arrival_tolerance: f32,
    pub road_speed_bonus: f32,
}

impl MotionParams {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            cell_dim: config.world.cell_dim,
            arrival_tolerance: config.behavior.arrival_tolerance,
            road_speed_bonus: config.behavior.road_speed_bonus,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl Agent {
    /// Advance the visual clock by `delta_time` seconds.
    ///
    /// `road_quality` is the pathing value (0..=1) of the target cell.
    /// Returns true when a logic tick fired; the agent is then exactly on
    /// its cell center, its timer is reset and its age has gone up by one.
    pub fn update(&mut self, delta_time: f32, road_quality: f32, params: &MotionParams) -> bool {
        let target = cell_center(self.cell(), params.cell_dim);

        let speed = (self.move_speed + road_quality.clamp(0.0, 1.0) * params.road_speed_bonus)
            .clamp(0.0, 1.0);
        self.position = self.position.lerp(&target, speed);
        self.time_since_think += delta_time;

        // Per-axis check absorbs the float residue lerp never quite closes
        let arrived = (self.position.x - target.x).abs() < params.arrival_tolerance
            && (self.position.y - target.y).abs() < params.arrival_tolerance;

        if arrived && self.time_since_think >= self.think_delay {
            self.position = target;
            self.time_since_think = 0.0;
            self.age += 1;
            self.motion = MotionPhase::TickReady;
            return true;
        }

        self.motion = if arrived {
            MotionPhase::Idle
        } else {
            MotionPhase::Arriving
        };
        false
    }
}
