//! Agent data: identity, lifecycle, inventory, per-agent constants

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PopulationConfig;
use crate::core::types::{AgentId, GridPos, SettlementId, Vec2};
use crate::entity::motion::MotionPhase;

/// Behavioral state. Transitions only move forward:
/// Forager -> Pioneer -> Resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    /// Harvests opportunistically, looks for a settlement site
    Forager,
    /// Travelling to a surveyed resource centroid
    Pioneer { target: GridPos },
    /// Bound to a settlement it feeds
    Resident { home: SettlementId },
}

/// Payload-free view of [`AgentState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentRole {
    Forager,
    Pioneer,
    Resident,
}

impl AgentState {
    pub fn role(&self) -> AgentRole {
        match self {
            AgentState::Forager => AgentRole::Forager,
            AgentState::Pioneer { .. } => AgentRole::Pioneer,
            AgentState::Resident { .. } => AgentRole::Resident,
        }
    }

    pub fn target_centroid(&self) -> Option<GridPos> {
        match self {
            AgentState::Pioneer { target } => Some(*target),
            _ => None,
        }
    }

    pub fn home(&self) -> Option<SettlementId> {
        match self {
            AgentState::Resident { home } => Some(*home),
            _ => None,
        }
    }
}

/// Per-agent constants fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentTraits {
    pub max_age: u32,
    pub inventory_cap: u32,
    pub gather_rate: u32,
    pub move_speed: f32,
    pub think_delay: f32,
}

impl AgentTraits {
    /// Draw a fresh set of traits from the configured ranges
    pub fn roll<R: Rng + ?Sized>(config: &PopulationConfig, rng: &mut R) -> Self {
        Self {
            max_age: rng.gen_range(config.max_age_min..=config.max_age_max),
            inventory_cap: config.inventory_cap,
            gather_rate: rng.gen_range(config.gather_rate_min..=config.gather_rate_max),
            move_speed: rng.gen_range(config.move_speed_min..config.move_speed_max),
            think_delay: rng.gen_range(config.think_delay_min..config.think_delay_max),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Logical cell; always inside the grid
    pub grid_x: usize,
    pub grid_y: usize,
    /// Visual position in world units, only used for smooth motion
    pub position: Vec2,
    pub state: AgentState,
    pub age: u32,
    pub max_age: u32,
    pub inventory: u32,
    pub inventory_cap: u32,
    pub gather_rate: u32,
    pub move_speed: f32,
    pub think_delay: f32,
    pub time_since_think: f32,
    pub motion: MotionPhase,
}

impl Agent {
    /// New forager standing on the center of its cell
    pub fn new(id: AgentId, cell: GridPos, traits: AgentTraits, cell_dim: f32) -> Self {
        Self {
            id,
            grid_x: cell.x,
            grid_y: cell.y,
            position: cell_center(cell, cell_dim),
            state: AgentState::Forager,
            age: 0,
            max_age: traits.max_age,
            inventory: 0,
            inventory_cap: traits.inventory_cap,
            gather_rate: traits.gather_rate,
            move_speed: traits.move_speed,
            think_delay: traits.think_delay,
            time_since_think: 0.0,
            motion: MotionPhase::Idle,
        }
    }

    /// Randomized agent; the think timer starts at a random phase so
    /// agents spawned together do not tick in lockstep
    pub fn spawn<R: Rng + ?Sized>(
        id: AgentId,
        cell: GridPos,
        config: &PopulationConfig,
        cell_dim: f32,
        rng: &mut R,
    ) -> Self {
        let traits = AgentTraits::roll(config, rng);
        let mut agent = Self::new(id, cell, traits, cell_dim);
        if traits.think_delay > 0.0 {
            agent.time_since_think = rng.gen_range(0.0..traits.think_delay);
        }
        agent
    }

    pub fn cell(&self) -> GridPos {
        GridPos::new(self.grid_x, self.grid_y)
    }

    pub fn role(&self) -> AgentRole {
        self.state.role()
    }

    pub fn is_expired(&self) -> bool {
        self.age > self.max_age
    }

    pub fn is_full(&self) -> bool {
        self.inventory >= self.inventory_cap
    }

    /// Space left before the inventory cap
    pub fn room(&self) -> u32 {
        self.inventory_cap.saturating_sub(self.inventory)
    }

    /// Hand over the whole inventory
    pub fn take_inventory(&mut self) -> u32 {
        std::mem::take(&mut self.inventory)
    }
}

/// World-space center of a cell
pub fn cell_center(cell: GridPos, cell_dim: f32) -> Vec2 {
    Vec2::new(
        (cell.x as f32 + 0.5) * cell_dim,
        (cell.y as f32 + 0.5) * cell_dim,
    )
}
