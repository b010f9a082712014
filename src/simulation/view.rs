//! Read-only projection of the world for a presentation layer

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, GridPos, SettlementId, Tick, Vec2};
use crate::entity::{AgentRole, MotionPhase};
use crate::simulation::world::Simulation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub cell: GridPos,
    /// Smoothed position in world units
    pub position: Vec2,
    pub role: AgentRole,
    pub target: Option<GridPos>,
    pub home: Option<SettlementId>,
    pub inventory: u32,
    pub age: u32,
    pub motion: MotionPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementView {
    pub id: SettlementId,
    pub position: GridPos,
    pub stockpile: u64,
    pub resident_count: u32,
}

/// Everything a renderer needs for one frame; detached from the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub frame: Tick,
    pub width: usize,
    pub height: usize,
    pub cell_dim: f32,
    pub agents: Vec<AgentView>,
    pub settlements: Vec<SettlementView>,
}

impl WorldView {
    /// Number of agents in each role
    pub fn role_counts(&self) -> AHashMap<AgentRole, usize> {
        let mut counts = AHashMap::new();
        for agent in &self.agents {
            *counts.entry(agent.role).or_insert(0) += 1;
        }
        counts
    }
}

impl Simulation {
    pub fn view(&self) -> WorldView {
        let agents = self
            .agents
            .iter()
            .map(|agent| AgentView {
                id: agent.id,
                cell: agent.cell(),
                position: agent.position,
                role: agent.role(),
                target: agent.state.target_centroid(),
                home: agent.state.home(),
                inventory: agent.inventory,
                age: agent.age,
                motion: agent.motion,
            })
            .collect();

        let settlements = self
            .settlements
            .iter()
            .map(|s| SettlementView {
                id: s.id,
                position: s.position,
                stockpile: s.stockpile_amount(),
                resident_count: s.resident_count,
            })
            .collect();

        WorldView {
            frame: self.frame,
            width: self.environment.width(),
            height: self.environment.height(),
            cell_dim: self.config.world.cell_dim,
            agents,
            settlements,
        }
    }
}
