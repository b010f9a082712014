//! Discrete economy events emitted by a frame

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, GridPos, SettlementId, Tick};
use crate::entity::AgentRole;

/// Events generated during a frame
///
/// Returned by [`Simulation::advance_frame`](crate::simulation::Simulation::advance_frame)
/// for display or logging by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// A forager surveyed a site and set off to settle it
    BecamePioneer {
        agent: AgentId,
        target: GridPos,
        tick: Tick,
    },
    /// A pioneer reached its target and founded a settlement
    SettlementFounded {
        settlement: SettlementId,
        founder: AgentId,
        position: GridPos,
        /// The founder's inventory, deposited on founding
        initial_stockpile: u64,
        tick: Tick,
    },
    /// A resident emptied its inventory at home
    Deposited {
        agent: AgentId,
        settlement: SettlementId,
        amount: u32,
        stockpile: u64,
        tick: Tick,
    },
    /// An agent outlived its lifespan and was removed
    AgentDied {
        agent: AgentId,
        age: u32,
        role: AgentRole,
        /// Carried food that disappears with the agent
        inventory_lost: u32,
        tick: Tick,
    },
}

impl SimulationEvent {
    pub fn tick(&self) -> Tick {
        match self {
            SimulationEvent::BecamePioneer { tick, .. }
            | SimulationEvent::SettlementFounded { tick, .. }
            | SimulationEvent::Deposited { tick, .. }
            | SimulationEvent::AgentDied { tick, .. } => *tick,
        }
    }
}
