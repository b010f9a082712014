//! Settlements founded by pioneers

use serde::{Deserialize, Serialize};

use crate::city::stockpile::Stockpile;
use crate::core::types::{AgentId, GridPos, SettlementId, Tick};

/// An accumulation point on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: SettlementId,
    pub position: GridPos,
    pub founded_tick: Tick,
    pub founder: AgentId,
    pub stockpile: Stockpile,
    pub resident_count: u32,
    /// Reserved for harvest efficiency; no rule reads it yet
    pub tech_level: f32,
    /// Reserved for resident lifespan; no rule reads it yet
    pub safety_bonus: u32,
}

impl Settlement {
    pub fn new(id: SettlementId, position: GridPos, founder: AgentId, founded_tick: Tick) -> Self {
        Self {
            id,
            position,
            founded_tick,
            founder,
            stockpile: Stockpile::new(),
            resident_count: 0,
            tech_level: 1.0,
            safety_bonus: 0,
        }
    }

    pub fn deposit(&mut self, amount: u32) -> u64 {
        self.stockpile.deposit(amount)
    }

    pub fn add_resident(&mut self) {
        self.resident_count += 1;
    }

    pub fn stockpile_amount(&self) -> u64 {
        self.stockpile.amount()
    }
}
