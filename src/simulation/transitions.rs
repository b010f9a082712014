//! Agent state machine, applied when an agent's logic tick fires
//!
//! Forager -> Pioneer -> Resident. Lifespan is checked first; an expired
//! agent does nothing else that tick and is compacted out by the caller.

use rand::Rng;

use crate::city::Settlement;
use crate::core::config::BehaviorConfig;
use crate::core::types::{GridPos, SettlementId, Tick};
use crate::entity::{Agent, AgentState};
use crate::environment::ResourceField;
use crate::simulation::events::SimulationEvent;

/// Mutable slice of the world an agent tick touches
pub struct Economy<'a> {
    pub environment: &'a mut ResourceField,
    pub settlements: &'a mut Vec<Settlement>,
    pub behavior: &'a BehaviorConfig,
    pub tick: Tick,
}

impl<'a> Economy<'a> {
    /// Run one logic tick for `agent`
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        agent: &mut Agent,
        rng: &mut R,
    ) -> Option<SimulationEvent> {
        if agent.is_expired() {
            tracing::debug!(
                agent = agent.id.0,
                age = agent.age,
                role = ?agent.role(),
                "Agent died of old age"
            );
            return Some(SimulationEvent::AgentDied {
                agent: agent.id,
                age: agent.age,
                role: agent.role(),
                inventory_lost: agent.inventory,
                tick: self.tick,
            });
        }

        match agent.state {
            AgentState::Forager => self.forage(agent, rng),
            AgentState::Pioneer { target } => self.pioneer(agent, target),
            AgentState::Resident { home } => self.reside(agent, home, rng),
        }
    }

    fn forage<R: Rng + ?Sized>(
        &mut self,
        agent: &mut Agent,
        rng: &mut R,
    ) -> Option<SimulationEvent> {
        agent.harvest(self.environment);

        let mut event = None;
        if agent.inventory >= self.behavior.settle_threshold {
            if let Some(target) = agent.survey_area(self.environment, self.behavior.survey_radius) {
                agent.state = AgentState::Pioneer { target };
                tracing::debug!(
                    agent = agent.id.0,
                    x = target.x,
                    y = target.y,
                    "Forager became pioneer"
                );
                event = Some(SimulationEvent::BecamePioneer {
                    agent: agent.id,
                    target,
                    tick: self.tick,
                });
            }
        }

        // Movement is independent of the settling decision
        agent.sense_and_move(self.environment, rng);
        event
    }

    fn pioneer(&mut self, agent: &mut Agent, target: GridPos) -> Option<SimulationEvent> {
        if agent.step_toward(target) {
            Some(self.found_settlement(agent, target))
        } else {
            None
        }
    }

    fn found_settlement(&mut self, agent: &mut Agent, position: GridPos) -> SimulationEvent {
        let id = SettlementId(self.settlements.len() as u32);
        let mut settlement = Settlement::new(id, position, agent.id, self.tick);

        settlement.add_resident();
        let initial_stockpile = settlement.deposit(agent.take_inventory());
        agent.state = AgentState::Resident { home: id };
        self.settlements.push(settlement);

        tracing::info!(
            settlement = id.0,
            x = position.x,
            y = position.y,
            founder = agent.id.0,
            stockpile = initial_stockpile,
            "Settlement founded"
        );

        SimulationEvent::SettlementFounded {
            settlement: id,
            founder: agent.id,
            position,
            initial_stockpile,
            tick: self.tick,
        }
    }

    fn reside<R: Rng + ?Sized>(
        &mut self,
        agent: &mut Agent,
        home: SettlementId,
        rng: &mut R,
    ) -> Option<SimulationEvent> {
        if !agent.is_full() {
            agent.harvest(self.environment);
            agent.sense_and_move(self.environment, rng);
            return None;
        }

        // Settlements are never removed, so a bound home always resolves
        let settlement = self.settlements.get_mut(home.index())?;
        if !agent.step_toward(settlement.position) {
            return None;
        }

        let amount = agent.take_inventory();
        let stockpile = settlement.deposit(amount);
        tracing::debug!(
            agent = agent.id.0,
            settlement = home.0,
            amount,
            stockpile,
            "Deposited resources"
        );
        Some(SimulationEvent::Deposited {
            agent: agent.id,
            settlement: home,
            amount,
            stockpile,
            tick: self.tick,
        })
    }
}
