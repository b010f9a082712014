//! Simulation - owns every entity collection and the shared RNG

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::city::Settlement;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{AgentId, GridPos, SettlementId, Tick};
use crate::entity::{Agent, AgentTraits, MotionParams};
use crate::environment::{PathingLayer, ResourceField};
use crate::simulation::analytics::AnalyticsHistory;

/// The agent economy: resource field, agents, settlements, analytics
pub struct Simulation {
    pub(crate) config: SimulationConfig,
    pub(crate) motion: MotionParams,
    pub(crate) environment: ResourceField,
    pub(crate) pathing: PathingLayer,
    /// Arena; order is iteration order within a frame
    pub(crate) agents: Vec<Agent>,
    /// Arena indexed by `SettlementId`; never shrinks
    pub(crate) settlements: Vec<Settlement>,
    pub(crate) history: AnalyticsHistory,
    /// Global frame counter, drives the analytics cadence
    pub(crate) frame: Tick,
    next_agent_id: u32,
    pub(crate) rng: ChaCha8Rng,
}

impl Simulation {
    /// Randomized field and initial population, both drawn from `config.seed`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let environment = ResourceField::random(
            config.world.width,
            config.world.height,
            config.world.initial_resource_max,
            &mut rng,
        )?;
        Self::populate(config, environment, rng)
    }

    /// Caller-supplied field; the grid size in `config` is replaced by the
    /// field's own dimensions
    pub fn with_environment(
        mut config: SimulationConfig,
        environment: ResourceField,
    ) -> Result<Self> {
        adopt_field_size(&mut config, &environment);
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::populate(config, environment, rng)
    }

    /// Caller-supplied field and agents; `config.population.initial_agents`
    /// is ignored in favour of `agents`, which must not be empty
    pub fn with_agents(
        mut config: SimulationConfig,
        environment: ResourceField,
        agents: Vec<(GridPos, AgentTraits)>,
    ) -> Result<Self> {
        if agents.is_empty() {
            return Err(SimError::InvalidConfig("at least one agent is required".into()));
        }
        adopt_field_size(&mut config, &environment);
        config.population.initial_agents = agents.len();
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut sim = Self::empty(config, environment, rng);
        for (cell, traits) in agents {
            sim.spawn_agent_with(cell, traits)?;
        }
        Ok(sim)
    }

    fn empty(config: SimulationConfig, environment: ResourceField, rng: ChaCha8Rng) -> Self {
        let pathing = PathingLayer::new(environment.width(), environment.height());
        Self {
            motion: MotionParams::from_config(&config),
            config,
            environment,
            pathing,
            agents: Vec::new(),
            settlements: Vec::new(),
            history: AnalyticsHistory::new(),
            frame: 0,
            next_agent_id: 0,
            rng,
        }
    }

    fn populate(
        config: SimulationConfig,
        environment: ResourceField,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        let count = config.population.initial_agents;
        let mut sim = Self::empty(config, environment, rng);
        for _ in 0..count {
            let x = sim.rng.gen_range(0..sim.environment.width());
            let y = sim.rng.gen_range(0..sim.environment.height());
            sim.spawn_agent(x, y)?;
        }

        tracing::info!(
            width = sim.environment.width(),
            height = sim.environment.height(),
            agents = sim.agents.len(),
            food = sim.environment.get_stats().total_resources,
            seed = sim.config.seed,
            "Simulation initialized"
        );
        Ok(sim)
    }

    // === Editing ===

    /// Overwrite a cell's resource level
    pub fn set_resource(&mut self, x: usize, y: usize, level: u32) -> Result<()> {
        self.environment.set_resource(x, y, level)
    }

    /// Spawn a forager with randomized traits
    pub fn spawn_agent(&mut self, x: usize, y: usize) -> Result<AgentId> {
        self.check_cell(x, y)?;
        let id = self.issue_agent_id();
        let agent = Agent::spawn(
            id,
            GridPos::new(x, y),
            &self.config.population,
            self.config.world.cell_dim,
            &mut self.rng,
        );
        self.agents.push(agent);
        Ok(id)
    }

    /// Spawn a forager with explicit traits; its first tick is due at once
    pub fn spawn_agent_with(&mut self, cell: GridPos, traits: AgentTraits) -> Result<AgentId> {
        self.check_cell(cell.x, cell.y)?;
        if traits.inventory_cap == 0 || traits.gather_rate == 0 {
            return Err(SimError::InvalidConfig(
                "agent inventory_cap and gather_rate must be positive".into(),
            ));
        }
        if !(traits.move_speed > 0.0 && traits.move_speed <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "agent move_speed must lie within (0, 1], got {}",
                traits.move_speed
            )));
        }
        if !(traits.think_delay.is_finite() && traits.think_delay >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "agent think_delay must be finite and non-negative, got {}",
                traits.think_delay
            )));
        }
        let id = self.issue_agent_id();
        let mut agent = Agent::new(id, cell, traits, self.config.world.cell_dim);
        agent.time_since_think = traits.think_delay;
        self.agents.push(agent);
        Ok(id)
    }

    /// Remove an agent permanently; its inventory goes with it
    pub fn remove_agent(&mut self, id: AgentId) -> Result<Agent> {
        let idx = self.index_of(id).ok_or(SimError::AgentNotFound(id))?;
        Ok(self.agents.remove(idx))
    }

    fn issue_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }

    fn check_cell(&self, x: usize, y: usize) -> Result<()> {
        if x < self.environment.width() && y < self.environment.height() {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                x,
                y,
                width: self.environment.width(),
                height: self.environment.height(),
            })
        }
    }

    // === Queries ===

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment(&self) -> &ResourceField {
        &self.environment
    }

    pub fn pathing(&self) -> &PathingLayer {
        &self.pathing
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn history(&self) -> &AnalyticsHistory {
        &self.history
    }

    /// Frames advanced so far
    pub fn frame(&self) -> Tick {
        self.frame
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.index_of(id).map(|idx| &self.agents[idx])
    }

    pub fn settlement(&self, id: SettlementId) -> Option<&Settlement> {
        self.settlements.get(id.index())
    }

    /// Sum of every settlement stockpile
    pub fn stockpiled_food(&self) -> u64 {
        self.settlements.iter().map(Settlement::stockpile_amount).sum()
    }

    /// Food currently carried by agents
    pub fn carried_food(&self) -> u64 {
        self.agents.iter().map(|a| a.inventory as u64).sum()
    }
}

/// A supplied field overrides the configured grid size; the survey square
/// never needs to reach past the new grid
fn adopt_field_size(config: &mut SimulationConfig, environment: &ResourceField) {
    config.world.width = environment.width();
    config.world.height = environment.height();
    let span = environment.width().max(environment.height());
    config.behavior.survey_radius = config.behavior.survey_radius.min(span);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.width = 12;
        config.world.height = 8;
        config.population.initial_agents = 5;
        config
    }

    #[test]
    fn test_new_spawns_initial_population_in_bounds() {
        let sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.population(), 5);
        assert_eq!(sim.environment().width(), 12);
        assert_eq!(sim.environment().height(), 8);
        for agent in sim.agents() {
            assert!(agent.grid_x < 12 && agent.grid_y < 8);
        }
        assert!(sim.settlements().is_empty());
        assert!(sim.history().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = small_config();
        config.population.initial_agents = 0;
        assert!(matches!(Simulation::new(config), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_with_agents_rejects_empty_population() {
        let field = ResourceField::uniform(4, 4, 1).unwrap();
        let result = Simulation::with_agents(SimulationConfig::default(), field, vec![]);
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_with_environment_adopts_field_size() {
        let field = ResourceField::uniform(7, 3, 2).unwrap();
        let sim = Simulation::with_environment(small_config(), field).unwrap();
        assert_eq!(sim.config().world.width, 7);
        assert_eq!(sim.config().world.height, 3);
        assert_eq!(sim.population(), 5);
    }

    #[test]
    fn test_small_field_caps_survey_radius() {
        let field = ResourceField::uniform(3, 2, 2).unwrap();
        let sim = Simulation::with_environment(small_config(), field).unwrap();
        assert_eq!(sim.config().behavior.survey_radius, 3);
    }

    #[test]
    fn test_spawn_rejects_non_finite_think_delay() {
        for think_delay in [f32::NAN, f32::INFINITY, -0.5] {
            let traits = AgentTraits {
                max_age: 10,
                inventory_cap: 10,
                gather_rate: 1,
                move_speed: 0.2,
                think_delay,
            };
            let field = ResourceField::uniform(4, 4, 1).unwrap();
            let agents = vec![(GridPos::new(1, 1), traits)];
            let result = Simulation::with_agents(SimulationConfig::default(), field, agents);
            assert!(matches!(result, Err(SimError::InvalidConfig(_))));
        }

        let mut sim = Simulation::new(small_config()).unwrap();
        let traits = AgentTraits {
            max_age: 10,
            inventory_cap: 10,
            gather_rate: 1,
            move_speed: 0.2,
            think_delay: f32::NAN,
        };
        assert!(sim.spawn_agent_with(GridPos::new(0, 0), traits).is_err());
        assert_eq!(sim.population(), 5);
    }

    #[test]
    fn test_agent_ids_are_not_reused() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let first = sim.agents()[0].id;
        sim.remove_agent(first).unwrap();
        let fresh = sim.spawn_agent(0, 0).unwrap();
        assert!(sim.agents().iter().all(|a| a.id != first));
        assert_eq!(fresh, AgentId(5));
        assert!(matches!(sim.remove_agent(first), Err(SimError::AgentNotFound(_))));
    }

    #[test]
    fn test_spawn_out_of_bounds_rejected() {
        let mut sim = Simulation::new(small_config()).unwrap();
        assert!(matches!(sim.spawn_agent(12, 0), Err(SimError::OutOfBounds { .. })));
        assert!(sim.set_resource(0, 8, 3).is_err());
        assert_eq!(sim.population(), 5);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = Simulation::new(small_config()).unwrap();
        let b = Simulation::new(small_config()).unwrap();
        assert_eq!(a.environment().get_stats(), b.environment().get_stats());
        let cells_a: Vec<_> = a.agents().iter().map(Agent::cell).collect();
        let cells_b: Vec<_> = b.agents().iter().map(Agent::cell).collect();
        assert_eq!(cells_a, cells_b);
    }
}
