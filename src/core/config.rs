//! Simulation configuration with documented constants
//!
//! Every tuning value the economy uses lives here and is passed into the
//! [`Simulation`](crate::simulation::Simulation) at construction. There is no
//! global config; two simulations with different configs can coexist.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub behavior: BehaviorConfig,
    pub roads: RoadConfig,
    pub analytics: AnalyticsConfig,
    /// Seed for the single RNG that drives spawning and movement
    pub seed: u64,
}

/// Grid shape and initial resource field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// World units per grid cell; agents interpolate toward cell centers
    pub cell_dim: f32,
    /// Randomized cells start uniformly in `0..=initial_resource_max`
    pub initial_resource_max: u32,
}

/// Initial population and the ranges per-agent constants are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub initial_agents: usize,
    /// Lifespan in logic ticks, inclusive range
    pub max_age_min: u32,
    pub max_age_max: u32,
    pub inventory_cap: u32,
    /// Units harvested per tick, inclusive range
    pub gather_rate_min: u32,
    pub gather_rate_max: u32,
    /// Interpolation factor per frame, half-open range
    pub move_speed_min: f32,
    pub move_speed_max: f32,
    /// Seconds between logic ticks, half-open range
    pub think_delay_min: f32,
    pub think_delay_max: f32,
}

/// Constants of the agent state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Inventory at which a forager starts surveying for a settlement site
    pub settle_threshold: u32,
    /// Half-width of the square surveyed around a forager
    pub survey_radius: usize,
    /// Per-axis distance (world units) at which an agent counts as arrived
    pub arrival_tolerance: f32,
    /// Extra interpolation factor at road quality 1.0
    pub road_speed_bonus: f32,
}

/// Pathing layer dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Added to the cell an agent occupies after each of its logic ticks
    pub reinforce: f32,
    /// Subtracted from every cell once per frame
    pub decay: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Frames between analytics snapshots
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            behavior: BehaviorConfig::default(),
            roads: RoadConfig::default(),
            analytics: AnalyticsConfig::default(),
            seed: 42,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            cell_dim: 20.0,
            initial_resource_max: 10,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_agents: 10,
            max_age_min: 600,
            max_age_max: 1000,
            inventory_cap: 10,
            gather_rate_min: 1,
            gather_rate_max: 3,
            move_speed_min: 0.08,
            move_speed_max: 0.25,
            think_delay_min: 0.1,
            think_delay_max: 0.4,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            settle_threshold: 5,
            survey_radius: 4,
            arrival_tolerance: 1.0,
            road_speed_bonus: 0.20,
        }
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            reinforce: 0.01,
            decay: 0.001,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { snapshot_interval: 60 }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        if world.width == 0 || world.height == 0 {
            return Err(invalid(format!(
                "grid must be non-empty, got {}x{}",
                world.width, world.height
            )));
        }
        if !(world.cell_dim.is_finite() && world.cell_dim > 0.0) {
            return Err(invalid(format!("cell_dim must be positive, got {}", world.cell_dim)));
        }

        let pop = &self.population;
        if pop.initial_agents == 0 {
            return Err(invalid("initial_agents must be at least 1".into()));
        }
        if pop.inventory_cap == 0 {
            return Err(invalid("inventory_cap must be at least 1".into()));
        }
        if pop.max_age_min > pop.max_age_max {
            return Err(invalid(format!(
                "max_age range is inverted ({} > {})",
                pop.max_age_min, pop.max_age_max
            )));
        }
        if pop.gather_rate_min == 0 || pop.gather_rate_min > pop.gather_rate_max {
            return Err(invalid(format!(
                "gather_rate range must be positive and ordered, got {}..={}",
                pop.gather_rate_min, pop.gather_rate_max
            )));
        }
        check_open_range("move_speed", pop.move_speed_min, pop.move_speed_max)?;
        if pop.move_speed_min == 0.0 || pop.move_speed_max > 1.0 {
            return Err(invalid(format!(
                "move_speed must lie within (0, 1], got {}..{}",
                pop.move_speed_min, pop.move_speed_max
            )));
        }
        check_open_range("think_delay", pop.think_delay_min, pop.think_delay_max)?;

        let behavior = &self.behavior;
        if behavior.settle_threshold == 0 || behavior.settle_threshold > pop.inventory_cap {
            return Err(invalid(format!(
                "settle_threshold must be in 1..={}, got {}",
                pop.inventory_cap, behavior.settle_threshold
            )));
        }
        let span = world.width.max(world.height);
        if behavior.survey_radius > span {
            return Err(invalid(format!(
                "survey_radius must be at most {}, got {}",
                span, behavior.survey_radius
            )));
        }
        if !(behavior.arrival_tolerance.is_finite() && behavior.arrival_tolerance > 0.0) {
            return Err(invalid("arrival_tolerance must be positive".into()));
        }
        if !(0.0..=1.0).contains(&behavior.road_speed_bonus) {
            return Err(invalid("road_speed_bonus must be within 0..=1".into()));
        }

        let roads = &self.roads;
        if !(0.0..=1.0).contains(&roads.reinforce) || !(0.0..=1.0).contains(&roads.decay) {
            return Err(invalid("road reinforce/decay must be within 0..=1".into()));
        }

        if self.analytics.snapshot_interval == 0 {
            return Err(invalid("snapshot_interval must be at least 1".into()));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> SimError {
    SimError::InvalidConfig(msg)
}

/// `min..max` must be finite, non-negative and non-empty
fn check_open_range(name: &str, min: f32, max: f32) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) || min < 0.0 || min >= max {
        return Err(invalid(format!(
            "{name} range must satisfy 0 <= min < max, got {min}..{max}"
        )));
    }
    Ok(())
}
