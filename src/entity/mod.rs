//! Agents - per-entity state, motion clock and behaviors

pub mod agent;
pub mod behavior;
pub mod motion;

pub use agent::{cell_center, Agent, AgentRole, AgentState, AgentTraits};
pub use motion::{MotionParams, MotionPhase};
