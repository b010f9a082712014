//! Environment layer - the resource field and the road network over it

pub mod pathing;
pub mod resource_field;

pub use pathing::PathingLayer;
pub use resource_field::{EnvironmentStats, ResourceField};
