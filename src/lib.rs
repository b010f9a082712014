//! Homestead - agent foraging economy
//!
//! Foragers harvest a finite resource field, pioneers found settlements at
//! surveyed resource clusters, and residents feed those settlements'
//! stockpiles. [`simulation::Simulation`] drives it one frame at a time.

pub mod city;
pub mod core;
pub mod entity;
pub mod environment;
pub mod simulation;
pub mod spatial;
