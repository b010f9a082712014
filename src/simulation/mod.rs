//! Simulation orchestration: frame loop, agent state machine, analytics

pub mod analytics;
pub mod events;
pub mod tick;
pub mod transitions;
pub mod view;
pub mod world;

pub use analytics::{AnalyticsHistory, AnalyticsSnapshot, CSV_HEADER};
pub use events::SimulationEvent;
pub use transitions::Economy;
pub use view::{AgentView, SettlementView, WorldView};
pub use world::Simulation;
