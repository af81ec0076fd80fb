//! Headless reference level and scenario runner for the platformer enemy behaviors.
//!
//! [`TileLevel`] implements every world trait on a grid of square tiles, [`Scenario`] describes a
//! level with its player and enemies in YAML, and [`Simulation`] steps it at a fixed rate.

#![forbid(unsafe_code)]

pub mod error;
pub mod level;
pub mod scenario;
pub mod sim;

pub use error::SimError;
pub use level::{Body, TileLevel};
pub use scenario::{AgentSpec, PlayerSpec, Scenario, ScheduledEvent};
pub use sim::{EnemySummary, SimSummary, Simulation};
