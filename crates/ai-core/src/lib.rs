//! Per-agent control handler stack and controller primitives.
//!
//! An agent's behavior is a stack of [`ControlHandler`]s. Only the top handler is updated each
//! tick; deeper handlers stay dormant and resume when everything above them has been popped.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod controller;
pub mod handler;
pub mod stack;
pub mod tick;
pub mod world;

pub use controller::{tick_controllers, Controller};
pub use handler::{ControlHandler, HandlerKey, Lifetime};
pub use stack::{ControlHandlerStack, TickOutcome};
pub use tick::TickContext;
pub use world::{AgentId, WorldMut, WorldView};
