//! Platformer enemy behaviors built on the `ai-core` control-handler stack.
//!
//! Every behavior is one variant of [`Behavior`]; an [`EnemyController`] owns the stack for a
//! single enemy and knows how to (re)install the behavior its [`Archetype`] starts with.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod archetype;
pub mod behavior;
pub mod config;
pub mod enemy;
pub mod error;
pub mod handlers;
pub mod world;

pub use archetype::Archetype;
pub use behavior::{keys, Behavior, BehaviorStack};
pub use config::{AgentConfig, ConfigError};
pub use enemy::{broadcast_respawn, tick_enemies, EnemyController, RespawnEvent};
pub use error::BehaviorError;
pub use handlers::{
    Axis, AxisLockedChase, BallisticProjectile, Chase, DamageResponse, FlyingFollower,
    JumpingRunner, Patrol, Runner, StationaryShooter, TargetedShooter,
};
pub use world::{PlatformerWorld, ProjectileSpawn};
