//! Umbrella crate that re-exports the `ai-*` building blocks for platformer enemies.
//!
//! Most games only need [`behaviors`]: pick an [`Archetype`](behaviors::Archetype), implement
//! [`PlatformerWorld`](behaviors::PlatformerWorld) for your level and tick the resulting
//! [`EnemyController`](behaviors::EnemyController)s once per frame.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "motion")]
#[cfg_attr(docsrs, doc(cfg(feature = "motion")))]
pub use ai_motion as motion;

#[cfg(feature = "perception")]
#[cfg_attr(docsrs, doc(cfg(feature = "perception")))]
pub use ai_perception as perception;

#[cfg(feature = "behaviors")]
#[cfg_attr(docsrs, doc(cfg(feature = "behaviors")))]
pub use ai_behaviors as behaviors;

/// The types a game touches when wiring enemies into its loop.
#[cfg(feature = "behaviors")]
#[cfg_attr(docsrs, doc(cfg(feature = "behaviors")))]
pub mod prelude {
    pub use ai_behaviors::{
        broadcast_respawn, tick_enemies, AgentConfig, Archetype, EnemyController,
        PlatformerWorld, ProjectileSpawn, RespawnEvent,
    };
    pub use ai_core::{AgentId, TickContext, TickOutcome, WorldMut, WorldView};
    pub use ai_motion::{
        Collisions, Direction, Kinematics, LandingEvents, MotionWorld, PhysicsWorld, Vec2,
    };
    pub use ai_perception::{CollisionMask, PerceptionWorld, RayHit};
}
