use ai_core::{AgentId, Lifetime};
use ai_motion::{LandingEvents, Vec2};
use ai_perception::PerceptionWorld;

/// A projectile the host should create and drive with a
/// [`BallisticProjectile`](crate::BallisticProjectile).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn<A: AgentId> {
    pub owner: A,
    pub origin: Vec2,
    pub velocity: Vec2,
    pub gravity: f32,
    pub lifetime: Lifetime,
}

/// Everything the behaviors need from the game.
pub trait PlatformerWorld: PerceptionWorld + LandingEvents {
    fn spawn_projectile(&mut self, spawn: ProjectileSpawn<Self::Agent>);

    /// Whether `position` is still inside the playable area.
    fn in_bounds(&self, _position: Vec2) -> bool {
        true
    }
}
