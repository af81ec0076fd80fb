use ai_core::{AgentId, Lifetime, TickContext};
use ai_motion::{position_at, Vec2};

use crate::{PlatformerWorld, ProjectileSpawn};

/// Follows the closed-form arc of its launch, completing on contact or when it leaves the level.
#[derive(Debug, Clone)]
pub struct BallisticProjectile {
    origin: Vec2,
    launch: Vec2,
    gravity: f32,
    lifetime: Lifetime,
    elapsed: f32,
}

impl BallisticProjectile {
    pub fn new<A: AgentId>(spawn: &ProjectileSpawn<A>) -> Self {
        Self {
            origin: spawn.origin,
            launch: spawn.velocity,
            gravity: spawn.gravity,
            lifetime: spawn.lifetime,
            elapsed: 0.0,
        }
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.launch.x, self.launch.y - self.gravity * self.elapsed)
    }

    pub fn update<W: PlatformerWorld>(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
    ) -> bool {
        let Some(position) = world.position(agent) else {
            return false;
        };
        self.elapsed += ctx.dt();
        let next = position_at(self.origin, self.launch, self.gravity, self.elapsed);
        let contacts = world.move_agent(agent, next - position);

        if let Some(mut kinematics) = world.kinematics(agent) {
            kinematics.velocity = self.velocity();
            world.set_kinematics(agent, kinematics);
        }

        if contacts.any() {
            tracing::debug!(agent = ?agent, "projectile hit");
            return false;
        }
        let here = world.position(agent).unwrap_or(next);
        if !world.in_bounds(here) {
            tracing::debug!(agent = ?agent, x = here.x, y = here.y, "projectile left the level");
            return false;
        }
        true
    }
}
