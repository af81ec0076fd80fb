use ai_core::{
    AgentId, ControlHandler, ControlHandlerStack, HandlerKey, Lifetime, TickContext, WorldView,
};

use crate::handlers::{
    AxisLockedChase, BallisticProjectile, Chase, DamageResponse, FlyingFollower, JumpingRunner,
    Patrol, Runner, StationaryShooter, TargetedShooter,
};
use crate::PlatformerWorld;

pub mod keys {
    use ai_core::HandlerKey;

    pub const PATROL: HandlerKey = HandlerKey("patrol");
    pub const RUNNER: HandlerKey = HandlerKey("runner");
    pub const JUMPING_RUNNER: HandlerKey = HandlerKey("jumping_runner");
    pub const CHASE: HandlerKey = HandlerKey("chase");
    pub const FLYING_FOLLOWER: HandlerKey = HandlerKey("flying_follower");
    pub const AXIS_LOCKED_CHASE: HandlerKey = HandlerKey("axis_locked_chase");
    pub const STATIONARY_SHOOTER: HandlerKey = HandlerKey("stationary_shooter");
    pub const TARGETED_SHOOTER: HandlerKey = HandlerKey("targeted_shooter");
    pub const PROJECTILE: HandlerKey = HandlerKey("projectile");
    pub const DAMAGED: HandlerKey = HandlerKey("damaged");
}

pub type BehaviorStack<W> = ControlHandlerStack<W, Behavior<<W as WorldView>::Agent>>;

/// One enemy or projectile behavior.
#[derive(Debug)]
pub enum Behavior<A: AgentId> {
    Patrol(Patrol<A>),
    Runner(Runner),
    JumpingRunner(JumpingRunner),
    Chase(Chase<A>),
    FlyingFollower(FlyingFollower<A>),
    AxisLockedChase(AxisLockedChase<A>),
    StationaryShooter(StationaryShooter<A>),
    TargetedShooter(TargetedShooter<A>),
    Projectile(BallisticProjectile),
    Damaged(DamageResponse),
}

impl<A: AgentId> Behavior<A> {
    pub fn key(&self) -> HandlerKey {
        match self {
            Behavior::Patrol(_) => keys::PATROL,
            Behavior::Runner(_) => keys::RUNNER,
            Behavior::JumpingRunner(_) => keys::JUMPING_RUNNER,
            Behavior::Chase(_) => keys::CHASE,
            Behavior::FlyingFollower(_) => keys::FLYING_FOLLOWER,
            Behavior::AxisLockedChase(_) => keys::AXIS_LOCKED_CHASE,
            Behavior::StationaryShooter(_) => keys::STATIONARY_SHOOTER,
            Behavior::TargetedShooter(_) => keys::TARGETED_SHOOTER,
            Behavior::Projectile(_) => keys::PROJECTILE,
            Behavior::Damaged(_) => keys::DAMAGED,
        }
    }
}

impl<W> ControlHandler<W> for Behavior<W::Agent>
where
    W: PlatformerWorld + 'static,
{
    fn key(&self) -> HandlerKey {
        Behavior::key(self)
    }

    fn lifetime(&self) -> Lifetime {
        match self {
            Behavior::Chase(h) => h.lifetime(),
            Behavior::Projectile(h) => h.lifetime(),
            Behavior::Damaged(h) => h.lifetime(),
            _ => Lifetime::Infinite,
        }
    }

    fn try_activate(&mut self, previous: Option<HandlerKey>, agent: W::Agent, _world: &W) -> bool {
        let accepted = match self {
            Behavior::Chase(_) => Chase::<W::Agent>::may_follow(previous),
            Behavior::Damaged(_) => DamageResponse::may_follow(previous),
            _ => true,
        };
        if !accepted {
            tracing::trace!(
                agent = ?agent,
                handler = %Behavior::key(self),
                previous = ?previous,
                "refusing to stack"
            );
        }
        accepted
    }

    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        stack: &mut BehaviorStack<W>,
    ) -> bool {
        match self {
            Behavior::Patrol(h) => h.update(ctx, agent, world, stack),
            Behavior::Runner(h) => h.update(ctx, agent, world),
            Behavior::JumpingRunner(h) => h.update(ctx, agent, world),
            Behavior::Chase(h) => h.update(ctx, agent, world),
            Behavior::FlyingFollower(h) => h.update(ctx, agent, world),
            Behavior::AxisLockedChase(h) => h.update(ctx, agent, world),
            Behavior::StationaryShooter(h) => h.update(ctx, agent, world),
            Behavior::TargetedShooter(h) => h.update(ctx, agent, world),
            Behavior::Projectile(h) => h.update(ctx, agent, world),
            Behavior::Damaged(h) => h.update(ctx, agent, world),
        }
    }

    fn dispose(&mut self, agent: W::Agent, world: &mut W) {
        if let Behavior::JumpingRunner(h) = self {
            h.dispose(agent, world);
        }
    }
}
