use ai_core::{AgentId, Controller, HandlerKey, TickContext, TickOutcome};
use ai_motion::{Direction, Kinematics, Vec2};

use crate::{
    AgentConfig, Archetype, Behavior, BehaviorError, BehaviorStack, DamageResponse,
    PlatformerWorld,
};

/// The player respawned at a checkpoint; every enemy goes back to how it spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnEvent {
    pub checkpoint: u32,
}

/// Owns one enemy's behavior stack and knows how to rebuild it.
pub struct EnemyController<W>
where
    W: PlatformerWorld + 'static,
{
    controller: Controller<W, Behavior<W::Agent>>,
    archetype: Archetype,
    config: AgentConfig,
    target: Option<W::Agent>,
    spawn_direction: Direction,
    spawn_position: Option<Vec2>,
}

impl<W> EnemyController<W>
where
    W: PlatformerWorld + 'static,
{
    /// A controller with an empty stack. Fails when the config is invalid or the archetype needs
    /// a target and none is given.
    pub fn new(
        agent: W::Agent,
        archetype: Archetype,
        config: AgentConfig,
        target: Option<W::Agent>,
    ) -> Result<Self, BehaviorError> {
        config.validate()?;
        if archetype.requires_target() && target.is_none() {
            return Err(BehaviorError::MissingTarget {
                role: archetype.name(),
            });
        }
        Ok(Self {
            controller: Controller::new(agent),
            archetype,
            config,
            target,
            spawn_direction: Direction::default(),
            spawn_position: None,
        })
    }

    /// [`new`](Self::new), remembering the agent's current position and `direction` as its spawn
    /// state, then [`reset`](Self::reset) into the initial behavior.
    pub fn spawn(
        agent: W::Agent,
        archetype: Archetype,
        config: AgentConfig,
        target: Option<W::Agent>,
        direction: Direction,
        world: &mut W,
    ) -> Result<Self, BehaviorError> {
        let mut enemy = Self::new(agent, archetype, config, target)?;
        let position = world
            .position(agent)
            .ok_or(BehaviorError::UnknownAgent(agent.stable_id()))?;
        enemy.spawn_direction = direction;
        enemy.spawn_position = Some(position);
        enemy.reset(direction, world)?;
        Ok(enemy)
    }

    pub fn agent(&self) -> W::Agent {
        self.controller.agent
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn target(&self) -> Option<W::Agent> {
        self.target
    }

    pub fn stack(&self) -> &BehaviorStack<W> {
        &self.controller.stack
    }

    pub fn active(&self) -> Option<HandlerKey> {
        self.controller.stack.top_key()
    }

    /// Face `start_direction` at rest and replace the whole stack with the initial behavior.
    pub fn reset(
        &mut self,
        start_direction: Direction,
        world: &mut W,
    ) -> Result<(), BehaviorError> {
        let agent = self.agent();
        let behavior = self
            .archetype
            .initial_behavior(&self.config, agent, self.target, world)?;
        self.controller.reset([behavior], world);
        world.set_kinematics(agent, Kinematics::facing(start_direction));
        tracing::debug!(
            agent = ?agent,
            archetype = self.archetype.name(),
            direction = ?start_direction,
            "enemy reset"
        );
        Ok(())
    }

    /// Install the initial behavior at the bottom of an empty stack. Does nothing (and returns
    /// `false`) if the stack already holds a behavior.
    pub fn push_initial_behavior(&mut self, world: &mut W) -> Result<bool, BehaviorError> {
        if !self.controller.stack.is_empty() {
            return Ok(false);
        }
        let agent = self.agent();
        let behavior = self
            .archetype
            .initial_behavior(&self.config, agent, self.target, world)?;
        Ok(self.controller.insert(0, behavior, world))
    }

    /// Interrupt the current behavior with a damage response. `false` if already reeling.
    pub fn apply_damage(&mut self, world: &mut W) -> bool {
        let pushed = self
            .controller
            .push(Behavior::Damaged(DamageResponse::new(&self.config)), world);
        if pushed {
            tracing::debug!(agent = ?self.agent(), "damaged");
        }
        pushed
    }

    pub fn on_respawn(
        &mut self,
        event: RespawnEvent,
        world: &mut W,
    ) -> Result<(), BehaviorError> {
        let agent = self.agent();
        if let Some(position) = self.spawn_position {
            world.set_position(agent, position);
        }
        tracing::debug!(agent = ?agent, checkpoint = event.checkpoint, "respawn");
        self.reset(self.spawn_direction, world)
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> TickOutcome {
        self.controller.tick(ctx, world)
    }

    pub fn despawn(self, world: &mut W) {
        self.controller.despawn(world);
    }
}

/// Deliver `event` to every enemy.
pub fn broadcast_respawn<W>(
    event: RespawnEvent,
    enemies: &mut [EnemyController<W>],
    world: &mut W,
) -> Result<(), BehaviorError>
where
    W: PlatformerWorld + 'static,
{
    for enemy in enemies.iter_mut() {
        enemy.on_respawn(event, world)?;
    }
    Ok(())
}

/// Tick every enemy once, in stable agent order.
pub fn tick_enemies<W>(
    ctx: &TickContext,
    world: &mut W,
    enemies: &mut [EnemyController<W>],
) -> Vec<(W::Agent, TickOutcome)>
where
    W: PlatformerWorld + 'static,
{
    enemies.sort_by_key(|e| e.agent().stable_id());
    enemies
        .iter_mut()
        .map(|enemy| (enemy.agent(), enemy.tick(ctx, world)))
        .collect()
}
