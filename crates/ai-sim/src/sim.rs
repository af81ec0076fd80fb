//! Fixed-step simulation of a [`Scenario`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use ai_behaviors::{
    broadcast_respawn, tick_enemies, Archetype, BallisticProjectile, Behavior, EnemyController,
    RespawnEvent,
};
use ai_core::{tick_controllers, Controller, HandlerKey, TickContext};
use ai_motion::{Direction, MotionWorld, PhysicsWorld, Vec2};
use ai_perception::layers;

use crate::{Body, Scenario, ScheduledEvent, SimError, TileLevel};

/// Projectile box size relative to the tile size.
const PROJECTILE_HALF_EXTENT: f32 = 0.1;

type ProjectileController = Controller<TileLevel, Behavior<u32>>;

#[derive(Debug, Clone, Copy, Default)]
struct EnemyStats {
    active: Option<HandlerKey>,
    transitions: u32,
}

pub struct Simulation {
    name: String,
    level: TileLevel,
    player: u32,
    enemies: Vec<EnemyController<TileLevel>>,
    /// Agent id of each scenario agent, in document order.
    agents: Vec<u32>,
    projectiles: Vec<ProjectileController>,
    events: Vec<ScheduledEvent>,
    next_event: usize,
    clock: TickContext,
    ticks_run: u64,
    shots_fired: u32,
    player_hits: u32,
    stats: BTreeMap<u32, EnemyStats>,
}

impl Simulation {
    /// Place the player and every agent, each enemy starting in its initial behavior.
    pub fn new(scenario: &Scenario, dt: f32) -> Result<Self, SimError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::TimeStep(dt));
        }
        scenario.validate()?;

        let mut level = scenario.level()?;
        let player = level.spawn_body(Body::new(
            scenario.player.position,
            scenario.player.half_extents,
            layers::PLAYER,
            Direction::default(),
        ));

        let mut enemies = Vec::with_capacity(scenario.agents.len());
        let mut agents = Vec::with_capacity(scenario.agents.len());
        let mut stats = BTreeMap::new();
        for (index, spec) in scenario.agents.iter().enumerate() {
            let agent = level.spawn_body(Body::new(
                spec.position,
                spec.half_extents,
                layers::ENEMY,
                spec.direction,
            ));
            let target = spec.target_player.then_some(player);
            let enemy = EnemyController::spawn(
                agent,
                spec.archetype,
                spec.config,
                target,
                spec.direction,
                &mut level,
            )
            .map_err(|source| SimError::Agent {
                index,
                archetype: spec.archetype.name(),
                source,
            })?;
            stats.insert(
                agent,
                EnemyStats {
                    active: enemy.active(),
                    transitions: 0,
                },
            );
            agents.push(agent);
            enemies.push(enemy);
        }

        let mut events = scenario.events.clone();
        events.sort_by(|a, b| a.at().total_cmp(&b.at()));

        tracing::info!(
            scenario = %scenario.name,
            agents = agents.len(),
            events = events.len(),
            "simulation ready"
        );

        Ok(Self {
            name: scenario.name.clone(),
            level,
            player,
            enemies,
            agents,
            projectiles: Vec::new(),
            events,
            next_event: 0,
            clock: TickContext::first(dt),
            ticks_run: 0,
            shots_fired: 0,
            player_hits: 0,
            stats,
        })
    }

    pub fn level(&self) -> &TileLevel {
        &self.level
    }

    pub fn player(&self) -> u32 {
        self.player
    }

    /// Agent id of the `index`-th scenario agent.
    pub fn agent(&self, index: usize) -> Option<u32> {
        self.agents.get(index).copied()
    }

    pub fn enemy(&self, agent: u32) -> Option<&EnemyController<TileLevel>> {
        self.enemies.iter().find(|enemy| enemy.agent() == agent)
    }

    pub fn live_projectiles(&self) -> usize {
        self.projectiles.len()
    }

    /// Context the next [`step`](Self::step) will run with.
    pub fn clock(&self) -> TickContext {
        self.clock
    }

    /// Advance one frame: due events, enemies, projectiles, then newly fired shots.
    pub fn step(&mut self) -> Result<(), SimError> {
        let ctx = self.clock;
        self.apply_due_events(&ctx)?;

        tick_enemies(&ctx, &mut self.level, &mut self.enemies);
        self.record_transitions(&ctx);

        let outcomes = tick_controllers(&ctx, &mut self.level, &mut self.projectiles);
        for (projectile, outcome) in outcomes {
            let hit_player = self.level.overlapping(projectile, self.player);
            if hit_player {
                self.player_hits += 1;
                tracing::info!(projectile, tick = ctx.tick, "player hit");
            }
            if hit_player || outcome.finished().is_some() {
                self.remove_projectile(projectile);
            }
        }

        let half = Vec2::new(1.0, 1.0) * (PROJECTILE_HALF_EXTENT * self.level.tile_size());
        for spawn in self.level.take_spawns() {
            let facing = Direction::from_sign(spawn.velocity.x).unwrap_or_default();
            let agent = self.level.spawn_body(Body::new(
                spawn.origin,
                half,
                layers::PROJECTILE,
                facing,
            ));
            let handler = Behavior::Projectile(BallisticProjectile::new(&spawn));
            self.projectiles
                .push(Controller::with_handler(agent, handler, &mut self.level));
            self.shots_fired += 1;
            tracing::debug!(projectile = agent, owner = spawn.owner, "projectile spawned");
        }

        self.clock = ctx.next();
        self.ticks_run += 1;
        Ok(())
    }

    pub fn run(&mut self, ticks: u64) -> Result<SimSummary, SimError> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> SimSummary {
        let mut enemies: Vec<EnemySummary> = self
            .enemies
            .iter()
            .filter_map(|enemy| {
                let agent = enemy.agent();
                let body = self.level.body(agent)?;
                Some(EnemySummary {
                    agent,
                    archetype: enemy.archetype(),
                    active: enemy.active().map(|key| key.to_string()),
                    transitions: self.stats.get(&agent).map_or(0, |s| s.transitions),
                    position: body.position,
                    direction: body.kinematics.direction,
                    grounded: self.level.collisions(agent).grounded(),
                })
            })
            .collect();
        enemies.sort_by_key(|enemy| enemy.agent);

        SimSummary {
            scenario: self.name.clone(),
            ticks: self.ticks_run,
            seconds: self.clock.time_seconds,
            shots_fired: self.shots_fired,
            player_hits: self.player_hits,
            live_projectiles: self.projectiles.len(),
            enemies,
        }
    }

    /// Events fire on the first tick that starts within half a step of their time.
    fn apply_due_events(&mut self, ctx: &TickContext) -> Result<(), SimError> {
        let horizon = ctx.time_seconds + 0.5 * ctx.dt();
        while let Some(event) = self.events.get(self.next_event).copied() {
            if event.at() > horizon {
                break;
            }
            self.next_event += 1;
            tracing::debug!(?event, tick = ctx.tick, "scheduled event");

            match event {
                ScheduledEvent::Damage { agent: index, .. } => {
                    let Some(agent) = self.agent(index) else {
                        continue;
                    };
                    if let Some(enemy) = self.enemies.iter_mut().find(|e| e.agent() == agent) {
                        enemy.apply_damage(&mut self.level);
                    }
                }
                ScheduledEvent::Respawn { checkpoint, .. } => {
                    broadcast_respawn(
                        RespawnEvent { checkpoint },
                        &mut self.enemies,
                        &mut self.level,
                    )?;
                }
                ScheduledEvent::MovePlayer { position, .. } => {
                    self.level.set_position(self.player, position);
                }
            }
        }
        self.record_transitions(ctx);
        Ok(())
    }

    fn record_transitions(&mut self, ctx: &TickContext) {
        for enemy in &self.enemies {
            let stats = self.stats.entry(enemy.agent()).or_default();
            let active = enemy.active();
            if active != stats.active {
                stats.transitions += 1;
                tracing::debug!(
                    agent = enemy.agent(),
                    tick = ctx.tick,
                    from = ?stats.active,
                    to = ?active,
                    "behavior changed"
                );
                stats.active = active;
            }
        }
    }

    fn remove_projectile(&mut self, agent: u32) {
        let Some(index) = self.projectiles.iter().position(|p| p.agent == agent) else {
            return;
        };
        let controller = self.projectiles.swap_remove(index);
        controller.despawn(&mut self.level);
        self.level.remove_body(agent);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySummary {
    pub agent: u32,
    pub archetype: Archetype,
    /// Key of the behavior on top of the stack.
    pub active: Option<String>,
    /// How often the top of the stack changed.
    pub transitions: u32,
    pub position: Vec2,
    pub direction: Direction,
    pub grounded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSummary {
    pub scenario: String,
    pub ticks: u64,
    pub seconds: f32,
    pub shots_fired: u32,
    pub player_hits: u32,
    pub live_projectiles: usize,
    pub enemies: Vec<EnemySummary>,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.scenario.is_empty() {
            "scenario"
        } else {
            &self.scenario
        };
        writeln!(f, "{name}: {} ticks ({:.2}s)", self.ticks, self.seconds)?;
        writeln!(
            f,
            "shots fired: {}, player hits: {}, projectiles in flight: {}",
            self.shots_fired, self.player_hits, self.live_projectiles
        )?;
        for enemy in &self.enemies {
            writeln!(
                f,
                "  #{} {:<18} {:<20} ({:>7.2}, {:>7.2}) {:?}{} [{} transitions]",
                enemy.agent,
                enemy.archetype.name(),
                enemy.active.as_deref().unwrap_or("-"),
                enemy.position.x,
                enemy.position.y,
                enemy.direction,
                if enemy.grounded { " grounded" } else { "" },
                enemy.transitions,
            )?;
        }
        Ok(())
    }
}
