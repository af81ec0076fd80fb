use ai_core::{AgentId, Lifetime, TickContext};
use ai_motion::{solve_launch_velocity, Direction, MovementSolver, TrajectoryParams, Vec2};
use ai_perception::PerceptionScanner;

use super::{face, known_target, walk};
use crate::{AgentConfig, BehaviorError, PlatformerWorld, ProjectileSpawn};

/// Firing solution and cooldown shared by both shooters.
#[derive(Debug, Clone)]
struct Launcher {
    angle_degrees: f32,
    gravity: f32,
    max_velocity: Option<Vec2>,
    lifetime: Lifetime,
    interval: f32,
    cooldown: f32,
}

impl Launcher {
    fn new(config: &AgentConfig) -> Self {
        Self {
            angle_degrees: config.launch_angle,
            gravity: config.projectile_gravity,
            max_velocity: config.max_velocity,
            lifetime: config.projectile_lifetime(),
            interval: config.fire_interval.max(0.0),
            cooldown: 0.0,
        }
    }

    fn cool_down(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    fn ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    fn solve<A: AgentId>(
        &self,
        owner: A,
        origin: Vec2,
        aim: Vec2,
    ) -> Result<ProjectileSpawn<A>, BehaviorError> {
        let mut params =
            TrajectoryParams::with_angle_degrees(origin, aim, self.angle_degrees, self.gravity);
        if let Some(max) = self.max_velocity {
            params = params.with_max_velocity(max);
        }
        let velocity = solve_launch_velocity(&params)?;
        Ok(ProjectileSpawn {
            owner,
            origin,
            velocity,
            gravity: self.gravity,
            lifetime: self.lifetime,
        })
    }

    /// Fires at `aim` and restarts the cooldown. An unreachable aim point also restarts it.
    fn fire<W: PlatformerWorld>(
        &mut self,
        agent: W::Agent,
        origin: Vec2,
        aim: Vec2,
        world: &mut W,
    ) {
        self.cooldown = self.interval;
        match self.solve(agent, origin, aim) {
            Ok(spawn) => {
                tracing::debug!(
                    agent = ?agent,
                    vx = spawn.velocity.x,
                    vy = spawn.velocity.y,
                    "fired"
                );
                world.spawn_projectile(spawn);
            }
            Err(error) => tracing::warn!(agent = ?agent, %error, "holding fire"),
        }
    }
}

/// Holds position facing one way and lobs a shot at the far end of its sight line whenever the
/// target shows up in front of it.
#[derive(Debug, Clone)]
pub struct StationaryShooter<A> {
    target: A,
    scanner: PerceptionScanner,
    launcher: Launcher,
    solver: MovementSolver,
}

impl<A: AgentId> StationaryShooter<A> {
    pub fn new<W>(
        config: &AgentConfig,
        target: Option<A>,
        world: &W,
    ) -> Result<Self, BehaviorError>
    where
        W: PlatformerWorld<Agent = A>,
    {
        Ok(Self {
            target: known_target("stationary shooter", target, world)?,
            scanner: PerceptionScanner::new(config.scan(), config.detect_threshold()),
            launcher: Launcher::new(config),
            solver: MovementSolver::new(config.standing()),
        })
    }

    pub fn update<W>(&mut self, ctx: &TickContext, agent: A, world: &mut W) -> bool
    where
        W: PlatformerWorld<Agent = A>,
    {
        self.launcher.cool_down(ctx.dt());
        if walk(&mut self.solver, ctx, agent, world, None).is_none() {
            return false;
        }
        let (Some(origin), Some(kinematics)) = (world.position(agent), world.kinematics(agent))
        else {
            return false;
        };

        let facing = kinematics.direction;
        let sight = self
            .scanner
            .scan_toward(ctx.dt(), agent, self.target, facing, world);
        if self.scanner.is_detected(sight) && self.launcher.ready() {
            let aim = origin + facing.as_vec2() * self.scanner.config().ray_length;
            self.launcher.fire(agent, origin, aim, world);
        }
        true
    }
}

/// Turns to face the target and fires straight at its current position once it is in sight.
#[derive(Debug, Clone)]
pub struct TargetedShooter<A> {
    target: A,
    scanner: PerceptionScanner,
    launcher: Launcher,
    solver: MovementSolver,
}

impl<A: AgentId> TargetedShooter<A> {
    pub fn new<W>(
        config: &AgentConfig,
        target: Option<A>,
        world: &W,
    ) -> Result<Self, BehaviorError>
    where
        W: PlatformerWorld<Agent = A>,
    {
        Ok(Self {
            target: known_target("targeted shooter", target, world)?,
            scanner: PerceptionScanner::new(config.scan(), config.detect_threshold()),
            launcher: Launcher::new(config),
            solver: MovementSolver::new(config.standing()),
        })
    }

    pub fn update<W>(&mut self, ctx: &TickContext, agent: A, world: &mut W) -> bool
    where
        W: PlatformerWorld<Agent = A>,
    {
        self.launcher.cool_down(ctx.dt());
        let (Some(origin), Some(aim)) = (world.position(agent), world.position(self.target)) else {
            self.scanner.reset();
            return walk(&mut self.solver, ctx, agent, world, None).is_some();
        };
        if let Some(direction) = Direction::toward(origin.x, aim.x) {
            face(agent, world, direction);
        }
        if walk(&mut self.solver, ctx, agent, world, None).is_none() {
            return false;
        }

        let sight = self.scanner.scan(ctx.dt(), agent, self.target, world);
        if self.scanner.is_detected(sight) && self.launcher.ready() {
            let origin = world.position(agent).unwrap_or(origin);
            self.launcher.fire(agent, origin, aim, world);
        }
        true
    }
}
