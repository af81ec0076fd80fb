//! Ray-fan scanning.
//!
//! A scan casts `ray_count` rays spread symmetrically around the horizontal direction of the
//! target. The target is visible for the tick when the first thing any ray hits is the target
//! itself. Consecutive visible ticks accumulate into a sight duration that drops back to zero on
//! the first blind tick.

use ai_motion::{Direction, MotionWorld, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::layers::{self, CollisionMask};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    pub ray_length: f32,
    /// Total spread of the fan in radians.
    pub fan_angle: f32,
    pub ray_count: u32,
    pub mask: CollisionMask,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ray_length: 8.0,
            fan_angle: 30f32.to_radians(),
            ray_count: 5,
            mask: layers::SIGHT,
        }
    }
}

/// How long the target must stay in sight before it counts as detected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DetectThreshold {
    /// Any single positive scan.
    #[default]
    Instant,
    After(f32),
}

impl DetectThreshold {
    /// Negative seconds mean [`DetectThreshold::Instant`].
    pub fn from_seconds(seconds: f32) -> Self {
        if seconds < 0.0 {
            Self::Instant
        } else {
            Self::After(seconds)
        }
    }

    pub fn is_met(self, visible: bool, sight_duration: f32) -> bool {
        match self {
            Self::Instant => visible,
            Self::After(seconds) => visible && sight_duration >= seconds,
        }
    }
}

/// First body a ray touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<A> {
    /// The agent that was hit, or `None` for level geometry.
    pub target: Option<A>,
    pub point: Vec2,
    pub distance: f32,
}

pub trait PerceptionWorld: MotionWorld {
    /// Closest hit along `direction` (unit length) within `max_distance`, considering only bodies
    /// on `mask` layers and never `ignore`.
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
        ignore: Self::Agent,
    ) -> Option<RayHit<Self::Agent>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerceptionResult {
    pub visible: bool,
    /// Seconds of uninterrupted sight, including this tick.
    pub sight_duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerceptionScanner {
    config: ScanConfig,
    threshold: DetectThreshold,
    sight_duration: f32,
}

impl PerceptionScanner {
    pub fn new(config: ScanConfig, threshold: DetectThreshold) -> Self {
        Self {
            config,
            threshold,
            sight_duration: 0.0,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn threshold(&self) -> DetectThreshold {
        self.threshold
    }

    pub fn sight_duration(&self) -> f32 {
        self.sight_duration
    }

    pub fn reset(&mut self) {
        self.sight_duration = 0.0;
    }

    /// Unit ray directions fanned around `facing`, ordered by increasing angle. Empty when the
    /// scanner has no rays.
    pub fn ray_directions(&self, facing: Direction) -> Vec<Vec2> {
        let count = self.config.ray_count;
        let forward = facing.as_vec2();
        match count {
            0 => return Vec::new(),
            1 => return vec![forward],
            _ => {}
        }
        let half = self.config.fan_angle * 0.5;
        let step = self.config.fan_angle / (count - 1) as f32;
        (0..count)
            .map(|i| forward.rotate(-half + step * i as f32))
            .collect()
    }

    /// Scan toward the target's side of the agent.
    ///
    /// When the two share a column the agent's current facing is used. A missing agent or target
    /// counts as a blind tick.
    pub fn scan<W>(
        &mut self,
        dt: f32,
        agent: W::Agent,
        target: W::Agent,
        world: &W,
    ) -> PerceptionResult
    where
        W: PerceptionWorld,
    {
        let facing = match (world.position(agent), world.position(target)) {
            (Some(from), Some(to)) => Direction::toward(from.x, to.x)
                .or_else(|| world.kinematics(agent).map(|k| k.direction))
                .unwrap_or_default(),
            _ => return self.record(dt, false),
        };
        self.scan_toward(dt, agent, target, facing, world)
    }

    /// Scan along an explicit facing.
    pub fn scan_toward<W>(
        &mut self,
        dt: f32,
        agent: W::Agent,
        target: W::Agent,
        facing: Direction,
        world: &W,
    ) -> PerceptionResult
    where
        W: PerceptionWorld,
    {
        let Some(origin) = world.position(agent) else {
            return self.record(dt, false);
        };

        let visible = self.ray_directions(facing).into_iter().any(|direction| {
            world
                .cast_ray(origin, direction, self.config.ray_length, self.config.mask, agent)
                .is_some_and(|hit| hit.target == Some(target))
        });

        let result = self.record(dt, visible);
        tracing::trace!(
            agent = ?agent,
            target = ?target,
            visible,
            sight = result.sight_duration,
            "perception scan"
        );
        result
    }

    /// Whether the last recorded sight satisfies the threshold.
    pub fn is_detected(&self, result: PerceptionResult) -> bool {
        self.threshold.is_met(result.visible, result.sight_duration)
    }

    fn record(&mut self, dt: f32, visible: bool) -> PerceptionResult {
        if visible {
            self.sight_duration += dt.max(0.0);
        } else {
            self.sight_duration = 0.0;
        }
        PerceptionResult {
            visible,
            sight_duration: self.sight_duration,
        }
    }
}
