//! Closed-form ballistic launch solving.
//!
//! Gravity is a positive magnitude pulling toward `-y`. For a launch angle `θ` above the
//! horizontal and a horizontal span `dx` (absolute) with rise `dy`, the launch speed satisfies
//!
//! ```text
//! v² = g·dx² / (2·cos²θ·(dx·tanθ − dy))
//! ```

use thiserror::Error;

use crate::Vec2;

/// Spans shorter than this are treated as a purely vertical launch.
const VERTICAL_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("gravity must be a positive finite magnitude, got {0}")]
    InvalidGravity(f32),

    #[error("a {angle_degrees:.1}° launch cannot reach a target {dx:.2} across and {dy:.2} up")]
    Unreachable {
        angle_degrees: f32,
        dx: f32,
        dy: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryParams {
    pub start: Vec2,
    pub end: Vec2,
    /// Radians above the horizontal, measured toward `end`.
    pub angle: f32,
    pub gravity: f32,
    /// Per-axis magnitude limit applied to the solved velocity.
    pub max_velocity: Option<Vec2>,
}

impl TrajectoryParams {
    pub fn new(start: Vec2, end: Vec2, angle: f32, gravity: f32) -> Self {
        Self {
            start,
            end,
            angle,
            gravity,
            max_velocity: None,
        }
    }

    pub fn with_angle_degrees(start: Vec2, end: Vec2, degrees: f32, gravity: f32) -> Self {
        Self::new(start, end, degrees.to_radians(), gravity)
    }

    pub fn with_max_velocity(mut self, max_velocity: Vec2) -> Self {
        self.max_velocity = Some(max_velocity);
        self
    }
}

/// Initial velocity leaving `start` at `angle` that passes through `end`.
///
/// A target directly above or below the start ignores the angle: the launch is vertical and
/// just reaches `end` at its apex (or simply drops when `end` is below).
pub fn solve_launch_velocity(params: &TrajectoryParams) -> Result<Vec2, TrajectoryError> {
    let g = params.gravity;
    if !(g.is_finite() && g > 0.0) {
        return Err(TrajectoryError::InvalidGravity(g));
    }

    let span = params.end - params.start;
    let dx = span.x.abs();
    let dy = span.y;

    let velocity = if dx < VERTICAL_EPSILON {
        Vec2::new(0.0, (2.0 * g * dy.max(0.0)).sqrt())
    } else {
        let (sin, cos) = params.angle.sin_cos();
        let unreachable = TrajectoryError::Unreachable {
            angle_degrees: params.angle.to_degrees(),
            dx,
            dy,
        };
        if cos <= VERTICAL_EPSILON {
            return Err(unreachable);
        }

        let denominator = 2.0 * cos * cos * (dx * (sin / cos) - dy);
        if denominator <= 0.0 {
            return Err(unreachable);
        }

        let speed = (g * dx * dx / denominator).sqrt();
        let horizontal = if span.x < 0.0 { -1.0 } else { 1.0 };
        Vec2::new(horizontal * speed * cos, speed * sin)
    };

    Ok(match params.max_velocity {
        Some(max) => clamp_per_axis(velocity, max),
        None => velocity,
    })
}

fn clamp_per_axis(velocity: Vec2, max: Vec2) -> Vec2 {
    let limit = |value: f32, bound: f32| {
        let bound = bound.abs();
        if value.abs() > bound {
            bound.copysign(value)
        } else {
            value
        }
    };
    Vec2::new(limit(velocity.x, max.x), limit(velocity.y, max.y))
}

/// Position `t` seconds after leaving `start` with `velocity`.
pub fn position_at(start: Vec2, velocity: Vec2, gravity: f32, t: f32) -> Vec2 {
    Vec2::new(
        start.x + velocity.x * t,
        start.y + velocity.y * t - 0.5 * gravity * t * t,
    )
}

/// Time at which a launch from `start` with `velocity` crosses `end`'s column.
///
/// Vertical launches report the apex time when `end` is above, or `None` when the horizontal
/// velocity never carries the projectile to `end`.
pub fn flight_time(start: Vec2, end: Vec2, velocity: Vec2, gravity: f32) -> Option<f32> {
    let dx = end.x - start.x;
    if dx.abs() < VERTICAL_EPSILON {
        if velocity.y > 0.0 && gravity > 0.0 {
            return Some(velocity.y / gravity);
        }
        return None;
    }
    if velocity.x.abs() <= f32::EPSILON || dx.signum() != velocity.x.signum() {
        return None;
    }
    Some(dx / velocity.x)
}
