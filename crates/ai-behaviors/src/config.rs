use ai_core::Lifetime;
use ai_motion::{EdgePolicy, MovementConfig, Vec2};
use ai_perception::{layers, CollisionMask, DetectThreshold, ScanConfig};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },

    #[error("`total_scan_rays` must be at least 1")]
    NoScanRays,
}

/// Tuning shared by every enemy of one type.
///
/// Durations given in seconds treat any negative value as "never" (for lifetimes) or "instantly"
/// (for `detect_player_duration`). Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    pub speed: f32,
    /// Magnitude of downward acceleration.
    pub gravity: f32,
    pub jump_height: f32,
    pub jump_interval: f32,
    pub scan_ray_length: f32,
    /// Total spread of the perception fan.
    pub scan_ray_angle: f32,
    pub total_scan_rays: u32,
    pub scan_ray_collision_layers: CollisionMask,
    pub edge_turn_around_pause: f32,
    pub detect_player_duration: f32,
    pub total_chase_duration: f32,
    /// Per-axis clamp on solved projectile velocities.
    pub max_velocity: Option<Vec2>,
    /// Launch elevation for shots.
    pub launch_angle: f32,
    pub fire_interval: f32,
    pub projectile_gravity: f32,
    pub projectile_lifetime: f32,
    /// Fraction of the gap to the desired velocity closed per second by flyers.
    pub follow_smoothing: f32,
    pub damage_duration: f32,
    /// Followers stop once this close to their target.
    pub arrival_distance: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            gravity: 30.0,
            jump_height: 2.0,
            jump_interval: 1.5,
            scan_ray_length: 8.0,
            scan_ray_angle: 30.0,
            total_scan_rays: 5,
            scan_ray_collision_layers: layers::SIGHT,
            edge_turn_around_pause: 0.0,
            detect_player_duration: -1.0,
            total_chase_duration: 3.0,
            max_velocity: None,
            launch_angle: 45.0,
            fire_interval: 2.0,
            projectile_gravity: 30.0,
            projectile_lifetime: 4.0,
            follow_smoothing: 4.0,
            damage_duration: 0.5,
            arrival_distance: 0.1,
        }
    }
}

fn check(
    field: &'static str,
    requirement: &'static str,
    value: f32,
    ok: impl FnOnce(f32) -> bool,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            requirement,
            value,
        })
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("speed", "non-negative", self.speed, |v| v >= 0.0)?;
        check("gravity", "positive", self.gravity, |v| v > 0.0)?;
        check("jump_height", "non-negative", self.jump_height, |v| v >= 0.0)?;
        check("jump_interval", "non-negative", self.jump_interval, |v| v >= 0.0)?;
        check("scan_ray_length", "positive", self.scan_ray_length, |v| v > 0.0)?;
        check("scan_ray_angle", "within [0, 360]", self.scan_ray_angle, |v| {
            (0.0..=360.0).contains(&v)
        })?;
        if self.total_scan_rays == 0 {
            return Err(ConfigError::NoScanRays);
        }
        check("launch_angle", "within (-90, 90)", self.launch_angle, |v| {
            v > -90.0 && v < 90.0
        })?;
        check("fire_interval", "non-negative", self.fire_interval, |v| v >= 0.0)?;
        check("projectile_gravity", "positive", self.projectile_gravity, |v| v > 0.0)?;
        check("follow_smoothing", "non-negative", self.follow_smoothing, |v| v >= 0.0)?;
        check("arrival_distance", "non-negative", self.arrival_distance, |v| v >= 0.0)?;
        for (field, value) in [
            ("edge_turn_around_pause", self.edge_turn_around_pause),
            ("detect_player_duration", self.detect_player_duration),
            ("total_chase_duration", self.total_chase_duration),
            ("projectile_lifetime", self.projectile_lifetime),
            ("damage_duration", self.damage_duration),
        ] {
            check(field, "finite", value, |_| true)?;
        }
        if let Some(max) = self.max_velocity {
            check("max_velocity.x", "non-negative", max.x, |v| v >= 0.0)?;
            check("max_velocity.y", "non-negative", max.y, |v| v >= 0.0)?;
        }
        Ok(())
    }

    pub fn movement(&self, edge_policy: EdgePolicy) -> MovementConfig {
        MovementConfig::new(self.speed, self.gravity, edge_policy)
            .with_edge_pause(self.edge_turn_around_pause)
    }

    /// Gravity-only movement for handlers that hold their ground.
    pub fn standing(&self) -> MovementConfig {
        MovementConfig::new(0.0, self.gravity, EdgePolicy::FallOff)
    }

    pub fn scan(&self) -> ScanConfig {
        ScanConfig {
            ray_length: self.scan_ray_length,
            fan_angle: self.scan_ray_angle.to_radians(),
            ray_count: self.total_scan_rays,
            mask: self.scan_ray_collision_layers,
        }
    }

    pub fn detect_threshold(&self) -> DetectThreshold {
        DetectThreshold::from_seconds(self.detect_player_duration)
    }

    pub fn chase_lifetime(&self) -> Lifetime {
        Lifetime::from_seconds(self.total_chase_duration)
    }

    pub fn damage_lifetime(&self) -> Lifetime {
        Lifetime::from_seconds(self.damage_duration)
    }

    pub fn projectile_lifetime(&self) -> Lifetime {
        Lifetime::from_seconds(self.projectile_lifetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AgentConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_non_positive_gravity() {
        let config = AgentConfig {
            gravity: 0.0,
            ..AgentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "gravity", .. })
        ));
    }

    #[test]
    fn rejects_zero_rays_and_nan_angles() {
        let no_rays = AgentConfig {
            total_scan_rays: 0,
            ..AgentConfig::default()
        };
        assert_eq!(no_rays.validate(), Err(ConfigError::NoScanRays));

        let nan = AgentConfig {
            scan_ray_angle: f32::NAN,
            ..AgentConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn negative_durations_mean_infinite_or_instant() {
        let config = AgentConfig {
            total_chase_duration: -1.0,
            detect_player_duration: -1.0,
            ..AgentConfig::default()
        };
        assert_eq!(config.chase_lifetime(), Lifetime::Infinite);
        assert_eq!(config.detect_threshold(), DetectThreshold::Instant);
    }
}
