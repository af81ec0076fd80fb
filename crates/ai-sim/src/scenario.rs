//! YAML scenario documents: a tile level, the player and the enemies placed in it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ai_behaviors::{AgentConfig, Archetype, BehaviorError};
use ai_motion::{Direction, Vec2};

use crate::{SimError, TileLevel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_tile_size")]
    pub tile_size: f32,

    /// Top row first; `#` is solid, `.` or space is empty.
    pub tiles: Vec<String>,

    pub player: PlayerSpec,

    #[serde(default)]
    pub agents: Vec<AgentSpec>,

    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub position: Vec2,

    #[serde(default = "default_half_extents")]
    pub half_extents: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub archetype: Archetype,

    pub position: Vec2,

    #[serde(default)]
    pub direction: Direction,

    /// Options not given fall back to their defaults.
    #[serde(default)]
    pub config: AgentConfig,

    #[serde(default = "default_half_extents")]
    pub half_extents: Vec2,

    /// Whether the player is this agent's target.
    #[serde(default = "default_true")]
    pub target_player: bool,
}

/// Something that happens to the world at a point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduledEvent {
    /// Hurt the enemy at index `agent` of the scenario's agent list.
    Damage { at: f32, agent: usize },
    /// The player respawned at `checkpoint`.
    Respawn { at: f32, checkpoint: u32 },
    /// Teleport the player.
    MovePlayer { at: f32, position: Vec2 },
}

impl ScheduledEvent {
    pub fn at(&self) -> f32 {
        match *self {
            ScheduledEvent::Damage { at, .. }
            | ScheduledEvent::Respawn { at, .. }
            | ScheduledEvent::MovePlayer { at, .. } => at,
        }
    }
}

fn default_tile_size() -> f32 {
    1.0
}

fn default_half_extents() -> Vec2 {
    Vec2::new(0.4, 0.45)
}

fn default_true() -> bool {
    true
}

impl Scenario {
    /// Load a scenario from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse scenario from {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build the level this scenario describes, without any bodies.
    pub fn level(&self) -> Result<TileLevel, SimError> {
        TileLevel::from_rows(&self.tiles, self.tile_size)
    }

    /// Check everything that can be checked before simulating.
    pub fn validate(&self) -> Result<(), SimError> {
        self.level()?;

        for (index, agent) in self.agents.iter().enumerate() {
            let agent_error = |source: BehaviorError| SimError::Agent {
                index,
                archetype: agent.archetype.name(),
                source,
            };
            agent
                .config
                .validate()
                .map_err(|error| agent_error(error.into()))?;
            if agent.archetype.requires_target() && !agent.target_player {
                return Err(agent_error(BehaviorError::MissingTarget {
                    role: agent.archetype.name(),
                }));
            }
        }

        for event in &self.events {
            let at = event.at();
            if !(at.is_finite() && at >= 0.0) {
                return Err(SimError::EventTime(at));
            }
            if let ScheduledEvent::Damage { agent, .. } = *event {
                if agent >= self.agents.len() {
                    return Err(SimError::UnknownAgentIndex {
                        at,
                        index: agent,
                        count: self.agents.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
tiles:
  - '....'
  - '####'
player:
  position: { x: 3.5, y: 1.5 }
agents:
  - archetype: patrol
    position: { x: 0.5, y: 1.5 }
    config: { speed: 2.0 }
events:
  - { kind: damage, at: 1.0, agent: 0 }
  - { kind: respawn, at: 2.0, checkpoint: 1 }
"#;

    #[test]
    fn omitted_fields_take_defaults() {
        let scenario = Scenario::from_yaml(MINIMAL).unwrap();
        assert_eq!(scenario.tile_size, 1.0);
        assert_eq!(scenario.player.half_extents, default_half_extents());

        let agent = &scenario.agents[0];
        assert_eq!(agent.direction, Direction::Right);
        assert!(agent.target_player);
        assert_eq!(agent.config.speed, 2.0);
        assert_eq!(agent.config.gravity, AgentConfig::default().gravity);

        assert_eq!(
            scenario.events,
            vec![
                ScheduledEvent::Damage { at: 1.0, agent: 0 },
                ScheduledEvent::Respawn {
                    at: 2.0,
                    checkpoint: 1
                },
            ]
        );
        assert_eq!(scenario.validate(), Ok(()));
    }

    #[test]
    fn solid_rows_survive_yaml_quoting() {
        let scenario = Scenario::from_yaml(MINIMAL).unwrap();
        assert_eq!(scenario.tiles, vec!["....".to_owned(), "####".to_owned()]);

        let level = scenario.level().unwrap();
        assert!(level.is_solid_at(Vec2::new(3.5, 0.5)));
        assert!(!level.is_solid_at(Vec2::new(3.5, 1.5)));
    }

    #[test]
    fn damage_events_must_name_a_listed_agent() {
        let mut scenario = Scenario::from_yaml(MINIMAL).unwrap();
        scenario.events.push(ScheduledEvent::Damage { at: 0.5, agent: 3 });
        assert_eq!(
            scenario.validate(),
            Err(SimError::UnknownAgentIndex {
                at: 0.5,
                index: 3,
                count: 1
            })
        );
    }

    #[test]
    fn targeted_archetypes_cannot_opt_out_of_a_target() {
        let mut scenario = Scenario::from_yaml(MINIMAL).unwrap();
        scenario.agents[0].archetype = Archetype::TargetedShooter;
        scenario.agents[0].target_player = false;
        assert!(matches!(
            scenario.validate(),
            Err(SimError::Agent {
                index: 0,
                source: BehaviorError::MissingTarget { .. },
                ..
            })
        ));
    }
}
