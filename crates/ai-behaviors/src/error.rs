use ai_motion::TrajectoryError;
use thiserror::Error;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BehaviorError {
    #[error("{role} needs a target but none was given")]
    MissingTarget { role: &'static str },

    #[error("{role} target {target} is not in the world")]
    UnknownTarget { role: &'static str, target: u64 },

    #[error("agent {0} is not in the world")]
    UnknownAgent(u64),

    #[error("invalid agent config: {0}")]
    Config(#[from] ConfigError),

    #[error("no firing solution: {0}")]
    Trajectory(#[from] TrajectoryError),
}
