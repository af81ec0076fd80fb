use ai_behaviors::BehaviorError;

/// Reasons a scenario cannot be loaded into a level or simulated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("tile size must be positive and finite, got {0}")]
    TileSize(f32),

    #[error("level has no tiles")]
    EmptyLevel,

    #[error("tile row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {tile:?} at row {row}, column {column}")]
    UnknownTile {
        row: usize,
        column: usize,
        tile: char,
    },

    #[error("event at {at}s refers to agent {index}, but the scenario has {count} agents")]
    UnknownAgentIndex { at: f32, index: usize, count: usize },

    #[error("event time must be finite and non-negative, got {0}")]
    EventTime(f32),

    #[error("time step must be positive and finite, got {0}")]
    TimeStep(f32),

    #[error("agent {index} ({archetype}): {source}")]
    Agent {
        index: usize,
        archetype: &'static str,
        #[source]
        source: BehaviorError,
    },

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}
