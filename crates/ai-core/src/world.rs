use core::fmt::Debug;

/// Stable identifier for an agent.
///
/// Controllers are ticked in `stable_id` order so a frame is reproducible regardless of how the
/// host stores them.
pub trait AgentId: Copy + Ord + Eq + Debug + 'static {
    fn stable_id(self) -> u64;
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        u64::from(self)
    }
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

/// Read-only world access.
///
/// The core crate does not prescribe any queries; motion, perception and behavior crates
/// define extension traits on top of this one.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
