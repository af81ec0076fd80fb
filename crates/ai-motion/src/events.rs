use ai_core::WorldMut;

/// Handle for a landing-event subscription. Must be handed back to
/// [`LandingEvents::unsubscribe`] exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subscription(pub u64);

/// "Agent touched ground" notifications from the physics engine.
pub trait LandingEvents: WorldMut {
    fn subscribe_landed(&mut self, agent: Self::Agent) -> Subscription;

    fn unsubscribe(&mut self, subscription: Subscription);

    /// Whether the subscribed agent landed since the last call; clears the flag.
    fn take_landed(&mut self, subscription: Subscription) -> bool;
}
