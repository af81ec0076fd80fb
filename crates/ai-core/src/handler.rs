use core::fmt;

use crate::{ControlHandlerStack, TickContext, WorldMut};

/// Names a kind of handler. Activation gates compare keys, never handler instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerKey(pub &'static str);

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// How long a handler may stay on top of its stack.
///
/// Configuration files express this as seconds where any negative value (conventionally `-1`)
/// means "never expires"; see [`Lifetime::from_seconds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifetime {
    Infinite,
    /// Seconds left before the handler is force-completed. `0` means already expired.
    Remaining(f32),
}

impl Lifetime {
    pub fn from_seconds(seconds: f32) -> Self {
        if seconds < 0.0 {
            Lifetime::Infinite
        } else {
            Lifetime::Remaining(seconds)
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Lifetime::Infinite)
    }

    pub fn is_expired(self) -> bool {
        matches!(self, Lifetime::Remaining(left) if left <= 0.0)
    }

    /// Counts `dt` down and reports whether the lifetime has run out.
    pub fn advance(&mut self, dt: f32) -> bool {
        match self {
            Lifetime::Infinite => false,
            Lifetime::Remaining(left) => {
                *left -= dt.max(0.0);
                *left <= 0.0
            }
        }
    }

    pub fn remaining(self) -> Option<f32> {
        match self {
            Lifetime::Infinite => None,
            Lifetime::Remaining(left) => Some(left.max(0.0)),
        }
    }
}

/// One discrete behavior policy for an agent.
///
/// The stack owns the handler; the handler only knows its agent by id and reaches everything
/// else through the `world` it is handed each call.
pub trait ControlHandler<W>: Sized + 'static
where
    W: WorldMut + 'static,
{
    fn key(&self) -> HandlerKey;

    /// Duration the handler starts with when it joins a stack.
    fn lifetime(&self) -> Lifetime {
        Lifetime::Infinite
    }

    /// Gate run by [`ControlHandlerStack::push`] against the current top.
    fn try_activate(
        &mut self,
        _previous: Option<HandlerKey>,
        _agent: W::Agent,
        _world: &W,
    ) -> bool {
        true
    }

    /// Runs one frame. Returning `false` completes the handler and the stack pops it.
    ///
    /// The handler may push, insert, pop or reset `stack` while it runs; its own slot stays
    /// reserved until the call returns.
    fn update(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        stack: &mut ControlHandlerStack<W, Self>,
    ) -> bool;

    /// Called exactly once after the handler leaves its stack, whichever path removed it.
    fn dispose(&mut self, _agent: W::Agent, _world: &mut W) {}
}
