use core::marker::PhantomData;

use crate::{ControlHandler, HandlerKey, Lifetime, TickContext, WorldMut};

/// What happened to the top of a stack during one [`ControlHandlerStack::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to run.
    Empty,
    /// The top handler ran and stays active.
    Running(HandlerKey),
    /// The top handler's `update` returned `false`.
    ///
    /// `popped` is `false` when the handler was the last one on the stack and was kept.
    Completed { key: HandlerKey, popped: bool },
    /// The top handler ran out of lifetime before its update.
    Expired { key: HandlerKey, popped: bool },
}

impl TickOutcome {
    /// Key of the handler that finished this tick, if any.
    pub fn finished(self) -> Option<HandlerKey> {
        match self {
            TickOutcome::Completed { key, .. } | TickOutcome::Expired { key, .. } => Some(key),
            TickOutcome::Empty | TickOutcome::Running(_) => None,
        }
    }

    /// The last handler finished but stayed on the stack because a stack is never emptied by
    /// completion alone. Hosts use this to despawn self-terminating agents such as projectiles.
    pub fn is_stalled(self) -> bool {
        matches!(
            self,
            TickOutcome::Completed { popped: false, .. }
                | TickOutcome::Expired { popped: false, .. }
        )
    }
}

struct Slot<H> {
    id: u64,
    key: HandlerKey,
    lifetime: Lifetime,
    /// `None` while the handler is running its own update.
    handler: Option<H>,
}

/// Ordered handlers for one agent; the last element is the active top.
pub struct ControlHandlerStack<W, H>
where
    W: WorldMut + 'static,
    H: ControlHandler<W>,
{
    slots: Vec<Slot<H>>,
    next_id: u64,
    /// Set once the running handler's slot is removed during its own update.
    running_removed: bool,
    /// Handlers below the running one, disposed after it when its update returns.
    deferred: Vec<H>,
    _world: PhantomData<fn(&mut W)>,
}

impl<W, H> ControlHandlerStack<W, H>
where
    W: WorldMut + 'static,
    H: ControlHandler<W>,
{
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            running_removed: false,
            deferred: Vec::new(),
            _world: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn top_key(&self) -> Option<HandlerKey> {
        self.slots.last().map(|s| s.key)
    }

    /// Remaining lifetime of the top handler.
    pub fn top_lifetime(&self) -> Option<Lifetime> {
        self.slots.last().map(|s| s.lifetime)
    }

    /// Handler keys from bottom to top.
    pub fn keys(&self) -> Vec<HandlerKey> {
        self.slots.iter().map(|s| s.key).collect()
    }

    pub fn contains(&self, key: HandlerKey) -> bool {
        self.slots.iter().any(|s| s.key == key)
    }

    /// The top handler, unless it is the one currently running.
    pub fn top(&self) -> Option<&H> {
        self.slots.last().and_then(|s| s.handler.as_ref())
    }

    pub fn top_mut(&mut self) -> Option<&mut H> {
        self.slots.last_mut().and_then(|s| s.handler.as_mut())
    }

    pub fn get(&self, index: usize) -> Option<&H> {
        self.slots.get(index).and_then(|s| s.handler.as_ref())
    }

    fn slot(&mut self, handler: H) -> Slot<H> {
        let id = self.next_id;
        self.next_id += 1;
        Slot {
            id,
            key: handler.key(),
            lifetime: handler.lifetime(),
            handler: Some(handler),
        }
    }

    /// Make `handler` the new top if it passes the activation chain.
    ///
    /// A rejected or already-expired handler is disposed and the stack is left untouched.
    pub fn push(&mut self, mut handler: H, agent: W::Agent, world: &mut W) -> bool {
        let previous = self.top_key();
        let key = handler.key();

        if handler.lifetime().is_expired() {
            tracing::trace!(agent = ?agent, handler = %key, "handler expired before activation");
            handler.dispose(agent, world);
            return false;
        }

        if !handler.try_activate(previous, agent, world) {
            tracing::trace!(
                agent = ?agent,
                handler = %key,
                previous = ?previous,
                "activation rejected"
            );
            handler.dispose(agent, world);
            return false;
        }

        let slot = self.slot(handler);
        self.slots.push(slot);
        tracing::debug!(agent = ?agent, handler = %key, depth = self.slots.len(), "pushed handler");
        true
    }

    /// Place `handler` at `index` without running the activation chain.
    ///
    /// An index at or past the top goes through [`push`](Self::push) instead, because the
    /// handler would take control immediately.
    pub fn insert(&mut self, index: usize, handler: H, agent: W::Agent, world: &mut W) -> bool {
        if index >= self.slots.len() {
            return self.push(handler, agent, world);
        }

        let key = handler.key();
        let slot = self.slot(handler);
        self.slots.insert(index, slot);
        tracing::debug!(agent = ?agent, handler = %key, index, "inserted handler");
        true
    }

    /// Dispose and remove the top handler. Refused when it is the only one left.
    pub fn pop(&mut self, agent: W::Agent, world: &mut W) -> bool {
        if self.slots.len() <= 1 {
            tracing::trace!(agent = ?agent, top = ?self.top_key(), "refusing to pop last handler");
            return false;
        }

        if let Some(slot) = self.slots.pop() {
            tracing::debug!(agent = ?agent, handler = %slot.key, "popped handler");
            self.dispose_slot(slot, agent, world);
        }
        true
    }

    /// Removed slots are disposed in removal order. The running handler is disposed by `tick`
    /// once its update returns, so anything removed after it waits until then.
    fn dispose_slot(&mut self, slot: Slot<H>, agent: W::Agent, world: &mut W) {
        match slot.handler {
            None => self.running_removed = true,
            Some(handler) if self.running_removed => self.deferred.push(handler),
            Some(mut handler) => handler.dispose(agent, world),
        }
    }

    /// Dispose every handler top to bottom, then install `handlers` (first = bottom).
    ///
    /// # Panics
    ///
    /// Panics if `handlers` is empty: a live agent always has a behavior.
    pub fn reset<I>(&mut self, handlers: I, agent: W::Agent, world: &mut W)
    where
        I: IntoIterator<Item = H>,
    {
        let handlers: Vec<H> = handlers.into_iter().collect();
        assert!(
            !handlers.is_empty(),
            "reset requires at least one handler (agent {agent:?})"
        );

        self.dispose_all(agent, world);
        for handler in handlers {
            let slot = self.slot(handler);
            self.slots.push(slot);
        }
        tracing::debug!(agent = ?agent, keys = ?self.keys(), "reset handler stack");
    }

    /// Dispose every handler top to bottom and leave the stack empty.
    ///
    /// Only meant for tearing an agent down; live agents use [`reset`](Self::reset).
    pub fn dispose_all(&mut self, agent: W::Agent, world: &mut W) {
        while let Some(slot) = self.slots.pop() {
            self.dispose_slot(slot, agent, world);
        }
    }

    /// Run one frame of the top handler.
    pub fn tick(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) -> TickOutcome {
        let Some(top) = self.slots.last_mut() else {
            return TickOutcome::Empty;
        };
        let key = top.key;

        if top.lifetime.advance(ctx.dt()) {
            let popped = self.pop(agent, world);
            if popped {
                tracing::debug!(agent = ?agent, handler = %key, "handler expired");
            }
            return TickOutcome::Expired { key, popped };
        }

        let id = top.id;
        let Some(mut handler) = top.handler.take() else {
            return TickOutcome::Running(key);
        };

        let keep = handler.update(ctx, agent, world, self);

        let Some(index) = self.slots.iter().position(|s| s.id == id) else {
            // Removed during its own update (self-pop or reset).
            handler.dispose(agent, world);
            self.running_removed = false;
            for mut below in core::mem::take(&mut self.deferred) {
                below.dispose(agent, world);
            }
            return TickOutcome::Completed { key, popped: true };
        };

        if keep {
            self.slots[index].handler = Some(handler);
            return TickOutcome::Running(key);
        }

        if self.slots.len() <= 1 {
            tracing::trace!(agent = ?agent, handler = %key, "last handler completed; keeping it");
            self.slots[index].handler = Some(handler);
            return TickOutcome::Completed { key, popped: false };
        }

        self.slots.remove(index);
        handler.dispose(agent, world);
        tracing::debug!(agent = ?agent, handler = %key, "handler completed");
        TickOutcome::Completed { key, popped: true }
    }
}

impl<W, H> Default for ControlHandlerStack<W, H>
where
    W: WorldMut + 'static,
    H: ControlHandler<W>,
{
    fn default() -> Self {
        Self::new()
    }
}
