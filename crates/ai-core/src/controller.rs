use crate::{AgentId, ControlHandler, ControlHandlerStack, TickContext, TickOutcome, WorldMut};

/// Binds an agent id to its handler stack and forwards the per-frame tick.
pub struct Controller<W, H>
where
    W: WorldMut + 'static,
    H: ControlHandler<W>,
{
    pub agent: W::Agent,
    pub stack: ControlHandlerStack<W, H>,
}

impl<W, H> Controller<W, H>
where
    W: WorldMut + 'static,
    H: ControlHandler<W>,
{
    /// A controller with an empty stack; install a behavior with `reset` or `insert` before
    /// the first tick.
    pub fn new(agent: W::Agent) -> Self {
        Self {
            agent,
            stack: ControlHandlerStack::new(),
        }
    }

    /// A controller whose stack holds exactly `handler`.
    pub fn with_handler(agent: W::Agent, handler: H, world: &mut W) -> Self {
        let mut controller = Self::new(agent);
        controller.stack.reset([handler], agent, world);
        controller
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> TickOutcome {
        self.stack.tick(ctx, self.agent, world)
    }

    pub fn push(&mut self, handler: H, world: &mut W) -> bool {
        self.stack.push(handler, self.agent, world)
    }

    pub fn insert(&mut self, index: usize, handler: H, world: &mut W) -> bool {
        self.stack.insert(index, handler, self.agent, world)
    }

    pub fn pop(&mut self, world: &mut W) -> bool {
        self.stack.pop(self.agent, world)
    }

    pub fn reset<I>(&mut self, handlers: I, world: &mut W)
    where
        I: IntoIterator<Item = H>,
    {
        self.stack.reset(handlers, self.agent, world);
    }

    /// Tear the agent down, disposing every handler exactly once.
    pub fn despawn(mut self, world: &mut W) {
        self.stack.dispose_all(self.agent, world);
    }
}

/// Tick every controller once, in stable agent order.
pub fn tick_controllers<W, H>(
    ctx: &TickContext,
    world: &mut W,
    controllers: &mut [Controller<W, H>],
) -> Vec<(W::Agent, TickOutcome)>
where
    W: WorldMut + 'static,
    H: ControlHandler<W>,
{
    controllers.sort_by_key(|c| c.agent.stable_id());
    controllers
        .iter_mut()
        .map(|controller| (controller.agent, controller.tick(ctx, world)))
        .collect()
}
