use ai_core::{
    ControlHandler, ControlHandlerStack, HandlerKey, Lifetime, TickContext, TickOutcome, WorldMut,
    WorldView,
};

#[derive(Debug, Default)]
struct RecordingWorld {
    updated: Vec<&'static str>,
    disposed: Vec<&'static str>,
}

impl WorldView for RecordingWorld {
    type Agent = u64;
}

impl WorldMut for RecordingWorld {}

#[derive(Debug, Clone, Copy)]
enum OnUpdate {
    Nothing,
    Push(fn() -> Probe),
    PopSelf,
    Reset(fn() -> Probe),
}

#[derive(Debug)]
struct Probe {
    name: &'static str,
    lifetime: Lifetime,
    refuse_after: Option<&'static str>,
    finish_after: Option<u32>,
    on_update: OnUpdate,
    updates: u32,
}

impl Probe {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            lifetime: Lifetime::Infinite,
            refuse_after: None,
            finish_after: None,
            on_update: OnUpdate::Nothing,
            updates: 0,
        }
    }

    fn lasting(mut self, seconds: f32) -> Self {
        self.lifetime = Lifetime::from_seconds(seconds);
        self
    }

    fn refusing_after(mut self, previous: &'static str) -> Self {
        self.refuse_after = Some(previous);
        self
    }

    fn finishing_after(mut self, updates: u32) -> Self {
        self.finish_after = Some(updates);
        self
    }

    fn on_update(mut self, action: OnUpdate) -> Self {
        self.on_update = action;
        self
    }
}

impl ControlHandler<RecordingWorld> for Probe {
    fn key(&self) -> HandlerKey {
        HandlerKey(self.name)
    }

    fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    fn try_activate(
        &mut self,
        previous: Option<HandlerKey>,
        _agent: u64,
        _world: &RecordingWorld,
    ) -> bool {
        match (self.refuse_after, previous) {
            (Some(refused), Some(previous)) => refused != previous.0,
            _ => true,
        }
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        agent: u64,
        world: &mut RecordingWorld,
        stack: &mut ControlHandlerStack<RecordingWorld, Self>,
    ) -> bool {
        world.updated.push(self.name);
        self.updates += 1;

        match self.on_update {
            OnUpdate::Nothing => {}
            OnUpdate::Push(make) => {
                self.on_update = OnUpdate::Nothing;
                stack.push(make(), agent, world);
            }
            OnUpdate::PopSelf => {
                stack.pop(agent, world);
            }
            OnUpdate::Reset(make) => {
                stack.reset([make()], agent, world);
            }
        }

        match self.finish_after {
            Some(limit) => self.updates < limit,
            None => true,
        }
    }

    fn dispose(&mut self, _agent: u64, world: &mut RecordingWorld) {
        world.disposed.push(self.name);
    }
}

type Stack = ControlHandlerStack<RecordingWorld, Probe>;

const AGENT: u64 = 7;

fn ctx(tick: u64, dt: f32) -> TickContext {
    TickContext::new(tick, dt, tick as f32 * dt)
}

fn stack_of(names: &[&'static str], world: &mut RecordingWorld) -> Stack {
    let mut stack = Stack::new();
    stack.reset(names.iter().map(|&n| Probe::new(n)), AGENT, world);
    stack
}

#[test]
fn push_and_pop_are_lifo() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["a"], &mut world);

    assert!(stack.push(Probe::new("b"), AGENT, &mut world));
    assert!(stack.push(Probe::new("c"), AGENT, &mut world));
    assert_eq!(stack.top_key(), Some(HandlerKey("c")));

    assert!(stack.pop(AGENT, &mut world));
    assert_eq!(stack.top_key(), Some(HandlerKey("b")));

    assert!(stack.push(Probe::new("d"), AGENT, &mut world));
    assert_eq!(stack.top_key(), Some(HandlerKey("d")));

    assert!(stack.pop(AGENT, &mut world));
    assert!(stack.pop(AGENT, &mut world));
    assert_eq!(stack.keys(), vec![HandlerKey("a")]);
    assert_eq!(world.disposed, vec!["c", "d", "b"]);
}

#[test]
fn pop_on_single_element_stack_is_a_noop() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["only"], &mut world);

    assert!(!stack.pop(AGENT, &mut world));
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.top_key(), Some(HandlerKey("only")));
    assert!(world.disposed.is_empty());
}

#[test]
fn rejected_push_disposes_the_handler_and_leaves_the_stack() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["patrol"], &mut world);

    assert!(stack.push(Probe::new("stun").refusing_after("stun"), AGENT, &mut world));
    assert!(!stack.push(Probe::new("stun").refusing_after("stun"), AGENT, &mut world));

    assert_eq!(stack.keys(), vec![HandlerKey("patrol"), HandlerKey("stun")]);
    assert_eq!(world.disposed, vec!["stun"]);
}

#[test]
fn already_expired_handler_is_not_activated() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["patrol"], &mut world);

    assert!(!stack.push(Probe::new("blink").lasting(0.0), AGENT, &mut world));
    assert_eq!(stack.len(), 1);
    assert_eq!(world.disposed, vec!["blink"]);
}

#[test]
fn finite_duration_force_pops_once_elapsed() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["idle"], &mut world);
    assert!(stack.push(Probe::new("timed").lasting(1.0), AGENT, &mut world));

    let mut outcomes = Vec::new();
    for tick in 0..4 {
        outcomes.push(stack.tick(&ctx(tick, 0.25), AGENT, &mut world));
    }

    assert_eq!(world.updated, vec!["timed", "timed", "timed"]);
    assert_eq!(
        outcomes.last().copied(),
        Some(TickOutcome::Expired {
            key: HandlerKey("timed"),
            popped: true
        })
    );
    assert_eq!(stack.top_key(), Some(HandlerKey("idle")));
    assert_eq!(world.disposed, vec!["timed"]);
}

#[test]
fn infinite_duration_is_never_force_popped() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["idle"], &mut world);
    assert!(stack.push(Probe::new("forever").lasting(-1.0), AGENT, &mut world));

    for tick in 0..10_000 {
        let outcome = stack.tick(&ctx(tick, 0.5), AGENT, &mut world);
        assert_eq!(outcome, TickOutcome::Running(HandlerKey("forever")));
    }
    assert_eq!(stack.top_key(), Some(HandlerKey("forever")));
}

#[test]
fn update_returning_false_pops_the_handler() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["idle"], &mut world);
    assert!(stack.push(Probe::new("short").finishing_after(2), AGENT, &mut world));

    assert_eq!(
        stack.tick(&ctx(0, 0.1), AGENT, &mut world),
        TickOutcome::Running(HandlerKey("short"))
    );
    assert_eq!(
        stack.tick(&ctx(1, 0.1), AGENT, &mut world),
        TickOutcome::Completed {
            key: HandlerKey("short"),
            popped: true
        }
    );
    assert_eq!(stack.top_key(), Some(HandlerKey("idle")));

    // The resumed handler does not re-run activation and simply updates next tick.
    stack.tick(&ctx(2, 0.1), AGENT, &mut world);
    assert_eq!(world.updated, vec!["short", "short", "idle"]);
}

#[test]
fn last_handler_completing_is_kept() {
    let mut world = RecordingWorld::default();
    let mut stack = Stack::new();
    stack.reset([Probe::new("solo").finishing_after(1)], AGENT, &mut world);

    let outcome = stack.tick(&ctx(0, 0.1), AGENT, &mut world);
    assert!(outcome.is_stalled());
    assert_eq!(stack.len(), 1);
    assert!(world.disposed.is_empty());
}

#[test]
fn reset_disposes_everything_top_to_bottom_before_new_updates() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["a", "b", "c"], &mut world);

    stack.reset([Probe::new("d"), Probe::new("e")], AGENT, &mut world);

    assert_eq!(world.disposed, vec!["c", "b", "a"]);
    assert!(world.updated.is_empty());
    assert_eq!(stack.keys(), vec![HandlerKey("d"), HandlerKey("e")]);

    stack.tick(&ctx(0, 0.1), AGENT, &mut world);
    assert_eq!(world.updated, vec!["e"]);
    assert_eq!(world.disposed, vec!["c", "b", "a"]);
}

#[test]
fn reset_from_the_running_top_still_disposes_top_to_bottom() {
    let mut world = RecordingWorld::default();
    let mut stack = Stack::new();
    stack.reset(
        [
            Probe::new("a"),
            Probe::new("b"),
            Probe::new("c").on_update(OnUpdate::Reset(|| Probe::new("respawned"))),
        ],
        AGENT,
        &mut world,
    );

    let outcome = stack.tick(&ctx(0, 0.1), AGENT, &mut world);

    assert_eq!(
        outcome,
        TickOutcome::Completed {
            key: HandlerKey("c"),
            popped: true
        }
    );
    assert_eq!(world.disposed, vec!["c", "b", "a"]);
    assert_eq!(stack.keys(), vec![HandlerKey("respawned")]);

    stack.tick(&ctx(1, 0.1), AGENT, &mut world);
    assert_eq!(world.updated, vec!["c", "respawned"]);
    assert_eq!(world.disposed, vec!["c", "b", "a"]);
}

#[test]
#[should_panic(expected = "reset requires at least one handler")]
fn reset_with_no_handlers_panics() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["a"], &mut world);
    stack.reset(Vec::new(), AGENT, &mut world);
}

#[test]
fn dispose_before_first_update_is_safe() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["a"], &mut world);
    assert!(stack.push(Probe::new("fresh"), AGENT, &mut world));

    stack.reset([Probe::new("b")], AGENT, &mut world);

    assert!(world.updated.is_empty());
    assert_eq!(world.disposed, vec!["fresh", "a"]);
}

#[test]
fn push_during_update_takes_control_next_tick() {
    let mut world = RecordingWorld::default();
    let mut stack = Stack::new();
    stack.reset(
        [Probe::new("patrol").on_update(OnUpdate::Push(|| Probe::new("chase")))],
        AGENT,
        &mut world,
    );

    stack.tick(&ctx(0, 0.1), AGENT, &mut world);
    assert_eq!(stack.keys(), vec![HandlerKey("patrol"), HandlerKey("chase")]);

    stack.tick(&ctx(1, 0.1), AGENT, &mut world);
    stack.tick(&ctx(2, 0.1), AGENT, &mut world);
    assert_eq!(world.updated, vec!["patrol", "chase", "chase"]);
}

#[test]
fn push_during_update_sees_the_running_handler_as_previous_top() {
    let mut world = RecordingWorld::default();
    let mut stack = Stack::new();
    stack.reset(
        [Probe::new("stun")
            .on_update(OnUpdate::Push(|| Probe::new("stun").refusing_after("stun")))],
        AGENT,
        &mut world,
    );

    stack.tick(&ctx(0, 0.1), AGENT, &mut world);

    assert_eq!(stack.keys(), vec![HandlerKey("stun")]);
    assert_eq!(world.updated, vec!["stun"]);
    assert_eq!(world.disposed, vec!["stun"]);
}

#[test]
fn completing_handler_that_pushed_a_successor_is_removed_from_below_it() {
    let mut world = RecordingWorld::default();
    let mut stack = Stack::new();
    stack.reset(
        [Probe::new("windup")
            .on_update(OnUpdate::Push(|| Probe::new("attack")))
            .finishing_after(1)],
        AGENT,
        &mut world,
    );

    let outcome = stack.tick(&ctx(0, 0.1), AGENT, &mut world);

    assert_eq!(
        outcome,
        TickOutcome::Completed {
            key: HandlerKey("windup"),
            popped: true
        }
    );
    assert_eq!(stack.keys(), vec![HandlerKey("attack")]);
    assert_eq!(world.disposed, vec!["windup"]);
}

#[test]
fn handler_popping_itself_is_disposed_exactly_once() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["idle"], &mut world);
    assert!(stack.push(
        Probe::new("leaver").on_update(OnUpdate::PopSelf),
        AGENT,
        &mut world
    ));

    stack.tick(&ctx(0, 0.1), AGENT, &mut world);

    assert_eq!(stack.keys(), vec![HandlerKey("idle")]);
    assert_eq!(world.disposed, vec!["leaver"]);
}

#[test]
fn insert_at_bottom_differs_from_push_on_a_non_empty_stack() {
    let mut world = RecordingWorld::default();

    let mut inserted = stack_of(&["interrupt"], &mut world);
    assert!(inserted.insert(0, Probe::new("default"), AGENT, &mut world));
    assert_eq!(inserted.top_key(), Some(HandlerKey("interrupt")));

    let mut pushed = stack_of(&["interrupt"], &mut world);
    assert!(pushed.push(Probe::new("default"), AGENT, &mut world));
    assert_eq!(pushed.top_key(), Some(HandlerKey("default")));

    // Once the interrupt is popped, the inserted default is what resumes.
    assert!(inserted.pop(AGENT, &mut world));
    assert_eq!(inserted.keys(), vec![HandlerKey("default")]);
}

#[test]
fn insert_below_the_top_skips_activation_and_expiry_checks() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["stun"], &mut world);

    assert!(stack.insert(
        0,
        Probe::new("stun").refusing_after("stun").lasting(0.0),
        AGENT,
        &mut world
    ));
    assert_eq!(stack.len(), 2);
    assert!(world.disposed.is_empty());
}

#[test]
fn insert_at_the_top_goes_through_activation() {
    let mut world = RecordingWorld::default();
    let mut stack = stack_of(&["stun"], &mut world);

    assert!(!stack.insert(
        1,
        Probe::new("stun").refusing_after("stun"),
        AGENT,
        &mut world
    ));
    assert_eq!(stack.len(), 1);
}

#[test]
fn empty_stack_ticks_to_empty() {
    let mut world = RecordingWorld::default();
    let mut stack = Stack::new();
    assert_eq!(stack.tick(&ctx(0, 0.1), AGENT, &mut world), TickOutcome::Empty);
}
