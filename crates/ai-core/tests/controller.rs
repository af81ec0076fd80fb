use ai_core::{
    tick_controllers, ControlHandler, ControlHandlerStack, Controller, HandlerKey, TickContext,
    TickOutcome, WorldMut, WorldView,
};

#[derive(Debug, Default)]
struct OrderWorld {
    ticked: Vec<u32>,
    disposed: Vec<(u32, &'static str)>,
}

impl WorldView for OrderWorld {
    type Agent = u32;
}

impl WorldMut for OrderWorld {}

struct Named(&'static str);

impl ControlHandler<OrderWorld> for Named {
    fn key(&self) -> HandlerKey {
        HandlerKey(self.0)
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        agent: u32,
        world: &mut OrderWorld,
        _stack: &mut ControlHandlerStack<OrderWorld, Self>,
    ) -> bool {
        world.ticked.push(agent);
        true
    }

    fn dispose(&mut self, agent: u32, world: &mut OrderWorld) {
        world.disposed.push((agent, self.0));
    }
}

#[test]
fn controllers_tick_in_stable_id_order() {
    let mut world = OrderWorld::default();
    let mut controllers = vec![
        Controller::with_handler(30, Named("idle"), &mut world),
        Controller::with_handler(10, Named("idle"), &mut world),
        Controller::with_handler(20, Named("idle"), &mut world),
    ];

    let outcomes = tick_controllers(&TickContext::first(0.1), &mut world, &mut controllers);

    assert_eq!(world.ticked, vec![10, 20, 30]);
    assert!(outcomes
        .iter()
        .all(|(_, outcome)| *outcome == TickOutcome::Running(HandlerKey("idle"))));
}

#[test]
fn despawn_disposes_every_handler_once() {
    let mut world = OrderWorld::default();
    let mut controller = Controller::with_handler(4, Named("patrol"), &mut world);
    assert!(controller.push(Named("chase"), &mut world));

    controller.despawn(&mut world);

    assert_eq!(world.disposed, vec![(4, "chase"), (4, "patrol")]);
}

#[test]
fn new_controller_starts_empty_until_a_behavior_is_inserted() {
    let mut world = OrderWorld::default();
    let mut controller: Controller<OrderWorld, Named> = Controller::new(1);
    assert_eq!(controller.tick(&TickContext::first(0.1), &mut world), TickOutcome::Empty);

    assert!(controller.insert(0, Named("default"), &mut world));
    assert_eq!(
        controller.tick(&TickContext::first(0.1), &mut world),
        TickOutcome::Running(HandlerKey("default"))
    );
}

#[test]
fn tick_context_advances_time() {
    let ctx = TickContext::first(0.25).next().next();
    assert_eq!(ctx.tick, 2);
    assert!((ctx.time_seconds - 0.5).abs() < 1e-6);
}
