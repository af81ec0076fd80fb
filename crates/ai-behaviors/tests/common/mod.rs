#![allow(dead_code)]

use std::collections::BTreeMap;

use ai_behaviors::{PlatformerWorld, ProjectileSpawn};
use ai_core::{TickContext, WorldMut, WorldView};
use ai_motion::{
    Collisions, Direction, Kinematics, LandingEvents, MotionWorld, PhysicsWorld, Subscription,
    Vec2,
};
use ai_perception::{layers, CollisionMask, PerceptionWorld, RayHit};

pub const ENEMY: u32 = 1;
pub const PLAYER: u32 = 2;
pub const SHOT: u32 = 3;

/// Radius agents present to perception rays.
const BODY_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub kinematics: Kinematics,
    pub contacts: Collisions,
}

/// Flat floor at `y = 0` spanning `floor`, point-sized agents, optional vertical walls.
#[derive(Debug)]
pub struct Stage {
    pub bodies: BTreeMap<u32, Body>,
    pub floor: (f32, f32),
    pub probe: f32,
    pub walls: Vec<f32>,
    pub kill_height: f32,
    pub subscriptions: BTreeMap<u64, (u32, bool)>,
    pub unsubscribed: Vec<u64>,
    /// Owner's facing at the moment each subscription was dropped.
    pub facing_at_unsubscribe: Vec<Direction>,
    next_subscription: u64,
    pub projectiles: Vec<ProjectileSpawn<u32>>,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            bodies: BTreeMap::new(),
            floor: (0.0, 20.0),
            probe: 0.25,
            walls: Vec::new(),
            kill_height: -50.0,
            subscriptions: BTreeMap::new(),
            unsubscribed: Vec::new(),
            facing_at_unsubscribe: Vec::new(),
            next_subscription: 1,
            projectiles: Vec::new(),
        }
    }
}

impl Stage {
    pub fn with(mut self, agent: u32, position: Vec2, direction: Direction) -> Self {
        self.place(agent, position, direction);
        self
    }

    pub fn place(&mut self, agent: u32, position: Vec2, direction: Direction) {
        let grounded = position.y == 0.0 && self.over_floor(position.x);
        self.bodies.insert(
            agent,
            Body {
                position,
                kinematics: Kinematics::facing(direction),
                contacts: Collisions {
                    below: grounded,
                    ..Collisions::default()
                },
            },
        );
    }

    pub fn body(&self, agent: u32) -> Body {
        self.bodies[&agent]
    }

    pub fn position_of(&self, agent: u32) -> Vec2 {
        self.bodies[&agent].position
    }

    pub fn direction_of(&self, agent: u32) -> Direction {
        self.bodies[&agent].kinematics.direction
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    fn over_floor(&self, x: f32) -> bool {
        x >= self.floor.0 && x <= self.floor.1
    }
}

impl WorldView for Stage {
    type Agent = u32;
}

impl WorldMut for Stage {}

impl PhysicsWorld for Stage {
    fn collisions(&self, agent: u32) -> Collisions {
        self.bodies
            .get(&agent)
            .map(|b| b.contacts)
            .unwrap_or_default()
    }

    fn move_agent(&mut self, agent: u32, displacement: Vec2) -> Collisions {
        let Some(body) = self.bodies.get(&agent).copied() else {
            return Collisions::default();
        };
        let mut next = body.position + displacement;
        let mut contacts = Collisions::default();

        for &wall in &self.walls {
            let crosses = (body.position.x - wall) * (next.x - wall) <= 0.0;
            if crosses && displacement.x != 0.0 {
                next.x = body.position.x;
                if displacement.x > 0.0 {
                    contacts.right = true;
                } else {
                    contacts.left = true;
                }
            }
        }
        if body.position.y >= 0.0 && next.y <= 0.0 && self.over_floor(next.x) {
            next.y = 0.0;
            contacts.below = true;
        }

        if contacts.below && !body.contacts.below {
            for (owner, landed) in self.subscriptions.values_mut() {
                if *owner == agent {
                    *landed = true;
                }
            }
        }

        if let Some(body) = self.bodies.get_mut(&agent) {
            body.position = next;
            body.contacts = contacts;
        }
        contacts
    }

    fn is_grounded_ahead(&self, agent: u32, direction: Direction) -> bool {
        self.bodies.get(&agent).is_some_and(|b| {
            b.position.y == 0.0 && self.over_floor(b.position.x + direction.sign() * self.probe)
        })
    }
}

impl MotionWorld for Stage {
    fn position(&self, agent: u32) -> Option<Vec2> {
        self.bodies.get(&agent).map(|b| b.position)
    }

    fn set_position(&mut self, agent: u32, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.position = position;
        }
    }

    fn kinematics(&self, agent: u32) -> Option<Kinematics> {
        self.bodies.get(&agent).map(|b| b.kinematics)
    }

    fn set_kinematics(&mut self, agent: u32, kinematics: Kinematics) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.kinematics = kinematics;
        }
    }
}

impl PerceptionWorld for Stage {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
        ignore: u32,
    ) -> Option<RayHit<u32>> {
        let mut best: Option<RayHit<u32>> = None;
        let mut consider = |hit: RayHit<u32>| {
            if hit.distance <= max_distance && best.is_none_or(|b| hit.distance < b.distance) {
                best = Some(hit);
            }
        };

        for (&id, body) in &self.bodies {
            if id == ignore {
                continue;
            }
            let offset = body.position - origin;
            let along = offset.dot(direction);
            if along < 0.0 || (offset - direction * along).length() > BODY_RADIUS {
                continue;
            }
            consider(RayHit {
                target: Some(id),
                point: origin + direction * along,
                distance: along,
            });
        }

        if layers::contains(mask, layers::TERRAIN) && direction.x.abs() > 1e-6 {
            for &wall in &self.walls {
                let along = (wall - origin.x) / direction.x;
                if along >= 0.0 {
                    consider(RayHit {
                        target: None,
                        point: origin + direction * along,
                        distance: along,
                    });
                }
            }
        }
        best
    }
}

impl LandingEvents for Stage {
    fn subscribe_landed(&mut self, agent: u32) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscriptions.insert(id, (agent, false));
        Subscription(id)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        let Some((owner, _)) = self.subscriptions.remove(&subscription.0) else {
            panic!("double unsubscribe of {subscription:?}");
        };
        self.unsubscribed.push(subscription.0);
        if let Some(body) = self.bodies.get(&owner) {
            self.facing_at_unsubscribe.push(body.kinematics.direction);
        }
    }

    fn take_landed(&mut self, subscription: Subscription) -> bool {
        self.subscriptions
            .get_mut(&subscription.0)
            .map(|(_, landed)| std::mem::take(landed))
            .unwrap_or(false)
    }
}

impl PlatformerWorld for Stage {
    fn spawn_projectile(&mut self, spawn: ProjectileSpawn<u32>) {
        self.projectiles.push(spawn);
    }

    fn in_bounds(&self, position: Vec2) -> bool {
        position.y > self.kill_height
    }
}

/// Contexts for `count` consecutive frames of length `dt`.
pub fn frames(dt: f32, count: usize) -> impl Iterator<Item = TickContext> {
    std::iter::successors(Some(TickContext::first(dt)), |ctx| Some(ctx.next())).take(count)
}
