//! Tile-grid level implementing every world trait the behaviors need.
//!
//! Bodies are axis-aligned boxes positioned by their centre. They collide with solid tiles only,
//! never with each other; the simulation checks projectile/player overlap itself.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use ai_behaviors::{PlatformerWorld, ProjectileSpawn};
use ai_core::{WorldMut, WorldView};
use ai_motion::{
    Collisions, Direction, Kinematics, LandingEvents, MotionWorld, PhysicsWorld, Subscription,
    Vec2,
};
use ai_perception::{layers, CollisionMask, PerceptionWorld, RayHit};

use crate::SimError;

/// Gap left between a body and the tile it was pushed out of.
const SKIN: f32 = 1e-4;
/// Longest move resolved in one collision pass, in tiles.
const SUBSTEP: f32 = 0.25;
/// How far past a body's leading edge and below its feet ground is probed, in tiles.
const PROBE: f32 = 0.1;
/// Ray-march increment against terrain, in tiles.
const RAY_STEP: f32 = 0.05;
/// Padding around the grid that still counts as inside the level, in tiles.
const BOUNDS_MARGIN: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub half_extents: Vec2,
    /// Single perception layer bit, see [`ai_perception::layers`].
    pub layer: CollisionMask,
    pub kinematics: Kinematics,
    pub contacts: Collisions,
}

impl Body {
    pub fn new(
        position: Vec2,
        half_extents: Vec2,
        layer: CollisionMask,
        facing: Direction,
    ) -> Self {
        Self {
            position,
            half_extents,
            layer,
            kinematics: Kinematics::facing(facing),
            contacts: Collisions::default(),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.position - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.position + self.half_extents
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        let (a_min, a_max, b_min, b_max) = (self.min(), self.max(), other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// Entry distance of a ray into this box, `0` when the origin is inside.
    fn ray_entry(&self, origin: Vec2, direction: Vec2) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut near = 0.0f32;
        let mut far = f32::INFINITY;
        for (o, d, lo, hi) in [
            (origin.x, direction.x, min.x, max.x),
            (origin.y, direction.y, min.y, max.y),
        ] {
            if d.abs() < 1e-9 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (a, b) = ((lo - o) / d, (hi - o) / d);
            near = near.max(a.min(b));
            far = far.min(a.max(b));
            if near > far {
                return None;
            }
        }
        Some(near)
    }
}

/// A grid of solid or empty square tiles with `y` pointing up and tile `(0, 0)` at the origin.
#[derive(Debug, Clone)]
pub struct TileLevel {
    tile_size: f32,
    width: usize,
    height: usize,
    /// Row-major, bottom row first.
    solid: Vec<bool>,
    bodies: BTreeMap<u32, Body>,
    next_agent: u32,
    subscriptions: BTreeMap<u64, (u32, bool)>,
    next_subscription: u64,
    spawns: Vec<ProjectileSpawn<u32>>,
}

impl TileLevel {
    /// Parse rows of `#` (solid) and `.` or space (empty), top row first.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, SimError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(SimError::TileSize(tile_size));
        }
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if height == 0 || width == 0 {
            return Err(SimError::EmptyLevel);
        }

        let mut solid = vec![false; width * height];
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(SimError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = height - 1 - row;
            for (column, tile) in line.chars().enumerate() {
                solid[y * width + column] = match tile {
                    '#' => true,
                    '.' | ' ' => false,
                    _ => return Err(SimError::UnknownTile { row, column, tile }),
                };
            }
        }

        Ok(Self {
            tile_size,
            width,
            height,
            solid,
            bodies: BTreeMap::new(),
            next_agent: 0,
            subscriptions: BTreeMap::new(),
            next_subscription: 1,
            spawns: Vec::new(),
        })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Grid size in tiles.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Add a body under a fresh agent id.
    pub fn spawn_body(&mut self, body: Body) -> u32 {
        let agent = self.next_agent;
        self.next_agent += 1;
        self.bodies.insert(agent, body);
        agent
    }

    pub fn remove_body(&mut self, agent: u32) -> Option<Body> {
        self.bodies.remove(&agent)
    }

    pub fn body(&self, agent: u32) -> Option<&Body> {
        self.bodies.get(&agent)
    }

    pub fn overlapping(&self, a: u32, b: u32) -> bool {
        match (self.bodies.get(&a), self.bodies.get(&b)) {
            (Some(a), Some(b)) => a.overlaps(b),
            _ => false,
        }
    }

    /// Projectiles requested since the last call.
    pub fn take_spawns(&mut self) -> Vec<ProjectileSpawn<u32>> {
        std::mem::take(&mut self.spawns)
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_solid_at(&self, point: Vec2) -> bool {
        let column = (point.x / self.tile_size).floor() as i64;
        let row = (point.y / self.tile_size).floor() as i64;
        self.is_solid_tile(column, row)
    }

    fn is_solid_tile(&self, column: i64, row: i64) -> bool {
        if column < 0 || row < 0 || column >= self.width as i64 || row >= self.height as i64 {
            return false;
        }
        self.solid[row as usize * self.width + column as usize]
    }

    /// Tiles touched by the open interval `(lo, hi)`.
    fn tile_span(&self, lo: f32, hi: f32) -> RangeInclusive<i64> {
        let first = (lo / self.tile_size).floor() as i64;
        let last = (hi / self.tile_size).ceil() as i64 - 1;
        first..=last
    }

    fn overlaps_solid(&self, center: Vec2, half: Vec2) -> bool {
        let rows = self.tile_span(center.y - half.y, center.y + half.y);
        self.tile_span(center.x - half.x, center.x + half.x)
            .any(|column| rows.clone().any(|row| self.is_solid_tile(column, row)))
    }

    /// Centre coordinate that puts the leading edge just outside the tile it moved into.
    fn push_out(&self, center: f32, half: f32, delta: f32) -> f32 {
        if delta > 0.0 {
            let boundary = ((center + half) / self.tile_size).floor() * self.tile_size;
            boundary - half - SKIN
        } else {
            let boundary = ((center - half) / self.tile_size).floor() * self.tile_size;
            boundary + self.tile_size + half + SKIN
        }
    }

    fn march_terrain(&self, origin: Vec2, direction: Vec2, limit: f32) -> Option<f32> {
        let step = self.tile_size * RAY_STEP;
        let mut travelled = 0.0;
        while travelled < limit {
            if self.is_solid_at(origin + direction * travelled) {
                return Some(travelled);
            }
            travelled += step;
        }
        None
    }
}

impl WorldView for TileLevel {
    type Agent = u32;
}

impl WorldMut for TileLevel {}

impl PhysicsWorld for TileLevel {
    fn collisions(&self, agent: u32) -> Collisions {
        self.bodies
            .get(&agent)
            .map(|body| body.contacts)
            .unwrap_or_default()
    }

    fn move_agent(&mut self, agent: u32, displacement: Vec2) -> Collisions {
        let Some(mut body) = self.bodies.get(&agent).copied() else {
            return Collisions::default();
        };
        let was_grounded = body.contacts.below;
        let half = body.half_extents;
        let mut contacts = Collisions::default();

        let longest = displacement.x.abs().max(displacement.y.abs());
        let steps = ((longest / (self.tile_size * SUBSTEP)).ceil() as usize).max(1);
        let step = displacement / steps as f32;
        let (mut blocked_x, mut blocked_y) = (false, false);

        for _ in 0..steps {
            if !blocked_x && step.x != 0.0 {
                body.position.x += step.x;
                if self.overlaps_solid(body.position, half) {
                    body.position.x = self.push_out(body.position.x, half.x, step.x);
                    blocked_x = true;
                    if step.x > 0.0 {
                        contacts.right = true;
                    } else {
                        contacts.left = true;
                    }
                }
            }
            if !blocked_y && step.y != 0.0 {
                body.position.y += step.y;
                if self.overlaps_solid(body.position, half) {
                    body.position.y = self.push_out(body.position.y, half.y, step.y);
                    blocked_y = true;
                    contacts.below = step.y < 0.0;
                }
            }
        }

        // Resting on a tile without pressing into it still counts as standing.
        if displacement.y <= 0.0
            && !contacts.below
            && self.overlaps_solid(body.position - Vec2::new(0.0, 2.0 * SKIN), half)
        {
            contacts.below = true;
        }

        if contacts.below && !was_grounded {
            for (owner, landed) in self.subscriptions.values_mut() {
                if *owner == agent {
                    *landed = true;
                }
            }
            tracing::trace!(agent, x = body.position.x, y = body.position.y, "landed");
        }

        body.contacts = contacts;
        self.bodies.insert(agent, body);
        contacts
    }

    fn is_grounded_ahead(&self, agent: u32, direction: Direction) -> bool {
        let Some(body) = self.bodies.get(&agent) else {
            return false;
        };
        let probe = self.tile_size * PROBE;
        let ahead = Vec2::new(
            body.position.x + direction.sign() * (body.half_extents.x + probe),
            body.min().y - probe,
        );
        self.is_solid_at(ahead)
    }
}

impl MotionWorld for TileLevel {
    fn position(&self, agent: u32) -> Option<Vec2> {
        self.bodies.get(&agent).map(|body| body.position)
    }

    fn set_position(&mut self, agent: u32, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.position = position;
            body.contacts = Collisions::default();
        }
    }

    fn kinematics(&self, agent: u32) -> Option<Kinematics> {
        self.bodies.get(&agent).map(|body| body.kinematics)
    }

    fn set_kinematics(&mut self, agent: u32, kinematics: Kinematics) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.kinematics = kinematics;
        }
    }
}

impl PerceptionWorld for TileLevel {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
        ignore: u32,
    ) -> Option<RayHit<u32>> {
        let mut best: Option<RayHit<u32>> = None;
        for (&agent, body) in &self.bodies {
            if agent == ignore || !layers::contains(mask, body.layer) {
                continue;
            }
            let Some(distance) = body.ray_entry(origin, direction) else {
                continue;
            };
            if distance <= max_distance && best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit {
                    target: Some(agent),
                    point: origin + direction * distance,
                    distance,
                });
            }
        }

        if layers::contains(mask, layers::TERRAIN) {
            let limit = best.map_or(max_distance, |hit| hit.distance);
            if let Some(distance) = self.march_terrain(origin, direction, limit) {
                best = Some(RayHit {
                    target: None,
                    point: origin + direction * distance,
                    distance,
                });
            }
        }
        best
    }
}

impl LandingEvents for TileLevel {
    fn subscribe_landed(&mut self, agent: u32) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscriptions.insert(id, (agent, false));
        Subscription(id)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        if self.subscriptions.remove(&subscription.0).is_none() {
            tracing::warn!(subscription = subscription.0, "unsubscribe of unknown subscription");
        }
    }

    fn take_landed(&mut self, subscription: Subscription) -> bool {
        self.subscriptions
            .get_mut(&subscription.0)
            .map(|(_, landed)| std::mem::take(landed))
            .unwrap_or(false)
    }
}

impl PlatformerWorld for TileLevel {
    fn spawn_projectile(&mut self, spawn: ProjectileSpawn<u32>) {
        self.spawns.push(spawn);
    }

    fn in_bounds(&self, position: Vec2) -> bool {
        let margin = BOUNDS_MARGIN * self.tile_size;
        let right = self.width as f32 * self.tile_size + margin;
        position.x >= -margin && position.x <= right && position.y >= -margin
    }
}
