//! Collision layer bits used to filter perception rays.

pub type CollisionMask = u32;

/// The player character.
pub const PLAYER: CollisionMask = 1 << 0;
/// Solid level geometry.
pub const TERRAIN: CollisionMask = 1 << 1;
/// AI-controlled enemies.
pub const ENEMY: CollisionMask = 1 << 2;
pub const PROJECTILE: CollisionMask = 1 << 3;

pub const ALL: CollisionMask = PLAYER | TERRAIN | ENEMY | PROJECTILE;

/// What an enemy looking for the player should collide with.
pub const SIGHT: CollisionMask = PLAYER | TERRAIN;

pub fn contains(mask: CollisionMask, layer: CollisionMask) -> bool {
    mask & layer == layer
}
