//! Platformer locomotion, physics-query contracts and ballistic trajectory solving.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod events;
pub mod math;
pub mod movement;
pub mod physics;
pub mod trajectory;

pub use events::{LandingEvents, Subscription};
pub use math::{Direction, Vec2};
pub use movement::{jump_velocity, EdgePolicy, MoveResult, MovementConfig, MovementSolver};
pub use physics::{Collisions, Kinematics, MotionWorld, PhysicsWorld};
pub use trajectory::{
    flight_time, position_at, solve_launch_velocity, TrajectoryError, TrajectoryParams,
};
