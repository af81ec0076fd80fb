//! Line-of-sight perception for platformer agents.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod layers;
pub mod scanner;

pub use layers::CollisionMask;
pub use scanner::{
    DetectThreshold, PerceptionResult, PerceptionScanner, PerceptionWorld, RayHit, ScanConfig,
};
