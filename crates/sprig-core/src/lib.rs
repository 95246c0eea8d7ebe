//! Sprig Core - Foundational types for the sprig runtime
//!
//! This crate provides the types every other sprig crate depends on:
//! - `ResourceId` - Monotonic, never-reused identifiers
//! - `ResourceRegistry` - The id → resource map that stands in for references
//! - `Aabb`, `Color` and angle helpers - 2D spatial types
//! - `SpriteInfo` / `Sprite` - The sprite capability consumed by collision and drawing
//! - Error types and Result alias

mod error;
mod id;
mod resource;
mod sprite;
mod types;

pub use error::{Result, SprigError};
pub use id::ResourceId;
pub use resource::{Resource, ResourceKind, ResourceRegistry};
pub use sprite::{Sprite, SpriteFrame, SpriteInfo};
pub use types::{lengthdir_x, lengthdir_y, normalize_degrees, point_direction, point_distance, Aabb, Color};
