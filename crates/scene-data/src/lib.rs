//! Scene data types and ingestion for the orrery viewer.
//!
//! This crate contains pure data structures with no rendering logic. Scenes
//! arrive as JSON, are validated once at the ingestion boundary, and are then
//! treated as immutable snapshots by everything downstream.

pub mod error;
pub mod scene;
pub mod validate;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use error::{CoordinateField, SceneError};
pub use scene::{Asteroid, SceneData, SceneMetadata};
pub use validate::validate_scene;
