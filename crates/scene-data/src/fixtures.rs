//! Sample data fixtures for testing.
//!
//! This module provides ready-made scenes for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // scene-data = { path = "../scene-data", features = ["test-fixtures"] }
//!
//! use scene_data::fixtures;
//!
//! let scene = fixtures::sample_scene();
//! ```

use crate::{Asteroid, SceneData, SceneMetadata};

/// Returns the sample scene from the fixtures file.
///
/// Contains 5 main-belt and near-Earth asteroids with 16-point orbits:
/// - Ceres, Vesta, Pallas, Hygiea (main belt)
/// - Eros (near-Earth, smallest body, exercises the radius floor)
///
/// Pallas is the farthest body from the origin.
pub fn sample_scene() -> SceneData {
    let json = include_str!("../tests/fixtures/sample_scene.json");
    SceneData::from_json(json).expect("Failed to parse sample_scene.json")
}

/// Returns a scene holding a single asteroid at the given raw position.
pub fn single_asteroid_scene(id: &str, position: [f32; 3]) -> SceneData {
    SceneData {
        asteroids: vec![Asteroid {
            id: id.into(),
            name: id.into(),
            position,
            size: 1.0,
            orbit: vec![position],
        }],
        metadata: SceneMetadata {
            count: 1,
            ..Default::default()
        },
    }
}

/// Returns a scene with no asteroids.
pub fn empty_scene() -> SceneData {
    SceneData::default()
}
