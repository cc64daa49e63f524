//! Ingestion-boundary validation.
//!
//! Everything past this point assumes finite coordinates, positive sizes,
//! and unique non-empty ids.

use std::collections::HashSet;

use crate::error::{CoordinateField, SceneError};
use crate::scene::SceneData;

/// Checks a parsed scene against the invariants the renderer relies on.
///
/// Returns the first violation found, in payload order.
pub fn validate_scene(scene: &SceneData) -> Result<(), SceneError> {
    let mut seen = HashSet::with_capacity(scene.asteroids.len());

    for (index, asteroid) in scene.asteroids.iter().enumerate() {
        if asteroid.id.is_empty() {
            return Err(SceneError::EmptyId { index });
        }
        if !seen.insert(asteroid.id.as_str()) {
            return Err(SceneError::DuplicateId(asteroid.id.clone()));
        }
        if !is_finite(&asteroid.position) {
            return Err(SceneError::NonFinite {
                id: asteroid.id.clone(),
                field: CoordinateField::Position,
            });
        }
        if !asteroid.size.is_finite() || asteroid.size <= 0.0 {
            return Err(SceneError::InvalidSize {
                id: asteroid.id.clone(),
                size: asteroid.size,
            });
        }
        if let Some(point) = asteroid.orbit.iter().position(|p| !is_finite(p)) {
            return Err(SceneError::NonFinite {
                id: asteroid.id.clone(),
                field: CoordinateField::OrbitPoint(point),
            });
        }
    }

    Ok(())
}

fn is_finite(point: &[f32; 3]) -> bool {
    point.iter().all(|c| c.is_finite())
}
