//! Scene Types
//!
//! Serialization structs for the asteroid scene payload.
//!
//! A scene is a snapshot: it is replaced wholesale on reload and never
//! mutated in place. Coordinates are in raw source units; normalizing them
//! into render space is the job of the consumer.
//!
//! # Example
//!
//! ```
//! use scene_data::SceneData;
//!
//! let json = r#"{
//!     "asteroids": [
//!         { "id": "ceres", "name": "Ceres", "position": [100.0, 0.0, 0.0],
//!           "size": 4.7, "orbit": [[100.0, 0.0, 0.0], [0.0, 0.0, 100.0]] }
//!     ],
//!     "metadata": { "count": 1 }
//! }"#;
//!
//! let scene = SceneData::from_json(json).unwrap();
//! assert_eq!(scene.len(), 1);
//! assert_eq!(scene.find("ceres").unwrap().name, "Ceres");
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SceneError;
use crate::validate::validate_scene;

/// A single orbiting body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    /// Stable unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Position in raw units.
    pub position: [f32; 3],
    /// Body size in raw units. Must be positive.
    pub size: f32,
    /// Pre-computed orbit path. Order matters; the loop is not closed.
    #[serde(default)]
    pub orbit: Vec<[f32; 3]>,
}

/// Display-only scene metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {
    /// Number of asteroids the producer claims to have sent.
    #[serde(default)]
    pub count: usize,
    /// Epoch or timestamp label for the positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_point: Option<String>,
    /// Coordinate system label (e.g. "heliocentric ecliptic").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_system: Option<String>,
}

/// Complete scene payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    /// Orbiting bodies, in payload order.
    #[serde(default)]
    pub asteroids: Vec<Asteroid>,
    /// Display-only metadata.
    #[serde(default)]
    pub metadata: SceneMetadata,
}

impl SceneData {
    /// Parses and validates a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: SceneData = serde_json::from_str(json)?;
        validate_scene(&scene)?;
        Ok(scene)
    }

    /// Reads, parses, and validates a scene file.
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Looks up an asteroid by id.
    pub fn find(&self, id: &str) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id)
    }

    /// Returns true if an asteroid with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Iterates over raw body positions.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.asteroids.iter().map(|a| a.position)
    }

    /// Number of asteroids.
    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    /// Returns true if the scene has no asteroids.
    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    /// Returns true if `metadata.count` agrees with the asteroid list.
    pub fn count_matches_metadata(&self) -> bool {
        self.metadata.count == self.asteroids.len()
    }

    /// Returns the id of the asteroid after `current`, wrapping around.
    ///
    /// With no current selection (or an unknown one) this is the first id.
    pub fn next_id(&self, current: Option<&str>) -> Option<&str> {
        self.step_id(current, 1)
    }

    /// Returns the id of the asteroid before `current`, wrapping around.
    pub fn previous_id(&self, current: Option<&str>) -> Option<&str> {
        self.step_id(current, -1)
    }

    fn step_id(&self, current: Option<&str>, step: isize) -> Option<&str> {
        let len = self.asteroids.len();
        if len == 0 {
            return None;
        }

        let index = current
            .and_then(|id| self.asteroids.iter().position(|a| a.id == id))
            .map(|i| (i as isize + step).rem_euclid(len as isize) as usize)
            .unwrap_or(0);

        Some(self.asteroids[index].id.as_str())
    }
}
