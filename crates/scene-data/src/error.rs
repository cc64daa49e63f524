//! Errors raised while reading and validating a scene.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while ingesting a scene payload.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The scene file could not be read.
    #[error("failed to read scene file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not valid JSON or does not match the scene schema.
    ///
    /// Wrong coordinate arity (e.g. `[1, 2]` for a position) lands here.
    #[error("scene JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An asteroid has an empty identifier.
    #[error("asteroid at index {index} has an empty id")]
    EmptyId { index: usize },

    /// Two asteroids share the same identifier.
    #[error("duplicate asteroid id {0:?}")]
    DuplicateId(String),

    /// A position or orbit coordinate is NaN or infinite.
    #[error("asteroid {id:?} has a non-finite {field}")]
    NonFinite { id: String, field: CoordinateField },

    /// An asteroid size is zero, negative, or not finite.
    #[error("asteroid {id:?} has invalid size {size}")]
    InvalidSize { id: String, size: f32 },
}

/// Which coordinate of an asteroid failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateField {
    /// The body position.
    Position,
    /// A point of the orbit path, by index.
    OrbitPoint(usize),
}

impl std::fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateField::Position => write!(f, "position"),
            CoordinateField::OrbitPoint(index) => write!(f, "orbit point {}", index),
        }
    }
}
