//! Render projection: raw scene data to draw-ready bodies and orbit paths.
//!
//! Stateless. Every function here is a pure mapping from a scene snapshot,
//! a scale factor, and the current selection to render-space geometry plus
//! its visual encoding.

use bevy_math::Vec3;
use scene_data::{Asteroid, SceneData};

use crate::config::StyleConfig;
use crate::scale::SceneScale;

/// Bodies are never drawn smaller than this fraction of their raw size.
const MIN_SIZE_SCALE: f32 = 0.5;

/// Surface encoding for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyEncoding {
    /// sRGB base color.
    pub color: [f32; 3],
    /// Emissive intensity multiplier.
    pub emissive: f32,
}

/// Line encoding for an orbit path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitEncoding {
    /// sRGB line color.
    pub color: [f32; 3],
    /// Line opacity in `[0, 1]`.
    pub opacity: f32,
}

/// Draw data for one asteroid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedBody {
    /// Asteroid id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Render-space position.
    pub position: Vec3,
    /// Render-space sphere radius.
    pub radius: f32,
    /// Render-space orbit path, in input order.
    pub orbit: Vec<Vec3>,
    /// Whether this body is the current selection.
    pub selected: bool,
    /// Body encoding for the current selection state.
    pub body: BodyEncoding,
    /// Orbit encoding for the current selection state.
    pub orbit_style: OrbitEncoding,
}

/// Multiplies a raw point by the scale factor, elementwise.
pub fn project_point(raw: [f32; 3], scale: SceneScale) -> Vec3 {
    Vec3::from_array(raw) * scale.get()
}

/// Rendered radius for a body of raw `size`: `max(size * max(0.5, scale), floor)`.
pub fn body_radius(size: f32, scale: SceneScale, floor_radius: f32) -> f32 {
    (size * scale.get().max(MIN_SIZE_SCALE)).max(floor_radius)
}

/// Render-space position of the asteroid with this id, if it exists.
pub fn render_position(scene: &SceneData, id: &str, scale: SceneScale) -> Option<Vec3> {
    scene.find(id).map(|a| project_point(a.position, scale))
}

/// Body encoding for a selection state.
pub fn body_encoding(selected: bool, style: &StyleConfig) -> BodyEncoding {
    if selected {
        BodyEncoding {
            color: style.selected_color,
            emissive: style.selected_emissive,
        }
    } else {
        BodyEncoding {
            color: style.neutral_color,
            emissive: style.neutral_emissive,
        }
    }
}

/// Orbit encoding for a selection state.
pub fn orbit_encoding(selected: bool, style: &StyleConfig) -> OrbitEncoding {
    if selected {
        OrbitEncoding {
            color: style.selected_orbit_color,
            opacity: style.selected_orbit_opacity,
        }
    } else {
        OrbitEncoding {
            color: style.neutral_orbit_color,
            opacity: style.neutral_orbit_opacity,
        }
    }
}

/// Projects one asteroid.
pub fn project_asteroid(
    asteroid: &Asteroid,
    scale: SceneScale,
    selected: bool,
    style: &StyleConfig,
) -> ProjectedBody {
    ProjectedBody {
        id: asteroid.id.clone(),
        name: asteroid.name.clone(),
        position: project_point(asteroid.position, scale),
        radius: body_radius(asteroid.size, scale, style.floor_radius),
        orbit: asteroid
            .orbit
            .iter()
            .map(|&p| project_point(p, scale))
            .collect(),
        selected,
        body: body_encoding(selected, style),
        orbit_style: orbit_encoding(selected, style),
    }
}

/// Projects every asteroid in scene order.
///
/// A `selection` that names no asteroid in the scene selects nothing.
pub fn project_scene(
    scene: &SceneData,
    scale: SceneScale,
    selection: Option<&str>,
    style: &StyleConfig,
) -> Vec<ProjectedBody> {
    scene
        .asteroids
        .iter()
        .map(|a| project_asteroid(a, scale, selection == Some(a.id.as_str()), style))
        .collect()
}
