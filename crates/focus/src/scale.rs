//! Scale normalization: raw coordinates to a bounded render space.

use bevy_math::Vec3;
use scene_data::SceneData;

use crate::config::ScaleConfig;

/// Scalar mapping raw input units to render units.
///
/// Always finite and within the configured clamp range, except for an empty
/// scene where it is exactly `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneScale(pub(crate) f32);

impl SceneScale {
    /// Identity scale, used before any scene is loaded.
    pub const IDENTITY: Self = Self(1.0);

    /// Computes the scale for a whole scene.
    pub fn for_scene(scene: &SceneData, config: &ScaleConfig) -> Self {
        Self(compute_scale(scene.positions().map(Vec3::from_array), config))
    }

    /// The raw factor.
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for SceneScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Computes the scale factor that fits every position inside
/// `config.desired_radius`, clamped to `[min_scale, max_scale]`.
///
/// An empty set yields `1`. A non-empty set sitting entirely at the origin
/// uses a distance of `1` in place of zero.
pub fn compute_scale(positions: impl IntoIterator<Item = Vec3>, config: &ScaleConfig) -> f32 {
    let mut positions = positions.into_iter().peekable();
    if positions.peek().is_none() {
        return 1.0;
    }

    // f32::max ignores NaN, so a stray non-finite length cannot win.
    let max_dist = positions.map(Vec3::length).fold(0.0_f32, f32::max);
    let max_dist = if max_dist > 0.0 { max_dist } else { 1.0 };

    let scale = config.desired_radius / max_dist;
    if scale.is_finite() {
        scale.clamp(config.min_scale, config.max_scale)
    } else {
        config.max_scale
    }
}
