//! Camera pose and the navigation-control capability.
//!
//! The navigation surface is owned by the host (an orbit-style controller
//! driven by user input). The core only ever touches it through
//! [`NavigationSurface`], and every call site takes it as an
//! `Option<&mut dyn NavigationSurface>` so a host without one still works.

use bevy_math::{Mat3, Quat, Vec3};

/// Mutable look-at controls exposed by the host.
pub trait NavigationSurface {
    /// Current look-at target.
    fn target(&self) -> Vec3;

    /// Replaces the look-at target. Takes effect on the next [`update`](Self::update).
    fn set_target(&mut self, target: Vec3);

    /// Allows or forbids user rotation.
    fn set_enable_rotate(&mut self, enabled: bool);

    /// Allows or forbids all user interaction.
    fn set_enabled(&mut self, enabled: bool);

    /// Applies pending mutations (re-aims the camera at the target).
    fn update(&mut self);
}

/// Camera position and orientation in render space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    /// Creates a pose at `translation` looking at `target`.
    pub fn looking_at(translation: Vec3, target: Vec3) -> Self {
        let mut pose = Self {
            translation,
            rotation: Quat::IDENTITY,
        };
        pose.look_at(target);
        pose
    }

    /// Direction the camera faces (its local -Z).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Rotates the camera to face `target`, keeping +Y as up.
    ///
    /// Leaves the rotation untouched when `target` coincides with the camera.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(back) = (self.translation - target).try_normalize() else {
            return;
        };
        // Looking straight up or down: fall back to +Z as the up reference.
        let up = if back.cross(Vec3::Y).length_squared() < 1e-12 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let right = up.cross(back).normalize();
        let up = back.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, back));
    }
}
