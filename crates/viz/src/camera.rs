//! Camera system: orbit controls, user input handling, and pose syncing.
//!
//! [`OrbitControls`] is the viewer's navigation surface. The user drives it
//! with the mouse; the focus core drives it through
//! [`focus::NavigationSurface`]. Either way, pending changes are applied to
//! the camera transform by [`apply_orbit_controls`] at the end of the frame.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use focus::{CameraPose, NavigationSurface};

use crate::focus_bridge::FocusBridge;
use crate::scene_loader::LoadedScene;
use crate::OrrerySet;

/// Plugin for camera control and movement.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitControls>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, handle_camera_input.in_set(OrrerySet::Input))
            .add_systems(Update, apply_orbit_controls.in_set(OrrerySet::Camera));
    }
}

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Orbit-style navigation surface around a look-at target.
#[derive(Resource, Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Whether any user interaction is accepted.
    pub enabled: bool,
    /// Whether the user may rotate around the target.
    pub enable_rotate: bool,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// Fraction of the target distance moved per pixel of pan.
    pub pan_speed: f32,
    /// Fraction of the target distance per scroll line.
    pub zoom_speed: f32,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance from the target.
    pub max_distance: f32,
    /// Set by `update()`; consumed when the camera is re-aimed.
    needs_update: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_rotate: true,
            rotate_speed: 0.005,
            pan_speed: 0.0015,
            zoom_speed: 0.1,
            min_distance: 0.5,
            max_distance: 2000.0,
            needs_update: false,
        }
    }
}

impl OrbitControls {
    /// Returns true if an `update()` is waiting to be applied.
    pub fn is_update_pending(&self) -> bool {
        self.needs_update
    }

    /// Takes the pending-update flag.
    pub fn take_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }
}

impl NavigationSurface for OrbitControls {
    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn set_enable_rotate(&mut self, enabled: bool) {
        self.enable_rotate = enabled;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn update(&mut self) {
        self.needs_update = true;
    }
}

/// Reads a transform into a core camera pose.
pub fn pose_from_transform(transform: &Transform) -> CameraPose {
    CameraPose {
        translation: transform.translation,
        rotation: transform.rotation,
    }
}

/// Writes a core camera pose back into a transform.
pub fn write_pose(pose: &CameraPose, transform: &mut Transform) {
    transform.translation = pose.translation;
    transform.rotation = pose.rotation;
}

/// Rotates the camera around `target` by `yaw` (about +Y) and `pitch`
/// (about the camera's right axis), keeping the distance fixed.
///
/// Pitch is limited so the camera never flips over the poles.
pub fn orbit_around(pose: &mut CameraPose, target: Vec3, yaw: f32, pitch: f32) {
    let offset = pose.translation - target;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return;
    }

    let current_pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let max_pitch = std::f32::consts::FRAC_PI_2 - 0.05;
    let new_pitch = (current_pitch + pitch).clamp(-max_pitch, max_pitch);
    let current_yaw = offset.x.atan2(offset.z);
    let new_yaw = current_yaw + yaw;

    let horizontal = distance * new_pitch.cos();
    pose.translation = target
        + Vec3::new(
            horizontal * new_yaw.sin(),
            distance * new_pitch.sin(),
            horizontal * new_yaw.cos(),
        );
    pose.look_at(target);
}

/// Moves the camera toward or away from `target` by `factor` of the current
/// distance, clamped to `[min_distance, max_distance]`.
pub fn zoom_toward(
    pose: &mut CameraPose,
    target: Vec3,
    factor: f32,
    min_distance: f32,
    max_distance: f32,
) {
    let offset = pose.translation - target;
    let Some(direction) = offset.try_normalize() else {
        return;
    };
    let distance = (offset.length() * (1.0 - factor)).clamp(min_distance, max_distance);
    pose.translation = target + direction * distance;
}

/// Screen-space pan: shifts camera and target together along the camera's
/// right and up axes. Returns the new target.
pub fn pan(pose: &mut CameraPose, target: Vec3, delta: Vec2, speed: f32) -> Vec3 {
    let distance = pose.translation.distance(target).max(1.0);
    let right = pose.rotation * Vec3::X;
    let up = pose.rotation * Vec3::Y;
    let shift = (right * -delta.x + up * delta.y) * speed * distance;
    pose.translation += shift;
    target + shift
}

/// System to spawn the camera at the home view.
fn setup_camera(mut commands: Commands, bridge: Res<FocusBridge>, scene: Res<LoadedScene>) {
    let home = bridge.home_position(scene.scale);
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(home).looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        MainCamera,
    ));
}

/// System to handle mouse input: left drag rotates, right or middle drag
/// pans, the wheel zooms.
fn handle_camera_input(
    mut controls: ResMut<OrbitControls>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };

    if !controls.enabled {
        mouse_motion.clear();
        scroll.clear();
        return;
    }

    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    let mut pose = pose_from_transform(&transform);
    let mut changed = false;

    if delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) && controls.enable_rotate {
            orbit_around(
                &mut pose,
                controls.target,
                -delta.x * controls.rotate_speed,
                delta.y * controls.rotate_speed,
            );
            changed = true;
        } else if mouse_button.pressed(MouseButton::Right)
            || mouse_button.pressed(MouseButton::Middle)
        {
            let speed = controls.pan_speed;
            controls.target = pan(&mut pose, controls.target, delta, speed);
            changed = true;
        }
    }

    for ev in scroll.read() {
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
        zoom_toward(
            &mut pose,
            controls.target,
            lines * controls.zoom_speed,
            controls.min_distance,
            controls.max_distance,
        );
        changed = true;
    }

    if changed {
        write_pose(&pose, &mut transform);
    }
}

/// System to re-aim the camera after `update()` was called on the controls.
pub fn apply_orbit_controls(
    mut controls: ResMut<OrbitControls>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if !controls.is_update_pending() {
        return;
    }
    let target = controls.target;
    controls.take_update();

    for mut transform in camera_query.iter_mut() {
        let mut pose = pose_from_transform(&transform);
        pose.look_at(target);
        write_pose(&pose, &mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_at(position: Vec3) -> CameraPose {
        CameraPose::looking_at(position, Vec3::ZERO)
    }

    #[test]
    fn test_orbit_controls_default() {
        let controls = OrbitControls::default();
        assert!(controls.enabled);
        assert!(controls.enable_rotate);
        assert_eq!(controls.target, Vec3::ZERO);
        assert!(!controls.is_update_pending());
    }

    #[test]
    fn test_navigation_surface_update_is_deferred() {
        let mut controls = OrbitControls::default();
        controls.set_target(Vec3::X);
        controls.update();

        assert!(controls.is_update_pending());
        assert!(controls.take_update());
        assert!(!controls.take_update());
        assert_eq!(NavigationSurface::target(&controls), Vec3::X);
    }

    #[test]
    fn test_pose_round_trip_through_transform() {
        let pose = pose_at(Vec3::new(1.0, 2.0, 3.0));
        let mut transform = Transform::default();
        write_pose(&pose, &mut transform);
        assert_eq!(pose_from_transform(&transform), pose);
    }

    #[test]
    fn test_orbit_keeps_distance_and_aim() {
        let mut pose = pose_at(Vec3::new(0.0, 0.0, 10.0));
        orbit_around(&mut pose, Vec3::ZERO, 0.5, 0.3);

        assert!((pose.translation.length() - 10.0).abs() < 1e-4);
        let to_target = (-pose.translation).normalize();
        assert!((pose.forward() - to_target).length() < 1e-4);
    }

    #[test]
    fn test_orbit_pitch_is_limited() {
        let mut pose = pose_at(Vec3::new(0.0, 0.0, 10.0));
        orbit_around(&mut pose, Vec3::ZERO, 0.0, 10.0);

        assert!(pose.translation.y < 10.0);
        assert!(pose.translation.y > 9.9);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut pose = pose_at(Vec3::new(0.0, 0.0, 10.0));
        zoom_toward(&mut pose, Vec3::ZERO, 0.5, 1.0, 100.0);
        assert!((pose.translation.z - 5.0).abs() < 1e-5);

        zoom_toward(&mut pose, Vec3::ZERO, 0.99, 1.0, 100.0);
        assert!((pose.translation.z - 1.0).abs() < 1e-5);

        zoom_toward(&mut pose, Vec3::ZERO, -1000.0, 1.0, 100.0);
        assert!((pose.translation.z - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_pan_moves_camera_and_target_together() {
        let mut pose = pose_at(Vec3::new(0.0, 0.0, 10.0));
        let before = pose.translation;
        let target = pan(&mut pose, Vec3::ZERO, Vec2::new(10.0, 0.0), 0.01);

        let shift = pose.translation - before;
        assert!((target - shift).length() < 1e-5);
        // Dragging right moves the view left.
        assert!(shift.x < 0.0);
    }
}
