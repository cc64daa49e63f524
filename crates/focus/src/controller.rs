//! Camera target controller: per-frame exponential approach to a focus point.

use bevy_math::Vec3;
use std::time::Duration;

use crate::config::CameraConfig;
use crate::navigation::{CameraPose, NavigationSurface};
use crate::scale::SceneScale;

/// A render-space point the camera animates toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTarget {
    /// Point to look at, in render space.
    pub point: Vec3,
    /// Time left before the target clears itself. `None` never expires.
    pub remaining: Option<Duration>,
}

impl FocusTarget {
    /// A target that persists until replaced or cleared.
    pub fn persistent(point: Vec3) -> Self {
        Self {
            point,
            remaining: None,
        }
    }

    /// A target that clears itself after `duration`.
    pub fn expiring(point: Vec3, duration: Duration) -> Self {
        Self {
            point,
            remaining: Some(duration),
        }
    }

    /// Counts down the expiry. Returns true once the target has expired.
    fn tick(&mut self, delta: Duration) -> bool {
        match self.remaining.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(delta);
                remaining.is_zero()
            }
            None => false,
        }
    }
}

/// Holds at most one [`FocusTarget`] and nudges the camera toward it once per
/// frame.
///
/// The approach is exponential: each [`step`](Self::step) covers
/// `lerp_factor` of the remaining distance. It never reports completion; it
/// keeps nudging until the target is cleared.
#[derive(Debug, Clone)]
pub struct CameraTargetController {
    active: Option<FocusTarget>,
    lerp_factor: f32,
    focus_offset: Vec3,
}

impl CameraTargetController {
    /// Creates an idle controller.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            active: None,
            lerp_factor: config.lerp_factor,
            focus_offset: config.focus_offset(),
        }
    }

    /// The active target, if any.
    pub fn active(&self) -> Option<&FocusTarget> {
        self.active.as_ref()
    }

    /// The active focus point, if any.
    pub fn focus_point(&self) -> Option<Vec3> {
        self.active.map(|t| t.point)
    }

    /// Replaces the active target, discarding any pending expiry.
    pub fn set_focus(&mut self, target: FocusTarget) {
        self.active = Some(target);
    }

    /// Clears the active target.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Advances the expiry clock. Returns true if the target expired and was
    /// cleared during this call.
    pub fn advance(&mut self, delta: Duration) -> bool {
        let expired = self.active.as_mut().is_some_and(|t| t.tick(delta));
        if expired {
            self.active = None;
        }
        expired
    }

    /// Where the camera is heading for the current target.
    pub fn desired_camera_position(&self, scale: SceneScale) -> Option<Vec3> {
        self.active.map(|t| t.point + self.focus_offset * scale.get())
    }

    /// Runs one frame of the approach. Returns false when there is no target
    /// and the camera was left alone.
    ///
    /// With a navigation surface the look-at target is smoothed by the same
    /// factor and the surface re-aims the camera; without one the camera is
    /// pointed straight at the focus.
    pub fn step(
        &self,
        scale: SceneScale,
        camera: &mut CameraPose,
        controls: Option<&mut dyn NavigationSurface>,
    ) -> bool {
        let (Some(target), Some(desired)) = (self.active, self.desired_camera_position(scale))
        else {
            return false;
        };

        camera.translation = camera.translation.lerp(desired, self.lerp_factor);

        match controls {
            Some(controls) => {
                let look = controls.target().lerp(target.point, self.lerp_factor);
                controls.set_target(look);
                controls.update();
            }
            None => camera.look_at(target.point),
        }

        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every mutation the controller makes.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingControls {
        pub target: Vec3,
        pub enable_rotate: bool,
        pub enabled: bool,
        pub updates: usize,
    }

    impl NavigationSurface for RecordingControls {
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
            self.updates += 1;
        }
    }

    fn controller() -> CameraTargetController {
        CameraTargetController::new(&CameraConfig::default())
    }

    #[test]
    fn test_idle_leaves_camera_alone() {
        let controller = controller();
        let mut camera = CameraPose::looking_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        let before = camera;
        let mut controls = RecordingControls::default();

        assert!(!controller.step(SceneScale::IDENTITY, &mut camera, Some(&mut controls)));
        assert_eq!(camera, before);
        assert_eq!(controls.updates, 0);
    }

    #[test]
    fn test_step_moves_fraction_of_remaining_distance() {
        let mut controller = controller();
        let focus = Vec3::new(10.0, 0.0, 0.0);
        controller.set_focus(FocusTarget::persistent(focus));

        let mut camera = CameraPose::default();
        let desired = controller
            .desired_camera_position(SceneScale::IDENTITY)
            .unwrap();
        assert_eq!(desired, focus + Vec3::new(12.0, 9.0, 18.0));

        controller.step(SceneScale::IDENTITY, &mut camera, None);
        let expected = Vec3::ZERO.lerp(desired, 0.08);
        assert!((camera.translation - expected).length() < 1e-5);
    }

    #[test]
    fn test_offset_scales_with_scene() {
        let mut controller = controller();
        controller.set_focus(FocusTarget::persistent(Vec3::ZERO));

        let desired = controller.desired_camera_position(SceneScale(0.5)).unwrap();
        assert_eq!(desired, Vec3::new(6.0, 4.5, 9.0));
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut controller = controller();
        controller.set_focus(FocusTarget::persistent(Vec3::new(-5.0, 2.0, 8.0)));
        let desired = controller
            .desired_camera_position(SceneScale::IDENTITY)
            .unwrap();

        let mut camera = CameraPose::looking_at(Vec3::new(50.0, 50.0, 50.0), Vec3::ZERO);
        let mut last = camera.translation.distance(desired);
        for _ in 0..120 {
            controller.step(SceneScale::IDENTITY, &mut camera, None);
            let now = camera.translation.distance(desired);
            assert!(now < last);
            last = now;
        }
        assert!(last < 0.1);
    }

    #[test]
    fn test_without_controls_looks_directly_at_focus() {
        let mut controller = controller();
        let focus = Vec3::new(3.0, -1.0, 2.0);
        controller.set_focus(FocusTarget::persistent(focus));

        let mut camera = CameraPose::looking_at(Vec3::new(20.0, 20.0, 20.0), Vec3::ZERO);
        controller.step(SceneScale::IDENTITY, &mut camera, None);

        let to_focus = (focus - camera.translation).normalize();
        assert!((camera.forward() - to_focus).length() < 1e-4);
    }

    #[test]
    fn test_with_controls_smooths_target_and_updates() {
        let mut controller = controller();
        let focus = Vec3::new(10.0, 0.0, 0.0);
        controller.set_focus(FocusTarget::persistent(focus));

        let mut camera = CameraPose::default();
        let mut controls = RecordingControls::default();
        controller.step(SceneScale::IDENTITY, &mut camera, Some(&mut controls));

        assert!((controls.target - Vec3::new(0.8, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(controls.updates, 1);
        // Orientation is the surface's job when it is present.
        assert_eq!(camera.rotation, CameraPose::default().rotation);
    }

    #[test]
    fn test_expiring_target_clears_itself() {
        let mut controller = controller();
        controller.set_focus(FocusTarget::expiring(
            Vec3::ZERO,
            Duration::from_millis(100),
        ));

        assert!(!controller.advance(Duration::from_millis(60)));
        assert!(controller.focus_point().is_some());
        assert!(controller.advance(Duration::from_millis(40)));
        assert!(controller.focus_point().is_none());
        // Nothing left to expire.
        assert!(!controller.advance(Duration::from_millis(40)));
    }

    #[test]
    fn test_persistent_target_never_expires() {
        let mut controller = controller();
        controller.set_focus(FocusTarget::persistent(Vec3::ONE));

        assert!(!controller.advance(Duration::from_secs(3600)));
        assert_eq!(controller.focus_point(), Some(Vec3::ONE));
    }

    #[test]
    fn test_set_focus_replaces_pending_expiry() {
        let mut controller = controller();
        controller.set_focus(FocusTarget::expiring(Vec3::ZERO, Duration::from_millis(10)));
        controller.set_focus(FocusTarget::persistent(Vec3::X));

        assert!(!controller.advance(Duration::from_millis(50)));
        assert_eq!(controller.focus_point(), Some(Vec3::X));
    }
}
