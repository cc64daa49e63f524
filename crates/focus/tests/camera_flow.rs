//! Integration tests for the focus pipeline.
//!
//! These tests drive the full pipeline (scale, projection, bridge,
//! controller) the way a host would: one scene snapshot, a stream of signals,
//! and a fixed frame step.

use bevy_math::Vec3;
use focus::{
    default_config_toml, project_scene, render_position, CameraPose, EventBridge, FocusConfig,
    FocusState, NavigationSurface, SceneScale, TransitionCause,
};
use scene_data::fixtures;
use std::io::Write;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

/// Minimal orbit-style surface: re-aims the camera on update.
#[derive(Default)]
struct OrbitSurface {
    target: Vec3,
    enabled: bool,
    enable_rotate: bool,
    pending_aim: bool,
}

impl NavigationSurface for OrbitSurface {
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
        self.pending_aim = true;
    }
}

impl OrbitSurface {
    fn apply(&mut self, camera: &mut CameraPose) {
        if std::mem::take(&mut self.pending_aim) {
            camera.look_at(self.target);
        }
    }
}

/// Test the single-body example end to end.
#[test]
fn test_single_body_example() {
    let config = FocusConfig::default();
    let scene = fixtures::single_asteroid_scene("only", [100.0, 0.0, 0.0]);
    let scale = SceneScale::for_scene(&scene, &config.scale);

    assert!((scale.get() - 0.3).abs() < 1e-6);

    let bodies = project_scene(&scene, scale, None, &config.style);
    assert!((bodies[0].position - Vec3::new(30.0, 0.0, 0.0)).length() < 1e-4);
}

/// Test selecting, following, and resetting with a navigation surface.
#[test]
fn test_select_follow_then_reset() {
    let config = FocusConfig::default();
    let scene = fixtures::sample_scene();
    let scale = SceneScale::for_scene(&scene, &config.scale);

    let mut bridge = EventBridge::new(&config.camera, 0);
    let mut camera = CameraPose::looking_at(Vec3::new(0.0, 35.0, 70.0), Vec3::ZERO);
    let mut surface = OrbitSurface::default();

    bridge.on_highlight(Some("2-pallas"), &scene, scale);
    let pallas = render_position(&scene, "2-pallas", scale).unwrap();

    for _ in 0..240 {
        bridge.frame(scale, &mut camera, Some(&mut surface));
        surface.apply(&mut camera);
        bridge.advance(FRAME);
    }

    let desired = bridge.controller().desired_camera_position(scale).unwrap();
    assert!(camera.translation.distance(desired) < 0.01);
    assert!(surface.target.distance(pallas) < 0.01);

    // Reset wins over the focus and snaps immediately.
    let t = bridge
        .on_reset(1, scale, &mut camera, Some(&mut surface))
        .unwrap();
    assert_eq!(
        t.from,
        FocusState::Focusing {
            entity_id: "2-pallas".into()
        }
    );
    assert_eq!(camera.translation, bridge.home_position(scale));
    assert_eq!(bridge.focus_point(), Some(Vec3::ZERO));
    assert!(surface.enabled && surface.enable_rotate);

    let mut released = None;
    for frame in 1..=60 {
        bridge.frame(scale, &mut camera, Some(&mut surface));
        surface.apply(&mut camera);
        if let Some(t) = bridge.advance(FRAME) {
            released = Some((frame, t));
            break;
        }
    }

    let (frame, t) = released.expect("homing window never closed");
    assert_eq!(frame, 38);
    assert_eq!(t.cause, TransitionCause::HomingElapsed);
    assert_eq!(bridge.state(), &FocusState::Idle);

    // Idle: the camera is left alone.
    let parked = camera;
    assert!(!bridge.frame(scale, &mut camera, Some(&mut surface)));
    assert_eq!(camera, parked);
}

/// Test that the default offset parks the camera outside every sample body.
#[test]
fn test_default_offset_clears_every_body() {
    let config = FocusConfig::default();
    let scene = fixtures::sample_scene();
    let scale = SceneScale::for_scene(&scene, &config.scale);

    for body in project_scene(&scene, scale, None, &config.style) {
        let mut bridge = EventBridge::new(&config.camera, 0);
        let mut camera = CameraPose::looking_at(Vec3::new(0.0, 35.0, 70.0), Vec3::ZERO);
        bridge.on_highlight(Some(body.id.as_str()), &scene, scale);

        for _ in 0..240 {
            bridge.frame(scale, &mut camera, None);
            bridge.advance(FRAME);
        }

        let clearance = camera.translation.distance(body.position);
        assert!(
            clearance > 2.0 * body.radius,
            "{}: camera {} from center, radius {}",
            body.id,
            clearance,
            body.radius
        );
    }
}

/// Test that an empty scene keeps everything idle.
#[test]
fn test_empty_scene_stays_idle() {
    let config = FocusConfig::default();
    let scene = fixtures::empty_scene();
    let scale = SceneScale::for_scene(&scene, &config.scale);

    assert_eq!(scale.get(), 1.0);
    assert!(project_scene(&scene, scale, None, &config.style).is_empty());

    let mut bridge = EventBridge::new(&config.camera, 0);
    assert!(bridge.on_highlight(Some("1-ceres"), &scene, scale).is_none());
    assert_eq!(bridge.state(), &FocusState::Idle);
}

/// Test that a tuned config file changes the animation.
#[test]
fn test_config_file_drives_bridge() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[camera]\nhoming_duration_ms = 100\nlerp_factor = 1.0").unwrap();

    let config = FocusConfig::from_file(file.path()).unwrap();
    let mut bridge = EventBridge::new(&config.camera, 0);
    let mut camera = CameraPose::default();

    bridge.on_reset(1, SceneScale::IDENTITY, &mut camera, None);
    assert!(bridge.advance(Duration::from_millis(99)).is_none());
    assert!(bridge.advance(Duration::from_millis(1)).is_some());

    // A lerp factor of one lands on the target in a single frame.
    let scene = fixtures::single_asteroid_scene("a", [10.0, 0.0, 0.0]);
    let scale = SceneScale::for_scene(&scene, &config.scale);
    bridge.on_highlight(Some("a"), &scene, scale);
    bridge.frame(scale, &mut camera, None);
    assert_eq!(
        Some(camera.translation),
        bridge.controller().desired_camera_position(scale)
    );
}

/// Test that the shipped default config parses.
#[test]
fn test_default_config_parses() {
    let config = FocusConfig::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.camera.homing_duration_ms, 600);
    assert_eq!(config.scale.desired_radius, 30.0);
}
