//! Focus integration: selection and reset signals into camera focus.
//!
//! This module wires the headless [`focus::EventBridge`] into the app. The
//! selection lives in [`Highlight`], the reset counter in [`ResetSignal`];
//! both are plain resources any panel or key binding can write. Every frame
//! the chained systems below feed the bridge in a fixed order and let it
//! step the camera.

use bevy::app::AppExit;
use bevy::prelude::*;
use focus::{EventBridge, FocusConfig, NavigationSurface, Transition};

use crate::camera::{pose_from_transform, write_pose, MainCamera, OrbitControls};
use crate::scene_loader::{LoadedScene, SceneLoadedEvent};
use crate::OrrerySet;

/// Plugin for selection handling and camera focus.
pub struct FocusPlugin;

impl Plugin for FocusPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FocusSettings>()
            .init_resource::<Highlight>()
            .init_resource::<ResetSignal>()
            .init_resource::<FocusBridge>()
            .add_event::<SelectIntent>()
            .add_event::<PointerHover>()
            .add_event::<FocusTransitionEvent>()
            .add_systems(
                Update,
                (
                    handle_selection_keys,
                    apply_select_intents,
                    sync_scene_into_bridge,
                    sync_highlight,
                    sync_reset_signal,
                    advance_homing,
                    drive_camera,
                )
                    .chain()
                    .in_set(OrrerySet::Focus),
            )
            .add_systems(Last, teardown_on_exit);
    }
}

/// Loaded focus configuration.
#[derive(Resource, Debug, Clone, Default, Deref)]
pub struct FocusSettings(pub FocusConfig);

/// Id of the selected asteroid, if any.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlight(pub Option<String>);

/// Monotonic reset counter. Any change requests the home view.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSignal(pub u64);

impl ResetSignal {
    /// Request a reset.
    pub fn fire(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// The app's event bridge.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct FocusBridge(pub EventBridge);

impl FromWorld for FocusBridge {
    fn from_world(world: &mut World) -> Self {
        let camera = world
            .get_resource::<FocusSettings>()
            .map(|s| s.camera.clone())
            .unwrap_or_default();
        let baseline = world.get_resource::<ResetSignal>().map_or(0, |r| r.0);
        Self(EventBridge::new(&camera, baseline))
    }
}

/// A body was clicked.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SelectIntent {
    /// Id of the clicked asteroid.
    pub id: String,
}

/// The body under the pointer changed. `None` when the pointer left all bodies.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PointerHover {
    pub id: Option<String>,
}

/// Fired for every bridge state change.
#[derive(Event, Debug, Clone)]
pub struct FocusTransitionEvent(pub Transition);

/// Keyboard selection: Escape clears, Home or H resets, brackets cycle.
fn handle_selection_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    loaded: Res<LoadedScene>,
    mut highlight: ResMut<Highlight>,
    mut reset: ResMut<ResetSignal>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        highlight.set_if_neq(Highlight(None));
    }

    if keyboard.just_pressed(KeyCode::Home) || keyboard.just_pressed(KeyCode::KeyH) {
        reset.fire();
        tracing::info!("Camera reset requested");
    }

    let current = highlight.0.as_deref();
    let cycled = if keyboard.just_pressed(KeyCode::BracketRight) {
        loaded.scene.next_id(current)
    } else if keyboard.just_pressed(KeyCode::BracketLeft) {
        loaded.scene.previous_id(current)
    } else {
        None
    };
    if let Some(id) = cycled.map(str::to_owned) {
        highlight.set_if_neq(Highlight(Some(id)));
    }
}

/// Clicks on bodies become the selection. The last click in a frame wins.
///
/// Picking runs against last frame's projection, so a click can name a body
/// that a reload has since removed. Such clicks are dropped.
fn apply_select_intents(
    mut intents: EventReader<SelectIntent>,
    loaded: Res<LoadedScene>,
    mut highlight: ResMut<Highlight>,
) {
    let Some(intent) = intents
        .read()
        .filter(|intent| loaded.scene.contains(&intent.id))
        .last()
    else {
        return;
    };
    highlight.set_if_neq(Highlight(Some(intent.id.clone())));
}

/// Re-resolves the focus after a reload.
fn sync_scene_into_bridge(
    mut events: EventReader<SceneLoadedEvent>,
    loaded: Res<LoadedScene>,
    mut bridge: ResMut<FocusBridge>,
    mut transitions: EventWriter<FocusTransitionEvent>,
) {
    if events.read().last().is_none() {
        return;
    }
    if let Some(t) = bridge.on_scene_replaced(&loaded.scene, loaded.scale) {
        transitions.send(FocusTransitionEvent(t));
    }
}

fn sync_highlight(
    highlight: Res<Highlight>,
    loaded: Res<LoadedScene>,
    mut bridge: ResMut<FocusBridge>,
    mut transitions: EventWriter<FocusTransitionEvent>,
) {
    if !highlight.is_changed() {
        return;
    }
    if let Some(t) = bridge.on_highlight(highlight.0.as_deref(), &loaded.scene, loaded.scale) {
        transitions.send(FocusTransitionEvent(t));
    }
}

fn sync_reset_signal(
    reset: Res<ResetSignal>,
    loaded: Res<LoadedScene>,
    mut bridge: ResMut<FocusBridge>,
    mut controls: Option<ResMut<OrbitControls>>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut transitions: EventWriter<FocusTransitionEvent>,
) {
    // Held until a camera exists; the bridge compares against the last value it saw.
    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };

    let mut pose = pose_from_transform(&transform);
    let controls = controls
        .as_deref_mut()
        .map(|c| c as &mut dyn NavigationSurface);
    if let Some(t) = bridge.on_reset(reset.0, loaded.scale, &mut pose, controls) {
        write_pose(&pose, &mut transform);
        transitions.send(FocusTransitionEvent(t));
    }
}

fn advance_homing(
    time: Res<Time>,
    mut bridge: ResMut<FocusBridge>,
    mut transitions: EventWriter<FocusTransitionEvent>,
) {
    if let Some(t) = bridge.advance(time.delta()) {
        transitions.send(FocusTransitionEvent(t));
    }
}

/// Per-frame camera step toward the active focus.
fn drive_camera(
    bridge: Res<FocusBridge>,
    loaded: Res<LoadedScene>,
    mut controls: Option<ResMut<OrbitControls>>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if bridge.focus_point().is_none() {
        return;
    }
    let Ok(mut transform) = camera_query.get_single_mut() else {
        return;
    };

    let mut pose = pose_from_transform(&transform);
    let controls = controls
        .as_deref_mut()
        .map(|c| c as &mut dyn NavigationSurface);
    if bridge.frame(loaded.scale, &mut pose, controls) {
        write_pose(&pose, &mut transform);
    }
}

/// Drops any pending focus when the app shuts down.
fn teardown_on_exit(mut exits: EventReader<AppExit>, mut bridge: ResMut<FocusBridge>) {
    if exits.read().next().is_some() {
        bridge.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus::{FocusState, SceneScale};
    use scene_data::fixtures;

    fn test_app() -> App {
        let scene = fixtures::sample_scene();
        let scale = SceneScale::for_scene(&scene, &FocusConfig::default().scale);

        let mut app = App::new();
        app.insert_resource(LoadedScene {
            scene,
            scale,
            ..default()
        })
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<Time>()
        .init_resource::<OrbitControls>()
        .add_event::<SceneLoadedEvent>()
        .add_plugins(FocusPlugin);
        app.world_mut().spawn((
            Transform::from_xyz(10.0, 10.0, 10.0),
            MainCamera,
        ));
        app
    }

    fn bridge_state(app: &App) -> FocusState {
        app.world().resource::<FocusBridge>().state().clone()
    }

    #[test]
    fn test_reset_signal_fire() {
        let mut reset = ResetSignal::default();
        reset.fire();
        reset.fire();
        assert_eq!(reset.0, 2);

        let mut wrapped = ResetSignal(u64::MAX);
        wrapped.fire();
        assert_eq!(wrapped.0, 0);
    }

    #[test]
    fn test_startup_is_idle() {
        let mut app = test_app();
        app.update();

        assert_eq!(bridge_state(&app), FocusState::Idle);
        let camera = app
            .world_mut()
            .query_filtered::<&Transform, With<MainCamera>>()
            .single(app.world())
            .translation;
        assert_eq!(camera, Vec3::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_select_intent_focuses_body() {
        let mut app = test_app();
        app.world_mut().send_event(SelectIntent {
            id: "4-vesta".into(),
        });
        app.update();

        assert_eq!(
            app.world().resource::<Highlight>().0.as_deref(),
            Some("4-vesta")
        );
        assert_eq!(
            bridge_state(&app),
            FocusState::Focusing {
                entity_id: "4-vesta".into()
            }
        );
        // The camera has started moving and the controls are being steered.
        assert!(app.world().resource::<OrbitControls>().is_update_pending());
    }

    #[test]
    fn test_unknown_select_intent_stays_idle() {
        let mut app = test_app();
        app.world_mut().send_event(SelectIntent {
            id: "99942-apophis".into(),
        });
        app.update();

        assert_eq!(bridge_state(&app), FocusState::Idle);
        assert_eq!(app.world().resource::<Highlight>().0, None);
        assert!(!app.world().resource::<OrbitControls>().is_update_pending());
    }

    #[test]
    fn test_stale_click_keeps_current_selection() {
        let mut app = test_app();
        app.world_mut().send_event(SelectIntent {
            id: "1-ceres".into(),
        });
        app.update();

        app.world_mut().send_event(SelectIntent {
            id: "99942-apophis".into(),
        });
        app.update();

        assert_eq!(
            app.world().resource::<Highlight>().0.as_deref(),
            Some("1-ceres")
        );
        assert_eq!(
            bridge_state(&app),
            FocusState::Focusing {
                entity_id: "1-ceres".into()
            }
        );
    }

    #[test]
    fn test_reset_key_snaps_camera_home() {
        let mut app = test_app();
        app.world_mut().resource_mut::<OrbitControls>().enabled = false;
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyH);
        app.update();

        assert_eq!(bridge_state(&app), FocusState::Homing);
        assert_eq!(app.world().resource::<ResetSignal>().0, 1);

        let bridge = app.world().resource::<FocusBridge>();
        let scale = app.world().resource::<LoadedScene>().scale;
        assert_eq!(bridge.focus_point(), Some(Vec3::ZERO));

        // Snapped home, then one frame of approach toward the origin view.
        let home = bridge.home_position(scale);
        let desired = bridge.controller().desired_camera_position(scale).unwrap();
        let expected = home.lerp(desired, 0.08);
        let camera = app
            .world_mut()
            .query_filtered::<&Transform, With<MainCamera>>()
            .single(app.world())
            .translation;
        assert!(camera.distance(expected) < 1e-3);
        assert!(app.world().resource::<OrbitControls>().enabled);
    }

    #[test]
    fn test_escape_clears_selection() {
        let mut app = test_app();
        app.world_mut().resource_mut::<Highlight>().0 = Some("1-ceres".into());
        app.update();
        assert!(matches!(bridge_state(&app), FocusState::Focusing { .. }));

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();

        assert_eq!(app.world().resource::<Highlight>().0, None);
        assert_eq!(bridge_state(&app), FocusState::Idle);
    }

    #[test]
    fn test_bracket_keys_cycle_selection() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::BracketRight);
        app.update();

        assert_eq!(
            app.world().resource::<Highlight>().0.as_deref(),
            Some("1-ceres")
        );
    }

    #[test]
    fn test_transitions_are_reported() {
        let mut app = test_app();
        app.world_mut().send_event(SelectIntent {
            id: "2-pallas".into(),
        });
        app.update();

        let events = app.world().resource::<Events<FocusTransitionEvent>>();
        let mut reader = events.get_reader();
        let transitions: Vec<_> = reader.read(events).map(|e| e.0.clone()).collect();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, FocusState::Idle);
    }
}
