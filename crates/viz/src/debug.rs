//! Debug overlay: frame rate, scene scale, focus state, and load errors.
//!
//! Toggle with F3. Hidden by default.

use bevy::prelude::*;
use focus::FocusState;
use std::collections::VecDeque;

use crate::camera::MainCamera;
use crate::focus_bridge::{FocusBridge, Highlight, PointerHover};
use crate::scene_loader::LoadedScene;
use crate::OrrerySet;

/// Plugin for the debug overlay.
pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugOverlay>()
            .add_systems(Startup, setup_debug_overlay)
            .add_systems(
                Update,
                (toggle_debug_overlay, update_debug_display)
                    .chain()
                    .in_set(OrrerySet::Render),
            );
    }
}

/// Resource controlling debug overlay settings.
#[derive(Resource)]
pub struct DebugOverlay {
    /// Whether the debug overlay is visible.
    pub enabled: bool,
    /// Show FPS counter.
    pub show_fps: bool,
    /// Show camera position and look-at state.
    pub show_camera_info: bool,
}

impl Default for DebugOverlay {
    fn default() -> Self {
        Self {
            enabled: false,
            show_fps: true,
            show_camera_info: true,
        }
    }
}

/// Component marking the debug overlay container.
#[derive(Component)]
pub struct DebugOverlayContainer;

/// Component for the debug text.
#[derive(Component)]
pub struct DebugText;

/// Local resource for FPS history.
#[derive(Default)]
struct FpsHistory {
    history: VecDeque<f32>,
}

impl FpsHistory {
    fn push(&mut self, fps: f32) {
        self.history.push_back(fps);
        if self.history.len() > 60 {
            self.history.pop_front();
        }
    }

    fn average(&self) -> f32 {
        if self.history.is_empty() {
            0.0
        } else {
            self.history.iter().sum::<f32>() / self.history.len() as f32
        }
    }
}

/// Short label for a focus state.
pub fn focus_label(state: &FocusState) -> String {
    match state {
        FocusState::Idle => "Idle".to_string(),
        FocusState::Focusing { entity_id } => format!("Focusing {}", entity_id),
        FocusState::Homing => "Homing".to_string(),
    }
}

/// Scene summary lines: body count, scale, epoch, and any load error.
fn scene_lines(loaded: &LoadedScene) -> Vec<String> {
    let mut lines = vec![
        format!("Asteroids: {}", loaded.scene.len()),
        format!("Scale: {:.5}", loaded.scale.get()),
    ];
    if !loaded.has_bodies() {
        lines.push("No asteroids loaded".to_string());
    }
    if let Some(ref time_point) = loaded.scene.metadata.time_point {
        lines.push(format!("Epoch: {}", time_point));
    }
    if let Some(ref error) = loaded.last_error {
        lines.push(format!("ERROR: {}", error));
    }
    lines
}

/// System to set up the debug overlay UI.
fn setup_debug_overlay(mut commands: Commands) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    top: Val::Px(10.0),
                    left: Val::Px(10.0),
                    padding: UiRect::all(Val::Px(10.0)),
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
                background_color: Color::srgba(0.0, 0.0, 0.0, 0.8).into(),
                visibility: Visibility::Hidden,
                ..default()
            },
            DebugOverlayContainer,
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "DEBUG (F3 to toggle)",
                TextStyle {
                    font_size: 14.0,
                    color: Color::srgb(0.9, 0.9, 0.3),
                    ..default()
                },
            ));

            parent.spawn((
                TextBundle::from_section(
                    "",
                    TextStyle {
                        font_size: 12.0,
                        color: Color::srgb(0.8, 0.8, 0.8),
                        ..default()
                    },
                ),
                DebugText,
            ));
        });
}

/// System to toggle debug overlay with F3.
fn toggle_debug_overlay(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_overlay: ResMut<DebugOverlay>,
    mut container: Query<&mut Visibility, With<DebugOverlayContainer>>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        debug_overlay.enabled = !debug_overlay.enabled;

        for mut visibility in container.iter_mut() {
            *visibility = if debug_overlay.enabled {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }

        let status = if debug_overlay.enabled { "ON" } else { "OFF" };
        tracing::info!("Debug overlay: {}", status);
    }
}

/// System to update debug display data.
fn update_debug_display(
    debug_overlay: Res<DebugOverlay>,
    loaded: Res<LoadedScene>,
    bridge: Res<FocusBridge>,
    highlight: Res<Highlight>,
    time: Res<Time>,
    camera: Query<&Transform, With<MainCamera>>,
    mut hover_events: EventReader<PointerHover>,
    mut hovered: Local<Option<String>>,
    mut fps_history: Local<FpsHistory>,
    mut debug_text: Query<&mut Text, With<DebugText>>,
) {
    if let Some(hover) = hover_events.read().last() {
        *hovered = hover.id.clone();
    }

    if !debug_overlay.enabled {
        return;
    }

    let dt = time.delta_seconds();
    if dt > 0.0 {
        fps_history.push(1.0 / dt);
    }
    let avg_fps = fps_history.average();

    let mut lines = Vec::new();

    if debug_overlay.show_fps {
        let fps_color = if avg_fps < 30.0 { "LOW!" } else { "" };
        lines.push(format!("FPS: {:.0} {}", avg_fps, fps_color));
    }

    if debug_overlay.show_camera_info {
        if let Ok(transform) = camera.get_single() {
            let p = transform.translation;
            lines.push(format!("Camera: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
        }
        lines.push(format!("Focus: {}", focus_label(bridge.state())));
    }

    lines.push(format!(
        "Selected: {}",
        highlight.0.as_deref().unwrap_or("-")
    ));
    lines.push(format!("Hover: {}", hovered.as_deref().unwrap_or("-")));
    lines.extend(scene_lines(&loaded));

    for mut text in debug_text.iter_mut() {
        text.sections[0].value = lines.join("\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_data::fixtures;

    #[test]
    fn test_debug_overlay_default() {
        let overlay = DebugOverlay::default();
        assert!(!overlay.enabled);
        assert!(overlay.show_fps);
        assert!(overlay.show_camera_info);
    }

    #[test]
    fn test_fps_history() {
        let mut history = FpsHistory::default();
        assert_eq!(history.average(), 0.0);

        history.push(60.0);
        history.push(60.0);
        assert_eq!(history.average(), 60.0);

        history.push(30.0);
        assert!((history.average() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_focus_label() {
        assert_eq!(focus_label(&FocusState::Idle), "Idle");
        assert_eq!(focus_label(&FocusState::Homing), "Homing");
        assert_eq!(
            focus_label(&FocusState::Focusing {
                entity_id: "4-vesta".into()
            }),
            "Focusing 4-vesta"
        );
    }

    #[test]
    fn test_scene_lines_include_error() {
        let loaded = LoadedScene {
            scene: fixtures::sample_scene(),
            last_error: Some("Failed to load scene: bad".into()),
            ..default()
        };
        let lines = scene_lines(&loaded);

        assert_eq!(lines[0], "Asteroids: 5");
        assert!(lines.iter().any(|l| l == "Epoch: 2024-01-01T00:00:00Z"));
        assert_eq!(lines.last().map(String::as_str), Some("ERROR: Failed to load scene: bad"));
        assert!(!lines.iter().any(|l| l == "No asteroids loaded"));
    }

    #[test]
    fn test_scene_lines_flag_empty_scene() {
        let lines = scene_lines(&LoadedScene::default());

        assert_eq!(lines[0], "Asteroids: 0");
        assert_eq!(lines[1], "Scale: 1.00000");
        assert_eq!(lines[2], "No asteroids loaded");
        assert_eq!(lines.len(), 3);
    }
}
