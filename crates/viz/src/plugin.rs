//! Main viewer plugin that ties all systems together.

use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow};

use crate::bodies::BodyPlugin;
use crate::camera::CameraPlugin;
use crate::debug::DebugPlugin;
use crate::focus_bridge::{FocusPlugin, PointerHover};
use crate::scene_loader::SceneLoaderPlugin;
use crate::world::WorldPlugin;
use crate::OrrerySet;

/// Main plugin for the asteroid viewer.
///
/// This plugin sets up the window, orders the per-frame system sets, and
/// adds all sub-plugins.
pub struct OrreryPlugin;

impl Plugin for OrreryPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orrery".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        .configure_sets(
            Update,
            (
                OrrerySet::Load,
                OrrerySet::Input,
                OrrerySet::Focus,
                OrrerySet::Camera,
                OrrerySet::Render,
            )
                .chain(),
        )
        .add_plugins((
            SceneLoaderPlugin,
            FocusPlugin,
            CameraPlugin,
            WorldPlugin,
            BodyPlugin,
            DebugPlugin,
        ))
        .add_systems(Update, apply_hover_cursor.in_set(OrrerySet::Render));
    }
}

/// Cursor icon for a hover state.
pub fn hover_cursor(hovering: bool) -> CursorIcon {
    if hovering {
        CursorIcon::Pointer
    } else {
        CursorIcon::Default
    }
}

/// Shows a pointer cursor while a body is under the mouse.
fn apply_hover_cursor(
    mut hover_events: EventReader<PointerHover>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(hover) = hover_events.read().last() else {
        return;
    };
    for mut window in windows.iter_mut() {
        window.cursor.icon = hover_cursor(hover.id.is_some());
    }
}
