//! Viewer layer: Bevy app around the headless focus core.
//!
//! Systems run in the [`OrrerySet`] order every frame: the scene is
//! (re)loaded, input is turned into selection and reset signals, the focus
//! bridge steps the camera, the orbit controls re-aim it, and finally bodies
//! and orbits are drawn for the new selection.

use bevy::prelude::SystemSet;

pub mod bodies;
pub mod camera;
pub mod debug;
pub mod focus_bridge;
pub mod plugin;
pub mod scene_loader;
pub mod world;

pub use plugin::OrreryPlugin;

/// Per-frame ordering of the viewer's systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrrerySet {
    /// Scene loading and hot reload.
    Load,
    /// Pointer picking and camera input.
    Input,
    /// Selection and reset handling, camera focus.
    Focus,
    /// Applying navigation-control updates.
    Camera,
    /// Body sync, orbit drawing, and overlays.
    Render,
}
