//! Scene loading and file watching.
//!
//! Loads the asteroid scene from disk, recomputes the scene scale, and
//! reloads whenever the file changes (or `R` is pressed). A failed reload
//! keeps the previous scene on screen and records the error.

use bevy::prelude::*;
use focus::{ScaleConfig, SceneScale};
use notify::{Event as NotifyEvent, RecommendedWatcher, RecursiveMode, Watcher};
use scene_data::SceneData;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Instant;

use crate::focus_bridge::FocusSettings;
use crate::OrrerySet;

/// Plugin for loading the scene from a file.
pub struct SceneLoaderPlugin;

impl Plugin for SceneLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneSource>()
            .init_resource::<FocusSettings>()
            .init_resource::<LoadedScene>()
            .add_event::<SceneLoadedEvent>()
            .add_systems(PreStartup, load_initial_scene)
            .add_systems(
                Update,
                (check_file_updates, handle_reload_key)
                    .chain()
                    .in_set(OrrerySet::Load),
            );
    }
}

/// Where the scene comes from.
#[derive(Resource, Debug, Clone)]
pub struct SceneSource {
    /// Path to the scene JSON file.
    pub path: PathBuf,
    /// Reload automatically when the file changes.
    pub watch: bool,
}

impl Default for SceneSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/scene.json"),
            watch: true,
        }
    }
}

/// The currently displayed scene and its derived scale.
#[derive(Resource, Default)]
pub struct LoadedScene {
    /// The most recently loaded scene.
    pub scene: SceneData,
    /// Scale derived from `scene`.
    pub scale: SceneScale,
    /// When the scene was last replaced.
    pub last_update: Option<Instant>,
    /// Any error from the last load attempt.
    pub last_error: Option<String>,
}

impl LoadedScene {
    /// Check if a scene with at least one asteroid is loaded.
    pub fn has_bodies(&self) -> bool {
        !self.scene.is_empty()
    }
}

/// Event emitted when a new scene has replaced the old one.
#[derive(Event, Debug, Clone)]
pub struct SceneLoadedEvent {
    /// Number of asteroids in the new scene.
    pub count: usize,
    /// The new scale factor.
    pub scale: f32,
}

/// File watching state stored in Local (doesn't need Send+Sync).
#[derive(Default)]
struct FileWatcherState {
    watcher: Option<RecommendedWatcher>,
    rx: Option<Receiver<Result<NotifyEvent, notify::Error>>>,
    initialized: bool,
}

impl FileWatcherState {
    /// Starts watching the scene file's directory, once.
    fn ensure_initialized(&mut self, source: &SceneSource) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if !source.watch {
            tracing::info!("File watching disabled; press R to reload");
            return;
        }

        let watch_dir = source
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = channel();
        match RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        ) {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
                    tracing::warn!("Failed to watch directory {:?}: {}", watch_dir, e);
                } else {
                    tracing::info!("Watching directory: {:?}", watch_dir);
                }
                self.watcher = Some(watcher);
                self.rx = Some(rx);
            }
            Err(e) => {
                tracing::error!("Failed to create file watcher: {}", e);
            }
        }
    }
}

/// Returns true if a watcher event touches the scene file.
fn is_scene_change(event: &NotifyEvent, scene_path: &Path) -> bool {
    let scene_file = scene_path.file_name();
    matches!(
        event.kind,
        notify::EventKind::Modify(_) | notify::EventKind::Create(_)
    ) && event.paths.iter().any(|p| p.file_name() == scene_file)
}

/// Startup system: loads the scene before the camera and bodies are spawned.
fn load_initial_scene(
    source: Res<SceneSource>,
    settings: Res<FocusSettings>,
    mut loaded: ResMut<LoadedScene>,
    mut events: EventWriter<SceneLoadedEvent>,
) {
    if load_scene_file(&source.path, &mut loaded, &settings.scale) {
        events.send(SceneLoadedEvent {
            count: loaded.scene.len(),
            scale: loaded.scale.get(),
        });
    }
}

/// Check for file updates and reload the scene if necessary.
fn check_file_updates(
    mut watcher_state: Local<FileWatcherState>,
    source: Res<SceneSource>,
    settings: Res<FocusSettings>,
    mut loaded: ResMut<LoadedScene>,
    mut events: EventWriter<SceneLoadedEvent>,
) {
    watcher_state.ensure_initialized(&source);

    let Some(ref rx) = watcher_state.rx else {
        return;
    };

    // Editors often emit several events per save; reload once.
    let mut changed = false;
    while let Ok(result) = rx.try_recv() {
        match result {
            Ok(event) => {
                if is_scene_change(&event, &source.path) {
                    tracing::debug!("Detected file change: {:?}", event.paths);
                    changed = true;
                }
            }
            Err(e) => {
                tracing::warn!("File watcher error: {}", e);
            }
        }
    }

    if changed && load_scene_file(&source.path, &mut loaded, &settings.scale) {
        events.send(SceneLoadedEvent {
            count: loaded.scene.len(),
            scale: loaded.scale.get(),
        });
    }
}

/// Handle R key to force reload.
fn handle_reload_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    source: Res<SceneSource>,
    settings: Res<FocusSettings>,
    mut loaded: ResMut<LoadedScene>,
    mut events: EventWriter<SceneLoadedEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        tracing::info!("Manual reload triggered");
        if load_scene_file(&source.path, &mut loaded, &settings.scale) {
            events.send(SceneLoadedEvent {
                count: loaded.scene.len(),
                scale: loaded.scale.get(),
            });
        }
    }
}

/// Load the scene from a file. On failure the previous scene is kept and
/// the error is recorded in `loaded.last_error`.
pub fn load_scene_file(path: &Path, loaded: &mut LoadedScene, config: &ScaleConfig) -> bool {
    match SceneData::from_file(path) {
        Ok(scene) => {
            if !scene.count_matches_metadata() {
                tracing::warn!(
                    "Scene metadata count {} does not match {} asteroids",
                    scene.metadata.count,
                    scene.len()
                );
            }
            let scale = SceneScale::for_scene(&scene, config);
            tracing::info!(
                "Loaded scene from {:?} ({} asteroids, scale {:.5})",
                path,
                scene.len(),
                scale.get()
            );
            loaded.scene = scene;
            loaded.scale = scale;
            loaded.last_update = Some(Instant::now());
            loaded.last_error = None;
            true
        }
        Err(e) => {
            let error_msg = format!("Failed to load scene: {}", e);
            tracing::error!("{}", error_msg);
            loaded.last_error = Some(error_msg);
            false
        }
    }
}
