//! Asteroid rendering: spheres, orbit paths, and pointer picking.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use focus::{project_scene, BodyEncoding, OrbitEncoding, ProjectedBody};
use std::collections::{HashMap, HashSet};

use crate::camera::MainCamera;
use crate::focus_bridge::{FocusSettings, Highlight, PointerHover, SelectIntent};
use crate::scene_loader::LoadedScene;
use crate::OrrerySet;

/// Pointer travel (in logical pixels) below which a press and release count
/// as a click rather than a drag.
const CLICK_SLOP: f32 = 4.0;

/// Plugin for asteroid rendering and interaction.
pub struct BodyPlugin;

impl Plugin for BodyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BodyEntities>()
            .init_resource::<ProjectedScene>()
            .add_systems(Startup, setup_body_assets)
            .add_systems(Update, pick_bodies.in_set(OrrerySet::Input))
            .add_systems(
                Update,
                (reproject_scene, sync_bodies_with_scene, draw_orbits)
                    .chain()
                    .in_set(OrrerySet::Render),
            );
    }
}

/// Component for the visual representation of an asteroid.
#[derive(Component, Debug)]
pub struct VisualBody {
    /// Asteroid id.
    pub asteroid_id: String,
}

/// Resource mapping asteroid ids to their entities.
#[derive(Resource, Default)]
pub struct BodyEntities {
    /// Map of asteroid id to entity.
    pub map: HashMap<String, Entity>,
}

impl BodyEntities {
    /// Get the entity for an asteroid.
    pub fn get(&self, asteroid_id: &str) -> Option<Entity> {
        self.map.get(asteroid_id).copied()
    }

    /// Insert or update an asteroid entity mapping.
    pub fn insert(&mut self, asteroid_id: impl Into<String>, entity: Entity) {
        self.map.insert(asteroid_id.into(), entity);
    }

    /// Remove an asteroid entity mapping.
    pub fn remove(&mut self, asteroid_id: &str) -> Option<Entity> {
        self.map.remove(asteroid_id)
    }
}

/// Draw-ready projection of the loaded scene for the current selection.
#[derive(Resource, Default)]
pub struct ProjectedScene {
    pub bodies: Vec<ProjectedBody>,
}

impl ProjectedScene {
    /// Looks up a projected body by id.
    pub fn get(&self, id: &str) -> Option<&ProjectedBody> {
        self.bodies.iter().find(|b| b.id == id)
    }
}

/// Shared mesh for all bodies; scaled per entity.
#[derive(Resource)]
struct BodyAssets {
    sphere: Handle<Mesh>,
}

fn setup_body_assets(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(32, 18));
    commands.insert_resource(BodyAssets { sphere });
}

/// Re-runs the projection whenever the scene or the selection changes.
fn reproject_scene(
    loaded: Res<LoadedScene>,
    highlight: Res<Highlight>,
    settings: Res<FocusSettings>,
    mut projected: ResMut<ProjectedScene>,
) {
    if !(loaded.is_changed() || highlight.is_changed()) {
        return;
    }
    projected.bodies = project_scene(
        &loaded.scene,
        loaded.scale,
        highlight.0.as_deref(),
        &settings.style,
    );
}

/// System to synchronize body entities with the projected scene.
fn sync_bodies_with_scene(
    mut commands: Commands,
    projected: Res<ProjectedScene>,
    assets: Option<Res<BodyAssets>>,
    mut body_entities: ResMut<BodyEntities>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut bodies: Query<(&mut Transform, &Handle<StandardMaterial>), With<VisualBody>>,
) {
    if !projected.is_changed() {
        return;
    }
    let Some(assets) = assets else {
        return;
    };

    let existing_ids: HashSet<String> = body_entities.map.keys().cloned().collect();
    let projected_ids: HashSet<String> = projected.bodies.iter().map(|b| b.id.clone()).collect();

    for asteroid_id in existing_ids.difference(&projected_ids) {
        if let Some(entity) = body_entities.remove(asteroid_id) {
            commands.entity(entity).despawn_recursive();
        }
    }

    for body in &projected.bodies {
        if let Some(entity) = body_entities.get(&body.id) {
            if let Ok((mut transform, material)) = bodies.get_mut(entity) {
                *transform = body_transform(body);
                if let Some(material) = materials.get_mut(material) {
                    apply_body_encoding(material, &body.body);
                }
            }
        } else {
            let entity = spawn_body(&mut commands, body, &assets, &mut materials);
            body_entities.insert(body.id.clone(), entity);
        }
    }
}

fn body_transform(body: &ProjectedBody) -> Transform {
    Transform::from_translation(body.position).with_scale(Vec3::splat(body.radius))
}

fn apply_body_encoding(material: &mut StandardMaterial, encoding: &BodyEncoding) {
    let [r, g, b] = encoding.color;
    material.base_color = Color::srgb(r, g, b);
    material.emissive = Color::srgb(r, g, b).to_linear() * encoding.emissive;
}

fn orbit_color(encoding: &OrbitEncoding) -> Color {
    let [r, g, b] = encoding.color;
    Color::srgba(r, g, b, encoding.opacity)
}

/// Spawn a new visual body entity.
fn spawn_body(
    commands: &mut Commands,
    body: &ProjectedBody,
    assets: &BodyAssets,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let mut material = StandardMaterial {
        perceptual_roughness: 0.9,
        ..default()
    };
    apply_body_encoding(&mut material, &body.body);

    commands
        .spawn((
            PbrBundle {
                mesh: assets.sphere.clone(),
                material: materials.add(material),
                transform: body_transform(body),
                ..default()
            },
            VisualBody {
                asteroid_id: body.id.clone(),
            },
            Name::new(body.name.clone()),
        ))
        .id()
}

/// Draws every orbit as a polyline in input order.
fn draw_orbits(projected: Res<ProjectedScene>, mut gizmos: Gizmos) {
    for body in &projected.bodies {
        if body.orbit.len() < 2 {
            continue;
        }
        gizmos.linestrip(body.orbit.iter().copied(), orbit_color(&body.orbit_style));
    }
}

/// Distance along a normalized ray to its first intersection with a sphere.
///
/// A ray starting inside the sphere hits at distance zero.
pub fn ray_sphere_hit(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let far = -b + root;
    if far < 0.0 {
        return None;
    }
    Some((-b - root).max(0.0))
}

/// The nearest body hit by a ray, if any.
pub fn pick_body<'a>(
    bodies: &'a [ProjectedBody],
    origin: Vec3,
    direction: Vec3,
) -> Option<&'a ProjectedBody> {
    bodies
        .iter()
        .filter_map(|b| Some((ray_sphere_hit(origin, direction, b.position, b.radius)?, b)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, body)| body)
}

/// Press position of the pending left click.
#[derive(Default)]
struct ClickTracker {
    pressed_at: Option<Vec2>,
}

/// Ray-casts the pointer against projected bodies. Emits [`PointerHover`]
/// when the hovered body changes and [`SelectIntent`] on click.
fn pick_bodies(
    mut tracker: Local<ClickTracker>,
    mut hovered: Local<Option<String>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    projected: Res<ProjectedScene>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut hover_events: EventWriter<PointerHover>,
    mut select_events: EventWriter<SelectIntent>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };

    let cursor = window.cursor_position();
    let hit = cursor
        .and_then(|c| camera.viewport_to_world(camera_transform, c))
        .and_then(|ray| pick_body(&projected.bodies, ray.origin, *ray.direction))
        .map(|body| body.id.clone());

    if *hovered != hit {
        hover_events.send(PointerHover { id: hit.clone() });
        *hovered = hit.clone();
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        tracker.pressed_at = cursor;
    }
    if mouse_button.just_released(MouseButton::Left) {
        let pressed_at = tracker.pressed_at.take();
        let is_click = matches!(
            (pressed_at, cursor),
            (Some(start), Some(end)) if start.distance(end) <= CLICK_SLOP
        );
        if let (true, Some(id)) = (is_click, hit) {
            tracing::debug!(id = %id, "body clicked");
            select_events.send(SelectIntent { id });
        }
    }
}
