//! Environment rendering: background, central star, lights, and the
//! reference plane.

use bevy::prelude::*;

use crate::focus_bridge::FocusSettings;
use crate::OrrerySet;

/// Plugin for the static surroundings of the scene.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Environment>()
            .add_systems(Startup, spawn_environment)
            .add_systems(Update, draw_reference_plane.in_set(OrrerySet::Render));
    }
}

/// Look of the surroundings.
#[derive(Resource, Debug, Clone)]
pub struct Environment {
    /// Clear color behind the scene.
    pub background: Color,
    /// Render-space radius of the central star.
    pub star_radius: f32,
    /// Color of the central star.
    pub star_color: Color,
    /// Number of concentric rings drawn on the reference plane.
    pub ring_count: u32,
    /// Color of the reference rings.
    pub ring_color: Color,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            background: Color::srgb(0.01, 0.01, 0.03),
            star_radius: 1.2,
            star_color: Color::srgb(1.0, 0.85, 0.4),
            ring_count: 3,
            ring_color: Color::srgba(0.4, 0.4, 0.5, 0.15),
        }
    }
}

impl Environment {
    /// Radii of the reference rings, evenly spaced out to `outer`.
    pub fn ring_radii(&self, outer: f32) -> Vec<f32> {
        let count = self.ring_count.max(1);
        (1..=count)
            .map(|i| outer * i as f32 / count as f32)
            .collect()
    }
}

/// Marker component for the central star.
#[derive(Component)]
pub struct CentralStar;

fn spawn_environment(
    mut commands: Commands,
    environment: Res<Environment>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ClearColor(environment.background));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 80.0,
    });

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Sphere::new(environment.star_radius).mesh().uv(32, 18)),
            material: materials.add(StandardMaterial {
                base_color: environment.star_color,
                emissive: environment.star_color.to_linear() * 4.0,
                unlit: true,
                ..default()
            }),
            ..default()
        },
        CentralStar,
        Name::new("Star"),
    ));

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 4.0e7,
            range: 500.0,
            shadows_enabled: false,
            ..default()
        },
        ..default()
    });
}

/// Draws faint rings on the ecliptic plane out to the normalized radius.
fn draw_reference_plane(
    environment: Res<Environment>,
    settings: Res<FocusSettings>,
    mut gizmos: Gizmos,
) {
    for radius in environment.ring_radii(settings.scale.desired_radius) {
        gizmos.circle(Vec3::ZERO, Dir3::Y, radius, environment.ring_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_radii_evenly_spaced() {
        let environment = Environment::default();
        assert_eq!(environment.ring_radii(30.0), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_ring_radii_never_empty() {
        let environment = Environment {
            ring_count: 0,
            ..default()
        };
        assert_eq!(environment.ring_radii(30.0), vec![30.0]);
    }
}
