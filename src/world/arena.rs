//! Arena construction: floors, light, cauldron puzzle, spawner and the player.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::cauldron::spawn_cauldron_pair;
use super::spawner::{SpawnWaveEvent, Spawner};
use crate::magic::SpellCatalog;
use crate::player::{spawn_player, PlayerConfig};

/// Marker for every entity that belongs to the arena and is cleaned up with it.
#[derive(Component)]
pub struct LevelGeometry;

/// Walkable rectangle of a floor, in world XZ.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FloorBounds {
    pub min: Vec2,
    pub max: Vec2,
}

/// Height enemies are placed at when spawned on a floor.
pub const SPAWN_HEIGHT: f32 = 0.6;

impl FloorBounds {
    pub fn from_center(center: Vec3, half_extents: Vec2) -> Self {
        let center = Vec2::new(center.x, center.z);
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.z)
    }

    /// Uniform random point on the floor at spawn height.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec3 {
        Vec3::new(
            rng.gen_range(self.min.x..=self.max.x),
            SPAWN_HEIGHT,
            rng.gen_range(self.min.y..=self.max.y),
        )
    }
}

/// One rectangular floor slab.
#[derive(Debug, Clone)]
pub struct RoomLayout {
    pub center: Vec3,
    pub half_extents: Vec2,
    /// Whether the spawner may place enemies here
    pub spawnable: bool,
}

/// Arena layout and wave tuning.
#[derive(Resource, Debug, Clone)]
pub struct ArenaConfig {
    pub rooms: Vec<RoomLayout>,
    pub player_start: Vec3,
    /// Cauldron pair positions; lighting both removes the fence
    pub cauldrons: [Vec3; 2],
    pub fence_position: Vec3,
    pub fence_half_extents: Vec3,
    pub enemies_per_wave: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            rooms: vec![
                RoomLayout {
                    center: Vec3::ZERO,
                    half_extents: Vec2::new(10.0, 10.0),
                    spawnable: true,
                },
                RoomLayout {
                    center: Vec3::new(0.0, 0.0, -14.0),
                    half_extents: Vec2::new(2.0, 4.0),
                    spawnable: false,
                },
                RoomLayout {
                    center: Vec3::new(0.0, 0.0, -28.0),
                    half_extents: Vec2::new(10.0, 10.0),
                    spawnable: true,
                },
            ],
            player_start: Vec3::new(0.0, 1.0, 6.0),
            cauldrons: [Vec3::new(-7.0, 0.0, 7.0), Vec3::new(7.0, 0.0, 7.0)],
            fence_position: Vec3::new(0.0, 1.0, -14.0),
            fence_half_extents: Vec3::new(2.0, 1.0, 0.1),
            enemies_per_wave: 3,
        }
    }
}

const FLOOR_DEPTH: f32 = 0.2;

/// Build the arena, spawn the player and request the first wave.
pub fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ArenaConfig>,
    player_config: Res<PlayerConfig>,
    catalog: Res<SpellCatalog>,
    mut spawn_waves: EventWriter<SpawnWaveEvent>,
) {
    info!("Building arena with {} rooms", config.rooms.len());

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.8, 0.75, 0.7),
        brightness: 300.0,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelGeometry,
    ));

    let floor_material = materials.add(Color::srgb(0.35, 0.33, 0.3));
    let mut floors = Vec::new();
    for room in &config.rooms {
        let size = room.half_extents * 2.0;
        let floor = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(size.x, FLOOR_DEPTH, size.y))),
                MeshMaterial3d(floor_material.clone()),
                Transform::from_xyz(room.center.x, room.center.y - FLOOR_DEPTH / 2.0, room.center.z),
                Collider::cuboid(room.half_extents.x, FLOOR_DEPTH / 2.0, room.half_extents.y),
                FloorBounds::from_center(room.center, room.half_extents),
                LevelGeometry,
            ))
            .id();
        if room.spawnable {
            floors.push(floor);
        }
    }

    let half = config.fence_half_extents;
    let fence = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.25, 0.2, 0.15))),
            Transform::from_translation(config.fence_position),
            Collider::cuboid(half.x, half.y, half.z),
            LevelGeometry,
        ))
        .id();

    spawn_cauldron_pair(
        &mut commands,
        &mut meshes,
        &mut materials,
        config.cauldrons,
        fence,
    );

    let spawner = commands
        .spawn((
            Spawner::new(config.enemies_per_wave, floors),
            LevelGeometry,
        ))
        .id();
    spawn_waves.send(SpawnWaveEvent { spawner });

    spawn_player(
        &mut commands,
        config.player_start,
        &player_config,
        &catalog,
        &mut meshes,
        &mut materials,
    );
}
