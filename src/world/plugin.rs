//! World plugin - arena setup, enemy waves, and the cauldron puzzle.

use bevy::prelude::*;

use super::arena::{setup_arena, ArenaConfig, LevelGeometry};
use super::cauldron::light_cauldrons;
use super::spawner::{spawn_waves, trigger_next_wave, SpawnWaveEvent};
use crate::core::{GameState, GameplaySet};
use crate::enemies::Enemy;
use crate::magic::{Projectile, ProjectileRegistry};
use crate::player::{GameCamera, Player};

/// World plugin - handles arena construction and world interactables.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaConfig>()
            .add_event::<SpawnWaveEvent>()
            // Loading is only left for a fresh game, never on unpause
            .add_systems(OnExit(GameState::Loading), setup_arena)
            .add_systems(OnExit(GameState::GameOver), cleanup_arena)
            .add_systems(
                Update,
                (trigger_next_wave, spawn_waves)
                    .chain()
                    .in_set(GameplaySet::Death),
            )
            .add_systems(Update, light_cauldrons.in_set(GameplaySet::Resolve));
    }
}

/// Despawn everything the arena and the last run left behind.
fn cleanup_arena(
    mut commands: Commands,
    mut registry: ResMut<ProjectileRegistry>,
    query: Query<
        Entity,
        Or<(
            With<LevelGeometry>,
            With<Player>,
            With<Enemy>,
            With<GameCamera>,
            With<Projectile>,
        )>,
    >,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    registry.clear();
}
