//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::data::{load_enemy_definitions, EnemyRegistry};
use crate::core::GameplaySet;

/// Enemy plugin - handles enemy definitions, AI, and death.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .add_systems(Startup, load_enemy_definitions)
            .add_systems(
                Update,
                (
                    ai::ai_finish_cast,
                    ai::ai_detection,
                    ai::ai_chase,
                    ai::ai_cast,
                )
                    .chain()
                    .in_set(GameplaySet::Ai),
            )
            .add_systems(
                Update,
                (ai::handle_enemy_death, ai::despawn_dead_enemies)
                    .chain()
                    .in_set(GameplaySet::Death),
            );
    }
}
