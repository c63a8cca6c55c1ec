//! Enemies module - enemy entities, caster AI, and spawning.

mod ai;
mod components;
mod data;
mod plugin;
mod spawning;

pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry, ENEMIES_DIR};
pub use plugin::EnemyPlugin;
pub use spawning::{enemy_caster, spawn_enemy};
