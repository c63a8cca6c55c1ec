//! Spellbound - a top-down arena where spells are channeled, not fired.
//!
//! Casting is a small protocol: pick a spell slot, pick a target, then hold a
//! channel that fills over time until the spell resolves or gets interrupted.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, system sets, data loading, shared events
//! - **Magic**: Spell catalog, mana, cast channels, projectiles
//! - **Combat**: Health, damage application, deaths
//! - **Player**: Click-to-move, spell slots, target confirmation, camera
//! - **Enemies**: Enemy definitions, spawning, casting AI
//! - **World**: Arena layout, wave spawner, cauldron puzzle
//! - **UI**: HUD, cast indicators, pause and game over overlays

pub mod combat;
pub mod core;
pub mod enemies;
pub mod magic;
pub mod player;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct SpellboundPlugin;

impl Plugin for SpellboundPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            .add_plugins(magic::MagicPlugin)
            .add_plugins(combat::CombatPlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(world::WorldPlugin)
            .add_plugins(ui::UiPlugin);
    }
}
