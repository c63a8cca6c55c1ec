//! Magic plugin - spell catalog, channels, mana and projectiles.

use bevy::prelude::*;

use super::catalog::{load_spell_catalog, SpellCatalog};
use super::events::*;
use super::projectile::{self, ProjectileRegistry};
use super::systems;
use crate::core::GameplaySet;

/// Tunables shared by every caster.
#[derive(Resource, Debug, Clone)]
pub struct MagicConfig {
    /// Directory holding one RON file per spell
    pub spells_dir: String,
    /// Radius of a projectile's own hit volume
    pub projectile_radius: f32,
}

impl Default for MagicConfig {
    fn default() -> Self {
        Self {
            spells_dir: "assets/data/spells".to_string(),
            projectile_radius: 0.2,
        }
    }
}

/// Magic plugin - handles the cast channel protocol and spell resolution.
pub struct MagicPlugin;

impl Plugin for MagicPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MagicConfig>()
            .init_resource::<SpellCatalog>()
            .init_resource::<ProjectileRegistry>()
            .add_event::<CastStartedEvent>()
            .add_event::<CastCompletedEvent>()
            .add_event::<CastInterruptedEvent>()
            .add_event::<TargetHighlightEvent>()
            .add_event::<CasterVisualEvent>()
            .add_systems(Startup, load_spell_catalog)
            .add_systems(
                Update,
                (systems::advance_channels, systems::regenerate_mana)
                    .in_set(GameplaySet::Channel),
            )
            .add_systems(
                Update,
                (
                    systems::apply_target_highlights,
                    projectile::spawn_spell_effects,
                    projectile::attach_projectile_visuals,
                    projectile::move_projectiles,
                )
                    .chain()
                    .in_set(GameplaySet::Resolve),
            );
    }
}
