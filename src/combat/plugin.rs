//! Combat plugin - damage and death handling.

use bevy::prelude::*;

use super::systems;
use crate::core::GameplaySet;

/// Combat plugin - the only writer of `Health`.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::apply_damage.in_set(GameplaySet::Damage))
            .add_systems(Update, systems::check_deaths.in_set(GameplaySet::Death));
    }
}
