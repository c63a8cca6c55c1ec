//! Enemy spawning from registry definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{AiState, Enemy, EnemyType};
use super::data::EnemyDefinition;
use crate::combat::Health;
use crate::magic::{
    CastChannel, Caster, CasterRole, Faction, ManaPool, SpellCatalog, SpellId, Spellbook,
    Targetable,
};

/// Caster component for an enemy definition.
pub fn enemy_caster(definition: &EnemyDefinition) -> Caster {
    Caster {
        power: definition.casting_power,
        channel_power: definition.channel_power,
        casting_speed: definition.casting_speed,
        role: CasterRole::Autonomous {
            sight_range: definition.sight_range,
        },
    }
}

/// Spawn one enemy of `enemy_type` at `position`.
///
/// Returns `None` (and spawns nothing) if the enemy's spell is not in the catalog.
pub fn spawn_enemy(
    commands: &mut Commands,
    enemy_type: &str,
    definition: &EnemyDefinition,
    catalog: &SpellCatalog,
    position: Vec3,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Option<Entity> {
    let Some(spell) = catalog.instance(&SpellId::new(definition.spell.as_str()), definition.spell_level)
    else {
        warn!(
            "Enemy '{}' casts unknown spell '{}', not spawning",
            enemy_type, definition.spell
        );
        return None;
    };

    let collider = definition.collider.clone().unwrap_or_default();
    let (r, g, b) = definition.color;

    let entity = commands
        .spawn((
            Enemy,
            EnemyType(enemy_type.to_string()),
            AiState::default(),
            definition.to_stats(),
            Health::new(definition.max_health),
            enemy_caster(definition),
            ManaPool::new(definition.mana, definition.mana_regen),
            CastChannel::default(),
            Spellbook::single(spell),
            Targetable::new(Faction::Enemy, collider.radius * definition.scale),
            Mesh3d(meshes.add(Capsule3d::new(collider.radius, collider.half_height * 2.0))),
            MeshMaterial3d(materials.add(Color::srgb(r, g, b))),
            Transform::from_translation(position).with_scale(Vec3::splat(definition.scale)),
        ))
        .insert((
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(collider.half_height, collider.radius),
        ))
        .id();

    info!("Spawned {} at {:?}", definition.name, position);
    Some(entity)
}
