//! Global events shared by combat, magic and enemy systems.
//!
//! Damage never touches another entity's `Health` directly: the attacker sends a
//! `DamageEvent` and the damage system (the only writer of `Health`) applies it.

use bevy::prelude::*;

/// Sent when an entity should take damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage (the caster of the spell)
    pub source: Entity,
    pub amount: f32,
}

/// Sent once when an entity's health reaches 0.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
    /// Entity that dealt the killing blow (if known)
    pub killed_by: Option<Entity>,
}
