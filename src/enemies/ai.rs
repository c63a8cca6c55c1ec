//! Enemy AI behavior systems.
//!
//! `Idle -> Chasing -> Casting -> Idle`. Every finished or interrupted channel
//! drops the enemy back to `Idle`, so it re-detects the player before casting again.

use bevy::prelude::*;

use super::components::{AiState, DeathTimer, Enemy, EnemyStats};
use crate::combat::{Dead, Health};
use crate::magic::{
    start_channel, CastChannel, CastCompletedEvent, CastError, CastEvents, CastInterruptedEvent,
    ManaPool, Spellbook,
};
use crate::player::Player;

/// The slot every enemy casts from.
const ENEMY_SLOT: usize = 0;

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Detect player and transition from Idle to Chasing.
pub fn ai_detection(
    player_query: Query<&Transform, (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut enemy_query: Query<(&Transform, &EnemyStats, &mut AiState), (With<Enemy>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    for (enemy_transform, stats, mut ai_state) in enemy_query.iter_mut() {
        if *ai_state != AiState::Idle {
            continue;
        }

        let distance = horizontal_distance(player_transform.translation, enemy_transform.translation);
        if distance <= stats.detection_range {
            *ai_state = AiState::Chasing;
        }
    }
}

/// Chase the player and stop to cast once in range.
pub fn ai_chase(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut enemy_query: Query<(&mut Transform, &EnemyStats, &mut AiState), (With<Enemy>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    for (mut enemy_transform, stats, mut ai_state) in enemy_query.iter_mut() {
        if *ai_state != AiState::Chasing {
            continue;
        }

        let player_pos = player_transform.translation;
        let enemy_pos = enemy_transform.translation;
        let direction = Vec3::new(player_pos.x - enemy_pos.x, 0.0, player_pos.z - enemy_pos.z);
        let distance = direction.length();

        if distance <= stats.cast_range {
            *ai_state = AiState::Casting;
            continue;
        }

        // Lose interest once well outside detection range
        if distance > stats.detection_range * 1.5 {
            *ai_state = AiState::Idle;
            continue;
        }

        let step = (stats.move_speed * time.delta_secs()).min(distance);
        enemy_transform.translation += direction / distance * step;

        let look_target = Vec3::new(player_pos.x, enemy_transform.translation.y, player_pos.z);
        enemy_transform.look_at(look_target, Vec3::Y);
    }
}

/// Start a channel at the player for every casting enemy whose channel is free.
///
/// An enemy that cannot pay holds position until it can. One that sees the
/// player leave cast range goes back to chasing.
pub fn ai_cast(
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut enemy_query: Query<
        (
            Entity,
            &Transform,
            &EnemyStats,
            &Health,
            &Spellbook,
            &ManaPool,
            &mut CastChannel,
            &mut AiState,
        ),
        With<Enemy>,
    >,
    mut events: CastEvents,
) {
    let player = player_query.get_single().ok();

    for (entity, transform, stats, health, spellbook, mana, mut channel, mut ai_state) in
        enemy_query.iter_mut()
    {
        if *ai_state != AiState::Casting || channel.is_channeling() {
            continue;
        }

        let Some((player, player_transform)) = player else {
            *ai_state = AiState::Idle;
            continue;
        };

        if horizontal_distance(transform.translation, player_transform.translation) > stats.cast_range {
            *ai_state = AiState::Chasing;
            continue;
        }

        match channel.begin(ENEMY_SLOT, spellbook, mana) {
            Ok(()) => {}
            Err(CastError::InsufficientResource { .. }) => continue,
            Err(e) => {
                warn!("{:?} cannot cast: {}", entity, e);
                *ai_state = AiState::Idle;
                continue;
            }
        }

        // Autonomous casters lock their pre-selected target immediately
        if let Err(e) = start_channel(
            entity,
            &mut channel,
            spellbook,
            player,
            health.current,
            transform.translation,
            &mut events,
        ) {
            warn!("{:?} failed to lock the player: {}", entity, e);
            channel.cancel_targeting();
            *ai_state = AiState::Idle;
        }
    }
}

/// Drop back to Idle after every completed or interrupted channel.
pub fn ai_finish_cast(
    mut completed: EventReader<CastCompletedEvent>,
    mut interrupted: EventReader<CastInterruptedEvent>,
    mut enemy_query: Query<&mut AiState, With<Enemy>>,
) {
    let casters = completed
        .read()
        .map(|event| event.caster)
        .chain(interrupted.read().map(|event| event.caster));

    for caster in casters {
        if let Ok(mut ai_state) = enemy_query.get_mut(caster) {
            if *ai_state == AiState::Casting {
                *ai_state = AiState::Idle;
            }
        }
    }
}

/// Handle enemy death transition.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut enemy_query: Query<(Entity, &Health, &mut AiState), (With<Enemy>, Without<DeathTimer>)>,
) {
    for (entity, health, mut ai_state) in enemy_query.iter_mut() {
        if health.is_dead() && *ai_state != AiState::Dying {
            *ai_state = AiState::Dying;
            commands.entity(entity).insert(DeathTimer::default());
        }
    }
}

/// Despawn enemies once their death timer runs out.
pub fn despawn_dead_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DeathTimer)>,
) {
    for (entity, mut death_timer) in query.iter_mut() {
        death_timer.0.tick(time.delta());

        if death_timer.0.finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
