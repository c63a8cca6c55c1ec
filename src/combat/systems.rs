//! Combat systems - damage application and death routing.

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::*;
use crate::core::{DamageEvent, DeathEvent, GameState};
use crate::player::Player;

/// Apply queued damage to entities.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, Option<&Dead>)>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = HashSet::new();

    for event in damage_events.read() {
        if died_this_frame.contains(&event.target) {
            continue;
        }

        // Target may have been despawned since the event was sent
        let Ok((mut health, dead)) = health_query.get_mut(event.target) else {
            continue;
        };
        if dead.is_some() {
            continue;
        }

        health.take_damage(event.amount);

        if health.is_dead() {
            died_this_frame.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}

/// Route deaths: the player ends the run, enemies are left to their own death handling.
pub fn check_deaths(
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<Entity, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in death_events.read() {
        if player_query.get(event.entity).is_ok() {
            info!("Player died! Transitioning to Game Over...");
            next_state.set(GameState::GameOver);
        } else {
            debug!("{:?} died (killed by {:?})", event.entity, event.killed_by);
        }
    }
}
