//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// AI state machine for enemy behavior.
#[derive(Component, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiState {
    /// Standing still, waiting for the player to enter detection range.
    #[default]
    Idle,
    /// Moving toward the player.
    Chasing,
    /// Standing still and channeling (or waiting for mana to channel).
    Casting,
    /// Waiting out the death timer before despawn.
    Dying,
}

/// Enemy movement and perception, loaded from RON data files.
#[derive(Component, Clone, Debug)]
pub struct EnemyStats {
    pub move_speed: f32,
    pub detection_range: f32,
    /// Distance at which the enemy stops and starts channeling
    pub cast_range: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            detection_range: 10.0,
            cast_range: 6.0,
        }
    }
}

/// Timer between death and despawn.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(2.0, TimerMode::Once))
    }
}
