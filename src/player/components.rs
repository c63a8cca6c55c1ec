//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Character attributes that feed the player's `Caster`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Attributes {
    /// Scales spell damage and mana regeneration
    pub intelligence: u32,
    /// Drives channel progress
    pub dexterity: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            intelligence: 2,
            dexterity: 10,
        }
    }
}

/// Point the player is walking to; `None` when standing still.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct MoveTarget(pub Option<Vec3>);

impl MoveTarget {
    pub fn set(&mut self, point: Vec3) {
        self.0 = Some(point);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Marker for the camera that follows the player.
#[derive(Component)]
pub struct GameCamera;

/// Configuration for the click-to-move controller and the player's caster.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    /// Movement speed in units per second
    pub move_speed: f32,
    /// Turn through `SmoothTransform` instead of snapping
    pub smooth_turning: bool,
    /// Turn rate used when `smooth_turning` is on
    pub turn_speed: f32,
    /// Distance at which a move target counts as reached
    pub arrival_threshold: f32,
    /// Search radius around a confirm click
    pub click_radius: f32,
    /// How far the player may drift while channeling
    pub anchor_tolerance: f32,
    pub casting_speed: f32,
    pub mana_regen_rate: f32,
    /// Spells equipped at spawn, in slot order
    pub loadout: Vec<(String, u32)>,
    /// Camera position relative to the player
    pub camera_offset: Vec3,
    pub camera_follow_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            smooth_turning: true,
            turn_speed: 10.0,
            arrival_threshold: 0.1,
            click_radius: 2.0,
            anchor_tolerance: 0.1,
            casting_speed: 15.0,
            mana_regen_rate: 1.2,
            loadout: vec![
                ("firebolt".to_string(), 1),
                ("ember_swarm".to_string(), 1),
            ],
            camera_offset: Vec3::new(0.0, 12.0, 9.0),
            camera_follow_speed: 6.0,
        }
    }
}
