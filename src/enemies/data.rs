//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::components::EnemyStats;
use crate::core::load_ron_dir;

/// Directory holding one RON file per enemy type.
pub const ENEMIES_DIR: &str = "assets/data/enemies";

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.5,
            radius: 0.3,
        }
    }
}

fn default_casting_speed() -> f32 {
    1.0
}

fn default_channel_power() -> f32 {
    20.0
}

fn default_mana() -> f32 {
    100.0
}

fn default_mana_regen() -> f32 {
    1.2
}

fn default_color() -> (f32, f32, f32) {
    (0.7, 0.2, 0.2)
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub cast_range: f32,
    /// Channels toward targets further than this are interrupted
    pub sight_range: f32,
    pub scale: f32,
    #[serde(default)]
    pub collider: Option<ColliderConfig>,
    /// Spell catalog id the enemy casts
    pub spell: String,
    pub spell_level: u32,
    /// Caster power
    pub casting_power: f32,
    #[serde(default = "default_casting_speed")]
    pub casting_speed: f32,
    #[serde(default = "default_channel_power")]
    pub channel_power: f32,
    #[serde(default = "default_mana")]
    pub mana: f32,
    #[serde(default = "default_mana_regen")]
    pub mana_regen: f32,
    #[serde(default = "default_color")]
    pub color: (f32, f32, f32),
}

impl EnemyDefinition {
    /// Convert to EnemyStats component.
    pub fn to_stats(&self) -> EnemyStats {
        EnemyStats {
            move_speed: self.move_speed,
            detection_range: self.detection_range,
            cast_range: self.cast_range,
        }
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    /// Every enemy type, sorted so random picks are reproducible with a seeded rng.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let loaded = match load_ron_dir::<EnemyDefinition>(Path::new(ENEMIES_DIR)) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("Enemy definitions unavailable: {}", e);
            return;
        }
    };

    for (enemy_type, definition) in loaded {
        info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
        registry.definitions.insert(enemy_type, definition);
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}
