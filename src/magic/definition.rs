//! Spell definitions - the immutable, authored half of a spell.

use serde::Deserialize;
use std::fmt;

/// Stable spell identifier (matches the RON file name).
#[derive(Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SpellId(pub String);

impl SpellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a multi-target spell distributes itself over the struck targets.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One homing projectile per struck target.
    #[default]
    PerTarget,
    /// A single projectile that damages every listed target on arrival.
    Shared,
}

/// Resolution behaviour of a spell.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum SpellBehavior {
    /// A single homing projectile toward the locked target.
    #[default]
    SingleTarget,
    /// Strikes the locked target and other hostiles around it.
    MultiTarget {
        /// Search radius around the locked target
        radius: f32,
        /// Maximum number of targets, the locked target included
        max_targets: usize,
        #[serde(default)]
        policy: FanOut,
    },
}

/// How a spell turns its coefficients into damage.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DamageMode {
    /// `damage_per_level * level * power`
    #[default]
    OneShot,
    /// Flat `damage_per_level`, ignores level and caster power
    Continuous,
}

fn default_speed() -> f32 {
    6.0
}

fn default_spawn_offset() -> (f32, f32, f32) {
    (0.0, 1.0, 0.0)
}

/// Spell definition loaded from RON.
///
/// Authored once and shared by every [`SpellInstance`](super::SpellInstance)
/// through an `Arc`.
#[derive(Deserialize, Clone, Debug)]
pub struct SpellDefinition {
    pub id: SpellId,
    pub name: String,
    pub damage_per_level: f32,
    pub mana_per_level: f32,
    /// Seconds-ish of channel per level; higher means slower casts
    pub cast_delay_per_level: f32,
    #[serde(default)]
    pub behavior: SpellBehavior,
    #[serde(default)]
    pub damage_mode: DamageMode,
    /// Projectile travel speed in units per second
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Spawn point relative to the caster
    #[serde(default = "default_spawn_offset")]
    pub spawn_offset: (f32, f32, f32),
}

impl SpellDefinition {
    /// Reject definitions that would stall or break the channel formula.
    pub fn validate(&self) -> Result<(), String> {
        if self.cast_delay_per_level <= 0.0 {
            return Err(format!(
                "cast_delay_per_level must be positive, got {}",
                self.cast_delay_per_level
            ));
        }
        if self.mana_per_level < 0.0 {
            return Err("mana_per_level must not be negative".to_string());
        }
        if self.speed <= 0.0 {
            return Err("speed must be positive".to_string());
        }
        if let SpellBehavior::MultiTarget { max_targets: 0, .. } = self.behavior {
            return Err("multi-target spell needs max_targets >= 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_definition(id: &str, mana_per_level: f32, cast_delay_per_level: f32) -> SpellDefinition {
    SpellDefinition {
        id: SpellId::new(id),
        name: id.to_string(),
        damage_per_level: 10.0,
        mana_per_level,
        cast_delay_per_level,
        behavior: SpellBehavior::SingleTarget,
        damage_mode: DamageMode::OneShot,
        speed: default_speed(),
        spawn_offset: default_spawn_offset(),
    }
}
