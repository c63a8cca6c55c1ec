//! Caster attributes, caster roles and spell-target components.

use bevy::prelude::*;

/// Which side an entity fights on. Spells only lock onto the opposing faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn hostile(self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }
}

/// Makes an entity a valid spell target while it is alive.
#[derive(Component, Debug, Clone)]
pub struct Targetable {
    pub faction: Faction,
    /// Radius of the hit volume projectiles must reach
    pub hit_radius: f32,
    /// Number of casters currently channeling at this entity
    pub channelers: u32,
}

impl Targetable {
    pub fn new(faction: Faction, hit_radius: f32) -> Self {
        Self {
            faction,
            hit_radius,
            channelers: 0,
        }
    }

    pub fn is_being_targeted(&self) -> bool {
        self.channelers > 0
    }

    pub fn set_targeted(&mut self, targeted: bool) {
        if targeted {
            self.channelers += 1;
        } else {
            self.channelers = self.channelers.saturating_sub(1);
        }
    }
}

/// How a caster picks targets and what keeps its channel alive.
///
/// The channel, mana and resolution code is shared; only these rules differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CasterRole {
    /// Confirms targets by clicking and must stand still while channeling.
    Player {
        /// How far the caster may drift from the cast-start position
        anchor_tolerance: f32,
    },
    /// Locks a pre-selected target immediately and must keep it in sight.
    Autonomous {
        sight_range: f32,
    },
}

/// Anything that can channel spells.
#[derive(Component, Debug, Clone)]
pub struct Caster {
    /// Casting power: scales one-shot damage and mana regeneration
    pub power: f32,
    /// Numerator of channel progress per second
    pub channel_power: f32,
    /// Flat multiplier on channel progress
    pub casting_speed: f32,
    pub role: CasterRole,
}

impl Caster {
    pub fn faction(&self) -> Faction {
        match self.role {
            CasterRole::Player { .. } => Faction::Player,
            CasterRole::Autonomous { .. } => Faction::Enemy,
        }
    }
}
