//! Mana pool - gates cast attempts and pays for completed casts.

use bevy::prelude::*;

use super::error::CastError;

/// Mana pool, normalized to 0-100 by default.
#[derive(Component, Debug, Clone)]
pub struct ManaPool {
    pub current: f32,
    pub maximum: f32,
    /// Mana per second per point of caster power
    pub regen_rate: f32,
}

impl Default for ManaPool {
    fn default() -> Self {
        Self {
            current: 100.0,
            maximum: 100.0,
            regen_rate: 1.2,
        }
    }
}

impl ManaPool {
    pub fn new(current: f32, regen_rate: f32) -> Self {
        Self {
            current: current.clamp(0.0, 100.0),
            regen_rate,
            ..default()
        }
    }

    /// A cast may only start with strictly more mana than it costs.
    pub fn can_afford(&self, cost: f32) -> bool {
        self.current > cost
    }

    /// Pay `cost`. Leaves the pool untouched if it cannot.
    pub fn debit(&mut self, cost: f32) -> Result<(), CastError> {
        if cost > self.current {
            return Err(CastError::InsufficientResource {
                cost,
                available: self.current,
            });
        }
        self.current -= cost;
        Ok(())
    }

    pub fn regenerate(&mut self, delta: f32, power: f32) {
        let gained = self.regen_rate * power * delta;
        if gained > 0.0 {
            self.current = (self.current + gained).min(self.maximum);
        }
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}
