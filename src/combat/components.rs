//! Combat-related components.

use bevy::prelude::*;

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        self.current / self.maximum
    }
}

/// Marker for entities that have died. Dead entities are never valid spell targets.
#[derive(Component, Debug)]
pub struct Dead;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut health = Health::new(30.0);
        assert_eq!(health.take_damage(50.0), 30.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut health = Health::new(30.0);
        assert_eq!(health.take_damage(-5.0), 0.0);
        assert_eq!(health.current, 30.0);
    }
}
