//! Spell instances and the per-caster spellbook.

use bevy::prelude::*;
use std::sync::Arc;

use super::definition::{DamageMode, SpellDefinition, SpellId};

/// Number of cast slots (bound to F1..F12 for the player).
pub const SPELL_SLOTS: usize = 12;

/// A caster's level-scaled binding of a shared [`SpellDefinition`].
#[derive(Clone, Debug)]
pub struct SpellInstance {
    definition: Arc<SpellDefinition>,
    level: u32,
}

impl SpellInstance {
    /// Levels below 1 are raised to 1.
    pub fn new(definition: Arc<SpellDefinition>, level: u32) -> Self {
        Self {
            definition,
            level: level.max(1),
        }
    }

    pub fn definition(&self) -> &SpellDefinition {
        &self.definition
    }

    pub fn id(&self) -> &SpellId {
        &self.definition.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    pub fn level_up(&mut self) {
        self.level += 1;
    }

    /// `mana_per_level * level`
    pub fn mana_cost(&self) -> f32 {
        self.definition.mana_per_level * self.level as f32
    }

    /// `cast_delay_per_level * level`
    pub fn cast_delay(&self) -> f32 {
        self.definition.cast_delay_per_level * self.level as f32
    }

    /// Damage dealt to each struck target by a caster with `power`.
    pub fn damage(&self, power: f32) -> f32 {
        match self.definition.damage_mode {
            DamageMode::OneShot => self.definition.damage_per_level * self.level as f32 * power,
            DamageMode::Continuous => self.definition.damage_per_level,
        }
    }
}

/// The spells a caster has equipped, one per cast slot.
#[derive(Component, Clone, Debug, Default)]
pub struct Spellbook {
    slots: [Option<SpellInstance>; SPELL_SLOTS],
}

impl Spellbook {
    /// A spellbook with `instance` in slot 0, as enemies carry.
    pub fn single(instance: SpellInstance) -> Self {
        let mut book = Self::default();
        book.equip(0, instance);
        book
    }

    pub fn get(&self, slot: usize) -> Option<&SpellInstance> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Put `instance` in `slot`, returning whatever was there. Out-of-range slots are ignored.
    pub fn equip(&mut self, slot: usize, instance: SpellInstance) -> Option<SpellInstance> {
        let entry = self.slots.get_mut(slot)?;
        entry.replace(instance)
    }

    pub fn unequip(&mut self, slot: usize) -> Option<SpellInstance> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Raise the level of the spell in `slot`. Returns the new level.
    pub fn level_up(&mut self, slot: usize) -> Option<u32> {
        let instance = self.slots.get_mut(slot)?.as_mut()?;
        instance.level_up();
        Some(instance.level())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SpellInstance)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, instance)| instance.as_ref().map(|i| (slot, i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::definition::test_definition;

    #[test]
    fn test_derived_costs_scale_with_level() {
        let instance = SpellInstance::new(Arc::new(test_definition("firebolt", 40.0, 1.5)), 2);
        assert_eq!(instance.mana_cost(), 80.0);
        assert_eq!(instance.cast_delay(), 3.0);
    }

    #[test]
    fn test_level_zero_is_raised_to_one() {
        let mut instance = SpellInstance::new(Arc::new(test_definition("firebolt", 40.0, 1.0)), 0);
        assert_eq!(instance.level(), 1);
        instance.set_level(0);
        assert_eq!(instance.level(), 1);
    }

    #[test]
    fn test_damage_modes() {
        let mut def = test_definition("firebolt", 10.0, 1.0);
        def.damage_per_level = 5.0;
        let one_shot = SpellInstance::new(Arc::new(def.clone()), 3);
        assert_eq!(one_shot.damage(2.0), 30.0);

        def.damage_mode = DamageMode::Continuous;
        let continuous = SpellInstance::new(Arc::new(def), 3);
        assert_eq!(continuous.damage(2.0), 5.0);
    }

    #[test]
    fn test_spellbook_equip_and_level_up() {
        let def = Arc::new(test_definition("firebolt", 10.0, 1.0));
        let mut book = Spellbook::default();

        assert!(book.equip(3, SpellInstance::new(def.clone(), 1)).is_none());
        assert_eq!(book.get(3).map(SpellInstance::level), Some(1));
        assert_eq!(book.level_up(3), Some(2));
        assert!(book.get(4).is_none());

        // Out of range slots are ignored
        assert!(book.equip(SPELL_SLOTS, SpellInstance::new(def, 1)).is_none());
        assert!(book.get(SPELL_SLOTS).is_none());

        assert!(book.unequip(3).is_some());
        assert_eq!(book.iter().count(), 0);
    }
}
