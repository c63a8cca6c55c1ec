//! Spell catalog - every authored spell, loaded from RON.

use bevy::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::definition::{SpellDefinition, SpellId};
use super::instance::SpellInstance;
use super::plugin::MagicConfig;
use crate::core::{load_ron_dir, DataLoadError};

/// Resource holding all loaded spell definitions.
#[derive(Resource, Default)]
pub struct SpellCatalog {
    spells: HashMap<SpellId, Arc<SpellDefinition>>,
}

impl SpellCatalog {
    /// Add a definition after validating it.
    pub fn insert(&mut self, definition: SpellDefinition) -> Result<(), DataLoadError> {
        definition
            .validate()
            .map_err(|reason| DataLoadError::InvalidDefinition {
                path: definition.id.to_string(),
                reason,
            })?;
        self.spells
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, id: &SpellId) -> Option<&Arc<SpellDefinition>> {
        self.spells.get(id)
    }

    /// A level-scaled instance of `id`, sharing the catalog's definition.
    pub fn instance(&self, id: &SpellId, level: u32) -> Option<SpellInstance> {
        self.get(id)
            .map(|definition| SpellInstance::new(Arc::clone(definition), level))
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

/// Load every spell definition from the configured data directory.
pub fn load_spell_catalog(config: Res<MagicConfig>, mut catalog: ResMut<SpellCatalog>) {
    let definitions = match load_ron_dir::<SpellDefinition>(Path::new(&config.spells_dir)) {
        Ok(definitions) => definitions,
        Err(e) => {
            warn!("No spells loaded: {}", e);
            return;
        }
    };

    for (file_stem, definition) in definitions {
        if definition.id.as_str() != file_stem {
            warn!(
                "Spell file '{}.ron' declares id '{}'; using the declared id",
                file_stem, definition.id
            );
        }

        let name = definition.name.clone();
        match catalog.insert(definition) {
            Ok(()) => info!("Loaded spell definition: {} ({})", name, file_stem),
            Err(e) => error!("{}", e),
        }
    }

    info!("Loaded {} spell definitions", catalog.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::definition::test_definition;

    #[test]
    fn test_instances_share_definition() {
        let mut catalog = SpellCatalog::default();
        catalog.insert(test_definition("firebolt", 20.0, 1.0)).unwrap();

        let id = SpellId::new("firebolt");
        let a = catalog.instance(&id, 1).unwrap();
        let b = catalog.instance(&id, 3).unwrap();

        assert!(std::ptr::eq(a.definition(), b.definition()));
        assert_eq!(b.mana_cost(), 60.0);
        assert!(catalog.instance(&SpellId::new("missing"), 1).is_none());
    }

    #[test]
    fn test_insert_rejects_invalid_definition() {
        let mut catalog = SpellCatalog::default();
        let result = catalog.insert(test_definition("stalled", 20.0, 0.0));
        assert!(matches!(result, Err(DataLoadError::InvalidDefinition { .. })));
        assert!(catalog.is_empty());
    }
}
