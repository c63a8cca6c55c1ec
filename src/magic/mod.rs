//! Magic module - spells, mana, the cast channel protocol and projectiles.

mod caster;
mod catalog;
mod channel;
mod definition;
mod error;
mod events;
mod instance;
mod mana;
mod plugin;
mod projectile;
mod systems;
mod targeting;

pub use caster::{Caster, CasterRole, Faction, Targetable};
pub use catalog::SpellCatalog;
pub use channel::{
    yaw_towards, CastChannel, CastSession, ChannelInputs, ChannelOutcome, ChannelStep,
    CHANNEL_COMPLETE,
};
pub use definition::{DamageMode, FanOut, SpellBehavior, SpellDefinition, SpellId};
#[cfg(test)]
pub(crate) use definition::test_definition;
pub use error::{CastError, InterruptReason};
pub use events::*;
pub use instance::{SpellInstance, Spellbook, SPELL_SLOTS};
pub use mana::ManaPool;
pub use plugin::{MagicConfig, MagicPlugin};
pub use projectile::{Projectile, ProjectileRegistry};
pub use systems::start_channel;
pub use targeting::{nearest_target, TargetingQuery};
