//! Per-tick ordering of gameplay systems.

use bevy::prelude::*;

/// Gameplay phases, run in this order every `Update` while in game.
///
/// Channels are evaluated after input and AI have started them, effects are
/// spawned and moved after channels complete, and damage lands last so a hit
/// taken this tick interrupts channels on the next one.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Ai,
    Channel,
    Resolve,
    Damage,
    Death,
}
