//! Player module - player entity, cast input, movement, and camera.

mod casting;
mod components;
mod movement;
mod plugin;

pub use casting::{slot_for_key, ScreenRaycast, SLOT_KEYS};
pub use components::*;
pub use movement::{build_loadout, spawn_player, step_towards};
pub use plugin::PlayerPlugin;
