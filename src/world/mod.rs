//! World module - arena, enemy waves, and interactables.

mod arena;
mod cauldron;
mod plugin;
mod spawner;

pub use arena::{ArenaConfig, FloorBounds, LevelGeometry, RoomLayout, SPAWN_HEIGHT};
pub use cauldron::{CauldronFire, FireCauldron};
pub use plugin::WorldPlugin;
pub use spawner::{SpawnWaveEvent, Spawner};
