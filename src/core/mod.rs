//! Core game module - states, events, data loading and fundamental systems.
//!
//! Everything else builds on the states and events declared here.

mod data;
mod error;
mod events;
mod plugin;
mod sets;
mod states;
mod tween;

pub use data::*;
pub use error::DataLoadError;
pub use events::*;
pub use plugin::CorePlugin;
pub use sets::GameplaySet;
pub use states::*;
pub use tween::*;
