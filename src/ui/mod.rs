//! User interface - HUD, cast indicators and overlays.

mod hud;
mod indicators;
mod plugin;

pub use hud::{cast_bar_fraction, slot_label};
pub use indicators::{CastingCircle, IndicatorAssets, TargetRing};
pub use plugin::UiPlugin;
