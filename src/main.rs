//! Spellbound - Entry Point
//!
//! Controls:
//! - F1-F12: Pick the spell in that slot
//! - Left click: Confirm the target under the cursor
//! - Right click: Move
//! - Escape: Pause/Unpause
//! - R: Retry after dying

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Spellbound".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(spellbound::SpellboundPlugin)
        .run();
}
