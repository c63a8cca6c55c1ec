//! Player plugin - input, movement, and the follow camera.

use bevy::prelude::*;

use super::casting::{player_cast_input, player_confirm_target};
use super::components::*;
use super::movement::{camera_follow, player_move_input, player_movement};
use crate::core::{GameState, GameplaySet};

/// Player plugin - handles cast input, click-to-move and the camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .add_systems(
                Update,
                (
                    player_cast_input,
                    player_confirm_target,
                    player_move_input,
                    player_movement,
                )
                    .chain()
                    .in_set(GameplaySet::Input),
            )
            .add_systems(
                Update,
                camera_follow
                    .after(GameplaySet::Death)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
