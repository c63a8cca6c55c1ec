//! Game state definitions that control the overall flow of the game.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while spell and enemy data is read
/// - `InGame` is active play
/// - `Paused` freezes gameplay but keeps the world visible
/// - `GameOver` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    #[default]
    Loading,
    InGame,
    Paused,
    GameOver,
}
