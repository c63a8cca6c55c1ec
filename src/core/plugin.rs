//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::sets::GameplaySet;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Ai,
                    GameplaySet::Channel,
                    GameplaySet::Resolve,
                    GameplaySet::Damage,
                    GameplaySet::Death,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            // Data files are read synchronously at Startup, so there is nothing to wait for
            .add_systems(OnEnter(GameState::Loading), finish_loading)
            .add_systems(
                Update,
                handle_pause_input
                    .run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            )
            .add_systems(Update, update_smooth_transforms);
    }
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Escape toggles pause.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
