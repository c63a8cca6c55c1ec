//! UI plugin - pause and game over overlays, HUD and cast indicators.

use bevy::prelude::*;

use super::hud;
use super::indicators;
use crate::core::GameState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        indicators::setup_indicator_systems(app);

        app
            // Pause menu
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(Update, pause_menu_input.run_if(in_state(GameState::Paused)))
            .add_systems(OnExit(GameState::Paused), cleanup::<PauseMenuUi>)
            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(Update, game_over_input.run_if(in_state(GameState::GameOver)))
            .add_systems(OnExit(GameState::GameOver), cleanup::<GameOverUi>);
    }
}

#[derive(Component)]
struct PauseMenuUi;

#[derive(Component)]
struct GameOverUi;

/// What a menu button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MenuButton {
    Resume,
    Retry,
    Quit,
}

impl MenuButton {
    /// State to move to, or `None` for quitting.
    fn target_state(self) -> Option<GameState> {
        match self {
            MenuButton::Resume => Some(GameState::InGame),
            // Loading rebuilds the arena from scratch
            MenuButton::Retry => Some(GameState::Loading),
            MenuButton::Quit => None,
        }
    }
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

fn spawn_overlay<M: Component>(
    commands: &mut Commands,
    marker: M,
    background: Color,
    title: &str,
    title_color: Color,
    buttons: &[(&str, MenuButton)],
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(background),
            GlobalZIndex(10),
            marker,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 56.0,
                    ..default()
                },
                TextColor(title_color),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            for (label, button) in buttons {
                spawn_menu_button(parent, label, *button);
            }
        });
}

fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn setup_pause_menu(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        PauseMenuUi,
        Color::srgba(0.0, 0.0, 0.0, 0.7),
        "PAUSED",
        Color::srgb(0.8, 0.8, 0.85),
        &[("Resume", MenuButton::Resume), ("Quit", MenuButton::Quit)],
    );
}

fn setup_game_over(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        GameOverUi,
        Color::srgba(0.1, 0.0, 0.0, 0.85),
        "YOU DIED",
        Color::srgb(0.8, 0.2, 0.2),
        &[("Retry (R)", MenuButton::Retry), ("Quit", MenuButton::Quit)],
    );
}

/// Shared button handling for both overlays.
fn press_buttons(
    interaction_query: &mut Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    next_state: &mut NextState<GameState>,
    exit: &mut EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button.target_state() {
                    Some(state) => next_state.set(state),
                    None => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => *bg_color = BUTTON_HOVERED.into(),
            Interaction::None => *bg_color = BUTTON_IDLE.into(),
        }
    }
}

fn pause_menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    press_buttons(&mut interaction_query, &mut next_state, &mut exit);
}

fn game_over_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        info!("Restarting the arena");
        next_state.set(GameState::Loading);
        return;
    }
    press_buttons(&mut interaction_query, &mut next_state, &mut exit);
}

fn cleanup<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
