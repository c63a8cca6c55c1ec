//! In-game HUD - health, mana, cast bar, targeting hint and spell slots.

use bevy::prelude::*;

use crate::combat::Health;
use crate::core::GameState;
use crate::magic::{CastChannel, ManaPool, SpellInstance, Spellbook, CHANNEL_COMPLETE};
use crate::player::{Player, SLOT_KEYS};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for mana bar fill.
#[derive(Component)]
pub struct ManaBar;

/// Marker for the cast bar container, shown only while channeling.
#[derive(Component)]
pub struct CastBarContainer;

/// Marker for cast bar fill.
#[derive(Component)]
pub struct CastBar;

/// Marker for the "select a target" hint.
#[derive(Component)]
pub struct TargetingHint;

/// Marker for the spell slot list.
#[derive(Component)]
pub struct SpellList;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                update_health_bar,
                update_mana_bar,
                update_cast_bar,
                update_targeting_hint,
                update_spell_list,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

/// Fraction of the cast bar to fill for a channel `progress`.
pub fn cast_bar_fraction(progress: f32) -> f32 {
    (progress / CHANNEL_COMPLETE).clamp(0.0, 1.0)
}

/// One line of the spell list.
pub fn slot_label(slot: usize, spell: &SpellInstance) -> String {
    format!(
        "{:?}  {} Lv{}  ({:.0} mana)",
        SLOT_KEYS[slot],
        spell.definition().name,
        spell.level(),
        spell.mana_cost()
    )
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Bars (bottom-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.8, 0.7)),
                Node {
                    margin: UiRect::bottom(Val::Px(12.0)),
                    ..default()
                },
                SpellList,
            ));

            spawn_bar(parent, "Mana", Color::srgb(0.2, 0.4, 0.9), ManaBar, None::<ManaBar>);
            spawn_bar(
                parent,
                "Health",
                Color::srgb(0.8, 0.2, 0.2),
                HealthBar,
                None::<HealthBar>,
            );
        });

    // Cast bar and targeting hint (bottom center)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Center,
                padding: UiRect::bottom(Val::Px(80.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Select a target"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.85, 0.5)),
                Visibility::Hidden,
                TargetingHint,
            ));

            spawn_bar(
                parent,
                "Casting",
                Color::srgb(0.9, 0.6, 0.1),
                CastBar,
                Some(CastBarContainer),
            );
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component, C: Component>(
    parent: &mut ChildBuilder,
    label: &str,
    color: Color,
    bar_marker: M,
    container_marker: Option<C>,
) {
    let mut container = parent.spawn(Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        margin: UiRect::bottom(Val::Px(5.0)),
        ..default()
    });

    if let Some(marker) = container_marker {
        container.insert((marker, Visibility::Hidden));
    }

    container.with_children(|bar_parent| {
        bar_parent.spawn((
            Text::new(label),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::srgb(0.8, 0.8, 0.8)),
            Node {
                width: Val::Px(60.0),
                ..default()
            },
        ));

        bar_parent
            .spawn((
                Node {
                    width: Val::Px(150.0),
                    height: Val::Px(12.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
            ))
            .with_children(|bg| {
                bg.spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(color),
                    bar_marker,
                ));
            });
    });
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&Health, With<Player>>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(health.percentage() * 100.0);
}

fn update_mana_bar(
    player_query: Query<&ManaPool, With<Player>>,
    mut bar_query: Query<&mut Node, With<ManaBar>>,
) {
    let Ok(mana) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(mana.percentage() * 100.0);
}

/// Fill the cast bar while channeling and hide it otherwise.
fn update_cast_bar(
    player_query: Query<&CastChannel, With<Player>>,
    mut bar_query: Query<&mut Node, With<CastBar>>,
    mut container_query: Query<&mut Visibility, With<CastBarContainer>>,
) {
    let Ok(channel) = player_query.get_single() else {
        return;
    };

    if let Ok(mut visibility) = container_query.get_single_mut() {
        let wanted = if channel.is_channeling() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }

    if let Ok(mut bar) = bar_query.get_single_mut() {
        bar.width = Val::Percent(cast_bar_fraction(channel.progress()) * 100.0);
    }
}

fn update_targeting_hint(
    player_query: Query<&CastChannel, With<Player>>,
    mut hint_query: Query<&mut Visibility, With<TargetingHint>>,
) {
    let Ok(channel) = player_query.get_single() else {
        return;
    };
    let Ok(mut visibility) = hint_query.get_single_mut() else {
        return;
    };

    let wanted = if channel.is_targeting() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    visibility.set_if_neq(wanted);
}

/// List the equipped spells with their key, level and cost.
fn update_spell_list(
    player_query: Query<Ref<Spellbook>, With<Player>>,
    mut list_query: Query<&mut Text, With<SpellList>>,
) {
    let Ok(spellbook) = player_query.get_single() else {
        return;
    };
    let Ok(mut text) = list_query.get_single_mut() else {
        return;
    };
    if !spellbook.is_changed() && !text.is_added() {
        return;
    }

    let lines: Vec<String> = spellbook
        .iter()
        .map(|(slot, spell)| slot_label(slot, spell))
        .collect();
    text.0 = lines.join("\n");
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
