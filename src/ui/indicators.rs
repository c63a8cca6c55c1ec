//! World-space cast feedback: casting circles under channeling casters and
//! target rings under entities being channeled at.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::core::{GameState, GameplaySet};
use crate::magic::{CasterVisualEvent, Targetable};

/// Ring shown under a caster while it channels.
#[derive(Component)]
pub struct CastingCircle;

/// Ring shown under an entity while someone channels at it.
#[derive(Component)]
pub struct TargetRing;

/// Shared ring mesh and materials.
#[derive(Resource)]
pub struct IndicatorAssets {
    pub ring: Handle<Mesh>,
    pub casting: Handle<StandardMaterial>,
    pub targeted: Handle<StandardMaterial>,
}

impl FromWorld for IndicatorAssets {
    fn from_world(world: &mut World) -> Self {
        let ring = world
            .resource_mut::<Assets<Mesh>>()
            .add(Annulus::new(0.55, 0.7));
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let casting = materials.add(StandardMaterial {
            base_color: Color::srgba(0.9, 0.6, 0.1, 0.8),
            emissive: LinearRgba::rgb(2.0, 1.0, 0.1),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        let targeted = materials.add(StandardMaterial {
            base_color: Color::srgba(0.9, 0.1, 0.1, 0.8),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        Self {
            ring,
            casting,
            targeted,
        }
    }
}

/// Register the indicator systems.
///
/// They run after resolution and before deaths, so a target despawned this
/// tick still exists when its ring is attached.
pub fn setup_indicator_systems(app: &mut App) {
    app.init_resource::<IndicatorAssets>().add_systems(
        Update,
        (update_casting_circles, update_target_rings)
            .after(GameplaySet::Resolve)
            .before(GameplaySet::Death)
            .run_if(in_state(GameState::InGame)),
    );
}

fn ring_transform() -> Transform {
    // Annulus meshes lie in XY; lay it flat at the caster's feet
    Transform::from_xyz(0.0, -0.75, 0.0)
        .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
}

/// Show or hide casting circles from `CasterVisualEvent`s.
///
/// Only the last event per caster in a frame counts.
pub fn update_casting_circles(
    mut commands: Commands,
    assets: Res<IndicatorAssets>,
    mut events: EventReader<CasterVisualEvent>,
    circles: Query<(Entity, &Parent), With<CastingCircle>>,
) {
    let wanted: HashMap<Entity, bool> = events
        .read()
        .map(|event| (event.caster, event.casting))
        .collect();

    for (caster, casting) in wanted {
        let existing: Vec<Entity> = circles
            .iter()
            .filter(|(_, parent)| parent.get() == caster)
            .map(|(circle, _)| circle)
            .collect();

        if !casting {
            for circle in existing {
                commands.entity(circle).despawn_recursive();
            }
            continue;
        }

        if !existing.is_empty() {
            continue;
        }
        if let Some(mut caster) = commands.get_entity(caster) {
            caster.with_children(|parent| {
                parent.spawn((
                    CastingCircle,
                    Mesh3d(assets.ring.clone()),
                    MeshMaterial3d(assets.casting.clone()),
                    ring_transform(),
                ));
            });
        }
    }
}

/// Keep a target ring under every entity with at least one channeler.
pub fn update_target_rings(
    mut commands: Commands,
    assets: Res<IndicatorAssets>,
    targets: Query<(Entity, &Targetable, Option<&Children>), Changed<Targetable>>,
    rings: Query<(), With<TargetRing>>,
) {
    for (entity, targetable, children) in targets.iter() {
        let ring = children
            .into_iter()
            .flatten()
            .copied()
            .find(|child| rings.contains(*child));

        match (targetable.is_being_targeted(), ring) {
            (true, None) => {
                let Some(mut target) = commands.get_entity(entity) else {
                    continue;
                };
                target.with_children(|parent| {
                    parent.spawn((
                        TargetRing,
                        Mesh3d(assets.ring.clone()),
                        MeshMaterial3d(assets.targeted.clone()),
                        ring_transform(),
                    ));
                });
            }
            (false, Some(ring)) => {
                if let Some(ring) = commands.get_entity(ring) {
                    ring.despawn_recursive();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::Faction;

    fn indicator_app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<IndicatorAssets>()
            .add_event::<CasterVisualEvent>()
            .add_systems(Update, (update_casting_circles, update_target_rings));
        app
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query_filtered::<(), F>().iter(world).count()
    }

    #[test]
    fn test_casting_circle_follows_visual_events() {
        let mut app = indicator_app();
        let caster = app.world_mut().spawn(Transform::default()).id();

        app.world_mut().send_event(CasterVisualEvent {
            caster,
            casting: true,
        });
        app.update();
        assert_eq!(count::<With<CastingCircle>>(&mut app), 1);

        app.world_mut().send_event(CasterVisualEvent {
            caster,
            casting: false,
        });
        app.update();
        assert_eq!(count::<With<CastingCircle>>(&mut app), 0);
    }

    #[test]
    fn test_target_ring_tracks_channelers() {
        let mut app = indicator_app();
        let target = app
            .world_mut()
            .spawn((Transform::default(), Targetable::new(Faction::Enemy, 0.5)))
            .id();

        app.world_mut()
            .get_mut::<Targetable>(target)
            .unwrap()
            .set_targeted(true);
        app.update();
        assert_eq!(count::<With<TargetRing>>(&mut app), 1);

        app.world_mut()
            .get_mut::<Targetable>(target)
            .unwrap()
            .set_targeted(false);
        app.update();
        assert_eq!(count::<With<TargetRing>>(&mut app), 0);
    }

    fn despawn_targets(mut commands: Commands, targets: Query<Entity, With<Targetable>>) {
        for entity in targets.iter() {
            commands.entity(entity).despawn_recursive();
        }
    }

    #[test]
    fn test_target_despawned_in_death_set_keeps_no_ring() {
        let mut app = App::new();
        app.add_plugins(bevy::state::app::StatesPlugin)
            .insert_state(GameState::InGame)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_event::<CasterVisualEvent>()
            .configure_sets(Update, (GameplaySet::Resolve, GameplaySet::Death).chain())
            .add_systems(Update, despawn_targets.in_set(GameplaySet::Death));
        setup_indicator_systems(&mut app);

        let mut targetable = Targetable::new(Faction::Enemy, 0.5);
        targetable.set_targeted(true);
        let target = app.world_mut().spawn((Transform::default(), targetable)).id();

        app.update();

        assert!(app.world().get_entity(target).is_err());
        assert_eq!(count::<With<TargetRing>>(&mut app), 0);
    }
}
