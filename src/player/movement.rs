//! Click-to-move player controller, player spawning and the follow camera.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::casting::ScreenRaycast;
use super::components::*;
use crate::combat::Health;
use crate::core::SmoothTransform;
use crate::magic::{
    yaw_towards, CastChannel, Caster, CasterRole, Faction, ManaPool, SpellCatalog, SpellId,
    Spellbook, Targetable, SPELL_SLOTS,
};

/// Horizontal step of at most `max_step` from `position` toward `target`.
///
/// Returns `None` once the target is within `threshold`. Height is ignored,
/// the character controller keeps the player on the ground.
pub fn step_towards(position: Vec3, target: Vec3, max_step: f32, threshold: f32) -> Option<Vec3> {
    let offset = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
    let distance = offset.length();
    if distance <= threshold {
        return None;
    }
    Some(offset / distance * max_step.min(distance))
}

/// Right click sets a move target on the ground.
pub fn player_move_input(
    mouse: Res<ButtonInput<MouseButton>>,
    raycast: ScreenRaycast,
    mut player_query: Query<&mut MoveTarget, With<Player>>,
) {
    if !mouse.just_pressed(MouseButton::Right) {
        return;
    }
    let Ok(mut move_target) = player_query.get_single_mut() else {
        return;
    };
    if let Some((_, point)) = raycast.under_cursor() {
        move_target.set(point);
    }
}

/// Walk toward the move target.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
pub fn player_movement(
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<
        (
            &mut Transform,
            &mut MoveTarget,
            &mut KinematicCharacterController,
            Option<&mut SmoothTransform>,
        ),
        With<Player>,
    >,
) {
    let Ok((mut transform, mut move_target, mut controller, smooth)) =
        player_query.get_single_mut()
    else {
        return;
    };
    let Some(target) = move_target.0 else {
        if controller.translation.is_some() {
            controller.translation = None;
        }
        return;
    };

    let max_step = config.move_speed * time.delta_secs();
    let Some(step) = step_towards(
        transform.translation,
        target,
        max_step,
        config.arrival_threshold,
    ) else {
        move_target.clear();
        controller.translation = None;
        if let Some(mut smooth) = smooth {
            smooth.target_rotation = None;
        }
        return;
    };

    controller.translation = Some(step);

    let Some(facing) = yaw_towards(transform.translation, target, transform.rotation) else {
        return;
    };
    match smooth {
        Some(mut smooth) if config.smooth_turning => smooth.target_rotation = Some(facing),
        _ => transform.rotation = facing,
    }
}

/// Keep the game camera at a fixed offset from the player.
pub fn camera_follow(
    config: Res<PlayerConfig>,
    player_query: Query<&Transform, (With<Player>, Without<GameCamera>)>,
    mut camera_query: Query<&mut SmoothTransform, With<GameCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    for mut smooth in camera_query.iter_mut() {
        smooth.target_translation = Some(player.translation + config.camera_offset);
    }
}

/// Build the starting spellbook from the configured loadout.
///
/// Unknown spell ids are skipped with a warning.
pub fn build_loadout(catalog: &SpellCatalog, loadout: &[(String, u32)]) -> Spellbook {
    let mut spellbook = Spellbook::default();
    for (slot, (id, level)) in loadout.iter().take(SPELL_SLOTS).enumerate() {
        match catalog.instance(&SpellId::new(id.as_str()), *level) {
            Some(instance) => {
                spellbook.equip(slot, instance);
            }
            None => warn!("Loadout spell '{}' is not in the catalog", id),
        }
    }
    spellbook
}

/// Spawn the player entity and the camera that follows it.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec3,
    config: &PlayerConfig,
    catalog: &SpellCatalog,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let attributes = Attributes::default();

    let player = commands
        .spawn((
            Player,
            attributes,
            MoveTarget::default(),
            Health::new(100.0),
            Caster {
                power: attributes.intelligence as f32,
                channel_power: attributes.dexterity as f32,
                casting_speed: config.casting_speed,
                role: CasterRole::Player {
                    anchor_tolerance: config.anchor_tolerance,
                },
            },
            ManaPool::new(100.0, config.mana_regen_rate),
            CastChannel::default(),
            build_loadout(catalog, &config.loadout),
            Targetable::new(Faction::Player, 0.5),
            SmoothTransform::new(0.0, config.turn_speed),
            Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.3, 0.4, 0.8))),
            Transform::from_translation(position),
        ))
        .insert((
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .id();

    commands.spawn((
        GameCamera,
        Camera3d::default(),
        SmoothTransform::new(config.camera_follow_speed, 0.0),
        Transform::from_translation(position + config.camera_offset)
            .looking_at(position, Vec3::Y),
    ));

    info!("Spawned player at {:?}", position);
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::test_definition;

    #[test]
    fn test_step_towards_moves_at_most_max_step() {
        let step = step_towards(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.5, 0.1).unwrap();
        assert!((step.length() - 0.5).abs() < 1e-5);
        assert!(step.x > 0.0);
    }

    #[test]
    fn test_step_towards_does_not_overshoot() {
        let step = step_towards(Vec3::ZERO, Vec3::new(0.3, 0.0, 0.0), 5.0, 0.1).unwrap();
        assert!((step.x - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_step_towards_arrives_within_threshold() {
        assert!(step_towards(Vec3::ZERO, Vec3::new(0.05, 0.0, 0.0), 1.0, 0.1).is_none());
    }

    #[test]
    fn test_step_towards_ignores_height() {
        let step = step_towards(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 5.0, 0.0), 1.0, 0.1);
        assert!(step.is_none());
    }

    #[test]
    fn test_build_loadout_skips_unknown_spells() {
        let mut catalog = SpellCatalog::default();
        catalog.insert(test_definition("firebolt", 20.0, 1.0)).unwrap();

        let loadout = vec![
            ("missing".to_string(), 1),
            ("firebolt".to_string(), 3),
        ];
        let spellbook = build_loadout(&catalog, &loadout);

        assert!(spellbook.get(0).is_none());
        let spell = spellbook.get(1).unwrap();
        assert_eq!(spell.level(), 3);
        assert_eq!(spell.mana_cost(), 60.0);
    }
}
