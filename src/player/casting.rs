//! Player cast input: slot selection, target confirmation and screen raycasts.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;

use super::components::{GameCamera, MoveTarget, Player, PlayerConfig};
use crate::combat::Health;
use crate::magic::{
    start_channel, CastChannel, CastEvents, Caster, ManaPool, Spellbook, TargetingQuery,
    SPELL_SLOTS,
};

/// Keys bound to spell slots, in slot order.
pub const SLOT_KEYS: [KeyCode; SPELL_SLOTS] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

const MAX_RAY_DISTANCE: f32 = 500.0;

pub fn slot_for_key(key: KeyCode) -> Option<usize> {
    SLOT_KEYS.iter().position(|&bound| bound == key)
}

/// Casts a ray from the cursor through the game camera.
#[derive(SystemParam)]
pub struct ScreenRaycast<'w, 's> {
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<GameCamera>>,
    rapier_context: Query<'w, 's, &'static RapierContext>,
}

impl ScreenRaycast<'_, '_> {
    /// Collider and world point under the cursor.
    ///
    /// Sensors are ignored. Without a physics hit the ray is intersected with
    /// the ground plane and no entity is reported.
    pub fn under_cursor(&self) -> Option<(Option<Entity>, Vec3)> {
        let window = self.windows.get_single().ok()?;
        let cursor = window.cursor_position()?;
        let (camera, camera_transform) = self.cameras.get_single().ok()?;
        let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
        let direction = *ray.direction;

        if let Ok(context) = self.rapier_context.get_single() {
            let filter = QueryFilter::default().exclude_sensors();
            if let Some((entity, distance)) =
                context.cast_ray(ray.origin, direction, MAX_RAY_DISTANCE, true, filter)
            {
                return Some((Some(entity), ray.origin + direction * distance));
            }
        }

        let distance = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))?;
        Some((None, ray.get_point(distance)))
    }
}

/// F1..F12 select a spell slot and enter targeting.
pub fn player_cast_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<(&mut CastChannel, &Spellbook, &ManaPool), With<Player>>,
) {
    let Some(slot) = keyboard
        .get_just_pressed()
        .find_map(|key| slot_for_key(*key))
    else {
        return;
    };
    let Ok((mut channel, spellbook, mana)) = player_query.get_single_mut() else {
        return;
    };

    match channel.begin(slot, spellbook, mana) {
        Ok(()) => debug!("Slot {} selected, awaiting target", slot + 1),
        Err(e) => info!("Cannot cast from slot {}: {}", slot + 1, e),
    }
}

/// Left click while targeting locks the nearest hostile near the click.
///
/// A click that finds nothing cancels targeting.
pub fn player_confirm_target(
    mouse: Res<ButtonInput<MouseButton>>,
    config: Res<PlayerConfig>,
    raycast: ScreenRaycast,
    targeting: TargetingQuery,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &Health,
            &Caster,
            &Spellbook,
            &mut CastChannel,
            &mut MoveTarget,
        ),
        With<Player>,
    >,
    mut events: CastEvents,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok((entity, transform, health, caster, spellbook, mut channel, mut move_target)) =
        player_query.get_single_mut()
    else {
        return;
    };
    if !channel.is_targeting() {
        return;
    }

    let hostile = caster.faction().hostile();
    let target = raycast
        .under_cursor()
        .and_then(|(_, point)| targeting.nearest(point, config.click_radius, hostile));

    let Some(target) = target else {
        channel.cancel_targeting();
        debug!("No target under cursor, targeting cancelled");
        return;
    };

    move_target.clear();
    if let Err(e) = start_channel(
        entity,
        &mut channel,
        spellbook,
        target,
        health.current,
        transform.translation,
        &mut events,
    ) {
        warn!("Could not start channel: {}", e);
    }
}
