//! Targeting query - nearest valid target around a point.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::caster::{Faction, Targetable};
use crate::combat::Dead;

/// Nearest candidate within `radius` of `origin`.
///
/// Strict minimum distance; on an exact tie the first candidate wins.
pub fn nearest_target(
    origin: Vec3,
    radius: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<Entity> {
    let mut closest = None;
    let mut closest_distance = f32::MAX;

    for (entity, position) in candidates {
        let distance = origin.distance(position);
        if distance <= radius && distance < closest_distance {
            closest = Some(entity);
            closest_distance = distance;
        }
    }

    closest
}

/// World query over alive, targetable entities.
///
/// Uses the rapier broadphase when a physics context exists and falls back to a
/// linear scan otherwise. Every answer is a snapshot of the current frame;
/// callers must re-check validity on later ticks.
#[derive(SystemParam)]
pub struct TargetingQuery<'w, 's> {
    rapier_context: Query<'w, 's, &'static RapierContext>,
    targets: Query<'w, 's, (Entity, &'static Transform, &'static Targetable), Without<Dead>>,
}

impl TargetingQuery<'_, '_> {
    /// Nearest alive target of `faction` within `radius` of `origin`.
    pub fn nearest(&self, origin: Vec3, radius: f32, faction: Faction) -> Option<Entity> {
        nearest_target(origin, radius, self.candidates(origin, radius, faction))
    }

    /// Every alive target of `faction` within `radius`, nearest first.
    pub fn within(&self, origin: Vec3, radius: f32, faction: Faction) -> Vec<(Entity, Vec3)> {
        let mut found: Vec<(Entity, Vec3)> = self
            .candidates(origin, radius, faction)
            .into_iter()
            .filter(|(_, position)| origin.distance(*position) <= radius)
            .collect();
        found.sort_by(|a, b| {
            origin
                .distance_squared(a.1)
                .total_cmp(&origin.distance_squared(b.1))
        });
        found
    }

    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.targets
            .get(entity)
            .ok()
            .map(|(_, transform, _)| transform.translation)
    }

    pub fn faction_of(&self, entity: Entity) -> Option<Faction> {
        self.targets
            .get(entity)
            .ok()
            .map(|(_, _, targetable)| targetable.faction)
    }

    fn candidates(&self, origin: Vec3, radius: f32, faction: Faction) -> Vec<(Entity, Vec3)> {
        let matches = |targetable: &Targetable| targetable.faction == faction;

        let Ok(context) = self.rapier_context.get_single() else {
            return self
                .targets
                .iter()
                .filter(|(_, _, targetable)| matches(targetable))
                .map(|(entity, transform, _)| (entity, transform.translation))
                .collect();
        };

        let mut found = Vec::new();
        context.intersections_with_shape(
            origin,
            Quat::IDENTITY,
            &Collider::ball(radius),
            QueryFilter::default(),
            |hit_entity| {
                if let Ok((entity, transform, targetable)) = self.targets.get(hit_entity) {
                    if matches(targetable) {
                        found.push((entity, transform.translation));
                    }
                }
                true
            },
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_nearest_target_picks_minimum_distance() {
        let mut world = World::new();
        let far = world.spawn_empty().id();
        let near = world.spawn_empty().id();

        let picked = nearest_target(
            Vec3::ZERO,
            5.0,
            [(far, Vec3::new(3.0, 0.0, 0.0)), (near, Vec3::new(0.0, 0.0, 1.0))],
        );
        assert_eq!(picked, Some(near));
    }

    #[test]
    fn test_nearest_target_ignores_outside_radius() {
        let mut world = World::new();
        let outside = world.spawn_empty().id();

        let picked = nearest_target(Vec3::ZERO, 2.0, [(outside, Vec3::new(2.5, 0.0, 0.0))]);
        assert_eq!(picked, None);
    }

    #[test]
    fn test_nearest_target_tie_keeps_first() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let picked = nearest_target(
            Vec3::ZERO,
            5.0,
            [(first, Vec3::X), (second, Vec3::NEG_X)],
        );
        assert_eq!(picked, Some(first));
    }

    #[test]
    fn test_targeting_query_skips_dead_and_friendly() {
        let mut world = World::new();
        let dead = world
            .spawn((
                Transform::from_xyz(0.2, 0.0, 0.0),
                Targetable::new(Faction::Enemy, 0.5),
                Dead,
            ))
            .id();
        let friendly = world
            .spawn((
                Transform::from_xyz(0.3, 0.0, 0.0),
                Targetable::new(Faction::Player, 0.5),
            ))
            .id();
        let enemy = world
            .spawn((
                Transform::from_xyz(1.5, 0.0, 0.0),
                Targetable::new(Faction::Enemy, 0.5),
            ))
            .id();

        let (nearest, valid_dead, valid_friendly) = world
            .run_system_once(move |targeting: TargetingQuery| {
                (
                    targeting.nearest(Vec3::ZERO, 2.0, Faction::Enemy),
                    targeting.position_of(dead),
                    targeting.faction_of(friendly),
                )
            })
            .unwrap();

        assert_eq!(nearest, Some(enemy));
        assert_eq!(valid_dead, None);
        assert_eq!(valid_friendly, Some(Faction::Player));
    }

    #[test]
    fn test_within_sorts_nearest_first() {
        let mut world = World::new();
        let far = world
            .spawn((Transform::from_xyz(3.0, 0.0, 0.0), Targetable::new(Faction::Enemy, 0.5)))
            .id();
        let near = world
            .spawn((Transform::from_xyz(1.0, 0.0, 0.0), Targetable::new(Faction::Enemy, 0.5)))
            .id();
        world.spawn((Transform::from_xyz(9.0, 0.0, 0.0), Targetable::new(Faction::Enemy, 0.5)));

        let found = world
            .run_system_once(|targeting: TargetingQuery| {
                targeting
                    .within(Vec3::ZERO, 4.0, Faction::Enemy)
                    .into_iter()
                    .map(|(entity, _)| entity)
                    .collect::<Vec<_>>()
            })
            .unwrap();

        assert_eq!(found, vec![near, far]);
    }

    /// A physics context holding one ball collider per entity, as the
    /// rapier plugin would have synced them.
    fn physics_context(colliders: &[(Entity, Vec3, f32)]) -> RapierContext {
        use bevy_rapier3d::rapier::prelude::{vector, ColliderBuilder};

        let mut context = RapierContext::default();
        for &(entity, position, radius) in colliders {
            context.colliders.insert(
                ColliderBuilder::ball(radius)
                    .translation(vector![position.x, position.y, position.z])
                    .user_data(entity.to_bits() as u128)
                    .build(),
            );
        }
        context.update_query_pipeline();
        context
    }

    #[test]
    fn test_broadphase_honours_radius_and_faction() {
        let mut world = World::new();
        let spawn = |world: &mut World, x: f32, faction: Faction| {
            world
                .spawn((Transform::from_xyz(x, 0.0, 0.0), Targetable::new(faction, 0.5)))
                .id()
        };
        let friendly = spawn(&mut world, 0.5, Faction::Player);
        let near = spawn(&mut world, 1.0, Faction::Enemy);
        let inside = spawn(&mut world, 1.8, Faction::Enemy);
        // Its collider overlaps the search ball but its centre is outside
        let grazing = spawn(&mut world, 2.3, Faction::Enemy);
        let far = spawn(&mut world, 8.0, Faction::Enemy);
        // Close enough, but has no collider for the broadphase to find
        spawn(&mut world, 0.2, Faction::Enemy);

        let context = physics_context(&[
            (friendly, Vec3::new(0.5, 0.0, 0.0), 0.5),
            (near, Vec3::new(1.0, 0.0, 0.0), 0.5),
            (inside, Vec3::new(1.8, 0.0, 0.0), 0.5),
            (grazing, Vec3::new(2.3, 0.0, 0.0), 0.5),
            (far, Vec3::new(8.0, 0.0, 0.0), 0.5),
        ]);
        world.spawn(context);

        let (nearest, found) = world
            .run_system_once(|targeting: TargetingQuery| {
                (
                    targeting.nearest(Vec3::ZERO, 2.0, Faction::Enemy),
                    targeting
                        .within(Vec3::ZERO, 2.0, Faction::Enemy)
                        .into_iter()
                        .map(|(entity, _)| entity)
                        .collect::<Vec<_>>(),
                )
            })
            .unwrap();

        assert_eq!(nearest, Some(near));
        assert_eq!(found, vec![near, inside]);
    }

    #[test]
    fn test_broadphase_finds_player_for_enemy_casters() {
        let mut world = World::new();
        let player = world
            .spawn((Transform::from_xyz(0.0, 0.0, 1.5), Targetable::new(Faction::Player, 0.5)))
            .id();
        let enemy = world
            .spawn((Transform::from_xyz(0.0, 0.0, 0.5), Targetable::new(Faction::Enemy, 0.5)))
            .id();
        world.spawn(physics_context(&[
            (player, Vec3::new(0.0, 0.0, 1.5), 0.5),
            (enemy, Vec3::new(0.0, 0.0, 0.5), 0.5),
        ]));

        let nearest = world
            .run_system_once(|targeting: TargetingQuery| {
                targeting.nearest(Vec3::ZERO, 3.0, Faction::Player)
            })
            .unwrap();

        assert_eq!(nearest, Some(player));
    }
}
