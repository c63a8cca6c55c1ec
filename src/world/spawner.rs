//! Enemy wave spawner.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use super::arena::FloorBounds;
use crate::enemies::{spawn_enemy, Enemy, EnemyRegistry};
use crate::magic::SpellCatalog;

/// Spawns random enemies from the registry onto random floors.
#[derive(Component, Debug, Clone)]
pub struct Spawner {
    pub enemies_to_spawn: usize,
    /// Floor entities (carrying `FloorBounds`) enemies may appear on
    pub floors: Vec<Entity>,
    pub waves_spawned: u32,
}

impl Spawner {
    pub fn new(enemies_to_spawn: usize, floors: Vec<Entity>) -> Self {
        Self {
            enemies_to_spawn,
            floors,
            waves_spawned: 0,
        }
    }
}

/// Ask a spawner to spawn one wave.
#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnWaveEvent {
    pub spawner: Entity,
}

/// Pick `count` enemy types (with repetition) and a spawn point for each.
///
/// Returns nothing when there are no types or no floors to place them on.
pub fn plan_wave<'a>(
    types: &[&'a str],
    floors: &[FloorBounds],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<(&'a str, Vec3)> {
    if types.is_empty() || floors.is_empty() {
        return Vec::new();
    }

    (0..count)
        .filter_map(|_| {
            let enemy_type = *types.choose(rng)?;
            let floor = floors.choose(rng)?;
            Some((enemy_type, floor.random_point(rng)))
        })
        .collect()
}

/// Spawn a wave for every `SpawnWaveEvent`.
pub fn spawn_waves(
    mut commands: Commands,
    mut events: EventReader<SpawnWaveEvent>,
    mut spawners: Query<&mut Spawner>,
    floors: Query<&FloorBounds>,
    registry: Res<EnemyRegistry>,
    catalog: Res<SpellCatalog>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in events.read() {
        let Ok(mut spawner) = spawners.get_mut(event.spawner) else {
            warn!("Spawn request for missing spawner {:?}", event.spawner);
            continue;
        };

        let bounds: Vec<FloorBounds> = spawner
            .floors
            .iter()
            .filter_map(|&floor| floors.get(floor).ok().copied())
            .collect();
        if bounds.is_empty() {
            error!("Spawner {:?} has no floor to place enemies on", event.spawner);
            continue;
        }
        if registry.is_empty() {
            warn!("No enemy definitions loaded, wave skipped");
            continue;
        }

        let types = registry.types();
        let wave = plan_wave(&types, &bounds, spawner.enemies_to_spawn, &mut rand::thread_rng());

        let mut spawned = 0;
        for (enemy_type, position) in wave {
            let Some(definition) = registry.get(enemy_type) else {
                continue;
            };
            if spawn_enemy(
                &mut commands,
                enemy_type,
                definition,
                &catalog,
                position,
                &mut meshes,
                &mut materials,
            )
            .is_some()
            {
                spawned += 1;
            }
        }

        spawner.waves_spawned += 1;
        info!("Wave {} spawned {} enemies", spawner.waves_spawned, spawned);
    }
}

/// Request the next wave on the frame the last enemy despawns.
pub fn trigger_next_wave(
    mut removed: RemovedComponents<Enemy>,
    enemies: Query<(), With<Enemy>>,
    spawners: Query<Entity, With<Spawner>>,
    mut spawn_waves: EventWriter<SpawnWaveEvent>,
) {
    if removed.read().count() == 0 || !enemies.is_empty() {
        return;
    }
    for spawner in spawners.iter() {
        spawn_waves.send(SpawnWaveEvent { spawner });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyDefinition;
    use crate::core::parse_ron;
    use crate::magic::test_definition;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn imp() -> EnemyDefinition {
        parse_ron(
            "imp.ron",
            r#"(name: "Imp", max_health: 40.0, move_speed: 2.5, detection_range: 12.0,
                cast_range: 7.0, sight_range: 10.0, scale: 1.0, spell: "firebolt",
                spell_level: 1, casting_power: 1.0)"#,
        )
        .unwrap()
    }

    #[test]
    fn test_plan_wave_places_every_enemy_on_a_floor() {
        let floors = [
            FloorBounds::from_center(Vec3::ZERO, Vec2::new(2.0, 2.0)),
            FloorBounds::from_center(Vec3::new(20.0, 0.0, 0.0), Vec2::new(1.0, 1.0)),
        ];
        let mut rng = StdRng::seed_from_u64(3);

        let wave = plan_wave(&["imp", "wraith"], &floors, 10, &mut rng);

        assert_eq!(wave.len(), 10);
        for (enemy_type, position) in wave {
            assert!(["imp", "wraith"].contains(&enemy_type));
            assert!(floors.iter().any(|floor| floor.contains(position)));
        }
    }

    #[test]
    fn test_plan_wave_without_types_is_empty() {
        let floors = [FloorBounds::from_center(Vec3::ZERO, Vec2::ONE)];
        let mut rng = StdRng::seed_from_u64(3);
        assert!(plan_wave(&[], &floors, 4, &mut rng).is_empty());
    }

    #[test]
    fn test_spawn_wave_event_spawns_enemies() {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<EnemyRegistry>()
            .init_resource::<SpellCatalog>()
            .add_event::<SpawnWaveEvent>()
            .add_systems(Update, spawn_waves);

        app.world_mut()
            .resource_mut::<SpellCatalog>()
            .insert(test_definition("firebolt", 20.0, 1.0))
            .unwrap();
        app.world_mut()
            .resource_mut::<EnemyRegistry>()
            .definitions
            .insert("imp".to_string(), imp());

        let bounds = FloorBounds::from_center(Vec3::ZERO, Vec2::new(4.0, 4.0));
        let floor = app.world_mut().spawn(bounds).id();
        let spawner = app.world_mut().spawn(Spawner::new(3, vec![floor])).id();
        app.world_mut().send_event(SpawnWaveEvent { spawner });

        app.update();

        let world = app.world_mut();
        let positions: Vec<Vec3> = world
            .query_filtered::<&Transform, With<Enemy>>()
            .iter(world)
            .map(|transform| transform.translation)
            .collect();
        assert_eq!(positions.len(), 3);
        assert!(positions.iter().all(|position| bounds.contains(*position)));
        assert_eq!(world.get::<Spawner>(spawner).unwrap().waves_spawned, 1);
    }
}
