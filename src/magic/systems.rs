//! Per-tick magic systems: channel scheduling, mana regeneration, target highlight.

use bevy::prelude::*;
use std::collections::HashMap;

use super::caster::{Caster, Targetable};
use super::channel::{yaw_towards, CastChannel, ChannelInputs, ChannelOutcome};
use super::error::{CastError, InterruptReason};
use super::events::{CastCompletedEvent, CastEvents, TargetHighlightEvent};
use super::instance::Spellbook;
use super::mana::ManaPool;
use crate::combat::{Dead, Health};

/// Lock `target` on a caster that is in `Targeting` and announce the channel.
///
/// Player confirmation and enemy AI both start channels through here.
pub fn start_channel(
    caster: Entity,
    channel: &mut CastChannel,
    spellbook: &Spellbook,
    target: Entity,
    starting_life: f32,
    anchor: Vec3,
    events: &mut CastEvents,
) -> Result<(), CastError> {
    let session = channel.lock_target(target, starting_life, anchor, spellbook)?;
    debug!(
        "{:?} channels {} (level {}) at {:?}",
        caster,
        session.spell.id(),
        session.spell.level(),
        target
    );
    events.started(caster, target, session.slot);
    Ok(())
}

/// Advance every active channel by one tick.
///
/// A completed channel pays for itself and emits `CastCompletedEvent` in the
/// same pass, so the rest of the tick never sees a half-applied cast.
pub fn advance_channels(
    time: Res<Time>,
    mut queries: ParamSet<(
        Query<(Entity, &Transform), (With<Targetable>, Without<Dead>)>,
        Query<(
            Entity,
            &mut Transform,
            &Caster,
            &Health,
            &mut CastChannel,
            &mut ManaPool,
        )>,
    )>,
    mut events: CastEvents,
) {
    let dt = time.delta_secs();

    // Positions of every target still valid this tick
    let targets: HashMap<Entity, Vec3> = queries
        .p0()
        .iter()
        .map(|(entity, transform)| (entity, transform.translation))
        .collect();

    let mut casters = queries.p1();
    for (entity, mut transform, caster, health, mut channel, mut mana) in casters.iter_mut() {
        let Some(target) = channel.session().map(|session| session.target) else {
            continue;
        };
        let target_position = targets.get(&target).copied();

        let inputs = ChannelInputs {
            target_position,
            life: health.current,
            caster_position: transform.translation,
            delta: dt,
        };

        match channel.tick(&inputs, caster) {
            ChannelOutcome::Inactive => {}
            ChannelOutcome::Continue => {
                if let Some(position) = target_position {
                    if let Some(rotation) =
                        yaw_towards(transform.translation, position, transform.rotation)
                    {
                        transform.rotation = rotation;
                    }
                }
            }
            ChannelOutcome::Completed(session) => {
                if let Err(e) = mana.debit(session.spell.mana_cost()) {
                    warn!("{:?} finished channeling but {}", entity, e);
                    events.interrupted(entity, target, InterruptReason::InsufficientResource);
                    continue;
                }

                debug!("{:?} completed {}", entity, session.spell.id());
                let offset = Vec3::from(session.spell.definition().spawn_offset);
                events.completed(CastCompletedEvent {
                    caster: entity,
                    target,
                    power: caster.power,
                    origin: transform.translation + offset,
                    spell: session.spell,
                });
            }
            ChannelOutcome::Interrupted(_, reason) => {
                debug!("{:?} channel interrupted: {}", entity, reason);
                events.interrupted(entity, target, reason);
            }
        }
    }
}

/// Regenerate mana for every caster, whatever its cast state.
pub fn regenerate_mana(time: Res<Time>, mut query: Query<(&mut ManaPool, &Caster)>) {
    let dt = time.delta_secs();
    for (mut mana, caster) in query.iter_mut() {
        mana.regenerate(dt, caster.power);
    }
}

/// Apply being-targeted toggles to their targets.
pub fn apply_target_highlights(
    mut highlights: EventReader<TargetHighlightEvent>,
    mut targets: Query<&mut Targetable>,
) {
    for event in highlights.read() {
        // Target may already be despawned
        if let Ok(mut targetable) = targets.get_mut(event.target) {
            targetable.set_targeted(event.highlighted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::apply_damage;
    use crate::core::{DamageEvent, DeathEvent};
    use crate::magic::caster::{CasterRole, Faction};
    use crate::magic::definition::{test_definition, DamageMode, FanOut, SpellBehavior, SpellId};
    use crate::magic::events::*;
    use crate::magic::instance::SpellInstance;
    use crate::magic::plugin::MagicConfig;
    use crate::magic::projectile::{
        move_projectiles, spawn_spell_effects, Projectile, ProjectileRegistry,
    };
    use bevy::ecs::system::RunSystemOnce;
    use std::sync::Arc;
    use std::time::Duration;

    fn magic_app(delta: f32) -> App {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<MagicConfig>()
            .init_resource::<ProjectileRegistry>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<CastStartedEvent>()
            .add_event::<CastCompletedEvent>()
            .add_event::<CastInterruptedEvent>()
            .add_event::<TargetHighlightEvent>()
            .add_event::<CasterVisualEvent>()
            .add_systems(
                Update,
                (
                    advance_channels,
                    regenerate_mana,
                    apply_target_highlights,
                    spawn_spell_effects,
                    move_projectiles,
                    apply_damage,
                )
                    .chain(),
            );
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(delta));
        app
    }

    fn spawn_target(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Transform::from_translation(position),
                Targetable::new(Faction::Enemy, 0.5),
                Health::new(100.0),
            ))
            .id()
    }

    /// Player caster with 10 channel power and no mana regeneration.
    fn spawn_caster(app: &mut App, book: Spellbook, mana: f32) -> Entity {
        app.world_mut()
            .spawn((
                Transform::default(),
                Caster {
                    power: 2.0,
                    channel_power: 10.0,
                    casting_speed: 1.0,
                    role: CasterRole::Player {
                        anchor_tolerance: 0.1,
                    },
                },
                Targetable::new(Faction::Player, 0.5),
                Health::new(100.0),
                book,
                CastChannel::default(),
                ManaPool::new(mana, 0.0),
            ))
            .id()
    }

    fn begin_cast(app: &mut App, caster: Entity, target: Entity) {
        app.world_mut()
            .run_system_once(
                move |mut casters: Query<(&mut CastChannel, &Spellbook, &ManaPool, &Health)>,
                      mut events: CastEvents| {
                    let (mut channel, book, mana, health) = casters.get_mut(caster).unwrap();
                    channel.begin(0, book, mana).unwrap();
                    start_channel(
                        caster,
                        &mut channel,
                        book,
                        target,
                        health.current,
                        Vec3::ZERO,
                        &mut events,
                    )
                    .unwrap();
                },
            )
            .unwrap();
    }

    fn firebolt(mana_per_level: f32) -> Spellbook {
        Spellbook::single(SpellInstance::new(
            Arc::new(test_definition("firebolt", mana_per_level, 1.0)),
            1,
        ))
    }

    fn channel(app: &App, caster: Entity) -> &CastChannel {
        app.world().get::<CastChannel>(caster).unwrap()
    }

    fn interrupt_reasons(app: &App) -> Vec<InterruptReason> {
        let events = app.world().resource::<Events<CastInterruptedEvent>>();
        events.iter_current_update_events().map(|e| e.reason).collect()
    }

    #[test]
    fn test_completed_cast_debits_mana_and_damages_target() {
        let mut app = magic_app(1.0);
        let target = spawn_target(&mut app, Vec3::new(0.0, 1.0, -3.0));
        let caster = spawn_caster(&mut app, firebolt(40.0), 50.0);

        begin_cast(&mut app, caster, target);
        app.update();
        assert!(app.world().get::<Targetable>(target).unwrap().is_being_targeted());

        // 10 progress per tick
        for _ in 0..10 {
            app.update();
        }

        assert!(channel(&app, caster).is_idle());
        assert_eq!(channel(&app, caster).progress(), 0.0);
        assert_eq!(app.world().get::<ManaPool>(caster).unwrap().current, 10.0);
        assert!(!app.world().get::<Targetable>(target).unwrap().is_being_targeted());

        // Let the projectile fly
        for _ in 0..5 {
            app.update();
        }

        // damage_per_level 10 * level 1 * power 2
        assert_eq!(app.world().get::<Health>(target).unwrap().current, 80.0);
        assert_eq!(app.world().resource::<ProjectileRegistry>().total(), 0);
    }

    #[test]
    fn test_damage_while_channeling_interrupts_without_effect() {
        let mut app = magic_app(1.0);
        let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));
        let caster = spawn_caster(&mut app, firebolt(40.0), 50.0);

        begin_cast(&mut app, caster, target);
        for _ in 0..6 {
            app.update();
        }
        assert_eq!(channel(&app, caster).progress(), 60.0);

        app.world_mut().get_mut::<Health>(caster).unwrap().current = 90.0;
        app.update();

        assert!(channel(&app, caster).is_idle());
        assert_eq!(channel(&app, caster).progress(), 0.0);
        assert_eq!(interrupt_reasons(&app), vec![InterruptReason::DamageTaken]);
        assert_eq!(app.world().get::<ManaPool>(caster).unwrap().current, 50.0);

        for _ in 0..5 {
            app.update();
        }
        assert_eq!(app.world().get::<Health>(target).unwrap().current, 100.0);
        assert_eq!(app.world().resource::<ProjectileRegistry>().total(), 0);
        assert!(!app.world().get::<Targetable>(target).unwrap().is_being_targeted());
    }

    #[test]
    fn test_target_destroyed_near_completion_interrupts() {
        let mut app = magic_app(0.99);
        let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));
        let caster = spawn_caster(&mut app, firebolt(40.0), 50.0);

        begin_cast(&mut app, caster, target);
        for _ in 0..10 {
            app.update();
        }
        assert!((channel(&app, caster).progress() - 99.0).abs() < 1e-3);

        app.world_mut().despawn(target);
        app.update();

        assert!(channel(&app, caster).is_idle());
        assert_eq!(interrupt_reasons(&app), vec![InterruptReason::InvalidTarget]);
        assert_eq!(app.world().get::<ManaPool>(caster).unwrap().current, 50.0);
        assert!(app
            .world()
            .resource::<Events<CastCompletedEvent>>()
            .is_empty());
    }

    #[test]
    fn test_dead_target_is_invalid() {
        let mut app = magic_app(1.0);
        let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));
        let caster = spawn_caster(&mut app, firebolt(40.0), 50.0);

        begin_cast(&mut app, caster, target);
        app.update();
        app.world_mut().entity_mut(target).insert(Dead);
        app.update();

        assert_eq!(interrupt_reasons(&app), vec![InterruptReason::InvalidTarget]);
    }

    #[test]
    fn test_player_moving_interrupts() {
        let mut app = magic_app(1.0);
        let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));
        let caster = spawn_caster(&mut app, firebolt(40.0), 50.0);

        begin_cast(&mut app, caster, target);
        app.update();
        app.world_mut()
            .get_mut::<Transform>(caster)
            .unwrap()
            .translation = Vec3::new(1.0, 0.0, 0.0);
        app.update();

        assert_eq!(interrupt_reasons(&app), vec![InterruptReason::MovedAway]);
    }

    #[test]
    fn test_channel_faces_target_yaw_only() {
        let mut app = magic_app(0.1);
        let target = spawn_target(&mut app, Vec3::new(4.0, 2.0, 0.0));
        let caster = spawn_caster(&mut app, firebolt(40.0), 50.0);

        begin_cast(&mut app, caster, target);
        app.update();

        let rotation = app.world().get::<Transform>(caster).unwrap().rotation;
        let forward = rotation * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-4));
    }

    fn swarm_completion(app: &mut App, caster: Entity, target: Entity, policy: FanOut) {
        let mut definition = test_definition("ember_swarm", 10.0, 1.0);
        definition.behavior = SpellBehavior::MultiTarget {
            radius: 3.0,
            max_targets: 5,
            policy,
        };
        definition.damage_mode = DamageMode::Continuous;
        definition.damage_per_level = 5.0;

        app.world_mut().send_event(CastCompletedEvent {
            caster,
            target,
            spell: SpellInstance::new(Arc::new(definition), 2),
            power: 3.0,
            origin: Vec3::new(0.0, 0.0, 2.0),
        });
    }

    fn assert_each_struck_once(policy: FanOut, expected_projectiles: usize) {
        let mut app = magic_app(0.5);
        let caster = spawn_caster(&mut app, Spellbook::default(), 50.0);
        let primary = spawn_target(&mut app, Vec3::new(0.0, 0.0, -4.0));
        let left = spawn_target(&mut app, Vec3::new(-1.0, 0.0, -4.0));
        let right = spawn_target(&mut app, Vec3::new(1.0, 0.0, -4.0));
        let far = spawn_target(&mut app, Vec3::new(0.0, 0.0, -20.0));

        swarm_completion(&mut app, caster, primary, policy);
        app.update();
        assert_eq!(
            app.world()
                .resource::<ProjectileRegistry>()
                .active(&SpellId::new("ember_swarm"))
                .len(),
            expected_projectiles
        );

        for _ in 0..20 {
            app.update();
        }

        for target in [primary, left, right] {
            assert_eq!(app.world().get::<Health>(target).unwrap().current, 95.0);
        }
        assert_eq!(app.world().get::<Health>(far).unwrap().current, 100.0);
        assert_eq!(app.world().resource::<ProjectileRegistry>().total(), 0);
    }

    #[test]
    fn test_multi_target_per_target_strikes_each_once() {
        assert_each_struck_once(FanOut::PerTarget, 3);
    }

    #[test]
    fn test_multi_target_shared_strikes_each_once() {
        assert_each_struck_once(FanOut::Shared, 1);
    }

    #[test]
    fn test_projectile_despawns_when_target_lost() {
        let mut app = magic_app(0.1);
        let caster = spawn_caster(&mut app, Spellbook::default(), 50.0);
        let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -10.0));

        let projectile = app
            .world_mut()
            .spawn((
                Projectile::new(
                    SpellId::new("firebolt"),
                    caster,
                    target,
                    vec![target],
                    10.0,
                    6.0,
                ),
                Transform::default(),
            ))
            .id();
        app.world_mut()
            .resource_mut::<ProjectileRegistry>()
            .register(&SpellId::new("firebolt"), projectile);

        app.update();
        assert!(app.world().get_entity(projectile).is_ok());

        app.world_mut().despawn(target);
        app.update();

        assert!(app.world().get_entity(projectile).is_err());
        assert_eq!(app.world().resource::<ProjectileRegistry>().total(), 0);
        assert!(app.world().resource::<Events<DamageEvent>>().is_empty());
    }

    #[test]
    fn test_regeneration_runs_while_channeling() {
        let mut app = magic_app(1.0);
        let target = spawn_target(&mut app, Vec3::new(0.0, 0.0, -3.0));
        let caster = spawn_caster(&mut app, firebolt(10.0), 50.0);
        app.world_mut().get_mut::<ManaPool>(caster).unwrap().regen_rate = 1.0;

        begin_cast(&mut app, caster, target);
        app.update();

        // power 2 * rate 1 * 1s
        assert_eq!(app.world().get::<ManaPool>(caster).unwrap().current, 52.0);
        assert!(channel(&app, caster).is_channeling());
    }
}
