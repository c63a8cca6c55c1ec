//! Spell resolution - homing projectiles and multi-target fan-out.

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use super::caster::Targetable;
use super::definition::{FanOut, SpellBehavior, SpellId};
use super::events::CastCompletedEvent;
use super::plugin::MagicConfig;
use super::targeting::TargetingQuery;
use crate::combat::Dead;
use crate::core::DamageEvent;

/// A spawned spell effect travelling toward its target.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub spell: SpellId,
    /// Caster that launched it
    pub source: Entity,
    /// Entity the projectile homes in on
    pub primary: Entity,
    /// Entities damaged on arrival (the primary included)
    pub targets: Vec<Entity>,
    pub damage: f32,
    pub speed: f32,
    /// Entities already damaged by this projectile
    pub struck: HashSet<Entity>,
}

impl Projectile {
    pub fn new(
        spell: SpellId,
        source: Entity,
        primary: Entity,
        targets: Vec<Entity>,
        damage: f32,
        speed: f32,
    ) -> Self {
        Self {
            spell,
            source,
            primary,
            targets,
            damage,
            speed,
            struck: HashSet::new(),
        }
    }
}

/// Live projectiles grouped by spell, plus one shared mesh/material per spell.
#[derive(Resource, Default)]
pub struct ProjectileRegistry {
    active: HashMap<SpellId, Vec<Entity>>,
    visuals: HashMap<SpellId, (Handle<Mesh>, Handle<StandardMaterial>)>,
}

impl ProjectileRegistry {
    pub fn register(&mut self, spell: &SpellId, projectile: Entity) {
        self.active.entry(spell.clone()).or_default().push(projectile);
    }

    pub fn release(&mut self, spell: &SpellId, projectile: Entity) {
        if let Some(entities) = self.active.get_mut(spell) {
            entities.retain(|&e| e != projectile);
            if entities.is_empty() {
                self.active.remove(spell);
            }
        }
    }

    pub fn active(&self, spell: &SpellId) -> &[Entity] {
        self.active.get(spell).map_or(&[], Vec::as_slice)
    }

    pub fn total(&self) -> usize {
        self.active.values().map(Vec::len).sum()
    }

    /// Forget every live projectile; the shared visuals are kept.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Pick the entities a multi-target spell strikes: the locked target first,
/// then the nearest others, capped at `max_targets`.
pub fn select_targets(
    primary: Entity,
    nearby: impl IntoIterator<Item = Entity>,
    max_targets: usize,
) -> Vec<Entity> {
    let mut selected = vec![primary];
    for entity in nearby {
        if selected.len() >= max_targets {
            break;
        }
        if entity != primary {
            selected.push(entity);
        }
    }
    selected.truncate(max_targets.max(1));
    selected
}

/// Spawn the effect for every completed cast.
pub fn spawn_spell_effects(
    mut commands: Commands,
    mut completed: EventReader<CastCompletedEvent>,
    targeting: TargetingQuery,
    mut registry: ResMut<ProjectileRegistry>,
) {
    for event in completed.read() {
        let spell = &event.spell;
        let definition = spell.definition();
        let damage = spell.damage(event.power);

        let projectiles = match definition.behavior {
            SpellBehavior::SingleTarget => vec![(event.target, vec![event.target])],
            SpellBehavior::MultiTarget {
                radius,
                max_targets,
                policy,
            } => {
                let (Some(position), Some(faction)) = (
                    targeting.position_of(event.target),
                    targeting.faction_of(event.target),
                ) else {
                    debug!("{} lost its target before resolving", spell.id());
                    continue;
                };

                let nearby = targeting
                    .within(position, radius, faction)
                    .into_iter()
                    .map(|(entity, _)| entity);
                let struck = select_targets(event.target, nearby, max_targets);

                match policy {
                    FanOut::PerTarget => struck.into_iter().map(|t| (t, vec![t])).collect(),
                    FanOut::Shared => vec![(event.target, struck)],
                }
            }
        };

        for (primary, targets) in projectiles {
            let projectile = commands
                .spawn((
                    Projectile::new(
                        spell.id().clone(),
                        event.caster,
                        primary,
                        targets,
                        damage,
                        definition.speed,
                    ),
                    Transform::from_translation(event.origin),
                    Visibility::default(),
                ))
                .id();
            registry.register(spell.id(), projectile);
        }
    }
}

/// Home projectiles in on their targets and resolve them on contact.
///
/// A projectile whose primary target is gone despawns without dealing damage.
pub fn move_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<MagicConfig>,
    mut registry: ResMut<ProjectileRegistry>,
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile)>,
    targets: Query<(&Transform, &Targetable), (Without<Dead>, Without<Projectile>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut projectile) in projectiles.iter_mut() {
        let Ok((target_transform, targetable)) = targets.get(projectile.primary) else {
            commands.entity(entity).despawn_recursive();
            registry.release(&projectile.spell, entity);
            continue;
        };

        let goal = target_transform.translation;
        let offset = goal - transform.translation;
        let distance = offset.length();
        let step = projectile.speed * dt;

        if distance <= step {
            transform.translation = goal;
        } else {
            transform.translation += offset / distance * step;
            transform.look_to(offset, Vec3::Y);
        }

        if transform.translation.distance(goal) > targetable.hit_radius + config.projectile_radius {
            continue;
        }

        let Projectile {
            targets: victims,
            struck,
            source,
            damage,
            ..
        } = &mut *projectile;

        for &victim in victims.iter() {
            if targets.get(victim).is_err() || !struck.insert(victim) {
                continue;
            }
            damage_events.send(DamageEvent {
                target: victim,
                source: *source,
                amount: *damage,
            });
        }

        commands.entity(entity).despawn_recursive();
        registry.release(&projectile.spell, entity);
    }
}

/// Give new projectiles the mesh and material shared by their spell.
///
/// A projectile may already be queued for despawn by the time this runs.
pub fn attach_projectile_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut registry: ResMut<ProjectileRegistry>,
    config: Res<MagicConfig>,
    new_projectiles: Query<(Entity, &Projectile), Added<Projectile>>,
) {
    for (entity, projectile) in new_projectiles.iter() {
        let (mesh, material) = registry
            .visuals
            .entry(projectile.spell.clone())
            .or_insert_with(|| {
                let hue = spell_hue(&projectile.spell);
                (
                    meshes.add(Sphere::new(config.projectile_radius)),
                    materials.add(StandardMaterial {
                        base_color: Color::hsl(hue, 0.8, 0.6),
                        emissive: LinearRgba::from(Color::hsl(hue, 1.0, 0.5)) * 2.0,
                        ..default()
                    }),
                )
            })
            .clone();

        commands
            .entity(entity)
            .try_insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

/// Stable per-spell hue so each spell keeps its colour between runs.
fn spell_hue(spell: &SpellId) -> f32 {
    let sum: u32 = spell.as_str().bytes().map(u32::from).sum();
    (sum % 360) as f32
}
