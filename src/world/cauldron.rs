//! Fire cauldron puzzle: lighting both cauldrons of a pair removes their fence.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::arena::LevelGeometry;

/// A cauldron trigger, paired with one other cauldron and guarding one fence.
#[derive(Component, Debug, Clone)]
pub struct FireCauldron {
    pub partner: Option<Entity>,
    pub fence: Entity,
    /// The fire shown once lit
    pub fire: Entity,
    pub lit: bool,
}

/// Marker for a cauldron's fire visual.
#[derive(Component)]
pub struct CauldronFire;

const CAULDRON_RADIUS: f32 = 0.6;
const CAULDRON_HALF_HEIGHT: f32 = 0.4;

/// Spawn two linked cauldrons guarding `fence`.
pub fn spawn_cauldron_pair(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    positions: [Vec3; 2],
    fence: Entity,
) -> [Entity; 2] {
    let bowl_mesh = meshes.add(Cylinder::new(CAULDRON_RADIUS, CAULDRON_HALF_HEIGHT * 2.0));
    let bowl_material = materials.add(Color::srgb(0.2, 0.2, 0.22));
    let fire_mesh = meshes.add(Sphere::new(0.35));
    let fire_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.5, 0.1),
        emissive: LinearRgba::rgb(8.0, 3.0, 0.5),
        ..default()
    });

    let ids = [commands.spawn_empty().id(), commands.spawn_empty().id()];

    for (index, position) in positions.into_iter().enumerate() {
        let fire = commands
            .spawn((
                CauldronFire,
                Mesh3d(fire_mesh.clone()),
                MeshMaterial3d(fire_material.clone()),
                Transform::from_translation(position + Vec3::Y * 0.9),
                Visibility::Hidden,
                LevelGeometry,
            ))
            .id();

        commands.entity(ids[index]).insert((
            FireCauldron {
                partner: Some(ids[1 - index]),
                fence,
                fire,
                lit: false,
            },
            Mesh3d(bowl_mesh.clone()),
            MeshMaterial3d(bowl_material.clone()),
            Transform::from_translation(position + Vec3::Y * CAULDRON_HALF_HEIGHT),
            Collider::cylinder(CAULDRON_HALF_HEIGHT, CAULDRON_RADIUS),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            // The player is a kinematic body and the cauldron has no rigid body
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
            LevelGeometry,
        ));
    }

    ids
}

/// Light any cauldron something walks into; remove the fence once a pair is lit.
pub fn light_cauldrons(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    mut cauldrons: Query<&mut FireCauldron>,
    mut fires: Query<&mut Visibility, With<CauldronFire>>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };

        for entity in [*a, *b] {
            let Ok(mut cauldron) = cauldrons.get_mut(entity) else {
                continue;
            };
            if cauldron.lit {
                continue;
            }
            cauldron.lit = true;
            let (fire, fence, partner) = (cauldron.fire, cauldron.fence, cauldron.partner);

            if let Ok(mut visibility) = fires.get_mut(fire) {
                *visibility = Visibility::Visible;
            }
            info!("Cauldron {:?} lit", entity);

            let partner_lit = partner
                .and_then(|partner| cauldrons.get(partner).ok())
                .is_some_and(|partner| partner.lit);
            if partner_lit {
                if let Some(mut fence_commands) = commands.get_entity(fence) {
                    fence_commands.despawn_recursive();
                    info!("Both cauldrons lit, fence {:?} removed", fence);
                }
            }
        }
    }
}
