//! Exponential transform smoothing.
//!
//! Used for the follow camera and for the player's optional smooth turning: a
//! system writes the goal, `update_smooth_transforms` eases toward it.

use bevy::prelude::*;

/// Eases an entity's transform toward a goal translation and/or rotation.
#[derive(Component, Debug, Clone)]
pub struct SmoothTransform {
    /// Goal translation (None = leave translation alone)
    pub target_translation: Option<Vec3>,
    /// Goal rotation (None = leave rotation alone)
    pub target_rotation: Option<Quat>,
    pub translation_speed: f32,
    pub rotation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            target_rotation: None,
            translation_speed: 8.0,
            rotation_speed: 10.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32, rotation_speed: f32) -> Self {
        Self {
            translation_speed,
            rotation_speed,
            ..default()
        }
    }

    /// Move one step of `dt` seconds toward the goals.
    pub fn step(&self, transform: &mut Transform, dt: f32) {
        if let Some(goal) = self.target_translation {
            let t = (self.translation_speed * dt).min(1.0);
            transform.translation = transform.translation.lerp(goal, t);
        }
        if let Some(goal) = self.target_rotation {
            let t = (self.rotation_speed * dt).min(1.0);
            transform.rotation = transform.rotation.slerp(goal, t);
        }
    }
}

/// Ease every smoothed transform toward its goal.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &SmoothTransform)>,
) {
    let dt = time.delta_secs();
    for (mut transform, smooth) in query.iter_mut() {
        smooth.step(&mut transform, dt);
    }
}
