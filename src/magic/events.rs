//! Cast lifecycle events and the presentation notifications.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::error::InterruptReason;
use super::instance::SpellInstance;

/// A channel started toward `target`.
#[derive(Event, Debug, Clone)]
pub struct CastStartedEvent {
    pub caster: Entity,
    pub target: Entity,
    pub slot: usize,
}

/// A channel completed and was paid for. Consumed by the resolution systems.
#[derive(Event, Debug, Clone)]
pub struct CastCompletedEvent {
    pub caster: Entity,
    pub target: Entity,
    pub spell: SpellInstance,
    /// Caster power when the cast completed
    pub power: f32,
    /// World position the effect spawns at
    pub origin: Vec3,
}

/// A channel ended without an effect.
#[derive(Event, Debug, Clone)]
pub struct CastInterruptedEvent {
    pub caster: Entity,
    pub target: Entity,
    pub reason: InterruptReason,
}

/// Target-side "being channeled at" indicator.
///
/// Sent `true` when a channel locks the target and `false` on every exit.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetHighlightEvent {
    pub target: Entity,
    pub highlighted: bool,
}

/// Fire-and-forget notification for the caster's animation/visuals.
#[derive(Event, Debug, Clone, Copy)]
pub struct CasterVisualEvent {
    pub caster: Entity,
    pub casting: bool,
}

/// Writers for everything a channel announces, bundled so player and AI
/// start channels through the same code.
#[derive(SystemParam)]
pub struct CastEvents<'w> {
    started: EventWriter<'w, CastStartedEvent>,
    completed: EventWriter<'w, CastCompletedEvent>,
    interrupted: EventWriter<'w, CastInterruptedEvent>,
    highlights: EventWriter<'w, TargetHighlightEvent>,
    visuals: EventWriter<'w, CasterVisualEvent>,
}

impl CastEvents<'_> {
    pub fn started(&mut self, caster: Entity, target: Entity, slot: usize) {
        self.started.send(CastStartedEvent { caster, target, slot });
        self.highlights.send(TargetHighlightEvent {
            target,
            highlighted: true,
        });
        self.visuals.send(CasterVisualEvent {
            caster,
            casting: true,
        });
    }

    pub fn completed(&mut self, event: CastCompletedEvent) {
        self.ended(event.caster, event.target);
        self.completed.send(event);
    }

    pub fn interrupted(&mut self, caster: Entity, target: Entity, reason: InterruptReason) {
        self.ended(caster, target);
        self.interrupted.send(CastInterruptedEvent {
            caster,
            target,
            reason,
        });
    }

    fn ended(&mut self, caster: Entity, target: Entity) {
        self.highlights.send(TargetHighlightEvent {
            target,
            highlighted: false,
        });
        self.visuals.send(CasterVisualEvent {
            caster,
            casting: false,
        });
    }
}
