//! Cast channel state machine shared by player and enemy casters.
//!
//! `Idle -> Targeting -> Channeling -> {Completed | Interrupted} -> Idle`.
//! Completed and Interrupted are not stored: `CastChannel::tick` reports them
//! and the channel is already back to `Idle` when it returns.

use bevy::prelude::*;
use std::mem;

use super::caster::{Caster, CasterRole};
use super::error::{CastError, InterruptReason};
use super::instance::{SpellInstance, Spellbook};
use super::mana::ManaPool;

/// Progress value at which a channel completes.
pub const CHANNEL_COMPLETE: f32 = 100.0;

/// One in-flight channel toward a locked target.
#[derive(Debug, Clone)]
pub struct CastSession {
    pub slot: usize,
    pub spell: SpellInstance,
    /// Weak reference: re-validated every tick
    pub target: Entity,
    pub progress: f32,
    /// Life when the channel began; any drop below it interrupts
    pub starting_life: f32,
    /// Caster position when the channel began
    pub anchor: Vec3,
}

/// Per-tick world facts the session is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ChannelInputs {
    /// Current target position, `None` if the target is gone or no longer valid
    pub target_position: Option<Vec3>,
    pub life: f32,
    pub caster_position: Vec3,
    pub delta: f32,
}

/// Result of evaluating a session for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelStep {
    Continue,
    Completed,
    Interrupted(InterruptReason),
}

impl CastSession {
    /// Run the interrupt checks, then accumulate progress.
    ///
    /// Interrupt checks always run before progress is added, so a session whose
    /// target vanished at 99% is interrupted, never completed.
    pub fn advance(&mut self, inputs: &ChannelInputs, caster: &Caster) -> ChannelStep {
        let Some(target_position) = inputs.target_position else {
            return ChannelStep::Interrupted(InterruptReason::InvalidTarget);
        };

        if inputs.life < self.starting_life {
            return ChannelStep::Interrupted(InterruptReason::DamageTaken);
        }

        match caster.role {
            CasterRole::Player { anchor_tolerance } => {
                if inputs.caster_position.distance(self.anchor) > anchor_tolerance {
                    return ChannelStep::Interrupted(InterruptReason::MovedAway);
                }
            }
            CasterRole::Autonomous { sight_range } => {
                if horizontal_distance(inputs.caster_position, target_position) > sight_range {
                    return ChannelStep::Interrupted(InterruptReason::LostSight);
                }
            }
        }

        let delay = self.spell.cast_delay().max(f32::EPSILON);
        let gained = caster.channel_power / delay * inputs.delta * caster.casting_speed;
        self.progress += gained.max(0.0);

        if self.progress >= CHANNEL_COMPLETE {
            ChannelStep::Completed
        } else {
            ChannelStep::Continue
        }
    }
}

/// Where a caster is in the channel protocol.
#[derive(Debug, Clone, Default)]
enum CastPhase {
    #[default]
    Idle,
    /// A slot is selected and waits for a target.
    Targeting { slot: usize },
    Channeling(CastSession),
}

/// What a tick of the channel produced.
#[derive(Debug, Clone)]
pub enum ChannelOutcome {
    /// Nothing to do (Idle or still Targeting).
    Inactive,
    Continue,
    /// The finished session; the channel is Idle again.
    Completed(CastSession),
    /// The abandoned session (progress already reset); the channel is Idle again.
    Interrupted(CastSession, InterruptReason),
}

/// Per-caster channel state machine.
#[derive(Component, Debug, Clone, Default)]
pub struct CastChannel {
    phase: CastPhase,
}

impl CastChannel {
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, CastPhase::Idle)
    }

    pub fn is_targeting(&self) -> bool {
        matches!(self.phase, CastPhase::Targeting { .. })
    }

    pub fn is_channeling(&self) -> bool {
        matches!(self.phase, CastPhase::Channeling(_))
    }

    pub fn session(&self) -> Option<&CastSession> {
        match &self.phase {
            CastPhase::Channeling(session) => Some(session),
            _ => None,
        }
    }

    /// Channel progress; 0 whenever no session is active.
    pub fn progress(&self) -> f32 {
        self.session().map_or(0.0, |session| session.progress)
    }

    /// Select `slot` and enter `Targeting` if the caster can pay for it.
    ///
    /// While already targeting, this re-selects the slot. Refusals leave the
    /// channel unchanged.
    pub fn begin(
        &mut self,
        slot: usize,
        spellbook: &Spellbook,
        mana: &ManaPool,
    ) -> Result<(), CastError> {
        if self.is_channeling() {
            return Err(CastError::AlreadyCasting);
        }

        let spell = spellbook.get(slot).ok_or(CastError::EmptySlot(slot))?;
        let cost = spell.mana_cost();
        if !mana.can_afford(cost) {
            return Err(CastError::InsufficientResource {
                cost,
                available: mana.current,
            });
        }

        self.phase = CastPhase::Targeting { slot };
        Ok(())
    }

    /// Drop a pending target selection. Returns whether anything was cancelled.
    pub fn cancel_targeting(&mut self) -> bool {
        if self.is_targeting() {
            self.phase = CastPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Lock `target` and start channeling from `anchor`.
    pub fn lock_target(
        &mut self,
        target: Entity,
        starting_life: f32,
        anchor: Vec3,
        spellbook: &Spellbook,
    ) -> Result<&CastSession, CastError> {
        let CastPhase::Targeting { slot } = self.phase else {
            return Err(CastError::NotTargeting);
        };

        let Some(spell) = spellbook.get(slot).cloned() else {
            self.phase = CastPhase::Idle;
            return Err(CastError::EmptySlot(slot));
        };

        self.phase = CastPhase::Channeling(CastSession {
            slot,
            spell,
            target,
            progress: 0.0,
            starting_life,
            anchor,
        });

        match &self.phase {
            CastPhase::Channeling(session) => Ok(session),
            _ => unreachable!("phase was just set to Channeling"),
        }
    }

    /// Advance an active session by one tick.
    pub fn tick(&mut self, inputs: &ChannelInputs, caster: &Caster) -> ChannelOutcome {
        let CastPhase::Channeling(session) = &mut self.phase else {
            return ChannelOutcome::Inactive;
        };

        match session.advance(inputs, caster) {
            ChannelStep::Continue => ChannelOutcome::Continue,
            ChannelStep::Completed => ChannelOutcome::Completed(self.finish()),
            ChannelStep::Interrupted(reason) => {
                ChannelOutcome::Interrupted(self.finish(), reason)
            }
        }
    }

    fn finish(&mut self) -> CastSession {
        match mem::take(&mut self.phase) {
            CastPhase::Channeling(mut session) => {
                session.progress = 0.0;
                session
            }
            _ => unreachable!("finish is only called while channeling"),
        }
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Rotation that faces `to` from `from`, changing yaw only.
///
/// Pitch and roll of `current` are kept. Returns `None` when the points are
/// (horizontally) on top of each other.
pub fn yaw_towards(from: Vec3, to: Vec3, current: Quat) -> Option<Quat> {
    let direction = Vec2::new(to.x - from.x, to.z - from.z);
    if direction.length_squared() < 1e-6 {
        return None;
    }
    // Forward is -Z
    let yaw = (-direction.x).atan2(-direction.y);
    let (_, pitch, roll) = current.to_euler(EulerRot::YXZ);
    Some(Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll))
}
