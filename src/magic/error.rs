//! Cast outcomes that are not successes.
//!
//! None of these are fatal. A `CastError` means the cast never started; an
//! `InterruptReason` means a channel ended in the `Interrupted` state.

use thiserror::Error;

/// Why a cast attempt was refused.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastError {
    #[error("not enough mana: need more than {cost}, have {available}")]
    InsufficientResource { cost: f32, available: f32 },

    #[error("no spell equipped in slot {0}")]
    EmptySlot(usize),

    #[error("already casting")]
    AlreadyCasting,

    #[error("no cast is waiting for a target")]
    NotTargeting,
}

/// Why an active channel ended without completing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    #[error("target destroyed or no longer targetable")]
    InvalidTarget,

    #[error("caster took damage while channeling")]
    DamageTaken,

    #[error("caster moved away from the cast position")]
    MovedAway,

    #[error("target left the caster's sight")]
    LostSight,

    #[error("mana pool could not pay for the spell")]
    InsufficientResource,
}
