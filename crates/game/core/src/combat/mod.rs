//! Combat resolution.
//!
//! Pure damage arithmetic plus a single mutation point, [`perform_attack`],
//! which touches nothing but the target's hp. Range and faction checks are the
//! caller's job and happen before this module is reached.

pub mod damage;
pub mod result;

pub use damage::{DamageKind, MIN_DAMAGE, calculate_damage};
pub use result::{AttackOutcome, perform_attack};
