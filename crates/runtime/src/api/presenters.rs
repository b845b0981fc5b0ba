//! Playback of visual effects requested by the battle session.
//!
//! The session pauses at every [`EffectRequest`] until the runtime reports the
//! effect as shown. Presenters decide how long "shown" takes.
use std::time::Duration;

use async_trait::async_trait;

use tactics_core::{EffectRequest, VisualEffect};

use super::errors::Result;

#[async_trait]
pub trait EffectPresenter: Send + Sync {
    /// Plays `request` and returns once it has finished.
    async fn present(&self, request: &EffectRequest) -> Result<()>;
}

/// Completes every effect immediately. Used by headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPresenter;

#[async_trait]
impl EffectPresenter for InstantPresenter {
    async fn present(&self, _request: &EffectRequest) -> Result<()> {
        Ok(())
    }
}

/// Holds each effect for a fixed beat. Moves take one beat per step walked.
#[derive(Debug, Clone, Copy)]
pub struct PacedPresenter {
    step: Duration,
}

impl PacedPresenter {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time spent on `effect`.
    pub fn duration_of(&self, effect: &VisualEffect) -> Duration {
        match effect {
            VisualEffect::Move { path, .. } => {
                let steps = u32::try_from(path.len()).unwrap_or(u32::MAX).max(1);
                self.step.saturating_mul(steps)
            }
            VisualEffect::AttackFlash { .. } | VisualEffect::DamageNumber { .. } => self.step,
        }
    }
}

impl Default for PacedPresenter {
    fn default() -> Self {
        Self::new(Duration::from_millis(120))
    }
}

#[async_trait]
impl EffectPresenter for PacedPresenter {
    async fn present(&self, request: &EffectRequest) -> Result<()> {
        let duration = self.duration_of(&request.effect);
        tracing::trace!(
            target: "runtime::presenter",
            ticket = %request.ticket,
            ?duration,
            "presenting effect"
        );
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tactics_core::{CombatantId, Position};

    use super::*;

    #[test]
    fn moves_take_a_beat_per_step() {
        let presenter = PacedPresenter::new(Duration::from_millis(10));
        let walk = VisualEffect::Move {
            actor: CombatantId(1),
            from: Position::new(0, 0),
            to: Position::new(2, 1),
            path: vec![Position::new(1, 0), Position::new(2, 0), Position::new(2, 1)],
        };
        assert_eq!(presenter.duration_of(&walk), Duration::from_millis(30));

        let flash = VisualEffect::AttackFlash {
            attacker: CombatantId(1),
            target: CombatantId(2),
            at: Position::new(2, 2),
        };
        assert_eq!(presenter.duration_of(&flash), Duration::from_millis(10));
    }
}
