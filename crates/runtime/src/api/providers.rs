//! Asynchronous abstraction for sourcing player and NPC intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so the battle
//! can run with human input, scripted fixtures, or automatic play.
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tactics_core::{PlayerCommand, TurnPhase, ai};

use super::errors::Result;
use super::view::BattleView;

/// Trait for providing commands based on the current battle view.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Automatic play
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide the next command for `view.actor` in its current phase.
    ///
    /// Called repeatedly during a turn until a command ends it.
    async fn provide_command(&self, view: &BattleView) -> Result<PlayerCommand>;
}

/// A simple provider that always waits.
/// Useful for testing or as a fallback.
pub struct WaitProvider;

#[async_trait]
impl ActionProvider for WaitProvider {
    async fn provide_command(&self, _view: &BattleView) -> Result<PlayerCommand> {
        Ok(PlayerCommand::Wait)
    }
}

/// Plays the actor with the automatic decision module, one phase at a time.
///
/// The decision is recomputed from the view on every call, so the provider
/// holds no state between commands and recovers from any phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPlayProvider;

impl AutoPlayProvider {
    fn next_command(view: &BattleView) -> PlayerCommand {
        let first_target = view.attackable_targets().next().map(|c| c.id);

        match view.phase {
            TurnPhase::Normal => ai::decide(&view.state, view.actor)
                .and_then(|decision| decision.commands().into_iter().next())
                .unwrap_or(PlayerCommand::Wait),
            TurnPhase::Moving => ai::decide(&view.state, view.actor)
                .and_then(|decision| decision.destination)
                .map_or(PlayerCommand::CancelSelection, PlayerCommand::MoveTo),
            TurnPhase::Moved => match first_target {
                Some(_) => PlayerCommand::SelectAttack,
                None => PlayerCommand::Wait,
            },
            TurnPhase::Attacking => {
                // Same target the automatic turn would hit, when it is in reach.
                let planned = ai::decide(&view.state, view.actor)
                    .and_then(|decision| decision.target)
                    .filter(|target| view.attackable_targets().any(|c| c.id == *target));
                planned
                    .or(first_target)
                    .map_or(PlayerCommand::CancelSelection, PlayerCommand::Attack)
            }
        }
    }
}

#[async_trait]
impl ActionProvider for AutoPlayProvider {
    async fn provide_command(&self, view: &BattleView) -> Result<PlayerCommand> {
        Ok(Self::next_command(view))
    }
}

/// Replays a fixed command list, then waits forever.
pub struct ScriptedProvider {
    commands: Mutex<VecDeque<PlayerCommand>>,
}

impl ScriptedProvider {
    pub fn new(commands: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_command(&self, _view: &BattleView) -> Result<PlayerCommand> {
        let next = self.commands.lock().await.pop_front();
        Ok(next.unwrap_or(PlayerCommand::Wait))
    }
}
