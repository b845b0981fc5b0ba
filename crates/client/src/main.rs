//! Tactics battle client binary.
//!
//! Loads a scenario, lets the runtime play both sides and prints how the
//! battle ended.
//!
//! ```bash
//! # built-in skirmish
//! cargo run -p tactics-client
//!
//! # custom scenario with visible pacing and a log file
//! TACTICS_SCENARIO=battles/ambush.ron TACTICS_EFFECT_DELAY_MS=150 \
//!     TACTICS_LOG_DIR=logs cargo run -p tactics-client
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;

use tactics_content::{ConfigLoader, ContentFactory, Scenario, ScenarioLoader};
use tactics_core::BattleConfig;
use tactics_runtime::{
    AutoPlayProvider, Event, PacedPresenter, Runtime, RuntimeConfig, Topic, TurnEvent,
};

use tactics_client::{ClientConfig, logging, report};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    let factory = ContentFactory::bundled();
    let battle_config = load_battle_config(&factory, &config)?;
    let scenario = load_scenario(&factory, &config)?;
    tracing::info!(
        scenario = %scenario.name,
        max_turns = config.max_turns,
        "starting tactics client"
    );

    let battle = scenario.apply_to(&battle_config);
    let session = scenario
        .start(&battle_config)
        .with_context(|| format!("invalid scenario '{}'", scenario.name))?;

    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            battle,
            ..RuntimeConfig::default()
        })
        .session(session)
        .player_provider(AutoPlayProvider)
        .presenter(PacedPresenter::new(config.effect_delay))
        .build()
        .await?;

    let handle = runtime.handle();
    let logger = tokio::spawn(log_events(
        handle.subscribe(Topic::Battle),
        handle.subscribe(Topic::Turn),
    ));

    let outcome = runtime.run(config.max_turns).await?;
    let roster = handle.combatants().await?;

    drop(handle);
    runtime.shutdown().await?;
    let turns = logger.await?;

    print!("{}", report::summary(outcome, turns, &roster));
    if !outcome.is_decided() {
        tracing::warn!(turns, "turn cap reached before the battle was decided");
    }
    Ok(())
}

fn load_battle_config(factory: &ContentFactory, config: &ClientConfig) -> Result<BattleConfig> {
    match &config.config_path {
        Some(path) => ConfigLoader::load(path),
        None => factory.load_config(),
    }
}

/// A scenario is either a RON file or the name of a bundled scenario.
fn load_scenario(factory: &ContentFactory, config: &ClientConfig) -> Result<Scenario> {
    let Some(scenario) = config.scenario.as_deref() else {
        return Ok(Scenario::skirmish());
    };
    let path = Path::new(scenario);
    if path.is_file() {
        ScenarioLoader::load(path)
    } else {
        factory.load_scenario(scenario)
    }
}

/// Logs every battle event as JSON until the runtime shuts down. Returns the
/// number of completed turns.
async fn log_events(
    mut battle: tokio::sync::broadcast::Receiver<Event>,
    mut turns: tokio::sync::broadcast::Receiver<Event>,
) -> u64 {
    let mut completed = 0u64;
    let mut battle_open = true;
    let mut turns_open = true;

    while battle_open || turns_open {
        tokio::select! {
            received = battle.recv(), if battle_open => match received {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::info!(target: "tactics::client", "{json}"),
                    Err(err) => tracing::warn!(%err, "failed to encode event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log fell behind");
                }
                Err(RecvError::Closed) => battle_open = false,
            },
            received = turns.recv(), if turns_open => match received {
                Ok(Event::Turn(TurnEvent::Completed { .. })) => completed += 1,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => turns_open = false,
            },
        }
    }

    completed
}
