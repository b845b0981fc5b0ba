//! End-to-end turns driven through the runtime, worker and event bus.

use async_trait::async_trait;

use tactics_content::Scenario;
use tactics_core::{
    ActionError, BattleConfig, BattleOutcome, CombatantId, EffectRequest, PlayerCommand,
    Position, RangeSet, SessionEvent, Ticket, TurnPhase, VisualEffect,
};
use tactics_runtime::{
    ActionProvider, AutoPlayProvider, BattleView, EffectPresenter, EffectEvent, Event,
    ProviderKind, Runtime, RuntimeConfig, RuntimeError, ScriptedProvider, Topic, TurnEvent,
};

struct UnpluggedController;

#[async_trait]
impl ActionProvider for UnpluggedController {
    async fn provide_command(&self, _view: &BattleView) -> tactics_runtime::Result<PlayerCommand> {
        Err(RuntimeError::NoActiveTurn)
    }
}

struct BrokenScreen;

#[async_trait]
impl EffectPresenter for BrokenScreen {
    async fn present(&self, _request: &EffectRequest) -> tactics_runtime::Result<()> {
        Err(RuntimeError::CommandChannelClosed)
    }
}

const HERO: CombatantId = CombatantId(1);
const ALLY: CombatantId = CombatantId(2);
const ENEMY: CombatantId = CombatantId(3);

fn skirmish_roster() -> Vec<tactics_core::Combatant> {
    Scenario::skirmish()
        .combatants
        .iter()
        .map(|spec| spec.to_combatant())
        .collect()
}

fn roomy_config() -> RuntimeConfig {
    RuntimeConfig {
        event_buffer_size: 4096,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn automatic_skirmish_ends_in_victory() {
    let mut runtime = Runtime::builder()
        .config(roomy_config())
        .roster(skirmish_roster())
        .player_provider(AutoPlayProvider)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut turns = handle.subscribe(Topic::Turn);

    let outcome = runtime.run(200).await.unwrap();
    assert_eq!(outcome, BattleOutcome::Victory);
    assert!(handle.view().await.unwrap().is_none());

    let enemy = handle
        .combatants()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == ENEMY)
        .unwrap();
    assert!(!enemy.is_alive());

    let mut ended = None;
    while let Ok(event) = turns.try_recv() {
        if let Event::Turn(TurnEvent::BattleEnded { outcome }) = event {
            ended = Some(outcome);
        }
    }
    assert_eq!(ended, Some(BattleOutcome::Victory));

    // Stepping a finished battle changes nothing.
    assert_eq!(runtime.step().await.unwrap(), BattleOutcome::Victory);

    drop(turns);
    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn both_sides_can_use_providers() {
    let mut runtime = Runtime::builder()
        .config(roomy_config())
        .roster(skirmish_roster())
        .player_provider(AutoPlayProvider)
        .npc_provider(AutoPlayProvider)
        .build()
        .await
        .unwrap();

    assert_eq!(runtime.run(200).await.unwrap(), BattleOutcome::Victory);
}

#[tokio::test]
async fn missing_player_provider_is_reported() {
    let mut runtime = Runtime::builder()
        .roster(skirmish_roster())
        .build()
        .await
        .unwrap();

    let err = runtime.step().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::ProviderNotSet {
            kind: ProviderKind::Player
        }
    ));
}

#[tokio::test]
async fn builder_requires_a_battle() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(RuntimeError::MissingSession)));
}

#[tokio::test]
async fn repeated_rejections_force_a_wait() {
    let script = ScriptedProvider::new([
        PlayerCommand::Attack(ENEMY),
        PlayerCommand::MoveTo(Position::new(6, 4)),
        PlayerCommand::CancelMove,
    ]);
    let mut runtime = Runtime::builder()
        .config(roomy_config())
        .roster(skirmish_roster())
        .player_provider(script)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut battle = handle.subscribe(Topic::Battle);

    let outcome = runtime.step().await.unwrap();
    assert_eq!(outcome, BattleOutcome::Ongoing);

    let mut events = Vec::new();
    while let Ok(Event::Battle(event)) = battle.try_recv() {
        events.push(event);
    }
    assert_eq!(events[0], SessionEvent::Waited { actor: HERO });
    assert_eq!(events[1], SessionEvent::TurnCompleted { actor: HERO });
    assert!(matches!(
        events[2],
        SessionEvent::TurnStarted { actor: ALLY, .. }
    ));

    let hero = handle
        .combatants()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == HERO)
        .unwrap();
    assert_eq!(hero.position, Position::new(6, 4));
}

#[tokio::test]
async fn handle_walks_a_move_through_its_effect() {
    let session = Scenario::skirmish().start(&BattleConfig::default()).unwrap();
    let runtime = Runtime::builder().session(session).build().await.unwrap();
    let handle = runtime.handle();
    let mut effects = handle.subscribe(Topic::Effect);

    assert_eq!(handle.current_actor().await.unwrap().map(|c| c.id), Some(HERO));
    let order: Vec<_> = handle
        .turn_order()
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(order, vec![HERO, ALLY, ENEMY]);
    assert_eq!(handle.outcome().await.unwrap(), BattleOutcome::Ongoing);

    let moves = handle.movement_range(HERO).await.unwrap();
    assert!(moves.contains(Position::new(7, 4)));
    assert!(!moves.contains(Position::new(5, 4)));
    let attacks = handle.attack_range(HERO).await.unwrap();
    assert_eq!(attacks.len(), 4);

    handle.submit(PlayerCommand::SelectMove).await.unwrap();
    handle
        .submit(PlayerCommand::MoveTo(Position::new(8, 4)))
        .await
        .unwrap();

    let request = handle.pending_effect().await.unwrap().unwrap();
    assert!(matches!(
        request.effect,
        VisualEffect::Move { actor: HERO, to, .. } if to == Position::new(8, 4)
    ));
    assert_eq!(
        effects.recv().await.unwrap(),
        Event::Effect(EffectEvent::Requested(request.clone()))
    );

    // Nothing else is accepted until the move has been shown.
    let err = handle.submit(PlayerCommand::Wait).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Action(ActionError::EffectPending { .. })
    ));

    handle.notify_effect_complete(request.ticket).await.unwrap();
    assert_eq!(
        effects.recv().await.unwrap(),
        Event::Effect(EffectEvent::Completed {
            ticket: request.ticket
        })
    );

    let view = handle.view().await.unwrap().unwrap();
    assert_eq!(view.actor, HERO);
    assert_eq!(view.phase, TurnPhase::Moved);
    assert_eq!(view.actor().unwrap().position, Position::new(8, 4));
    assert_eq!(
        view.attackable_targets().map(|c| c.id).collect::<Vec<_>>(),
        vec![ENEMY]
    );

    let err = handle
        .submit_as(ENEMY, PlayerCommand::Wait)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Action(ActionError::NotYourTurn { .. })
    ));
}

#[test]
fn events_serialize_as_json() {
    let event = Event::Effect(EffectEvent::Requested(EffectRequest {
        ticket: Ticket(7),
        effect: VisualEffect::DamageNumber {
            target: ENEMY,
            damage: 20,
            at: Position::new(8, 5),
        },
    }));

    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
    assert_eq!(back.topic(), Topic::Effect);
}

#[tokio::test]
async fn provider_failures_name_the_provider() {
    let mut runtime = Runtime::builder()
        .roster(skirmish_roster())
        .player_provider(UnpluggedController)
        .build()
        .await
        .unwrap();

    let err = runtime.step().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Provider {
            kind: ProviderKind::Player,
            ..
        }
    ));
}

#[tokio::test]
async fn presenter_failures_stop_the_turn() {
    let mut runtime = Runtime::builder()
        .roster(skirmish_roster())
        .player_provider(ScriptedProvider::new([
            PlayerCommand::SelectMove,
            PlayerCommand::MoveTo(Position::new(7, 4)),
        ]))
        .presenter(BrokenScreen)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let err = runtime.step().await.unwrap_err();
    assert!(matches!(err, RuntimeError::Presenter(_)));
    // The move effect is still waiting to be shown.
    assert!(matches!(
        handle.pending_effect().await.unwrap(),
        Some(EffectRequest {
            effect: VisualEffect::Move { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn ranges_serialize_as_cell_lists() {
    let runtime = Runtime::builder()
        .roster(skirmish_roster())
        .build()
        .await
        .unwrap();
    let moves = runtime.handle().movement_range(HERO).await.unwrap();

    let json = serde_json::to_value(&moves).unwrap();
    let cells = json.as_array().unwrap();
    assert_eq!(cells.len(), moves.len());
    assert!(cells.iter().any(|cell| cell["distance"] == 0));

    let back: RangeSet = serde_json::from_value(json).unwrap();
    assert_eq!(back, moves);
}
