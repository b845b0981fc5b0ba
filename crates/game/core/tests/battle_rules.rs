//! Battle-level rule checks driven through the public session API.

use tactics_core::{
    AiActionKind, BattleConfig, BattleSession, BattleState, Combatant, CombatantId, DamageKind,
    Faction, Grid, PlayerCommand, Position, SessionEvent, Stats, TurnPhase, VisualEffect,
    attack_range_from, calculate_damage, movement_range,
};

fn unit(id: u32, faction: Faction, x: i32, y: i32, stats: Stats) -> Combatant {
    Combatant::new(
        CombatantId(id),
        format!("unit-{id}"),
        faction,
        Position::new(x, y),
        stats,
    )
}

fn drain_effects(session: &mut BattleSession) -> Vec<VisualEffect> {
    let mut played = Vec::new();
    while let Some(request) = session.pending_effect().cloned() {
        played.push(request.effect);
        session
            .notify_effect_complete(request.ticket)
            .expect("head ticket is accepted");
    }
    played
}

#[test]
fn open_field_movement_is_a_diamond_with_origin_marker() {
    let hero = unit(
        1,
        Faction::Ally,
        6,
        4,
        Stats {
            mv: 3,
            ..Stats::default()
        },
    );
    let state = BattleState::with_combatants(Grid::new(12, 8), [hero]).unwrap();
    let actor = state.combatant(CombatantId(1)).unwrap();

    let range = movement_range(actor, &state);
    assert_eq!(range.targets().count(), 24);
    assert_eq!(range.distance(Position::new(6, 4)), Some(0));
    for cell in range.targets() {
        let distance = cell.position.manhattan(Position::new(6, 4));
        assert!((1..=3).contains(&distance));
        assert_eq!(cell.distance, distance);
    }
}

#[test]
fn movement_range_clips_at_edges_and_avoids_every_body() {
    let mut fallen = unit(3, Faction::Enemy, 1, 0, Stats::default());
    fallen.take_damage(1_000);
    let state = BattleState::with_combatants(
        Grid::new(12, 8),
        [
            unit(
                1,
                Faction::Ally,
                0,
                0,
                Stats {
                    mv: 4,
                    ..Stats::default()
                },
            ),
            unit(2, Faction::Ally, 0, 2, Stats::default()),
            fallen,
        ],
    )
    .unwrap();
    let actor = state.combatant(CombatantId(1)).unwrap();
    let range = movement_range(actor, &state);

    for cell in range.iter() {
        assert!(state.grid().contains(cell.position));
        assert!(!state.is_occupied_by_other(cell.position, actor.id));
    }
    assert!(!range.contains(Position::new(1, 0)));
    assert!(!range.contains(Position::new(0, 2)));
    // Reached only by walking around both bodies.
    assert_eq!(range.distance(Position::new(2, 0)), Some(4));
}

#[test]
fn attack_range_is_exactly_the_clipped_diamond() {
    let grid = Grid::new(12, 8);
    for (origin, reach) in [(Position::new(6, 4), 2), (Position::new(0, 7), 3)] {
        let range = attack_range_from(origin, reach, &grid);
        let expected: Vec<_> = grid
            .cells()
            .filter(|cell| (1..=reach).contains(&cell.manhattan(origin)))
            .collect();
        let actual: Vec<_> = range.iter().map(|cell| cell.position).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn damage_subtracts_defense_with_a_floor_of_one() {
    let strong = Stats {
        str: 28,
        ..Stats::default()
    };
    let armored = Stats {
        def: 12,
        ..Stats::default()
    };
    assert_eq!(calculate_damage(&strong, &armored, DamageKind::Physical), 16);

    let weak = Stats {
        str: 5,
        ..Stats::default()
    };
    let fortress = Stats {
        def: 20,
        ..Stats::default()
    };
    assert_eq!(calculate_damage(&weak, &fortress, DamageKind::Physical), 1);
}

#[test]
fn double_speed_earns_double_turns() {
    let mut session = BattleSession::new(
        BattleConfig::default(),
        [
            unit(
                1,
                Faction::Ally,
                0,
                0,
                Stats {
                    spd: 10,
                    ..Stats::default()
                },
            ),
            unit(
                2,
                Faction::Enemy,
                11,
                7,
                Stats {
                    spd: 5,
                    ..Stats::default()
                },
            ),
        ],
    )
    .unwrap();

    for _ in 0..600 {
        let actor = session.current_actor().map(|c| c.id).unwrap();
        session.submit(actor, PlayerCommand::Wait).unwrap();
    }

    let mut fast = 0u32;
    let mut slow = 0u32;
    for event in session.drain_events() {
        if let SessionEvent::TurnCompleted { actor } = event {
            match actor.0 {
                1 => fast += 1,
                _ => slow += 1,
            }
        }
    }
    assert_eq!(fast + slow, 600);
    let ratio = f64::from(fast) / f64::from(slow);
    assert!((ratio - 2.0).abs() < 0.02, "ratio was {ratio}");
}

#[test]
fn cancelled_move_restores_the_starting_cell() {
    let mut session = BattleSession::new(
        BattleConfig::default(),
        [
            unit(
                1,
                Faction::Ally,
                6,
                4,
                Stats {
                    spd: 100,
                    ..Stats::default()
                },
            ),
            unit(2, Faction::Enemy, 11, 0, Stats::default()),
        ],
    )
    .unwrap();
    let hero = CombatantId(1);

    session.select_move(hero).unwrap();
    assert_eq!(session.current_phase(), Some(TurnPhase::Moving));
    session.submit_move_to(hero, Position::new(5, 4)).unwrap();

    let played = drain_effects(&mut session);
    assert!(matches!(
        played.as_slice(),
        [VisualEffect::Move { to, path, .. }] if *to == Position::new(5, 4) && path.len() == 1
    ));
    assert_eq!(session.current_phase(), Some(TurnPhase::Moved));
    assert_eq!(
        session.combatant(hero).unwrap().position,
        Position::new(5, 4)
    );

    session.submit_cancel_move(hero).unwrap();
    assert_eq!(session.current_phase(), Some(TurnPhase::Normal));
    assert_eq!(
        session.combatant(hero).unwrap().position,
        Position::new(6, 4)
    );

    // The cancelled move may be replaced by a fresh one.
    session.select_move(hero).unwrap();
}

#[test]
fn automatic_turn_closes_distance_and_attacks() {
    let mut session = BattleSession::new(
        BattleConfig::default(),
        [
            unit(
                1,
                Faction::Ally,
                6,
                4,
                Stats {
                    hp: 120,
                    maxhp: 120,
                    def: 12,
                    spd: 10,
                    ..Stats::default()
                },
            ),
            unit(
                2,
                Faction::Enemy,
                8,
                5,
                Stats {
                    str: 16,
                    spd: 80,
                    mv: 2,
                    range: 1,
                    ..Stats::default()
                },
            ),
        ],
    )
    .unwrap();
    assert_eq!(session.current_actor().map(|c| c.id), Some(CombatantId(2)));

    let decision = session.take_ai_turn().unwrap();
    assert_eq!(decision.kind(), AiActionKind::Attack);
    assert_eq!(decision.target, Some(CombatantId(1)));
    let destination = decision.destination.unwrap();
    assert_eq!(destination.manhattan(Position::new(6, 4)), 1);
    assert!(destination.manhattan(Position::new(8, 5)) <= 2);

    let played = drain_effects(&mut session);
    assert!(matches!(
        played.as_slice(),
        [
            VisualEffect::Move { .. },
            VisualEffect::AttackFlash { .. },
            VisualEffect::DamageNumber { damage: 4, .. },
        ]
    ));
    assert_eq!(session.combatant(CombatantId(1)).unwrap().stats().hp, 116);
    assert_eq!(
        session.combatant(CombatantId(2)).unwrap().position,
        destination
    );
}
