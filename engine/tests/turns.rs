use hx_engine::content::find_item;
use hx_engine::{
    AttributeSet, CombatEngine, CombatEvent, Dice, Enemy, Outcome, Player, PlayerAction, Side,
    SkillError, StatusCause, StatusKind,
};

fn dummy() -> Enemy {
    Enemy::new("dummy", "Dummy", AttributeSet::new(15, 8, 5, 6))
}

fn sandbag(spd: i32) -> Enemy {
    Enemy::new("sandbag", "Sandbag", AttributeSet::new(10_000, 1, 0, spd))
}

fn hits_by(events: &[CombatEvent], side: Side) -> Vec<i32> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::AttackHit { attacker, damage, .. } if *attacker == side => Some(*damage),
            _ => None,
        })
        .collect()
}

#[test]
fn midpoint_scenario_wins_in_two_turns() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let report = engine.fight(&mut player, &dummy());

    assert_eq!(report.outcome, Outcome::Victory);
    assert_eq!(report.turns, 2);
    assert_eq!(hits_by(&report.events, Side::Player), vec![9, 9]);
    assert_eq!(hits_by(&report.events, Side::Enemy), vec![7]);
    assert_eq!(report.player_hp, 53);
    assert_eq!(report.enemy_hp, 0);
    assert_eq!(report.player_attacks, 2);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::InitiativeDecided { first: Side::Player })));
}

#[test]
fn same_seed_same_fight() {
    let enemy = hx_engine::content::find_enemy("night_sloth_demon").unwrap();
    let run = |seed| {
        let mut player = Player::at_level("Ann", 6);
        CombatEngine::new(Some(seed)).fight(&mut player, &enemy)
    };
    let a = run(2024);
    let b = run(2024);
    assert_eq!(a.events, b.events);
    assert_eq!(a.log, b.log);
    assert_eq!((a.player_hp, a.enemy_hp), (b.player_hp, b.enemy_hp));
}

#[test]
fn template_enemy_is_not_mutated() {
    let enemy = dummy();
    let mut player = Player::new("Ann");
    CombatEngine::with_dice(Dice::midpoint()).fight(&mut player, &enemy);
    assert_eq!(enemy.attributes.hp, 15);
}

#[test]
fn focus_is_consumed_by_a_guaranteed_hit() {
    let mut player = Player::new("Ann");
    player.attributes.add_status(StatusKind::Focus, 2);
    // 100 misses every normal roll
    let mut engine = CombatEngine::with_dice(Dice::from_scripted(vec![100], vec![1.0]));
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);

    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
    assert!(report.events.iter().any(|e| matches!(
        e,
        CombatEvent::AttackHit { attacker: Side::Player, guaranteed: true, .. }
    )));
    assert!(report.events.contains(&CombatEvent::FocusConsumed));
    assert!(!player.attributes.has_status(StatusKind::Focus));

    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
    assert!(report.events.contains(&CombatEvent::AttackMissed { attacker: Side::Player, evaded: false }));
}

#[test]
fn badge_focus_lasts_into_the_first_turn() {
    let mut player = Player::new("Ann");
    player.equip(find_item("hnu_badge").unwrap()).unwrap();
    let mut engine = CombatEngine::with_dice(Dice::from_scripted(vec![100], vec![1.0]));
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);
    assert!(enc.events.contains(&CombatEvent::StatusGranted {
        target: Side::Player,
        status: StatusKind::Focus,
        duration: 2,
        cause: StatusCause::AutoFocus,
    }));

    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
    assert!(report.events.contains(&CombatEvent::FocusConsumed));
}

#[test]
fn speech_words_inspire_for_three_turns() {
    let mut player = Player::new("Ann");
    player.equip(find_item("speech_words").unwrap()).unwrap();
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);
    for _ in 0..3 {
        engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
        assert!(player.attributes.has_status(StatusKind::Inspiration));
    }
    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
    assert!(report.events.contains(&CombatEvent::StatusExpired {
        target: Side::Player,
        status: StatusKind::Inspiration,
    }));
}

#[test]
fn successful_flee_ends_the_fight_immediately() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::from_scripted(vec![1], vec![]));
    let enemy = dummy();
    let mut enc = engine.start(&mut player, &enemy);
    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Flee);

    assert_eq!(report.outcome, Some(Outcome::Fled));
    assert!(report.events.contains(&CombatEvent::FleeAttempt { success: true, chance: 44 }));
    assert!(hits_by(&report.events, Side::Enemy).is_empty());
    assert_eq!(player.attributes.hp, 60);
}

#[test]
fn failed_flee_lets_the_enemy_swing() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::from_scripted(vec![90, 50], vec![1.0]));
    let enemy = dummy();
    let mut enc = engine.start(&mut player, &enemy);
    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Flee);

    assert_eq!(report.outcome, None);
    assert!(report.events.contains(&CombatEvent::FleeAttempt { success: false, chance: 44 }));
    assert_eq!(hits_by(&report.events, Side::Enemy), vec![7]);
}

#[test]
fn faster_enemy_goes_first_unless_priority_seat() {
    let fast = sandbag(20);
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let mut enc = engine.start(&mut player, &fast);
    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
    assert!(report.events.contains(&CombatEvent::InitiativeDecided { first: Side::Enemy }));

    let mut seated = Player::new("Ann");
    seated.equip(find_item("seat_all_lib").unwrap()).unwrap();
    let mut enc = engine.start(&mut seated, &fast);
    let first = engine.advance_one_turn(&mut enc, &mut seated, &PlayerAction::Attack);
    assert!(first.events.contains(&CombatEvent::InitiativeDecided { first: Side::Player }));
    let second = engine.advance_one_turn(&mut enc, &mut seated, &PlayerAction::Attack);
    assert!(second.events.contains(&CombatEvent::InitiativeDecided { first: Side::Enemy }));
}

#[test]
fn periodic_shield_counts_per_encounter() {
    let mut player = Player::new("Ann");
    player.equip(find_item("psionic_armor").unwrap()).unwrap();
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = sandbag(6);

    let shield_turns = |engine: &mut CombatEngine, player: &mut Player, turns: u32| {
        let mut enc = engine.start(player, &enemy);
        let mut granted = Vec::new();
        for _ in 0..turns {
            let report = engine.advance_one_turn(&mut enc, player, &PlayerAction::Defend);
            if report.events.iter().any(|e| matches!(
                e,
                CombatEvent::StatusGranted { cause: StatusCause::PeriodicShield, .. }
            )) {
                granted.push(report.turn);
            }
        }
        granted
    };

    assert_eq!(shield_turns(&mut engine, &mut player, 7), vec![3, 6]);
    // a new fight starts its own count
    assert_eq!(shield_turns(&mut engine, &mut player, 2), Vec::<u32>::new());
}

#[test]
fn shield_is_active_on_the_turn_it_is_granted() {
    let mut player = Player::new("Ann");
    player.equip(find_item("psionic_armor").unwrap()).unwrap();
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);
    engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
    engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
    engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
    assert!(player.attributes.has_status(StatusKind::Shield));
    engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
    assert!(!player.attributes.has_status(StatusKind::Shield));
}

#[test]
fn quilt_regenerates_each_turn() {
    let mut player = Player::new("Ann");
    player.equip(find_item("bed_quilt").unwrap()).unwrap();
    player.attributes.take_damage(30);
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);
    let report = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Defend);
    // round(60 * 0.03) = 2
    assert!(report.events.contains(&CombatEvent::Regenerated { amount: 2 }));
}

#[test]
fn finished_encounters_ignore_further_turns() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = dummy();
    let mut enc = engine.start(&mut player, &enemy);
    while !enc.is_over() {
        engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
    }
    let after = engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
    assert!(after.events.is_empty());
    assert_eq!(after.outcome, Some(Outcome::Victory));
    assert_eq!(enc.turn, 2);
}

#[test]
fn defeat_is_reported_not_raised() {
    let brute = Enemy::new("brute", "Brute", AttributeSet::new(10_000, 500, 0, 50));
    let mut player = Player::new("Ann");
    let report = CombatEngine::with_dice(Dice::midpoint()).fight(&mut player, &brute);
    assert_eq!(report.outcome, Outcome::Defeat);
    assert_eq!(report.player_hp, 0);
    assert!(report.log.contains("[END] defeat"));
}

#[test]
fn code_review_hits_through_cooldown_rules() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = dummy();
    let mut enc = engine.start(&mut player, &enemy);

    let events = engine.use_skill(&mut enc, &mut player, "code_review").unwrap();
    assert_eq!(
        events,
        vec![CombatEvent::SkillUsed { skill: "Code Review".into(), damage: Some(11), healed: 0 }]
    );
    assert_eq!(enc.enemy.attributes.hp, 4);
    assert_eq!(
        engine.use_skill(&mut enc, &mut player, "Code Review"),
        Err(SkillError::OnCooldown { name: "Code Review".into(), remaining: 2 })
    );
}

#[test]
fn knowledge_theft_drains() {
    let mut player = Player::new("Ann");
    player.attributes.take_damage(20);
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);
    let events = engine.use_skill(&mut enc, &mut player, "knowledge theft").unwrap();
    // 10 * 0.85 through K=140 against DEF 0 is 8; half comes back
    assert_eq!(
        events,
        vec![CombatEvent::SkillUsed { skill: "Knowledge Theft".into(), damage: Some(8), healed: 4 }]
    );
    assert_eq!(player.attributes.hp, 44);
}

#[test]
fn debug_mode_deals_no_damage() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = dummy();
    let mut enc = engine.start(&mut player, &enemy);
    let events = engine.use_skill(&mut enc, &mut player, "debug_mode").unwrap();
    assert_eq!(
        events,
        vec![CombatEvent::SkillUsed { skill: "Debug Mode".into(), damage: None, healed: 0 }]
    );
    assert_eq!(enc.enemy.attributes.hp, 15);
}

#[test]
fn rejected_skill_still_lets_the_enemy_act() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = dummy();
    let mut enc = engine.start(&mut player, &enemy);
    let report = engine.advance_one_turn(
        &mut enc,
        &mut player,
        &PlayerAction::Skill("time_travel".into()),
    );
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, CombatEvent::SkillRejected { .. })));
    assert_eq!(hits_by(&report.events, Side::Enemy), vec![7]);
    assert_eq!(enc.outcome, None);
}

#[test]
fn skill_cooldowns_tick_with_turns() {
    let mut player = Player::new("Ann");
    let mut engine = CombatEngine::with_dice(Dice::midpoint());
    let enemy = sandbag(6);
    let mut enc = engine.start(&mut player, &enemy);
    let review = PlayerAction::Skill("code_review".into());

    let used = |events: &[CombatEvent]| events.iter().any(|e| matches!(e, CombatEvent::SkillUsed { .. }));
    let t1 = engine.advance_one_turn(&mut enc, &mut player, &review);
    let t2 = engine.advance_one_turn(&mut enc, &mut player, &review);
    let t3 = engine.advance_one_turn(&mut enc, &mut player, &review);
    assert!(used(t1.events.as_slice()));
    assert!(!used(t2.events.as_slice()));
    assert!(used(t3.events.as_slice()));
}
