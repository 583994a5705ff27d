use hx_engine::{
    render_event, AttributeSet, CombatEngine, CombatEvent, Dice, Enemy, Outcome, Player, Side,
    StatusCause, StatusKind,
};

#[test]
fn midpoint_fight_log() {
    let mut player = Player::new("Ann");
    let dummy = Enemy::new("dummy", "Dummy", AttributeSet::new(15, 8, 5, 6));
    let report = CombatEngine::with_dice(Dice::midpoint()).fight(&mut player, &dummy);

    insta::assert_snapshot!(report.log, @r###"
    [START] Ann vs Dummy (tier 1)
    [ROUND] 1 Ann 60/60 | Dummy 15/15
    [INIT] Ann acts first
    [HIT][Ann] Dummy takes 9 damage
    [HIT][Dummy] Ann takes 7 damage
    [ROUND] 2 Ann 53/60 | Dummy 6/15
    [INIT] Ann acts first
    [HIT][Ann] Dummy takes 9 damage
    [END] victory after 2 turns
    "###);
}

#[test]
fn individual_lines() {
    let line = |e: CombatEvent| render_event(&e, "Ann", "Imp");

    assert_eq!(
        line(CombatEvent::StatusGranted {
            target: Side::Player,
            status: StatusKind::Shield,
            duration: 1,
            cause: StatusCause::PeriodicShield,
        }),
        "[STATUS][Ann] gains Shield for 1 turns (psionic armor)"
    );
    assert_eq!(
        line(CombatEvent::StatusExpired { target: Side::Enemy, status: StatusKind::Slow }),
        "[STATUS][Imp] Slow wears off"
    );
    assert_eq!(
        line(CombatEvent::AttackHit { attacker: Side::Player, damage: 12, guaranteed: true }),
        "[HIT][Ann] Imp takes 12 damage (focused)"
    );
    assert_eq!(
        line(CombatEvent::AttackMissed { attacker: Side::Enemy, evaded: true }),
        "[MISS][Imp] Ann sidesteps the blow"
    );
    assert_eq!(
        line(CombatEvent::SkillUsed { skill: "Knowledge Theft".into(), damage: Some(8), healed: 4 }),
        "[SKILL][Ann] Knowledge Theft deals 8 damage and heals 4"
    );
    assert_eq!(
        line(CombatEvent::SkillUsed { skill: "Debug Mode".into(), damage: None, healed: 0 }),
        "[SKILL][Ann] Debug Mode"
    );
    assert_eq!(
        line(CombatEvent::FleeAttempt { success: false, chance: 44 }),
        "[FLEE][Ann] failed (44%)"
    );
    assert_eq!(
        line(CombatEvent::MinionStrike { minions: 3, damage: 54 }),
        "[BOSS][Imp] 3 minions deal 54 damage"
    );
    assert_eq!(
        line(CombatEvent::FightEnded { outcome: Outcome::Fled, turns: 3 }),
        "[END] fled after 3 turns"
    );
}

#[test]
fn events_serialize_with_a_tag() {
    let json = serde_json::to_value(CombatEvent::Enraged).unwrap();
    assert_eq!(json["event"], "enraged");
    let json = serde_json::to_value(CombatEvent::Regenerated { amount: 2 }).unwrap();
    assert_eq!(json["event"], "regenerated");
    assert_eq!(json["amount"], 2);
}
