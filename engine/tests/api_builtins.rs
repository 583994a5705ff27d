use hx_engine::api::{build_player, simulate_fight, simulate_fight_many, FightConfig, PlayerSetup};
use hx_engine::content::{builtin_enemies, builtin_items, find_enemy};
use hx_engine::{ContentError, ItemKind, Outcome, PlayerAction};

fn against(enemy: &str, seed: u64) -> FightConfig {
    FightConfig {
        enemy: Some(enemy.into()),
        enemy_path: None,
        player: PlayerSetup::default(),
        story: None,
        seed,
        actions: vec![],
    }
}

#[test]
fn builtin_content_parses() {
    let enemies = builtin_enemies().unwrap();
    assert_eq!(enemies.len(), 12);
    assert_eq!(enemies.keys().next().map(String::as_str), Some("confused_bookworm"));

    let items = builtin_items().unwrap();
    assert!(items.len() >= 18);
    assert_eq!(items["health_potion"].kind, ItemKind::Consumable);
    assert_eq!(items["wenxin_key_i"].kind, ItemKind::Quest);

    // every drop names a known item
    for enemy in enemies.values() {
        for drop in &enemy.drops {
            assert!(items.contains_key(&drop.item_id), "{} drops {}", enemy.id, drop.item_id);
        }
    }
}

#[test]
fn unknown_enemy_is_an_error() {
    assert!(matches!(find_enemy("dean"), Err(ContentError::UnknownEnemy(id)) if id == "dean"));
    let err = simulate_fight(&against("dean", 1)).unwrap_err();
    assert!(err.to_string().contains("dean"));
}

#[test]
fn config_needs_exactly_one_enemy() {
    let mut cfg = against("confused_bookworm", 1);
    cfg.enemy_path = Some("somewhere.json".into());
    assert!(simulate_fight(&cfg).is_err());

    cfg.enemy = None;
    cfg.enemy_path = None;
    assert!(simulate_fight(&cfg).is_err());
}

#[test]
fn fight_with_builtins_runs() {
    let res = simulate_fight(&against("confused_bookworm", 2025)).unwrap();
    assert_eq!(res.outcome, Outcome::Victory);
    assert!(res.turns > 0);
    assert_eq!(res.enemy_hp_end, 0);
    assert_eq!((res.rewards.xp, res.rewards.coins), (5, 3));
    assert_eq!(res.log.first().map(String::as_str), Some("[START] Student vs Confused Bookworm (tier 1)"));
    assert!(res.log.last().unwrap().starts_with("[END] victory"));
}

#[test]
fn same_config_same_fight() {
    let cfg = against("night_sloth_demon", 77);
    let a = simulate_fight(&cfg).unwrap();
    let b = simulate_fight(&cfg).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.turns, b.turns);
}

#[test]
fn scripted_actions_come_first() {
    let mut cfg = against("confused_bookworm", 5);
    cfg.actions = vec![PlayerAction::Defend, PlayerAction::Skill("code_review".into())];
    let res = simulate_fight(&cfg).unwrap();
    assert!(res.log.iter().any(|l| l.starts_with("[DEFEND]")));
    assert!(res.log.iter().any(|l| l.contains("Code Review")));
}

#[test]
fn many_summary_makes_sense() {
    let stats = simulate_fight_many(&against("procrastination_imp", 1), 40).unwrap();
    assert_eq!(stats.samples, 40);
    assert_eq!(stats.victories + stats.defeats + stats.fled, 40);
    assert!(stats.avg_turns >= 1.0);
    assert!(stats.win_rate() > 0.5);
}

#[test]
fn build_player_applies_setup() {
    let setup = PlayerSetup {
        name: "Lin".into(),
        level: 3,
        allocate: vec!["atk".into(), "hp".into()],
        equip: vec!["student_uniform".into()],
    };
    let player = build_player(&setup).unwrap();
    assert_eq!(player.level, 3);
    assert_eq!(player.attributes.total_atk_points, 1);
    assert_eq!(player.attributes.total_hp_points, 1);
    assert_eq!(player.attributes.available_points, 0);
    assert_eq!(player.attributes.hp, player.attributes.max_hp);
    assert!(player.equipment.has_item("student_uniform"));
}

#[test]
fn build_player_rejects_bad_setup() {
    let bad_stat = PlayerSetup { allocate: vec!["luck".into()], ..PlayerSetup::default() };
    assert!(build_player(&bad_stat).is_err());

    let potion = PlayerSetup { equip: vec!["health_potion".into()], ..PlayerSetup::default() };
    let err = build_player(&potion).unwrap_err();
    assert!(format!("{:#}", err).contains("health_potion"));
}
