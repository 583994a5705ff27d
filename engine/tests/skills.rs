use hx_engine::{DamageProfile, RollFactor, Skill, SkillBook, SkillEffect, SkillError};

#[test]
fn builtin_book_is_ordered_and_ready() {
    let book = SkillBook::builtin();
    let ids: Vec<&str> = book.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["knowledge_theft", "deadline_rush", "code_review", "debug_mode", "algorithm_optimization"]
    );
    assert_eq!(book.available().count(), 5);
    assert_eq!(book.get("DEBUG MODE").map(|s| s.cooldown), Some(4));
}

#[test]
fn trigger_starts_cooldown_and_ticks_release_it() {
    let mut book = SkillBook::builtin();
    let fired = book.trigger("Code Review").unwrap();
    assert_eq!(fired.id, "code_review");
    assert_eq!(
        book.trigger("code_review"),
        Err(SkillError::OnCooldown { name: "Code Review".into(), remaining: 2 })
    );
    assert_eq!(book.available().count(), 4);

    book.tick_cooldowns();
    book.tick_cooldowns();
    book.tick_cooldowns();
    assert!(book.get("code_review").unwrap().is_ready());
}

#[test]
fn unknown_skill_is_rejected() {
    let mut book = SkillBook::builtin();
    assert_eq!(book.trigger("nap"), Err(SkillError::Unknown("nap".into())));
}

#[test]
fn reset_and_replace() {
    let mut book = SkillBook::builtin();
    book.trigger("deadline_rush").unwrap();
    book.reset_cooldowns();
    assert_eq!(book.available().count(), 5);

    book.add(Skill::new(
        "code_review",
        "Pair Review",
        1,
        Some(DamageProfile::new(RollFactor::Fixed(1.0), 120)),
        SkillEffect::Strike,
    ));
    assert_eq!(book.iter().count(), 5);
    assert_eq!(book.get("code_review").unwrap().name, "Pair Review");
}
