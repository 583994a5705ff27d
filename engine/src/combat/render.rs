use crate::combat::engine::Outcome;
use crate::combat::events::{CombatEvent, Side, StatusCause};

fn who<'a>(side: Side, player: &'a str, enemy: &'a str) -> &'a str {
    match side {
        Side::Player => player,
        Side::Enemy => enemy,
    }
}

fn cause_label(cause: StatusCause) -> &'static str {
    match cause {
        StatusCause::AutoInspiration => "opening speech",
        StatusCause::AutoFocus => "badge",
        StatusCause::OnAttackInspiration => "music",
        StatusCause::PeriodicShield => "psionic armor",
        StatusCause::SlowingStrike => "slowing strike",
        StatusCause::TensionPressure => "pressure",
    }
}

/// One log line for one event.
pub fn render_event(event: &CombatEvent, player: &str, enemy: &str) -> String {
    match event {
        CombatEvent::FightStarted { enemy: name, tier } => {
            format!("[START] {} vs {} (tier {})", player, name, tier)
        }
        CombatEvent::TurnStarted { turn, player_hp, player_max_hp, enemy_hp, enemy_max_hp } => format!(
            "[ROUND] {} {} {}/{} | {} {}/{}",
            turn, player, player_hp, player_max_hp, enemy, enemy_hp, enemy_max_hp
        ),
        CombatEvent::StatusGranted { target, status, duration, cause } => format!(
            "[STATUS][{}] gains {} for {} turns ({})",
            who(*target, player, enemy),
            status,
            duration,
            cause_label(*cause)
        ),
        CombatEvent::StatusExpired { target, status } => {
            format!("[STATUS][{}] {} wears off", who(*target, player, enemy), status)
        }
        CombatEvent::Regenerated { amount } => format!("[HEAL][{}] recovers {} HP", player, amount),
        CombatEvent::ReadingStarted { turns } => {
            format!("[BOSS][{}] starts reading, DEF up for {} turns", enemy, turns)
        }
        CombatEvent::SummonPulse { grew: true, total } => {
            format!("[BOSS][{}] summons another minion ({} total)", enemy, total)
        }
        CombatEvent::SummonPulse { grew: false, total } => {
            format!("[BOSS][{}] minions stir ({} total)", enemy, total)
        }
        CombatEvent::InitiativeDecided { first } => {
            format!("[INIT] {} acts first", who(*first, player, enemy))
        }
        CombatEvent::AttackHit { attacker, damage, guaranteed } => {
            let target = who(attacker.other(), player, enemy);
            let mark = if *guaranteed { " (focused)" } else { "" };
            format!(
                "[HIT][{}] {} takes {} damage{}",
                who(*attacker, player, enemy),
                target,
                damage,
                mark
            )
        }
        CombatEvent::AttackMissed { attacker, evaded: false } => {
            format!("[MISS][{}] attack misses", who(*attacker, player, enemy))
        }
        CombatEvent::AttackMissed { attacker, evaded: true } => format!(
            "[MISS][{}] {} sidesteps the blow",
            who(*attacker, player, enemy),
            who(attacker.other(), player, enemy)
        ),
        CombatEvent::FocusConsumed => format!("[STATUS][{}] Focus spent", player),
        CombatEvent::Enraged => format!("[BOSS][{}] is enraged", enemy),
        CombatEvent::MinionStrike { minions, damage } => {
            format!("[BOSS][{}] {} minions deal {} damage", enemy, minions, damage)
        }
        CombatEvent::SkillUsed { skill, damage: Some(d), healed } if *healed > 0 => format!(
            "[SKILL][{}] {} deals {} damage and heals {}",
            player, skill, d, healed
        ),
        CombatEvent::SkillUsed { skill, damage: Some(d), .. } => {
            format!("[SKILL][{}] {} deals {} damage", player, skill, d)
        }
        CombatEvent::SkillUsed { skill, damage: None, .. } => {
            format!("[SKILL][{}] {}", player, skill)
        }
        CombatEvent::SkillRejected { reason } => format!("[SKILL][{}] failed: {}", player, reason),
        CombatEvent::Defended => format!("[DEFEND][{}] braces", player),
        CombatEvent::FleeAttempt { success, chance } => format!(
            "[FLEE][{}] {} ({}%)",
            player,
            if *success { "escaped" } else { "failed" },
            chance
        ),
        CombatEvent::FightEnded { outcome, turns } => {
            let word = match outcome {
                Outcome::Victory => "victory",
                Outcome::Defeat => "defeat",
                Outcome::Fled => "fled",
            };
            format!("[END] {} after {} turns", word, turns)
        }
    }
}

/// Newline-delimited log for a sequence of events.
pub fn render_log(events: &[CombatEvent], player: &str, enemy: &str) -> String {
    events
        .iter()
        .map(|e| render_event(e, player, enemy))
        .collect::<Vec<_>>()
        .join("\n")
}
