/// Hit chance in percent for an attacker against a defender, clamped to 15..=95.
pub fn hit_chance(attacker_spd: i32, defender_spd: i32) -> i32 {
    let gap = defender_spd.saturating_sub(attacker_spd);
    100i32.saturating_sub(gap.saturating_mul(2)).clamp(15, 95)
}

/// Probability that a flee attempt succeeds, clamped to 0.1..=0.9.
pub fn flee_chance(player_spd: i32, enemy_spd: i32) -> f64 {
    let diff = player_spd as f64 - enemy_spd as f64;
    (0.4 + diff / 100.0).clamp(0.1, 0.9)
}

/// Convert a 0.0..=1.0 probability to a percent threshold.
pub fn percent_of(probability: f64) -> i32 {
    (probability * 100.0).round().clamp(0.0, 100.0) as i32
}

/// Roll a hit; returns `(roll, chance, hit)`.
pub fn roll_hit(dice: &mut crate::Dice, attacker_spd: i32, defender_spd: i32) -> (i32, i32, bool) {
    let chance = hit_chance(attacker_spd, defender_spd);
    let roll = dice.percent();
    (roll, chance, roll <= chance)
}
