use serde::{Deserialize, Serialize};

use crate::attributes::StatusKind;
use crate::combat::engine::Outcome;
use crate::combatant::{Enemy, Player};

/// XP percentage for `enemy_level - player_level`.
pub fn reward_percent(level_diff: i32) -> i32 {
    match level_diff {
        d if d >= 5 => 250,
        4 => 200,
        3 => 180,
        2 => 150,
        1 => 120,
        0 => 100,
        -1 => 50,
        -2 => 25,
        -3 => 10,
        _ => 5,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub xp: i32,
    pub coins: i32,
    pub levels_gained: i32,
}

/// Apply the consequences of a finished fight. Only victories pay out;
/// fleeing gives nothing.
pub fn settle(outcome: Outcome, player: &mut Player, enemy: &Enemy) -> Rewards {
    match outcome {
        Outcome::Victory => settle_victory(player, enemy),
        Outcome::Defeat | Outcome::Fled => Rewards::default(),
    }
}

pub fn settle_victory(player: &mut Player, enemy: &Enemy) -> Rewards {
    player.attributes.remove_status(StatusKind::Tension);
    player.attributes.remove_status(StatusKind::Slow);

    let pct = reward_percent(enemy.level() - player.level);
    let xp = enemy.xp_reward * pct / 100;
    let coins = enemy.coin_reward;
    player.coins += coins;
    let levels_gained = player.gain_xp(xp);
    tracing::debug!(xp, coins, levels_gained, "victory settled");
    Rewards { xp, coins, levels_gained }
}
