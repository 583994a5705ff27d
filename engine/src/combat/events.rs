use serde::{Deserialize, Serialize};

use crate::attributes::StatusKind;
use crate::combat::engine::Outcome;
use crate::combat::tier::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// What put a status on someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCause {
    AutoInspiration,
    AutoFocus,
    OnAttackInspiration,
    PeriodicShield,
    SlowingStrike,
    TensionPressure,
}

/// One thing that happened in a fight, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum CombatEvent {
    FightStarted {
        enemy: String,
        tier: Tier,
    },
    TurnStarted {
        turn: u32,
        player_hp: i32,
        player_max_hp: i32,
        enemy_hp: i32,
        enemy_max_hp: i32,
    },
    StatusGranted {
        target: Side,
        status: StatusKind,
        duration: i32,
        cause: StatusCause,
    },
    StatusExpired {
        target: Side,
        status: StatusKind,
    },
    Regenerated {
        amount: i32,
    },
    ReadingStarted {
        turns: i32,
    },
    SummonPulse {
        grew: bool,
        total: i32,
    },
    InitiativeDecided {
        first: Side,
    },
    AttackHit {
        attacker: Side,
        damage: i32,
        /// Landed through FOCUS without a roll.
        guaranteed: bool,
    },
    AttackMissed {
        attacker: Side,
        /// The roll hit but equipment evasion cancelled it.
        evaded: bool,
    },
    FocusConsumed,
    Enraged,
    MinionStrike {
        minions: i32,
        damage: i32,
    },
    SkillUsed {
        skill: String,
        damage: Option<i32>,
        healed: i32,
    },
    SkillRejected {
        reason: String,
    },
    Defended,
    FleeAttempt {
        success: bool,
        chance: i32,
    },
    FightEnded {
        outcome: Outcome,
        turns: u32,
    },
}

impl CombatEvent {
    /// Damage this event dealt to `side`, if any.
    pub fn damage_to(&self, side: Side) -> Option<i32> {
        match self {
            CombatEvent::AttackHit { attacker, damage, .. } if attacker.other() == side => {
                Some(*damage)
            }
            CombatEvent::MinionStrike { damage, .. } if side == Side::Player => Some(*damage),
            CombatEvent::SkillUsed { damage: Some(d), .. } if side == Side::Enemy => Some(*d),
            _ => None,
        }
    }
}
