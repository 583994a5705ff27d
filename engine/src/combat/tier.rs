use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::Player;

/// Dynamic difficulty bucket, fixed for the whole fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Novice,
    Standard,
    Veteran,
}

/// Story progress the tier reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryFlags {
    #[serde(default)]
    pub key_i: bool,
    #[serde(default)]
    pub key_ii: bool,
    #[serde(default)]
    pub key_iii: bool,
}

impl StoryFlags {
    pub fn keys_obtained(&self) -> usize {
        [self.key_i, self.key_ii, self.key_iii]
            .into_iter()
            .filter(|k| *k)
            .count()
    }
}

/// Without story flags the tier stays `Standard`.
pub fn difficulty_tier(player: &Player, story: Option<&StoryFlags>) -> Tier {
    let Some(story) = story else {
        return Tier::Standard;
    };
    let level = player.level;
    let score = player.equipment.quality_score();

    // the veteran condition wins when both hold
    if level >= 10 || score >= 3 || story.keys_obtained() >= 2 {
        Tier::Veteran
    } else if level < 6 || (score <= 0 && level < 9) {
        Tier::Novice
    } else {
        Tier::Standard
    }
}

impl Tier {
    pub fn index(self) -> usize {
        match self {
            Tier::Novice => 0,
            Tier::Standard => 1,
            Tier::Veteran => 2,
        }
    }

    fn pick<T: Copy>(self, table: [T; 3]) -> T {
        table[self.index()]
    }

    pub fn enemy_atk_multiplier(self) -> f64 {
        self.pick([0.9, 1.0, 1.1])
    }

    pub fn slow_chance(self) -> i32 {
        self.pick([30, 50, 70])
    }

    pub fn tension_chance(self) -> i32 {
        self.pick([20, 40, 60])
    }

    pub fn pressure_tension_chance(self) -> i32 {
        self.pick([60, 60, 70])
    }

    /// Turns between reading windows.
    pub fn reading_interval(self) -> i32 {
        self.pick([4, 3, 3])
    }

    pub fn opening_minions(self) -> i32 {
        self.pick([2, 3, 3])
    }

    pub fn minion_atk(self) -> i32 {
        self.pick([18, 20, 22])
    }

    /// Novice fights never add minions past the opening count.
    pub fn minions_grow(self) -> bool {
        self != Tier::Novice
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
