use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod attributes;
pub mod checks;
pub mod combat;
pub mod combatant;
pub mod content;
pub mod equipment;
pub mod error;
pub mod logging;

pub use attributes::{ActiveStatus, AttributeSet, Stat, StatusKind};
pub use checks::{flee_chance, hit_chance, percent_of, roll_hit};
pub use combat::damage::{mitigated_damage, physical_damage, DamageProfile, RollFactor};
pub use combat::engine::{CombatEngine, Encounter, FightReport, Outcome, PlayerAction, TurnReport};
pub use combat::events::{CombatEvent, Side, StatusCause};
pub use combat::render::{render_event, render_log};
pub use combat::rewards::{reward_percent, settle, settle_victory, Rewards};
pub use combat::skills::{Skill, SkillBook, SkillEffect};
pub use combat::tier::{difficulty_tier, StoryFlags, Tier};
pub use combatant::{BossMechanic, Combatant, DropItem, Enemy, Player, MAX_LEVEL, STEEL_SPOON_ID};
pub use equipment::{EquipKind, EquipSlot, Equipment, Item, ItemEffect, ItemKind, Quality};
pub use error::{ContentError, EquipError, SkillError, StatError};

/// Where the engine's random draws come from.
#[derive(Debug, Clone)]
enum Source {
    Seeded(ChaCha8Rng),
    Midpoint,
    Scripted {
        percents: Vec<i32>,
        factors: Vec<f64>,
        next_percent: usize,
        next_factor: usize,
    },
}

/// The single random stream a fight draws from.
#[derive(Debug, Clone)]
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random::<u64>())
    }

    /// Every percent roll is 50 and every factor is the middle of its range.
    pub fn midpoint() -> Self {
        Self { source: Source::Midpoint }
    }

    /// Replays fixed sequences, wrapping around when exhausted. An empty
    /// sequence falls back to midpoint values.
    pub fn from_scripted(percents: Vec<i32>, factors: Vec<f64>) -> Self {
        Self {
            source: Source::Scripted { percents, factors, next_percent: 0, next_factor: 0 },
        }
    }

    /// Uniform roll in 1..=100.
    pub fn percent(&mut self) -> i32 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=100),
            Source::Midpoint => 50,
            Source::Scripted { percents, next_percent, .. } => {
                if percents.is_empty() {
                    return 50;
                }
                let value = percents[*next_percent % percents.len()];
                *next_percent += 1;
                value.clamp(1, 100)
            }
        }
    }

    /// Uniform draw from `[lo, hi)`; degenerate ranges return `lo`.
    pub fn factor(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(lo..hi),
            Source::Midpoint => (lo + hi) / 2.0,
            Source::Scripted { factors, next_factor, .. } => {
                if factors.is_empty() {
                    return (lo + hi) / 2.0;
                }
                let value = factors[*next_factor % factors.len()];
                *next_factor += 1;
                value
            }
        }
    }

    /// `percent() <= chance`.
    pub fn chance(&mut self, chance: i32) -> bool {
        self.percent() <= chance
    }
}
