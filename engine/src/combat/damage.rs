//! Damage calculation
//!
//! Physical damage is `max(1, floor(base * (1 - def / (def + k))))` where
//! `base` is ATK times a roll factor.

use serde::{Deserialize, Serialize};

use crate::Dice;

/// Mitigation constant for plain attacks.
pub const BASE_K: i32 = 120;

/// How the attack factor is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollFactor {
    /// Uniform in `[lo, hi)`.
    Range(f64, f64),
    Fixed(f64),
}

impl RollFactor {
    pub fn roll(self, dice: &mut Dice) -> f64 {
        match self {
            RollFactor::Range(lo, hi) => dice.factor(lo, hi),
            RollFactor::Fixed(f) => f,
        }
    }
}

/// Roll factor and mitigation constant of one kind of attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    pub factor: RollFactor,
    pub k: i32,
}

impl DamageProfile {
    pub const BASIC: DamageProfile = DamageProfile {
        factor: RollFactor::Range(0.9, 1.1),
        k: BASE_K,
    };

    pub const fn new(factor: RollFactor, k: i32) -> Self {
        Self { factor, k }
    }
}

/// Fraction of damage that gets through `def`.
pub fn mitigation_ratio(def: i32, k: i32) -> f64 {
    let d = def.max(0) as f64;
    let k = k.max(1) as f64;
    1.0 - d / (d + k)
}

/// Final damage for a pre-computed base; never below 1.
pub fn mitigated_damage(base: f64, def: i32, k: i32) -> i32 {
    let raw = (base * mitigation_ratio(def, k)).floor();
    (raw as i32).max(1)
}

/// ATK x factor through the standard mitigation curve.
pub fn physical_damage(atk: i32, def: i32, factor: f64) -> i32 {
    mitigated_damage(atk as f64 * factor, def, BASE_K)
}
