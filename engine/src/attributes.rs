use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StatError;

pub const BASE_HP: i32 = 60;
pub const BASE_ATK: i32 = 10;
pub const BASE_DEF: i32 = 10;
pub const BASE_SPD: i32 = 10;

/// HP gained per point allocated to HP.
pub const HP_PER_POINT: i32 = 5;
/// ATK/DEF/SPD gained per point allocated.
pub const STAT_PER_POINT: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    None,
    Tension,
    Inspiration,
    Slow,
    Focus,
    Shield,
}

impl StatusKind {
    /// Real statuses in multiplier-application order.
    pub const ALL: [StatusKind; 5] = [
        StatusKind::Tension,
        StatusKind::Inspiration,
        StatusKind::Slow,
        StatusKind::Focus,
        StatusKind::Shield,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::None => "None",
            StatusKind::Tension => "Tension",
            StatusKind::Inspiration => "Inspiration",
            StatusKind::Slow => "Slow",
            StatusKind::Focus => "Focus",
            StatusKind::Shield => "Shield",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatusKind::None => "",
            StatusKind::Tension => "ATK +20%, DEF -15%",
            StatusKind::Inspiration => "ATK +15%, SPD +10%",
            StatusKind::Slow => "SPD -20%",
            StatusKind::Focus => "next attack cannot miss",
            StatusKind::Shield => "DEF +30%",
        }
    }

    pub fn atk_multiplier(&self) -> f64 {
        match self {
            StatusKind::Tension => 1.20,
            StatusKind::Inspiration => 1.15,
            _ => 1.0,
        }
    }

    pub fn def_multiplier(&self) -> f64 {
        match self {
            StatusKind::Tension => 0.85,
            StatusKind::Shield => 1.30,
            _ => 1.0,
        }
    }

    pub fn spd_multiplier(&self) -> f64 {
        match self {
            StatusKind::Inspiration => 1.10,
            StatusKind::Slow => 0.80,
            _ => 1.0,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One active status; re-applying the same kind replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub kind: StatusKind,
    /// Turns remaining.
    pub duration: i32,
}

impl ActiveStatus {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spd,
}

impl FromStr for Stat {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hp" => Ok(Stat::Hp),
            "atk" => Ok(Stat::Atk),
            "def" => Ok(Stat::Def),
            "spd" => Ok(Stat::Spd),
            _ => Err(StatError::UnknownStat(s.to_string())),
        }
    }
}

/// Base stats, point pool and timed statuses of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    pub hp: i32,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,

    #[serde(default)]
    pub available_points: i32,
    #[serde(default)]
    pub total_hp_points: i32,
    #[serde(default)]
    pub total_atk_points: i32,
    #[serde(default)]
    pub total_def_points: i32,
    #[serde(default)]
    pub total_spd_points: i32,

    #[serde(default)]
    pub active_statuses: IndexMap<StatusKind, ActiveStatus>,
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::new(BASE_HP, BASE_ATK, BASE_DEF, BASE_SPD)
    }
}

impl AttributeSet {
    /// Full-health stat block with an empty point pool.
    pub fn new(max_hp: i32, atk: i32, def: i32, spd: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            atk,
            def,
            spd,
            available_points: 0,
            total_hp_points: 0,
            total_atk_points: 0,
            total_def_points: 0,
            total_spd_points: 0,
            active_statuses: IndexMap::new(),
        }
    }

    /// Raw stat deltas; current HP is clamped to the new maximum.
    pub fn add_points(&mut self, hp: i32, atk: i32, def: i32, spd: i32) {
        self.max_hp += hp;
        self.hp = self.hp.min(self.max_hp);
        self.atk += atk;
        self.def += def;
        self.spd += spd;
    }

    pub fn add_status(&mut self, kind: StatusKind, duration: i32) {
        if kind == StatusKind::None {
            return;
        }
        self.active_statuses.insert(kind, ActiveStatus { kind, duration });
    }

    pub fn remove_status(&mut self, kind: StatusKind) {
        self.active_statuses.shift_remove(&kind);
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.active_statuses.contains_key(&kind)
    }

    pub fn status_duration(&self, kind: StatusKind) -> i32 {
        self.active_statuses.get(&kind).map(|s| s.duration).unwrap_or(0)
    }

    /// One turn tick: every duration drops by one and anything at or below
    /// zero is removed. Returns the kinds that expired.
    pub fn update_statuses(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for status in self.active_statuses.values_mut() {
            status.duration -= 1;
            if status.duration <= 0 {
                expired.push(status.kind);
            }
        }
        self.active_statuses.retain(|_, s| s.duration > 0);
        expired
    }

    fn chained(&self, base: i32, multiplier: impl Fn(StatusKind) -> f64) -> i32 {
        let mut value = base as f64;
        for kind in StatusKind::ALL {
            if self.has_status(kind) {
                value *= multiplier(kind);
            }
        }
        // truncate once, after the whole chain
        value as i32
    }

    pub fn effective_atk(&self) -> i32 {
        self.chained(self.atk, |k| k.atk_multiplier())
    }

    pub fn effective_def(&self) -> i32 {
        self.chained(self.def, |k| k.def_multiplier())
    }

    pub fn effective_spd(&self) -> i32 {
        self.chained(self.spd, |k| k.spd_multiplier())
    }

    pub fn allocate(&mut self, stat: Stat) -> Result<(), StatError> {
        if self.available_points <= 0 {
            return Err(StatError::NoPointsAvailable);
        }
        match stat {
            Stat::Hp => {
                self.total_hp_points += 1;
                self.max_hp += HP_PER_POINT;
                self.hp += HP_PER_POINT;
            }
            Stat::Atk => {
                self.total_atk_points += 1;
                self.atk += STAT_PER_POINT;
            }
            Stat::Def => {
                self.total_def_points += 1;
                self.def += STAT_PER_POINT;
            }
            Stat::Spd => {
                self.total_spd_points += 1;
                self.spd += STAT_PER_POINT;
            }
        }
        self.available_points -= 1;
        Ok(())
    }

    /// Spend one point on the named stat. `false` leaves everything untouched.
    pub fn allocate_point(&mut self, stat: &str) -> bool {
        if self.available_points <= 0 {
            return false;
        }
        match stat.parse::<Stat>() {
            Ok(stat) => self.allocate(stat).is_ok(),
            Err(_) => false,
        }
    }

    pub fn add_available_points(&mut self, points: i32) {
        self.available_points += points;
    }

    pub fn level_up(&mut self) {
        self.max_hp += 10;
        self.hp = self.max_hp;
        self.atk += 2;
        self.def += 2;
        self.spd += 2;
        self.available_points += 5;
    }

    /// Heal up to `max_hp`; returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    pub fn heal_to_full(&mut self) {
        self.hp = self.max_hp;
    }

    /// Subtract damage, never dropping below zero. Returns HP lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    pub fn status_summary(&self) -> String {
        self.active_statuses
            .values()
            .map(|s| format!("{}({} turns)", s.name(), s.duration))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HP: {}/{} ATK: {}({}) DEF: {}({}) SPD: {}({})",
            self.hp,
            self.max_hp,
            self.effective_atk(),
            self.atk,
            self.effective_def(),
            self.def,
            self.effective_spd(),
            self.spd
        )?;
        if self.available_points > 0 {
            write!(f, " points: {}", self.available_points)?;
        }
        if !self.active_statuses.is_empty() {
            write!(f, " [{}]", self.status_summary())?;
        }
        Ok(())
    }
}
