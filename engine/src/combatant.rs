use serde::{Deserialize, Serialize};

use crate::attributes::{
    AttributeSet, BASE_ATK, BASE_DEF, BASE_HP, BASE_SPD, HP_PER_POINT, STAT_PER_POINT,
};
use crate::equipment::{EquipSlot, Equipment, Item};
use crate::error::EquipError;
use crate::Dice;

/// Id of the accessory that blunts minion strikes and bites experiment failures.
pub const STEEL_SPOON_ID: &str = "steel_spoon";

/// Highest level a player can reach or be built at.
pub const MAX_LEVEL: i32 = 99;

/// Shared read view over anything that can stand in a fight.
pub trait Combatant {
    fn name(&self) -> &str;
    fn attributes(&self) -> &AttributeSet;
    fn attributes_mut(&mut self) -> &mut AttributeSet;

    fn hp(&self) -> i32 {
        self.attributes().hp
    }

    fn max_hp(&self) -> i32 {
        self.attributes().max_hp
    }

    fn effective_atk(&self) -> i32 {
        self.attributes().effective_atk()
    }

    fn effective_def(&self) -> i32 {
        self.attributes().effective_def()
    }

    fn effective_spd(&self) -> i32 {
        self.attributes().effective_spd()
    }

    fn is_alive(&self) -> bool {
        self.attributes().hp > 0
    }

    fn equipment(&self) -> Option<&Equipment> {
        None
    }

    fn has_slow_skill(&self) -> bool {
        false
    }

    fn has_tension_skill(&self) -> bool {
        false
    }

    fn is_group_enemy(&self) -> bool {
        false
    }

    fn has_explosion_mechanic(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub level: i32,
    #[serde(default)]
    pub xp: i32,
    #[serde(default)]
    pub coins: i32,
    pub attributes: AttributeSet,
    #[serde(default)]
    pub equipment: Equipment,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: 1,
            xp: 0,
            coins: 0,
            attributes: AttributeSet::default(),
            equipment: Equipment::new(),
        }
    }

    /// Fresh player at `level` (clamped to 1..=MAX_LEVEL) with stats
    /// recomputed from scratch.
    pub fn at_level(name: &str, level: i32) -> Self {
        let mut player = Self::new(name);
        player.level = level.clamp(1, MAX_LEVEL);
        player.recompute_attributes();
        player.attributes.heal_to_full();
        player
    }

    /// Equip and recompute; returns whatever was displaced.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, EquipError> {
        let displaced = self.equipment.equip(item)?;
        self.recompute_attributes();
        Ok(displaced)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        let item = self.equipment.unequip(slot);
        if item.is_some() {
            self.recompute_attributes();
        }
        item
    }

    /// Rebuild base stats from level, allocated points and equipment, then
    /// apply the matched-set multiplier. Statuses and the point pool are kept.
    pub fn recompute_attributes(&mut self) {
        let growth = self.level - 1;
        let eq = &self.equipment;
        let a = &mut self.attributes;

        let mut atk = BASE_ATK + growth * 2 + a.total_atk_points * STAT_PER_POINT + eq.total_atk();
        let mut def = BASE_DEF + growth * 2 + a.total_def_points * STAT_PER_POINT + eq.total_def();
        let mut spd = BASE_SPD + growth * 2 + a.total_spd_points * STAT_PER_POINT + eq.total_spd();
        let mut max_hp =
            BASE_HP + growth * 10 + a.total_hp_points * HP_PER_POINT + eq.total_hp();

        if let Some(quality) = eq.matched_set_quality() {
            let bonus = quality.set_bonus();
            atk = (atk as f64 * bonus) as i32;
            def = (def as f64 * bonus) as i32;
            spd = (spd as f64 * bonus) as i32;
            max_hp = (max_hp as f64 * bonus) as i32;
        }

        a.atk = atk;
        a.def = def;
        a.spd = spd;
        a.max_hp = max_hp;
        a.hp = a.hp.min(a.max_hp);
    }

    pub fn xp_to_next_level(&self) -> i32 {
        (self.level * 100 - self.xp).max(0)
    }

    /// Add XP and resolve any level thresholds crossed. Returns levels gained.
    pub fn gain_xp(&mut self, amount: i32) -> i32 {
        self.xp += amount.max(0);
        let mut gained = 0;
        while self.level < MAX_LEVEL && self.xp >= self.level * 100 {
            self.xp -= self.level * 100;
            self.level += 1;
            self.attributes.add_available_points(2);
            gained += 1;
        }
        if gained > 0 {
            self.recompute_attributes();
            self.attributes.heal_to_full();
            tracing::debug!(player = %self.name, level = self.level, "level up");
        }
        gained
    }

    /// Respawn after a defeat: lose a level and all allocations, lose a tenth
    /// of coins, come back at full health.
    pub fn apply_death_penalty(&mut self) {
        if self.level > 1 {
            self.level -= 1;
            let a = &mut self.attributes;
            a.total_hp_points = 0;
            a.total_atk_points = 0;
            a.total_def_points = 0;
            a.total_spd_points = 0;
            self.recompute_attributes();
        }
        self.coins -= self.coins / 10;
        self.attributes.heal_to_full();
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    fn equipment(&self) -> Option<&Equipment> {
        Some(&self.equipment)
    }
}

/// Scripted per-enemy behaviour the engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossMechanic {
    /// Periodic 2-turn window with DEF x1.5.
    Reading,
    /// Phantom minions that add their own strikes.
    Summoner,
    /// Tension on hit and an enrage below half HP.
    Pressure,
    /// Takes +25% from a focused attacker.
    FocusWeakness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropItem {
    pub item_id: String,
    #[serde(default = "one")]
    pub min_qty: i32,
    #[serde(default = "one")]
    pub max_qty: i32,
    /// 0.0..=1.0
    pub rate: f64,
}

fn one() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: Option<i32>,
    /// Tag that equipment damage multipliers target.
    #[serde(default)]
    pub family: Option<String>,
    pub attributes: AttributeSet,
    #[serde(default)]
    pub coin_reward: i32,
    #[serde(default)]
    pub xp_reward: i32,
    #[serde(default)]
    pub has_slow_skill: bool,
    #[serde(default)]
    pub has_tension_skill: bool,
    #[serde(default)]
    pub has_explosion_mechanic: bool,
    #[serde(default)]
    pub group_count: i32,
    #[serde(default)]
    pub mechanics: Vec<BossMechanic>,
    #[serde(default)]
    pub drops: Vec<DropItem>,
    #[serde(default)]
    pub special_skill: Option<String>,
    #[serde(default)]
    pub special_skill_description: Option<String>,
}

impl Enemy {
    pub fn new(id: &str, name: &str, attributes: AttributeSet) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level: None,
            family: None,
            attributes,
            coin_reward: 0,
            xp_reward: 0,
            has_slow_skill: false,
            has_tension_skill: false,
            has_explosion_mechanic: false,
            group_count: 0,
            mechanics: Vec::new(),
            drops: Vec::new(),
            special_skill: None,
            special_skill_description: None,
        }
    }

    pub fn with_rewards(mut self, coins: i32, xp: i32) -> Self {
        self.coin_reward = coins;
        self.xp_reward = xp;
        self
    }

    pub fn with_mechanic(mut self, mechanic: BossMechanic) -> Self {
        self.mechanics.push(mechanic);
        self
    }

    pub fn with_family(mut self, family: &str) -> Self {
        self.family = Some(family.to_string());
        self
    }

    pub fn has_mechanic(&self, mechanic: BossMechanic) -> bool {
        self.mechanics.contains(&mechanic)
    }

    /// Template level, or an estimate from raw stats.
    pub fn level(&self) -> i32 {
        self.level
            .unwrap_or_else(|| ((self.attributes.max_hp + self.attributes.atk) / 20).clamp(1, 15))
    }

    pub fn damage_tag(&self) -> &str {
        self.family.as_deref().unwrap_or(&self.id)
    }

    /// Roll every drop entry independently; returns `(item_id, quantity)`.
    pub fn roll_drops(&self, dice: &mut Dice) -> Vec<(String, i32)> {
        let mut out = Vec::new();
        for drop in &self.drops {
            let threshold = crate::checks::percent_of(drop.rate);
            if !dice.chance(threshold) {
                continue;
            }
            let span = (drop.max_qty - drop.min_qty).max(0);
            let qty = drop.min_qty + (dice.percent() - 1) % (span + 1);
            out.push((drop.item_id.clone(), qty));
        }
        out
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    fn has_slow_skill(&self) -> bool {
        self.has_slow_skill
    }

    fn has_tension_skill(&self) -> bool {
        self.has_tension_skill
    }

    fn is_group_enemy(&self) -> bool {
        self.group_count > 1
    }

    fn has_explosion_mechanic(&self) -> bool {
        self.has_explosion_mechanic
    }
}
