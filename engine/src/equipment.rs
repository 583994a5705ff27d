use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EquipError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Consumable,
    #[default]
    Equipment,
    Quest,
    Material,
}

/// Which kind of slot a piece of equipment wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipKind {
    Weapon,
    Armor,
    Accessory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory1,
    Accessory2,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 4] = [
        EquipSlot::Weapon,
        EquipSlot::Armor,
        EquipSlot::Accessory1,
        EquipSlot::Accessory2,
    ];

    fn index(self) -> usize {
        match self {
            EquipSlot::Weapon => 0,
            EquipSlot::Armor => 1,
            EquipSlot::Accessory1 => 2,
            EquipSlot::Accessory2 => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Accessory1 => "accessory 1",
            EquipSlot::Accessory2 => "accessory 2",
        }
    }
}

/// Cosmetic grade of an item. Weapon and armor of the same grade form a matched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Undergrad,
    Master,
    Doctor,
}

impl Quality {
    pub fn set_bonus(self) -> f64 {
        match self {
            Quality::Undergrad => 1.10,
            Quality::Master => 1.15,
            Quality::Doctor => 1.20,
        }
    }

    /// Contribution to the difficulty score.
    pub fn score(self) -> i32 {
        match self {
            Quality::Undergrad => 0,
            Quality::Master => 1,
            Quality::Doctor => 2,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quality::Undergrad => "undergrad",
            Quality::Master => "master",
            Quality::Doctor => "doctor",
        };
        f.write_str(s)
    }
}

/// Generic tagged effect: `kind` is the lookup key, `target` narrows it
/// (an enemy family, an enemy id or `"all"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub kind: String,
    #[serde(default)]
    pub target: String,
    #[serde(default = "one")]
    pub value: f64,
}

fn one() -> f64 {
    1.0
}

impl ItemEffect {
    pub fn new(kind: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self { kind: kind.into(), target: target.into(), value }
    }

    fn matches(&self, kind: &str, target: &str) -> bool {
        self.kind == kind && (target.is_empty() || self.target == target || self.target == "all")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub equip_kind: Option<EquipKind>,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub atk: i32,
    #[serde(default)]
    pub def: i32,
    #[serde(default)]
    pub spd: i32,
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
    #[serde(default)]
    pub description: String,
}

impl Item {
    pub fn equipment(id: &str, name: &str, equip_kind: EquipKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: ItemKind::Equipment,
            equip_kind: Some(equip_kind),
            quality: Quality::default(),
            set_name: None,
            atk: 0,
            def: 0,
            spd: 0,
            hp: 0,
            effect: None,
            description: String::new(),
        }
    }

    pub fn with_stats(mut self, atk: i32, def: i32, spd: i32, hp: i32) -> Self {
        self.atk = atk;
        self.def = def;
        self.spd = spd;
        self.hp = hp;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_effect(mut self, kind: &str, target: &str, value: f64) -> Self {
        self.effect = Some(ItemEffect::new(kind, target, value));
        self
    }

    pub fn with_set(mut self, set_name: &str) -> Self {
        self.set_name = Some(set_name.to_string());
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_equipment(&self) -> bool {
        self.kind == ItemKind::Equipment
    }
}

/// The four equipment slots of a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<Item>; 4],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    fn target_slot(&self, item: &Item) -> EquipSlot {
        match item.equip_kind {
            Some(EquipKind::Armor) => EquipSlot::Armor,
            Some(EquipKind::Accessory) => {
                if self.slots[EquipSlot::Accessory1.index()].is_none() {
                    EquipSlot::Accessory1
                } else if self.slots[EquipSlot::Accessory2.index()].is_none() {
                    EquipSlot::Accessory2
                } else {
                    EquipSlot::Accessory1
                }
            }
            Some(EquipKind::Weapon) | None => EquipSlot::Weapon,
        }
    }

    /// Put `item` in its slot and hand back whatever it displaced.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, EquipError> {
        if !item.is_equipment() {
            return Err(EquipError::NotEquipment(item.id));
        }
        let slot = self.target_slot(&item);
        tracing::trace!(item = %item.id, slot = slot.label(), "equip");
        Ok(self.slots[slot.index()].replace(item))
    }

    pub fn equip_item(&mut self, item: Item) -> bool {
        self.equip(item).is_ok()
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots[slot.index()].take()
    }

    /// `false` when the slot was already empty.
    pub fn unequip_item(&mut self, slot: EquipSlot) -> bool {
        self.unequip(slot).is_some()
    }

    pub fn get_equipped_item(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }

    pub fn total_atk(&self) -> i32 {
        self.items().map(|i| i.atk).sum()
    }

    pub fn total_def(&self) -> i32 {
        self.items().map(|i| i.def).sum()
    }

    pub fn total_spd(&self) -> i32 {
        self.items().map(|i| i.spd).sum()
    }

    pub fn total_hp(&self) -> i32 {
        self.items().map(|i| i.hp).sum()
    }

    /// An empty `target` matches any target.
    pub fn has_effect(&self, kind: &str, target: &str) -> bool {
        self.items()
            .filter_map(|i| i.effect.as_ref())
            .any(|e| e.matches(kind, target))
    }

    /// Product of every matching effect value, 1.0 when nothing matches.
    /// Two matching items compound.
    pub fn effect_value(&self, kind: &str, target: &str) -> f64 {
        self.items()
            .filter_map(|i| i.effect.as_ref())
            .filter(|e| e.matches(kind, target))
            .fold(1.0, |acc, e| acc * e.value)
    }

    pub fn count_in_set(&self, set_name: &str) -> usize {
        self.items()
            .filter(|i| i.set_name.as_deref() == Some(set_name))
            .count()
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.items().any(|i| i.id == id)
    }

    /// Sum of quality scores across all slots.
    pub fn quality_score(&self) -> i32 {
        self.items().map(|i| i.quality.score()).sum()
    }

    /// Shared quality of weapon and armor, if both are worn and match.
    pub fn matched_set_quality(&self) -> Option<Quality> {
        let weapon = self.get_equipped_item(EquipSlot::Weapon)?;
        let armor = self.get_equipped_item(EquipSlot::Armor)?;
        (weapon.quality == armor.quality).then_some(weapon.quality)
    }
}
