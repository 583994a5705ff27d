use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::combat::damage::{DamageProfile, RollFactor};
use crate::error::SkillError;

/// What a skill does besides its damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SkillEffect {
    /// Heals the user by `heal_ratio` of damage dealt.
    Drain { heal_ratio: f64 },
    /// Narrative extra action; not enforced by the engine.
    Rush,
    Strike,
    /// Narrative guard; no stat change.
    Guard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Informational only.
    #[serde(default)]
    pub mp_cost: i32,
    pub cooldown: u32,
    #[serde(default)]
    pub current_cooldown: u32,
    #[serde(default)]
    pub profile: Option<DamageProfile>,
    pub effect: SkillEffect,
}

impl Skill {
    pub fn new(id: &str, name: &str, cooldown: u32, profile: Option<DamageProfile>, effect: SkillEffect) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            mp_cost: 0,
            cooldown,
            current_cooldown: 0,
            profile,
            effect,
        }
    }

    fn described(mut self, mp_cost: i32, description: &str) -> Self {
        self.mp_cost = mp_cost;
        self.description = description.to_string();
        self
    }

    pub fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    fn answers_to(&self, key: &str) -> bool {
        self.id.eq_ignore_ascii_case(key) || self.name.eq_ignore_ascii_case(key)
    }
}

/// Ordered set of skills keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBook {
    skills: IndexMap<String, Skill>,
}

impl SkillBook {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The five player skills every fight starts with.
    pub fn builtin() -> Self {
        let mut book = Self::empty();
        book.add(
            Skill::new(
                "knowledge_theft",
                "Knowledge Theft",
                3,
                Some(DamageProfile::new(RollFactor::Range(0.8, 0.9), 140)),
                SkillEffect::Drain { heal_ratio: 0.5 },
            )
            .described(20, "Siphon an idea and heal for half the damage dealt"),
        );
        book.add(
            Skill::new(
                "deadline_rush",
                "Deadline Rush",
                5,
                Some(DamageProfile::new(RollFactor::Range(0.9, 1.3), 130)),
                SkillEffect::Rush,
            )
            .described(30, "A frantic burst of work"),
        );
        book.add(
            Skill::new(
                "code_review",
                "Code Review",
                2,
                Some(DamageProfile::new(RollFactor::Fixed(1.2), 120)),
                SkillEffect::Strike,
            )
            .described(15, "Point out every flaw"),
        );
        book.add(
            Skill::new("debug_mode", "Debug Mode", 4, None, SkillEffect::Guard)
                .described(25, "Step through the problem defensively"),
        );
        book.add(
            Skill::new(
                "algorithm_optimization",
                "Algorithm Optimization",
                6,
                Some(DamageProfile::new(RollFactor::Fixed(1.5), 120)),
                SkillEffect::Strike,
            )
            .described(40, "Cut the problem down to size"),
        );
        book
    }

    /// Insert or replace by id.
    pub fn add(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), skill);
    }

    /// Lookup by id or display name, case-insensitive.
    pub fn get(&self, key: &str) -> Option<&Skill> {
        self.skills.values().find(|s| s.answers_to(key))
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Skill> {
        self.skills.values_mut().find(|s| s.answers_to(key))
    }

    pub fn available(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values().filter(|s| s.is_ready())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Check the skill can fire and start its cooldown.
    pub fn trigger(&mut self, key: &str) -> Result<Skill, SkillError> {
        let skill = self
            .get_mut(key)
            .ok_or_else(|| SkillError::Unknown(key.to_string()))?;
        if skill.current_cooldown > 0 {
            return Err(SkillError::OnCooldown {
                name: skill.name.clone(),
                remaining: skill.current_cooldown,
            });
        }
        skill.current_cooldown = skill.cooldown;
        Ok(skill.clone())
    }

    pub fn tick_cooldowns(&mut self) {
        for skill in self.skills.values_mut() {
            skill.current_cooldown = skill.current_cooldown.saturating_sub(1);
        }
    }

    pub fn reset_cooldowns(&mut self) {
        for skill in self.skills.values_mut() {
            skill.current_cooldown = 0;
        }
    }
}
