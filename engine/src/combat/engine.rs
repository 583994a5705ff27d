use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::attributes::StatusKind;
use crate::checks::{flee_chance, percent_of, roll_hit};
use crate::combat::damage::{mitigated_damage, physical_damage, DamageProfile};
use crate::combat::events::{CombatEvent, Side, StatusCause};
use crate::combat::render::render_log;
use crate::combat::skills::{SkillBook, SkillEffect};
use crate::combat::tier::{difficulty_tier, StoryFlags, Tier};
use crate::combatant::{BossMechanic, Combatant, Enemy, Player, STEEL_SPOON_ID};
use crate::error::SkillError;
use crate::Dice;

const READING_TURNS: i32 = 2;
const READING_DEF_MULTIPLIER: f64 = 1.5;
const SUMMON_PERIOD: i32 = 3;
const SHIELD_PERIOD: u32 = 3;
const ENRAGE_MULTIPLIER: f64 = 1.3;
const FOCUS_WEAKNESS_MULTIPLIER: f64 = 1.25;
const SPOON_MINION_REDUCTION: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Attack,
    /// Skill id or display name.
    Skill(String),
    Defend,
    Flee,
}

/// Per-fight state. The enemy is a copy; the caller's template is untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub enemy: Enemy,
    pub turn: u32,
    pub tier: Tier,
    /// Turns of DEF boost left on a reading enemy.
    pub reading_turns: i32,
    pub minions: i32,
    pub summon_countdown: i32,
    /// Maintenance steps run this fight; drives the periodic shield.
    pub maintenance_ticks: u32,
    pub enraged: bool,
    pub player_attacks: u32,
    pub outcome: Option<Outcome>,
    pub events: Vec<CombatEvent>,
}

impl Encounter {
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub events: Vec<CombatEvent>,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightReport {
    pub outcome: Outcome,
    pub turns: u32,
    pub player_hp: i32,
    pub enemy_hp: i32,
    pub tier: Tier,
    pub events: Vec<CombatEvent>,
    /// Rendered, newline-delimited.
    pub log: String,
    /// Plain attacks the player made.
    pub player_attacks: u32,
}

/// Runs fights. Owns the single random stream; do not share across fights
/// running at the same time.
#[derive(Debug, Clone)]
pub struct CombatEngine {
    dice: Dice,
    skills: SkillBook,
    story: Option<StoryFlags>,
}

impl CombatEngine {
    /// Seeded from `seed`, or from entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let dice = match seed {
            Some(seed) => Dice::from_seed(seed),
            None => Dice::from_entropy(),
        };
        Self::with_dice(dice)
    }

    pub fn with_dice(dice: Dice) -> Self {
        Self { dice, skills: SkillBook::builtin(), story: None }
    }

    /// Story flags enable tier calculation; without them every fight is `Standard`.
    pub fn with_story(mut self, story: StoryFlags) -> Self {
        self.story = Some(story);
        self
    }

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillBook {
        &mut self.skills
    }

    pub fn dice_mut(&mut self) -> &mut Dice {
        &mut self.dice
    }

    /// Set up a fight against a copy of `enemy` and grant opening statuses.
    pub fn start(&mut self, player: &mut Player, enemy: &Enemy) -> Encounter {
        let tier = difficulty_tier(player, self.story.as_ref());
        debug!(player = %player.name, enemy = %enemy.name, %tier, "fight start");
        self.skills.reset_cooldowns();

        let mut events = vec![CombatEvent::FightStarted { enemy: enemy.name.clone(), tier }];

        // one extra turn so they survive the first status tick
        if player.equipment.has_effect("auto_inspiration", "") {
            grant(player, StatusKind::Inspiration, 3 + 1, StatusCause::AutoInspiration, &mut events);
        }
        if player.equipment.has_effect("auto_focus", "") {
            grant(player, StatusKind::Focus, 1 + 1, StatusCause::AutoFocus, &mut events);
        }

        let minions = if enemy.has_mechanic(BossMechanic::Summoner) {
            tier.opening_minions()
        } else {
            0
        };

        Encounter {
            enemy: enemy.clone(),
            turn: 0,
            tier,
            reading_turns: 0,
            minions,
            summon_countdown: SUMMON_PERIOD,
            maintenance_ticks: 0,
            enraged: false,
            player_attacks: 0,
            outcome: None,
            events,
        }
    }

    /// Resolve one full turn with the player taking `action`.
    pub fn advance_one_turn(
        &mut self,
        enc: &mut Encounter,
        player: &mut Player,
        action: &PlayerAction,
    ) -> TurnReport {
        if let Some(outcome) = enc.outcome {
            return TurnReport { turn: enc.turn, events: Vec::new(), outcome: Some(outcome) };
        }

        let mut events = Vec::new();
        enc.turn += 1;
        events.push(CombatEvent::TurnStarted {
            turn: enc.turn,
            player_hp: player.hp(),
            player_max_hp: player.max_hp(),
            enemy_hp: enc.enemy.hp(),
            enemy_max_hp: enc.enemy.max_hp(),
        });

        for status in player.attributes.update_statuses() {
            events.push(CombatEvent::StatusExpired { target: Side::Player, status });
        }
        for status in enc.enemy.attributes.update_statuses() {
            events.push(CombatEvent::StatusExpired { target: Side::Enemy, status });
        }
        self.skills.tick_cooldowns();

        maintain(enc, player, &mut events);
        boss_turn_start(enc, &mut events);

        let priority = enc.turn == 1 && player.equipment.has_effect("first_turn_priority", "");
        let first = if priority || player.effective_spd() >= enc.enemy.effective_spd() {
            Side::Player
        } else {
            Side::Enemy
        };
        events.push(CombatEvent::InitiativeDecided { first });

        match first {
            Side::Player => {
                self.player_act(enc, player, action, &mut events);
                if enc.outcome.is_none() && enc.enemy.is_alive() {
                    self.enemy_act(enc, player, &mut events);
                }
            }
            Side::Enemy => {
                self.enemy_act(enc, player, &mut events);
                if player.is_alive() {
                    self.player_act(enc, player, action, &mut events);
                }
            }
        }

        if enc.reading_turns > 0 {
            enc.reading_turns -= 1;
        }

        if enc.outcome.is_none() {
            if !player.is_alive() {
                enc.outcome = Some(Outcome::Defeat);
            } else if !enc.enemy.is_alive() {
                enc.outcome = Some(Outcome::Victory);
            }
        }
        if let Some(outcome) = enc.outcome {
            debug!(?outcome, turns = enc.turn, "fight end");
            events.push(CombatEvent::FightEnded { outcome, turns: enc.turn });
        }

        enc.events.extend(events.iter().cloned());
        TurnReport { turn: enc.turn, events, outcome: enc.outcome }
    }

    /// Attack every turn until someone drops.
    pub fn fight(&mut self, player: &mut Player, enemy: &Enemy) -> FightReport {
        self.fight_with(player, enemy, |_| PlayerAction::Attack)
    }

    /// Run to completion, asking `choose` for the player's action each turn.
    pub fn fight_with(
        &mut self,
        player: &mut Player,
        enemy: &Enemy,
        mut choose: impl FnMut(&Encounter) -> PlayerAction,
    ) -> FightReport {
        let mut enc = self.start(player, enemy);
        while !enc.is_over() {
            let action = choose(&enc);
            self.advance_one_turn(&mut enc, player, &action);
        }
        self.report(enc, player)
    }

    /// Summarise a finished (or abandoned) encounter.
    pub fn report(&self, enc: Encounter, player: &Player) -> FightReport {
        let log = render_log(&enc.events, &player.name, &enc.enemy.name);
        FightReport {
            outcome: enc.outcome.unwrap_or(Outcome::Defeat),
            turns: enc.turn,
            player_hp: player.hp(),
            enemy_hp: enc.enemy.hp(),
            tier: enc.tier,
            events: enc.events,
            log,
            player_attacks: enc.player_attacks,
        }
    }

    fn player_act(
        &mut self,
        enc: &mut Encounter,
        player: &mut Player,
        action: &PlayerAction,
        events: &mut Vec<CombatEvent>,
    ) {
        match action {
            PlayerAction::Attack => self.player_attack(enc, player, events),
            PlayerAction::Skill(name) => match self.use_skill(enc, player, name) {
                Ok(skill_events) => events.extend(skill_events),
                Err(err) => {
                    trace!(%err, "skill rejected");
                    events.push(CombatEvent::SkillRejected { reason: err.to_string() });
                }
            },
            PlayerAction::Defend => events.push(CombatEvent::Defended),
            PlayerAction::Flee => {
                let chance = percent_of(flee_chance(player.effective_spd(), enc.enemy.effective_spd()));
                let success = self.attempt_flee(player, &enc.enemy);
                events.push(CombatEvent::FleeAttempt { success, chance });
                if success {
                    enc.outcome = Some(Outcome::Fled);
                }
            }
        }
    }

    fn enemy_def_for_calc(enc: &Encounter) -> i32 {
        let def = enc.enemy.effective_def();
        if enc.reading_turns > 0 {
            (def as f64 * READING_DEF_MULTIPLIER) as i32
        } else {
            def
        }
    }

    fn player_attack(&mut self, enc: &mut Encounter, player: &mut Player, events: &mut Vec<CombatEvent>) {
        enc.player_attacks += 1;
        let def = Self::enemy_def_for_calc(enc);
        let focused = player.attributes.has_status(StatusKind::Focus);

        let mut base = player.effective_atk() as f64 * DamageProfile::BASIC.factor.roll(&mut self.dice);
        let multiplier = player.equipment.effect_value("damage_multiplier", enc.enemy.damage_tag());
        if multiplier > 1.0 {
            base *= multiplier;
        }
        if focused && enc.enemy.has_mechanic(BossMechanic::FocusWeakness) {
            base *= FOCUS_WEAKNESS_MULTIPLIER;
        }
        let damage = mitigated_damage(base, def, DamageProfile::BASIC.k);

        let hit = if focused {
            true
        } else {
            let (roll, chance, hit) =
                roll_hit(&mut self.dice, player.effective_spd(), enc.enemy.effective_spd());
            trace!(roll, chance, "player hit roll");
            hit
        };
        if !hit {
            events.push(CombatEvent::AttackMissed { attacker: Side::Player, evaded: false });
            return;
        }

        enc.enemy.attributes.take_damage(damage);
        trace!(damage, enemy_hp = enc.enemy.hp(), "player hit");
        events.push(CombatEvent::AttackHit { attacker: Side::Player, damage, guaranteed: focused });
        if focused {
            player.attributes.remove_status(StatusKind::Focus);
            events.push(CombatEvent::FocusConsumed);
        }

        if player.equipment.has_effect("on_attack_inspiration", "") {
            let chance = percent_of(player.equipment.effect_value("on_attack_inspiration", ""));
            if self.dice.chance(chance) {
                grant(player, StatusKind::Inspiration, 2, StatusCause::OnAttackInspiration, events);
            }
        }
    }

    fn enemy_act(&mut self, enc: &mut Encounter, player: &mut Player, events: &mut Vec<CombatEvent>) {
        let tier = enc.tier;
        let mut atk = (enc.enemy.effective_atk() as f64 * tier.enemy_atk_multiplier()).round() as i32;
        let pressure = enc.enemy.has_mechanic(BossMechanic::Pressure);
        if pressure && enc.enemy.hp() * 2 < enc.enemy.max_hp() {
            atk = (atk as f64 * ENRAGE_MULTIPLIER) as i32;
            if !enc.enraged {
                enc.enraged = true;
                events.push(CombatEvent::Enraged);
            }
        }

        let factor = DamageProfile::BASIC.factor.roll(&mut self.dice);
        let damage = physical_damage(atk, player.effective_def(), factor);

        let (roll, chance, hit) =
            roll_hit(&mut self.dice, enc.enemy.effective_spd(), player.effective_spd());
        trace!(roll, chance, "enemy hit roll");
        if !hit {
            events.push(CombatEvent::AttackMissed { attacker: Side::Enemy, evaded: false });
            return;
        }
        if player.equipment.has_effect("extra_evasion", "") {
            let evade = percent_of(player.equipment.effect_value("extra_evasion", ""));
            if self.dice.chance(evade) {
                events.push(CombatEvent::AttackMissed { attacker: Side::Enemy, evaded: true });
                return;
            }
        }

        player.attributes.take_damage(damage);
        trace!(damage, player_hp = player.hp(), "enemy hit");
        events.push(CombatEvent::AttackHit { attacker: Side::Enemy, damage, guaranteed: false });

        if enc.enemy.has_slow_skill() && self.dice.chance(tier.slow_chance()) {
            grant(player, StatusKind::Slow, 2, StatusCause::SlowingStrike, events);
        }
        let tension = if pressure {
            Some(tier.pressure_tension_chance())
        } else if enc.enemy.has_tension_skill() {
            Some(tier.tension_chance())
        } else {
            None
        };
        if let Some(chance) = tension {
            if self.dice.chance(chance) {
                grant(player, StatusKind::Tension, 3, StatusCause::TensionPressure, events);
            }
        }

        if enc.enemy.has_mechanic(BossMechanic::Summoner) && enc.minions > 0 && player.is_alive() {
            let spoon = player.equipment.has_item(STEEL_SPOON_ID);
            let def = player.effective_def();
            let total: i32 = (0..enc.minions)
                .map(|_| {
                    let strike = physical_damage(tier.minion_atk(), def, 1.0);
                    if spoon {
                        (strike as f64 * SPOON_MINION_REDUCTION) as i32
                    } else {
                        strike
                    }
                })
                .sum();
            if total > 0 {
                player.attributes.take_damage(total);
                events.push(CombatEvent::MinionStrike { minions: enc.minions, damage: total });
            }
        }
    }

    /// Fire a skill at the encounter's enemy. Unknown or cooling-down skills
    /// leave everything untouched.
    pub fn use_skill(
        &mut self,
        enc: &mut Encounter,
        player: &mut Player,
        key: &str,
    ) -> Result<Vec<CombatEvent>, SkillError> {
        let skill = self.skills.trigger(key)?;
        let mut damage = None;
        let mut healed = 0;

        if let Some(profile) = skill.profile {
            let def = Self::enemy_def_for_calc(enc);
            let base = player.effective_atk() as f64 * profile.factor.roll(&mut self.dice);
            let dealt = mitigated_damage(base, def, profile.k);
            enc.enemy.attributes.take_damage(dealt);
            damage = Some(dealt);
        }
        if let (SkillEffect::Drain { heal_ratio }, Some(dealt)) = (skill.effect, damage) {
            healed = player.attributes.heal((dealt as f64 * heal_ratio) as i32);
        }
        trace!(skill = %skill.id, ?damage, healed, "skill used");
        Ok(vec![CombatEvent::SkillUsed { skill: skill.name, damage, healed }])
    }

    /// Roll an escape attempt.
    pub fn attempt_flee(&mut self, player: &Player, enemy: &Enemy) -> bool {
        let chance = percent_of(flee_chance(player.effective_spd(), enemy.effective_spd()));
        self.dice.chance(chance)
    }
}

fn grant(
    player: &mut Player,
    status: StatusKind,
    duration: i32,
    cause: StatusCause,
    events: &mut Vec<CombatEvent>,
) {
    player.attributes.add_status(status, duration);
    events.push(CombatEvent::StatusGranted { target: Side::Player, status, duration, cause });
}

/// Recurring equipment effects at the top of each turn.
fn maintain(enc: &mut Encounter, player: &mut Player, events: &mut Vec<CombatEvent>) {
    let eq = &player.equipment;
    if eq.has_effect("per_turn_heal_percent", "") {
        let pct = eq.effect_value("per_turn_heal_percent", "");
        let amount = ((player.attributes.max_hp as f64 * pct).round() as i32).max(1);
        let healed = player.attributes.heal(amount);
        if healed > 0 {
            events.push(CombatEvent::Regenerated { amount: healed });
        }
    }

    enc.maintenance_ticks += 1;
    if enc.maintenance_ticks % SHIELD_PERIOD == 0 && player.equipment.has_effect("periodic_shield", "") {
        grant(player, StatusKind::Shield, 1, StatusCause::PeriodicShield, events);
    }
}

fn boss_turn_start(enc: &mut Encounter, events: &mut Vec<CombatEvent>) {
    let tier = enc.tier;
    if enc.enemy.has_mechanic(BossMechanic::Reading)
        && (enc.turn as i32 - 1) % tier.reading_interval() == 0
    {
        enc.reading_turns = READING_TURNS;
        events.push(CombatEvent::ReadingStarted { turns: READING_TURNS });
    }

    if enc.enemy.has_mechanic(BossMechanic::Summoner) {
        enc.summon_countdown -= 1;
        if enc.summon_countdown <= 0 {
            let grew = tier.minions_grow();
            if grew {
                enc.minions += 1;
            }
            enc.summon_countdown = SUMMON_PERIOD;
            events.push(CombatEvent::SummonPulse { grew, total: enc.minions });
        }
    }
}
