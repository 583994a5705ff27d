use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::attributes::Stat;
use crate::combat::engine::{CombatEngine, Outcome, PlayerAction};
use crate::combat::rewards::{settle, Rewards};
use crate::combat::tier::{StoryFlags, Tier};
use crate::combatant::{Enemy, Player};
use crate::content::{find_enemy, find_item};

fn default_name() -> String {
    "Student".to_string()
}

fn default_level() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlayerSetup {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: i32,
    /// One point per entry, e.g. `["atk", "atk", "hp"]`.
    #[serde(default)]
    pub allocate: Vec<String>,
    /// Built-in item ids, equipped in order.
    #[serde(default)]
    pub equip: Vec<String>,
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self { name: default_name(), level: default_level(), allocate: Vec::new(), equip: Vec::new() }
    }
}

/// A scripted fight. Exactly one of `enemy` (built-in id) or `enemy_path`
/// (JSON file) names the opponent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FightConfig {
    #[serde(default)]
    pub enemy: Option<String>,
    #[serde(default)]
    pub enemy_path: Option<String>,
    #[serde(default)]
    pub player: PlayerSetup,
    #[serde(default)]
    pub story: Option<StoryFlags>,
    #[serde(default)]
    pub seed: u64,
    /// Player actions in turn order; plain attacks once exhausted.
    #[serde(default)]
    pub actions: Vec<PlayerAction>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FightSummary {
    pub enemy: String,
    pub outcome: Outcome,
    pub turns: u32,
    pub tier: Tier,
    pub player_hp_end: i32,
    pub enemy_hp_end: i32,
    pub player_attacks: u32,
    pub rewards: Rewards,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ManySummary {
    pub enemy: String,
    pub samples: u32,
    pub victories: u32,
    pub defeats: u32,
    pub fled: u32,
    pub avg_turns: f64,
}

impl ManySummary {
    pub fn win_rate(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.victories as f64 / self.samples as f64
        }
    }
}

/// Load a config from `.json`, `.yaml` or `.yml`. A relative `enemy_path`
/// is taken from the config file's directory.
pub fn load_config(path: impl AsRef<Path>) -> Result<FightConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read fight config: {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let mut cfg: FightConfig = match ext.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse fight config YAML: {}", path.display()))?,
        _ => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse fight config JSON: {}", path.display()))?,
    };
    if let (Some(enemy_path), Some(dir)) = (cfg.enemy_path.as_mut(), path.parent()) {
        if Path::new(enemy_path.as_str()).is_relative() {
            *enemy_path = dir.join(enemy_path.as_str()).to_string_lossy().into_owned();
        }
    }
    Ok(cfg)
}

pub fn load_enemy(path: impl AsRef<Path>) -> Result<Enemy> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read enemy JSON: {}", path.display()))?;
    let enemy = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse enemy JSON: {}", path.display()))?;
    Ok(enemy)
}

pub fn resolve_enemy(cfg: &FightConfig) -> Result<Enemy> {
    match (&cfg.enemy, &cfg.enemy_path) {
        (Some(id), None) => Ok(find_enemy(id)?),
        (None, Some(path)) => load_enemy(path),
        (Some(_), Some(_)) => bail!("set either `enemy` or `enemy_path`, not both"),
        (None, None) => bail!("fight config names no enemy"),
    }
}

/// Player at full health with the setup's allocations and equipment applied.
pub fn build_player(setup: &PlayerSetup) -> Result<Player> {
    let mut player = Player::at_level(&setup.name, setup.level);
    player.attributes.add_available_points(setup.allocate.len() as i32);
    for stat in &setup.allocate {
        let stat: Stat = stat.parse()?;
        player.attributes.allocate(stat)?;
    }
    for id in &setup.equip {
        let item = find_item(id)?;
        player
            .equip(item)
            .with_context(|| format!("cannot equip `{}`", id))?;
    }
    player.attributes.heal_to_full();
    Ok(player)
}

fn engine_for(cfg: &FightConfig, seed: u64) -> CombatEngine {
    let engine = CombatEngine::new(Some(seed));
    match cfg.story {
        Some(story) => engine.with_story(story),
        None => engine,
    }
}

/// Run one fight as configured and settle rewards.
pub fn simulate_fight(cfg: &FightConfig) -> Result<FightSummary> {
    let enemy = resolve_enemy(cfg)?;
    let mut player = build_player(&cfg.player)?;
    let mut engine = engine_for(cfg, cfg.seed);

    let mut script = cfg.actions.iter().cloned();
    let report = engine.fight_with(&mut player, &enemy, |_| {
        script.next().unwrap_or(PlayerAction::Attack)
    });
    let rewards = settle(report.outcome, &mut player, &enemy);

    Ok(FightSummary {
        enemy: enemy.name.clone(),
        outcome: report.outcome,
        turns: report.turns,
        tier: report.tier,
        player_hp_end: report.player_hp,
        enemy_hp_end: report.enemy_hp,
        player_attacks: report.player_attacks,
        rewards,
        log: report.log.lines().map(str::to_string).collect(),
    })
}

/// Repeat a config over seeds `seed..seed + samples`.
pub fn simulate_fight_many(cfg: &FightConfig, samples: u32) -> Result<ManySummary> {
    let enemy = resolve_enemy(cfg)?;
    let template = build_player(&cfg.player)?;

    let mut summary = ManySummary {
        enemy: enemy.name.clone(),
        samples,
        victories: 0,
        defeats: 0,
        fled: 0,
        avg_turns: 0.0,
    };
    let mut total_turns = 0u64;
    for i in 0..samples {
        let mut player = template.clone();
        let mut engine = engine_for(cfg, cfg.seed.wrapping_add(i as u64));
        let mut script = cfg.actions.iter().cloned();
        let report = engine.fight_with(&mut player, &enemy, |_| {
            script.next().unwrap_or(PlayerAction::Attack)
        });
        total_turns += report.turns as u64;
        match report.outcome {
            Outcome::Victory => summary.victories += 1,
            Outcome::Defeat => summary.defeats += 1,
            Outcome::Fled => summary.fled += 1,
        }
    }
    if samples > 0 {
        summary.avg_turns = total_turns as f64 / samples as f64;
    }
    Ok(summary)
}
