use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use hx_engine::api::{self, FightConfig, FightSummary, PlayerSetup};
use hx_engine::content::{builtin_enemies, builtin_items};
use hx_engine::{difficulty_tier, flee_chance, hit_chance, percent_of, PlayerAction, StoryFlags};
use std::path::PathBuf;

#[derive(Args)]
struct PlayerArgs {
    /// Player display name
    #[arg(long, default_value = "Student")]
    name: String,
    /// Player level (1-99)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..=99))]
    level: i32,
    /// Built-in item id to equip (repeatable)
    #[arg(long)]
    equip: Vec<String>,
    /// Stat to put one point into: hp | atk | def | spd (repeatable)
    #[arg(long)]
    allocate: Vec<String>,
    /// Story keys obtained (0-3); enables the difficulty tier
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    keys: Option<u8>,
}

impl PlayerArgs {
    fn setup(&self) -> PlayerSetup {
        PlayerSetup {
            name: self.name.clone(),
            level: self.level,
            allocate: self.allocate.clone(),
            equip: self.equip.clone(),
        }
    }

    fn story(&self) -> Option<StoryFlags> {
        self.keys.map(|n| StoryFlags { key_i: n >= 1, key_ii: n >= 2, key_iii: n >= 3 })
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Fight one enemy and print the combat log
    Fight {
        /// Built-in enemy id
        #[arg(long, conflicts_with = "enemy_file")]
        enemy: Option<String>,
        /// Enemy JSON file
        #[arg(long)]
        enemy_file: Option<PathBuf>,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Scripted action: attack | defend | flee | skill:<id> (repeatable)
        #[arg(long = "action", value_parser = parse_action)]
        actions: Vec<PlayerAction>,
        #[command(flatten)]
        player: PlayerArgs,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a fight described by a JSON or YAML config
    Run {
        /// Path to the fight config
        #[arg(long)]
        config: PathBuf,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the difficulty tier a player would fight at
    Tier {
        #[command(flatten)]
        player: PlayerArgs,
    },
    /// Hit and flee odds for two speed values
    Odds {
        #[arg(long)]
        attacker_spd: i32,
        #[arg(long)]
        defender_spd: i32,
    },
    /// List built-in enemies
    Enemies,
    /// List built-in items
    Items,
}

#[derive(Parser)]
#[command(name = "hx-cli")]
#[command(about = "Campus combat engine harness")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn parse_action(s: &str) -> Result<PlayerAction, String> {
    let lowered = s.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "attack" => Ok(PlayerAction::Attack),
        "defend" => Ok(PlayerAction::Defend),
        "flee" => Ok(PlayerAction::Flee),
        other => match other.strip_prefix("skill:") {
            Some(id) if !id.is_empty() => Ok(PlayerAction::Skill(id.to_string())),
            _ => Err(format!("unknown action `{}` (attack, defend, flee, skill:<id>)", s)),
        },
    }
}

fn print_summary(summary: &FightSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    for line in &summary.log {
        println!("{}", line);
    }
    println!(
        "outcome={} turns={} hp={} xp={} coins={}",
        format!("{:?}", summary.outcome).to_lowercase(),
        summary.turns,
        summary.player_hp_end,
        summary.rewards.xp,
        summary.rewards.coins
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    hx_engine::logging::init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Fight { enemy, enemy_file, seed, actions, player, json } => {
            if enemy.is_none() && enemy_file.is_none() {
                bail!("pass --enemy <id> or --enemy-file <path>");
            }
            let cfg = FightConfig {
                enemy,
                enemy_path: enemy_file.map(|p| p.to_string_lossy().into_owned()),
                player: player.setup(),
                story: player.story(),
                seed,
                actions,
            };
            let summary = api::simulate_fight(&cfg)?;
            print_summary(&summary, json)?;
        }
        Cmd::Run { config, json } => {
            let cfg = api::load_config(&config)?;
            let summary = api::simulate_fight(&cfg)
                .with_context(|| format!("fight from {} failed", config.display()))?;
            print_summary(&summary, json)?;
        }
        Cmd::Tier { player } => {
            let built = api::build_player(&player.setup())?;
            let story = player.story();
            let tier = difficulty_tier(&built, story.as_ref());
            println!(
                "tier={} ({:?}) level={} quality={}",
                tier,
                tier,
                built.level,
                built.equipment.quality_score()
            );
        }
        Cmd::Odds { attacker_spd, defender_spd } => {
            println!(
                "hit={}% flee={}%",
                hit_chance(attacker_spd, defender_spd),
                percent_of(flee_chance(attacker_spd, defender_spd))
            );
        }
        Cmd::Enemies => {
            for (id, enemy) in builtin_enemies()? {
                println!("{:<28} L{:<3} {}", id, enemy.level(), enemy.name);
            }
        }
        Cmd::Items => {
            for (id, item) in builtin_items()? {
                let slot = item
                    .equip_kind
                    .map(|k| format!("{:?}", k).to_lowercase())
                    .unwrap_or_else(|| "-".to_string());
                let kind = format!("{:?}", item.kind).to_lowercase();
                println!("{:<20} {:<10} {:<10} {}", id, kind, slot, item.name);
            }
        }
    }
    Ok(())
}
