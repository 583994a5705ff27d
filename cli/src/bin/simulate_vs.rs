use anyhow::Context;
use clap::Parser;
use encoding_rs::Encoding;
use hx_engine::api::{build_player, PlayerSetup};
use hx_engine::content::find_enemy;
use hx_engine::{CombatEngine, CombatEvent, Enemy, Outcome, PlayerAction, Side, StoryFlags};
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: many fights vs one enemy")]
struct Args {
    /// Built-in enemy id
    #[arg(long, conflicts_with = "enemy_file", required_unless_present = "enemy_file")]
    enemy: Option<String>,

    /// Enemy JSON file (UTF-8, or UTF-16 with BOM)
    #[arg(long)]
    enemy_file: Option<PathBuf>,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on turns per trial
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Player level (1-99)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..=99))]
    level: i32,

    /// Built-in item id to equip (repeatable)
    #[arg(long)]
    equip: Vec<String>,

    /// Story keys obtained (0-3); enables the difficulty tier
    #[arg(long)]
    keys: Option<u8>,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_enemy(args: &Args) -> anyhow::Result<Enemy> {
    match (&args.enemy, &args.enemy_file) {
        (Some(id), _) => Ok(find_enemy(id)?),
        (None, Some(path)) => {
            let text = read_text_auto(path)?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse enemy JSON: {}", path.display()))
        }
        (None, None) => anyhow::bail!("pass --enemy <id> or --enemy-file <path>"),
    }
}

fn median(sorted: &[u32]) -> u32 {
    if sorted.is_empty() {
        return 0;
    }
    let m = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[m]
    } else {
        (sorted[m - 1] + sorted[m]) / 2
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    hx_engine::logging::init_tracing(0);

    let enemy = load_enemy(&args)?;
    let setup = PlayerSetup {
        level: args.level,
        equip: args.equip.clone(),
        ..PlayerSetup::default()
    };
    let template = build_player(&setup)?;
    let story = args
        .keys
        .map(|n| StoryFlags { key_i: n >= 1, key_ii: n >= 2, key_iii: n >= 3 });

    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut timeouts = 0u32;
    let mut hit_count = 0u32;
    let mut miss_count = 0u32;
    let mut dmg_total_on_hits = 0i64;
    let mut win_turns: Vec<u32> = Vec::with_capacity(args.trials as usize);

    for i in 0..args.trials {
        let mut player = template.clone();
        let engine = CombatEngine::new(Some(args.seed.wrapping_add(i as u64)));
        let mut engine = match story {
            Some(story) => engine.with_story(story),
            None => engine,
        };

        let mut enc = engine.start(&mut player, &enemy);
        while !enc.is_over() && enc.turn < args.max_turns {
            engine.advance_one_turn(&mut enc, &mut player, &PlayerAction::Attack);
        }

        for event in &enc.events {
            match event {
                CombatEvent::AttackHit { attacker: Side::Player, damage, .. } => {
                    hit_count += 1;
                    dmg_total_on_hits += *damage as i64;
                }
                CombatEvent::AttackMissed { attacker: Side::Player, .. } => miss_count += 1,
                _ => {}
            }
        }

        match enc.outcome {
            Some(Outcome::Victory) => {
                wins += 1;
                win_turns.push(enc.turn);
            }
            Some(Outcome::Defeat) => losses += 1,
            Some(Outcome::Fled) | None => timeouts += 1,
        }
    }

    win_turns.sort_unstable();
    let trials_f = args.trials.max(1) as f64;
    let hit_rate = if hit_count + miss_count == 0 {
        0.0
    } else {
        hit_count as f64 / (hit_count + miss_count) as f64
    };
    let avg_dmg_per_hit = if hit_count == 0 {
        0.0
    } else {
        dmg_total_on_hits as f64 / hit_count as f64
    };
    let avg_turns = if win_turns.is_empty() {
        0.0
    } else {
        win_turns.iter().map(|&t| t as u64).sum::<u64>() as f64 / win_turns.len() as f64
    };

    println!("simulate-vs results");
    println!("-------------------");
    println!("trials:             {}", args.trials);
    println!(
        "enemy:              {} (L{}, HP {}, ATK {}, DEF {}, SPD {})",
        enemy.name,
        enemy.level(),
        enemy.attributes.max_hp,
        enemy.attributes.atk,
        enemy.attributes.def,
        enemy.attributes.spd
    );
    println!(
        "player:             L{} (HP {}, ATK {}, DEF {}, SPD {})",
        template.level,
        template.attributes.max_hp,
        template.attributes.atk,
        template.attributes.def,
        template.attributes.spd
    );
    println!();
    println!("win rate:           {:.1}%", wins as f64 / trials_f * 100.0);
    println!("loss rate:          {:.1}%", losses as f64 / trials_f * 100.0);
    println!("timeouts:           {}", timeouts);
    println!("hit rate:           {:.1}%", hit_rate * 100.0);
    println!("avg dmg per hit:    {:.2}", avg_dmg_per_hit);
    println!("avg turns (wins):   {:.2}", avg_turns);
    println!("median turns:       {}", median(&win_turns));

    Ok(())
}
