use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::{ContentPack, DungeonMap, generate_dungeon};
use tools::{DifficultyArg, generate_runtime_seed, init_tracing, load_config};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon map and print it", long_about = None)]
struct Args {
    /// Map seed; a fresh one is drawn when omitted
    #[arg(short, long)]
    seed: Option<u32>,
    /// TOML file with generation settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    rooms: Option<usize>,
    #[arg(long)]
    goal: Option<String>,
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    #[arg(long)]
    affixes: Option<usize>,
    /// Print the full map as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing("dungeon_core=info,generate=info");
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(rooms) = args.rooms {
        config = config.with_room_count(rooms);
    }
    if let Some(goal) = &args.goal {
        config = config.with_goal(goal);
    }
    if let Some(difficulty) = args.difficulty {
        config = config.with_difficulty(difficulty.into());
    }
    if let Some(affixes) = args.affixes {
        config = config.with_affix_count(affixes);
    }

    let seed = args.seed.unwrap_or_else(generate_runtime_seed);
    info!(seed, rooms = config.room_count, goal = %config.goal_type, "generating dungeon");

    let content = ContentPack::default();
    let map = generate_dungeon(&content, &config, seed)
        .with_context(|| format!("Generation failed for seed {seed}"))?;

    if args.json {
        let json = serde_json::to_string_pretty(&map).context("Failed to serialize map")?;
        println!("{json}");
    } else {
        print_summary(&map);
    }
    Ok(())
}

fn print_summary(map: &DungeonMap) {
    println!("{} ({}, level {})", map.name, map.difficulty, map.level);
    println!("{}", map.description);
    println!("Seed: {}  Fingerprint: {:016x}", map.seed, map.fingerprint());
    println!(
        "Goal: {} [{}/{}] {}",
        map.goal.kind, map.goal.current, map.goal.required, map.goal.description
    );
    for affix in &map.affixes {
        let sign = if affix.positive { '+' } else { '-' };
        println!("Affix {sign} {}: {}", affix.id(), affix.description);
    }
    for warning in &map.warnings {
        println!("Warning: {warning:?}");
    }

    println!();
    for room in map.rooms.values() {
        let neighbors: Vec<String> = room.neighbors.iter().map(ToString::to_string).collect();
        let mut flags = Vec::new();
        if room.locked {
            flags.push("locked".to_string());
        }
        if let Some(item) = &room.goal_item {
            flags.push(item.clone());
        }
        if let Some(hint) = &room.threat.hint {
            flags.push(format!("\"{hint}\""));
        }
        println!(
            "{:>4} {:<9} depth {:>2} threat {} -> [{}] {}",
            room.id.to_string(),
            format!("{:?}", room.kind),
            room.distance_from_start,
            room.threat.level,
            neighbors.join(", "),
            flags.join(" ")
        );
    }
    println!("Edges: {}  Max depth: {}", map.edge_count(), map.max_depth());
}
