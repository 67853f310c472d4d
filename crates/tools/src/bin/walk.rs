use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{
    ContentPack, Expedition, PlayerVitals, RoomId, RoomPhase, RunStatus, generate_dungeon,
};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use tools::{SimulatedCombat, init_tracing, load_config};
use tracing::debug;

/// Plays random legal moves through generated dungeons and checks run invariants each step.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u32,
    #[arg(short, long, default_value_t = 100)]
    runs: u32,
    #[arg(long, default_value_t = 500)]
    max_steps: u32,
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn choose(rng: &mut ChaCha8Rng, slice: &[RoomId]) -> RoomId {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn check_invariants(expedition: &Expedition, previous: RoomId) -> Result<()> {
    let run = expedition.run();
    let map = expedition.map();
    if run.player.hp > run.player.max_hp {
        bail!("hp {} above max {}", run.player.hp, run.player.max_hp);
    }
    if run.torches.current > run.torches.max {
        bail!("torches {} above max {}", run.torches.current, run.torches.max);
    }
    if run.history.last() != Some(&run.current_room) {
        bail!("history does not end at the current room {}", run.current_room);
    }
    if run.current_room != previous
        && !map.room(previous).is_some_and(|room| room.is_adjacent(run.current_room))
    {
        bail!("moved from {previous} to non-neighbour {}", run.current_room);
    }
    if map.room(run.current_room).is_some_and(|room| room.locked) && !run.goal.completed {
        bail!("entered locked room {} with the goal open", run.current_room);
    }
    if run.goal.current > run.goal.required && run.goal.required > 0 {
        bail!("goal progress {} beyond {}", run.goal.current, run.goal.required);
    }
    if run.status == RunStatus::Dead && run.rewards.is_some() {
        bail!("dead run was rewarded");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing("dungeon_core=warn,walk=info");
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let content = ContentPack::default();
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(args.seed));

    println!("Walking {} dungeons from seed {}...", args.runs, args.seed);
    let mut outcomes: BTreeMap<String, u32> = BTreeMap::new();

    for index in 0..args.runs {
        let map_seed = args.seed.wrapping_add(index);
        let map = generate_dungeon(&content, &config, map_seed)?;
        let player = PlayerVitals::for_level(config.player_level);
        let mut expedition = Expedition::start(map, &content, player);
        let mut combat = SimulatedCombat::new(rng.next_u64());

        let mut steps = 0;
        while !expedition.status().is_terminal() && steps < args.max_steps {
            let previous = expedition.run().current_room;
            match expedition.phase() {
                RoomPhase::Battle { .. } => {
                    expedition.resolve_battle(&mut combat)?;
                }
                RoomPhase::Event | RoomPhase::Trade if rng.next_u64() % 2 == 0 => {
                    expedition.finish_room()?;
                }
                _ => {
                    let moves = expedition.available_moves();
                    // Bias towards pressing on; bail out on a dead end or now and then.
                    if moves.is_empty() || rng.next_u64() % 50 == 0 {
                        expedition.exit()?;
                    } else {
                        expedition.move_to(choose(&mut rng, &moves))?;
                    }
                }
            }
            if let Err(error) = check_invariants(&expedition, previous) {
                bail!("invariant failed on map seed {map_seed} after {steps} steps: {error}");
            }
            steps += 1;
        }

        let status = expedition.status();
        debug!(map_seed, steps, ?status, points = expedition.run().points.total, "walk finished");
        *outcomes.entry(format!("{status:?}")).or_default() += 1;
    }

    for (status, count) in &outcomes {
        println!("{status:>10}: {count}");
    }
    println!("Walk completed successfully.");
    Ok(())
}
