//! Mobile motion demo entry point.
//!
//! Drives a [`MobileEngine`] without a server: a local player walks a fixed
//! loop while NPCs wander randomly. At the end the snapshots of every mobile
//! are printed, as a table or as JSON.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 200 --mobiles 8 --json
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use mobile_motion::components::direction::{Compass, Direction};
use mobile_motion::components::equipment::Layer;
use mobile_motion::components::mobile::Serial;
use mobile_motion::components::tileposition::TilePosition;
use mobile_motion::engine::{MobileEngine, MobileSnapshot};
use mobile_motion::resources::engineconfig::EngineConfig;

/// Player loop: a square walked clockwise.
const PLAYER_LOOP: [Compass; 4] = [Compass::East, Compass::South, Compass::West, Compass::North];
const PLAYER_LEG: usize = 3;
const PLAYER_SERIAL: Serial = Serial(0x0000_0001);
const MOUNT_SERIAL: Serial = Serial(0x4000_0001);

/// Mobile motion demo
#[derive(Parser)]
#[command(version, about = "Simulates wandering mobiles and prints their render state.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 500)]
    ticks: u32,

    /// Milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Number of wandering NPCs.
    #[arg(long, default_value_t = 4)]
    mobiles: u32,

    /// Seed for the wandering NPCs.
    #[arg(long)]
    seed: Option<u64>,

    /// Print snapshots as JSON.
    #[arg(long)]
    json: bool,
}

fn offset_of(compass: Compass) -> (i32, i32) {
    match compass {
        Compass::North => (0, -1),
        Compass::NorthEast => (1, -1),
        Compass::East => (1, 0),
        Compass::SouthEast => (1, 1),
        Compass::South => (0, 1),
        Compass::SouthWest => (-1, 1),
        Compass::West => (-1, 0),
        Compass::NorthWest => (-1, -1),
    }
}

struct Walker {
    serial: Serial,
    /// Tile the last accepted step leads to.
    target: TilePosition,
}

fn step_towards(
    engine: &mut MobileEngine,
    walker: &mut Walker,
    compass: Compass,
    run: bool,
) -> bool {
    let Some(entity) = engine.entity_for(walker.serial) else {
        return false;
    };
    let (dx, dy) = offset_of(compass);
    let next = TilePosition::new(walker.target.x + dx, walker.target.y + dy, walker.target.z);
    let accepted = engine.enqueue_step(entity, next, Direction::new(compass), run);
    if accepted {
        walker.target = next;
    }
    accepted
}

fn print_table(snapshots: &[MobileSnapshot]) {
    println!(
        "{:>10} {:>6} {:>12} {:>10} {:>14} {:>5} {:>5} {:>4} {:>4}",
        "serial", "body", "tile", "facing", "offset", "group", "frame", "walk", "run"
    );
    for s in snapshots {
        let facing = s
            .direction
            .compass()
            .map(|c| format!("{:?}", c))
            .unwrap_or_else(|| "-".to_string());
        let group = s
            .animation_group
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>#10x} {:>6} {:>12} {:>10} {:>14} {:>5} {:>5} {:>4} {:>4}",
            s.serial.0,
            s.graphic,
            format!("({},{},{})", s.position.x, s.position.y, s.position.z),
            facing,
            format!("({},{},{})", s.offset.x, s.offset.y, s.offset.z),
            group,
            s.anim_index,
            s.is_walking,
            s.is_running
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    if cli.config.is_some()
        && let Err(e) = config.load_from_file()
    {
        warn!("{}, using defaults", e);
    }

    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let mut engine = MobileEngine::new(config);

    let player = engine.spawn_mobile(
        PLAYER_SERIAL,
        0x0190,
        TilePosition::new(100, 100, 0),
        Direction::new(Compass::East),
    );
    engine.set_local_player(player);
    engine.equip(player, Layer::Mount, MOUNT_SERIAL);
    let mut player_walker = Walker {
        serial: PLAYER_SERIAL,
        target: TilePosition::new(100, 100, 0),
    };

    let mut npcs: Vec<Walker> = (0..cli.mobiles)
        .map(|i| {
            let serial = Serial(0x0000_1000 + i);
            let target = TilePosition::new(90 + rng.i32(0..20), 90 + rng.i32(0..20), 0);
            let graphic = match i % 3 {
                0 => 0x0191,
                1 => 0x00D9,
                _ => 0x0009,
            };
            let facing = Direction::new(Compass::ALL[rng.usize(0..Compass::ALL.len())]);
            engine.spawn_mobile(serial, graphic, target, facing);
            Walker { serial, target }
        })
        .collect();

    info!(
        "simulating {} ticks of {} ms with {} npcs",
        cli.ticks,
        cli.tick_ms,
        npcs.len()
    );

    let mut player_steps = 0usize;
    for _ in 0..cli.ticks {
        let leg = PLAYER_LOOP[(player_steps / PLAYER_LEG) % PLAYER_LOOP.len()];
        if step_towards(&mut engine, &mut player_walker, leg, true) {
            player_steps += 1;
        }

        for npc in npcs.iter_mut() {
            if rng.u8(0..10) == 0 {
                let compass = Compass::ALL[rng.usize(0..Compass::ALL.len())];
                step_towards(&mut engine, npc, compass, rng.bool());
            }
        }

        engine.advance_one_tick(cli.tick_ms);
    }

    let view = engine.view_center();
    info!(
        "finished at tick {}, view centered on ({}, {}) after {} recenters",
        engine.now(),
        view.x,
        view.y,
        view.recenters
    );

    let snapshots = engine.snapshots();
    if cli.json {
        match serde_json::to_string_pretty(&snapshots) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing snapshots: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_table(&snapshots);
    }
}
