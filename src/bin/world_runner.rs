//! Headless World Runner
//!
//! Runs a scripted arena world without a terminal and prints the final
//! counters as JSON. Used for deterministic soak runs and regression
//! comparisons across seeds.

use clap::Parser;
use serde::Serialize;

use gridquest::board::Board;
use gridquest::core::config::EngineConfig;
use gridquest::core::types::{Position, BOARD_HEIGHT, BOARD_WIDTH};
use gridquest::entity::{Entity, EntityKind};
use gridquest::script::ProgramBuffer;
use gridquest::world::World;

/// Headless World Runner - scripted arena runs for regression checks
#[derive(Parser, Debug)]
#[command(name = "world_runner")]
#[command(about = "Run the arena world headless and output final counters")]
struct Args {
    /// Maximum ticks before the run stops
    #[arg(long, default_value_t = 500)]
    max_ticks: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log per-tick counters to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    outcome: String,
    ticks: u32,
    health: i16,
    ammo: i16,
    gems: i16,
    torches: i16,
    score: i32,
    sound_events: usize,
    player_x: i16,
    player_y: i16,
    seed: u64,
}

fn main() {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut world = World::with_seed(EngineConfig::default(), seed);
    world.add_board(build_arena());

    let mut ticks = 0;
    let mut sound_events = 0;
    while ticks < args.max_ticks && !world.game_over() {
        world.tick();
        // Scrolls never pop in a headless run, but a script may still
        // raise one; dropping it unblocks the board.
        let _ = world.take_scroll();
        sound_events += world.audio.drain().len();
        ticks += 1;

        if args.verbose {
            eprintln!(
                "tick {:4}  health={:<4} ammo={:<3} gems={:<3} score={}",
                ticks, world.state.health, world.state.ammo, world.state.gems, world.state.score
            );
        }
    }

    let outcome = if world.game_over() { "died" } else { "survived" };
    let player = world.board().player_pos();
    let result = RunResult {
        outcome: outcome.to_string(),
        ticks,
        health: world.state.health,
        ammo: world.state.ammo,
        gems: world.state.gems,
        torches: world.state.torches,
        score: world.state.score,
        sound_events,
        player_x: player.x,
        player_y: player.y,
        seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Run Result");
            println!("==========");
            println!("Outcome: {}", result.outcome);
            println!("Ticks: {}", result.ticks);
            println!("Health: {}", result.health);
            println!("Score: {}", result.score);
            println!("Player: ({}, {})", result.player_x, result.player_y);
            println!("Seed: {}", result.seed);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(err) => eprintln!("failed to serialize result: {}", err),
            }
        }
    }
}

/// A walled arena: the idle player against a hunting pack, with a
/// quartermaster object that hands out supplies when touched.
fn build_arena() -> Board {
    let mut board = Board::new();
    for x in 0..BOARD_WIDTH {
        board.set_entity(Position::new(x, 0), *Entity::create(EntityKind::Solid, 0x0e));
        board.set_entity(
            Position::new(x, BOARD_HEIGHT - 1),
            *Entity::create(EntityKind::Solid, 0x0e),
        );
    }
    for y in 0..BOARD_HEIGHT {
        board.set_entity(Position::new(0, y), *Entity::create(EntityKind::Solid, 0x0e));
        board.set_entity(
            Position::new(BOARD_WIDTH - 1, y),
            *Entity::create(EntityKind::Solid, 0x0e),
        );
    }

    board.spawn_kind(EntityKind::Player, Position::new(10, 12), 0x1f);

    for (x, y, kind) in [
        (12, 12, EntityKind::Gem),
        (14, 12, EntityKind::Gem),
        (12, 10, EntityKind::Ammo),
    ] {
        board.set_entity(Position::new(x, y), *Entity::create(kind, 0x0b));
    }

    board.spawn_kind(EntityKind::Lion, Position::new(50, 5), 0x0c);
    board.spawn_kind(EntityKind::Lion, Position::new(50, 20), 0x0c);
    board.spawn_kind(EntityKind::Tiger, Position::new(55, 12), 0x0b);
    board.spawn_kind(EntityKind::Ruffian, Position::new(40, 3), 0x0d);

    let quartermaster = board.spawn_kind(EntityKind::Object, Position::new(11, 12), 0x0e);
    let program = board.add_program(ProgramBuffer::from_text(
        "@quartermaster\n\
         #end\n\
         :touch\n\
         #give ammo 5\n\
         #give torches 1\n\
         Take these.\n\
         #end\n",
    ));
    if let Some(id) = quartermaster {
        board.attach_program(id, program);
    }

    board
}
