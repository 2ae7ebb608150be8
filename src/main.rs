//! Gridquest entry point: builds a demo world and runs the terminal loop.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;

use gridquest::board::Board;
use gridquest::core::config::EngineConfig;
use gridquest::core::error::Result;
use gridquest::core::types::{Direction, Position, BOARD_HEIGHT, BOARD_WIDTH};
use gridquest::entity::{Entity, EntityKind};
use gridquest::render::terminal::{Control, TerminalRenderer};
use gridquest::script::ProgramBuffer;
use gridquest::thing::centipede;
use gridquest::world::World;

/// Tile-based adventure engine with an embedded scripting language.
#[derive(Parser, Debug)]
#[command(name = "gridquest")]
#[command(about = "Run the demo world in the terminal")]
struct Args {
    /// Engine config TOML; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds per frame.
    #[arg(long, default_value_t = 30)]
    frame_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridquest=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let mut world = match args.seed {
        Some(seed) => World::with_seed(config, seed),
        None => World::new(config),
    };
    build_demo_world(&mut world);

    let mut renderer = TerminalRenderer::new()?;
    loop {
        if renderer.pump_input(&mut world.input)? == Control::Quit {
            break;
        }
        world.update();
        if let Some(scroll) = world.take_scroll() {
            if let Some(label) = renderer.show_scroll(&scroll)? {
                world.scroll_link_clicked(&scroll, &label);
            }
        }
        renderer.draw(&world)?;
        if world.game_over() {
            tracing::info!(score = world.state.score, "game over");
            break;
        }
        thread::sleep(Duration::from_millis(args.frame_ms));
    }
    Ok(())
}

/// Two small boards showing off most of the engine.
fn build_demo_world(world: &mut World) {
    let mut first = Board::new();
    for x in 0..BOARD_WIDTH {
        first.set_entity(Position::new(x, 0), *Entity::create(EntityKind::Normal, 0x0e));
        first.set_entity(
            Position::new(x, BOARD_HEIGHT - 1),
            *Entity::create(EntityKind::Normal, 0x0e),
        );
    }
    for y in 0..BOARD_HEIGHT {
        first.set_entity(Position::new(0, y), *Entity::create(EntityKind::Normal, 0x0e));
    }
    first.spawn_kind(EntityKind::Player, Position::new(10, 12), 0x1f);

    for (x, y, kind, color) in [
        (15, 8, EntityKind::Ammo, 0x03),
        (16, 8, EntityKind::Ammo, 0x03),
        (20, 10, EntityKind::Gem, 0x0b),
        (21, 10, EntityKind::Gem, 0x0d),
        (25, 15, EntityKind::Torch, 0x06),
        (30, 5, EntityKind::Energizer, 0x05),
        (18, 18, EntityKind::Boulder, 0x0e),
        (19, 18, EntityKind::Boulder, 0x0e),
        (24, 4, EntityKind::Key, 0x0c),
        (40, 12, EntityKind::Door, 0x4f),
        (33, 20, EntityKind::SliderEW, 0x0f),
    ] {
        first.set_entity(Position::new(x, y), *Entity::create(kind, color));
    }
    for y in 3..9 {
        first.set_entity(Position::new(45, y), *Entity::create(EntityKind::Water, 0x1f));
    }
    for x in 48..54 {
        first.set_entity(Position::new(x, 17), *Entity::create(EntityKind::Forest, 0x20));
    }

    first.spawn_kind(EntityKind::Lion, Position::new(50, 8), 0x0c);
    first.spawn_kind(EntityKind::Tiger, Position::new(52, 20), 0x0b);
    first.spawn_kind(EntityKind::Bear, Position::new(35, 22), 0x06);
    first.spawn_kind(EntityKind::Shark, Position::new(45, 5), 0x17);

    let chain = [
        Position::new(28, 12),
        Position::new(29, 12),
        Position::new(30, 12),
    ];
    let head = first.spawn_kind(EntityKind::CentipedeHead, chain[0], 0x09);
    let mut leader = head;
    for &pos in &chain[1..] {
        let seg = first.spawn_kind(EntityKind::CentipedeSegment, pos, 0x09);
        if let (Some(l), Some(s)) = (leader, seg) {
            centipede::link(&mut first, l, s);
        }
        leader = seg;
    }

    let guide = first.spawn_kind(EntityKind::Object, Position::new(12, 10), 0x0e);
    let program = first.add_program(ProgramBuffer::from_text(
        "@guide\n\
         #end\n\
         :touch\n\
         $Welcome to Gridquest\n\
         \n\
         Arrows move, shift-arrows shoot,\n\
         T lights a torch, Q quits.\n\
         !bye;Goodbye\n\
         #end\n\
         :bye\n\
         Safe travels!\n\
         #end\n",
    ));
    if let Some(id) = guide {
        first.attach_program(id, program);
    }

    let mut second = Board::new();
    second.dark = true;
    second.spawn_kind(EntityKind::Player, Position::new(2, 12), 0x1f);
    second.spawn_kind(EntityKind::SpinningGun, Position::new(30, 12), 0x0f);
    for y in 8..17 {
        second.set_entity(Position::new(20, y), *Entity::create(EntityKind::Breakable, 0x0e));
    }
    second.spawn_kind(EntityKind::Ruffian, Position::new(45, 12), 0x0d);

    let a = world.add_board(first);
    let b = world.add_board(second);
    if let Some(board) = world.board_at_mut(a) {
        board.exits[Direction::East.index()] = Some(b);
    }
    if let Some(board) = world.board_at_mut(b) {
        board.exits[Direction::West.index()] = Some(a);
    }
}
