//! Behavioral things
//!
//! A `Thing` backs one board cell with mutable state and per-tick behavior.
//! Subtype parameters live in the `ThingData` enum; behavior dispatch is an
//! exhaustive match over the closed kind set.

pub mod centipede;
pub mod devices;
pub mod enemies;
pub mod object;
pub mod player;
pub mod projectile;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, TickContext};
use crate::core::types::{Position, ProgramId, Step, ThingId};
use crate::entity::{Entity, EntityKind};

/// Interpreter execution state for scriptable things.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptState {
    /// Instruction pointer into the bound program. Negative means execution
    /// has ended.
    pub ip: i16,
    /// Execution is a no-op while paused.
    pub paused: bool,
}

/// Subtype-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingData {
    Player,
    Object { locked: bool },
    Scroll,
    Bullet { from_player: bool },
    Star { life: u8 },
    Lion { intelligence: u8 },
    Tiger { intelligence: u8, firing_rate: u8 },
    Bear { sensitivity: u8 },
    Ruffian { intelligence: u8, rest_rate: u8 },
    Slime { spread_rate: u8, countdown: u8 },
    Shark { intelligence: u8 },
    SpinningGun { intelligence: u8, firing_rate: u8, throws_stars: bool },
    Pusher,
    CentipedeHead { intelligence: u8, deviance: u8 },
    CentipedeSegment,
    Duplicator { rate: u8, phase: u8 },
}

impl ThingData {
    /// Default parameters for a kind, as the world-loader would produce for
    /// an unparameterized spawn.
    pub fn default_for(kind: EntityKind) -> ThingData {
        use EntityKind::*;
        match kind {
            Player => ThingData::Player,
            Object => ThingData::Object { locked: false },
            Scroll => ThingData::Scroll,
            Bullet => ThingData::Bullet { from_player: false },
            Star => ThingData::Star { life: 100 },
            Lion => ThingData::Lion { intelligence: 4 },
            Tiger => ThingData::Tiger {
                intelligence: 4,
                firing_rate: 4,
            },
            Bear => ThingData::Bear { sensitivity: 4 },
            Ruffian => ThingData::Ruffian {
                intelligence: 5,
                rest_rate: 4,
            },
            Slime => ThingData::Slime {
                spread_rate: 4,
                countdown: 0,
            },
            Shark => ThingData::Shark { intelligence: 4 },
            SpinningGun => ThingData::SpinningGun {
                intelligence: 4,
                firing_rate: 4,
                throws_stars: false,
            },
            Pusher => ThingData::Pusher,
            CentipedeHead => ThingData::CentipedeHead {
                intelligence: 4,
                deviance: 4,
            },
            CentipedeSegment => ThingData::CentipedeSegment,
            Duplicator => ThingData::Duplicator { rate: 4, phase: 0 },
            _ => ThingData::Object { locked: false },
        }
    }
}

/// A behavioral actor bound to one board cell.
#[derive(Debug, Clone)]
pub struct Thing {
    pub kind: EntityKind,
    pub pos: Position,
    /// Direction state: walk step, projectile heading, pusher direction.
    pub step: Step,
    /// 0 = never executes; otherwise executes every Nth board cycle.
    pub cycle_rate: u8,
    /// Cleared when the thing executes; reset at the start of each tick so
    /// a thing that moves ahead of the field walk runs at most once.
    pub can_exec: bool,
    /// Marked by `delete_thing`; the slot is freed by the end-of-tick
    /// garbage pass.
    pub dead: bool,
    /// What to restore at this cell when the thing leaves it.
    pub under: Entity,
    pub leader: Option<ThingId>,
    pub follower: Option<ThingId>,
    pub program: Option<ProgramId>,
    pub script: ScriptState,
    pub data: ThingData,
}

impl Thing {
    pub fn new(kind: EntityKind, pos: Position, data: ThingData) -> Thing {
        Thing {
            kind,
            pos,
            step: Step::IDLE,
            cycle_rate: default_cycle_rate(kind),
            can_exec: true,
            dead: false,
            under: *Entity::empty(),
            leader: None,
            follower: None,
            program: None,
            script: ScriptState::default(),
            data,
        }
    }
}

/// Per-kind default execution rates. Lower is faster; a thing runs on
/// cycles divisible by its rate.
fn default_cycle_rate(kind: EntityKind) -> u8 {
    use EntityKind::*;
    match kind {
        Player | Bullet | Star | Ruffian | Scroll => 1,
        Lion | Tiger | SpinningGun | CentipedeHead | CentipedeSegment | Duplicator => 2,
        Bear | Slime | Shark | Object => 3,
        Pusher => 4,
        _ => 0,
    }
}

/// Invoke one thing's behavior for this tick.
pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let Some(kind) = board.thing(id).map(|t| t.kind) else {
        return;
    };
    use EntityKind::*;
    match kind {
        Player => player::exec(board, id, ctx),
        Object => object::exec(board, id, ctx),
        Bullet | Star => projectile::exec(board, id, ctx),
        Lion | Tiger | Bear | Ruffian | Slime | Shark => enemies::exec(board, id, ctx),
        SpinningGun | Pusher | Duplicator => devices::exec(board, id, ctx),
        CentipedeHead | CentipedeSegment => centipede::exec(board, id, ctx),
        // Scrolls only act when touched.
        _ => {}
    }
}

/// A random cardinal unit step.
pub fn random_step(rng: &mut ChaCha8Rng) -> Step {
    match rng.gen_range(0..4) {
        0 => Step::new(0, -1),
        1 => Step::new(0, 1),
        2 => Step::new(1, 0),
        _ => Step::new(-1, 0),
    }
}
