//! Board ownership and per-tick simulation
//!
//! A board owns its 1500-cell field, the thing arena, and the program bank.
//! All spatial mutation (movement, pushing, interaction, deletion) goes
//! through board methods; the world only selects which board runs.

mod interact;
mod movement;

pub use movement::walkable_for;

use std::cmp::Ordering;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::audio::SoundQueue;
use crate::core::config::EngineConfig;
use crate::core::types::{
    BoardId, Direction, Position, ProgramId, Step, ThingId, Tick, FIELD_LEN,
};
use crate::entity::{Entity, EntityKind};
use crate::script::text::ScrollModel;
use crate::script::ProgramBuffer;
use crate::thing::{self, Thing, ThingData};
use crate::world::{InputState, WorldState};

/// One line of transient on-screen text with its remaining display life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMessage {
    pub text: String,
    pub life: u8,
}

/// Requests raised during a tick that only the world may act on, collected
/// here so containers being iterated are never mutated mid-tick.
#[derive(Debug, Default)]
pub struct TickRequests {
    /// The player touched a board edge; switch boards through this exit.
    pub board_switch: Option<Direction>,
    /// A script produced a multi-line text model; the outer layer should
    /// switch display modes and show it.
    pub scroll: Option<ScrollModel>,
}

/// Everything a board tick may read or mutate besides the board itself.
pub struct TickContext<'a> {
    pub state: &'a mut WorldState,
    pub input: InputState,
    pub config: &'a EngineConfig,
    pub rng: &'a mut ChaCha8Rng,
    pub audio: &'a SoundQueue,
    pub requests: &'a mut TickRequests,
}

/// One 60x25 screen of the game world.
#[derive(Debug, Clone)]
pub struct Board {
    field: Vec<Entity>,
    things: Vec<Option<Thing>>,
    programs: Vec<ProgramBuffer>,
    /// Exit board indices, indexed by `Direction`.
    pub exits: [Option<BoardId>; 4],
    pub dark: bool,
    pub message: Option<BoardMessage>,
    /// Monotonically increasing cycle counter.
    pub cycle: Tick,
    player: Option<ThingId>,
}

impl Board {
    pub fn new() -> Board {
        Board {
            field: vec![*Entity::empty(); FIELD_LEN],
            things: vec![],
            programs: vec![],
            exits: [None; 4],
            dark: false,
            message: None,
            cycle: 0,
            player: None,
        }
    }

    // === Field access ===

    /// The entity at `pos`. Out-of-range coordinates yield the shared edge
    /// sentinel.
    pub fn entity_at(&self, pos: Position) -> Entity {
        if pos.in_range() {
            self.field[pos.index()]
        } else {
            *Entity::edge()
        }
    }

    /// Write `entity` at `pos`. Out-of-range writes are silently dropped.
    pub fn set_entity(&mut self, pos: Position, entity: Entity) {
        if pos.in_range() {
            self.field[pos.index()] = entity;
        }
    }

    /// Overwrite the display glyph of the cell at `pos`.
    pub fn set_glyph(&mut self, pos: Position, glyph: u8) {
        if pos.in_range() {
            self.field[pos.index()].glyph = glyph;
        }
    }

    /// Change the kind of the cell at `pos` (and its backing thing, if any),
    /// keeping color. Used for centipede role swaps.
    pub fn set_kind(&mut self, pos: Position, kind: EntityKind) {
        if !pos.in_range() {
            return;
        }
        let cell = &mut self.field[pos.index()];
        cell.kind = kind;
        cell.glyph = kind.glyph();
        if let Some(id) = cell.thing {
            if let Some(thing) = self.things.get_mut(id.idx()).and_then(Option::as_mut) {
                thing.kind = kind;
            }
        }
    }

    // === Thing arena ===

    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(id.idx()).and_then(Option::as_ref)
    }

    pub fn thing_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.get_mut(id.idx()).and_then(Option::as_mut)
    }

    /// True if `id` names a live (not deleted) thing.
    pub fn alive(&self, id: ThingId) -> bool {
        self.thing(id).map_or(false, |t| !t.dead)
    }

    /// Ids of all live things, in arena order.
    pub fn live_things(&self) -> Vec<ThingId> {
        self.things
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                Some(t) if !t.dead => Some(ThingId(i as u32)),
                _ => None,
            })
            .collect()
    }

    /// Create a thing of `kind` at `pos`, capturing the current cell entity
    /// as its under-entity. Returns None for out-of-range positions.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Position,
        color: u8,
        data: ThingData,
    ) -> Option<ThingId> {
        if !pos.in_range() {
            return None;
        }
        let under = self.entity_at(pos);
        let mut thing = Thing::new(kind, pos, data);
        thing.under = under;

        let id = match self.things.iter().position(Option::is_none) {
            Some(slot) => {
                self.things[slot] = Some(thing);
                ThingId(slot as u32)
            }
            None => {
                self.things.push(Some(thing));
                ThingId(self.things.len() as u32 - 1)
            }
        };
        self.field[pos.index()] = Entity::with_thing(kind, color, id);
        if kind == EntityKind::Player {
            self.player = Some(id);
        }
        Some(id)
    }

    /// Spawn a kind with loader-default parameters, or place a plain
    /// flyweight entity for kinds with no behavior.
    pub fn spawn_kind(&mut self, kind: EntityKind, pos: Position, color: u8) -> Option<ThingId> {
        if kind.needs_thing() {
            self.spawn(kind, pos, color, ThingData::default_for(kind))
        } else {
            self.set_entity(pos, *Entity::create(kind, color));
            None
        }
    }

    /// Add a program to the board's bank.
    pub fn add_program(&mut self, program: ProgramBuffer) -> ProgramId {
        self.programs.push(program);
        ProgramId(self.programs.len() as u32 - 1)
    }

    pub fn program(&self, id: ProgramId) -> &ProgramBuffer {
        &self.programs[id.idx()]
    }

    pub fn program_mut(&mut self, id: ProgramId) -> &mut ProgramBuffer {
        &mut self.programs[id.idx()]
    }

    /// Bind `thing` to `program`, resetting its instruction pointer.
    pub fn attach_program(&mut self, thing: ThingId, program: ProgramId) {
        if let Some(t) = self.thing_mut(thing) {
            t.program = Some(program);
            t.script = Default::default();
        }
    }

    /// The `@` name of a scriptable thing, lowercased.
    pub fn thing_name(&self, id: ThingId) -> Option<String> {
        let pid = self.thing(id)?.program?;
        self.program(pid).name()
    }

    // === Player ===

    /// The player thing. Exactly one thing per board is the player; a board
    /// with none must never reach simulation.
    pub fn player(&self) -> ThingId {
        self.player.expect("board has no player")
    }

    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn player_pos(&self) -> Position {
        let id = self.player();
        self.thing(id).map(|t| t.pos).unwrap_or_default()
    }

    /// A cardinal unit step toward the player, with a random tiebreak when
    /// diagonal, inverted while the player is energized.
    pub fn seek_step(&self, from: Position, ctx: &mut TickContext) -> Step {
        let player = self.player_pos();
        let toward_x = match player.x.cmp(&from.x) {
            Ordering::Less => Step::new(-1, 0),
            Ordering::Greater => Step::new(1, 0),
            Ordering::Equal => Step::IDLE,
        };
        let toward_y = match player.y.cmp(&from.y) {
            Ordering::Less => Step::new(0, -1),
            Ordering::Greater => Step::new(0, 1),
            Ordering::Equal => Step::IDLE,
        };
        let step = match (toward_x.is_idle(), toward_y.is_idle()) {
            (true, _) => toward_y,
            (_, true) => toward_x,
            _ => {
                if ctx.rng.gen() {
                    toward_x
                } else {
                    toward_y
                }
            }
        };
        if ctx.state.energizer_cycles > 0 {
            step.opposite()
        } else {
            step
        }
    }

    // === Deletion ===

    /// Remove a thing from play: restore its under-entity, unlink any
    /// centipede references to it, and mark it for the end-of-tick garbage
    /// pass. The slot stays reserved until then so other things iterating
    /// mid-tick never see the id reused.
    pub fn delete_thing(&mut self, id: ThingId) {
        let Some(thing) = self.thing_mut(id) else {
            return;
        };
        if thing.dead {
            return;
        }
        thing.dead = true;
        let pos = thing.pos;
        let under = thing.under;
        if thing.kind == EntityKind::Player {
            self.player = None;
        }
        self.set_entity(pos, under);
        for slot in self.things.iter_mut().flatten() {
            if slot.leader == Some(id) {
                slot.leader = None;
            }
            if slot.follower == Some(id) {
                slot.follower = None;
            }
        }
        tracing::debug!(id = id.0, "thing deleted");
    }

    /// Replace a thing with a plain entity at its cell, without restoring
    /// its under-entity (`#become`, slime hardening).
    pub fn replace_thing_with_entity(&mut self, id: ThingId, entity: Entity) {
        let Some(thing) = self.thing_mut(id) else {
            return;
        };
        if thing.dead {
            return;
        }
        thing.dead = true;
        let pos = thing.pos;
        if thing.kind == EntityKind::Player {
            self.player = None;
        }
        for slot in self.things.iter_mut().flatten() {
            if slot.leader == Some(id) {
                slot.leader = None;
            }
            if slot.follower == Some(id) {
                slot.follower = None;
            }
        }
        self.set_entity(pos, entity);
    }

    /// Free slots of things deleted during this tick.
    fn collect_garbage(&mut self) {
        for slot in self.things.iter_mut() {
            if slot.as_ref().map_or(false, |t| t.dead) {
                *slot = None;
            }
        }
    }

    // === Messaging ===

    /// Show a one-line transient message.
    pub fn show_message(&mut self, text: impl Into<String>, ctx: &TickContext) {
        self.message = Some(BoardMessage {
            text: text.into(),
            life: ctx.config.message_cycles,
        });
    }

    /// Broadcast a label to scriptable things. "ALL" matches everyone,
    /// "OTHERS" everyone but the sender, anything else matches `@` names
    /// case-insensitively. Matching things seek the label and unpause.
    pub fn send_label(&mut self, to: &str, label: &str, from: Option<ThingId>) {
        for id in self.live_things() {
            let Some(thing) = self.thing(id) else { continue };
            if thing.program.is_none() {
                continue;
            }
            // Locked objects ignore labels sent by anything but themselves.
            if let ThingData::Object { locked: true } = thing.data {
                if from != Some(id) {
                    continue;
                }
            }
            let matches = if to.eq_ignore_ascii_case("all") {
                true
            } else if to.eq_ignore_ascii_case("others") {
                from != Some(id)
            } else {
                self.thing_name(id).as_deref() == Some(&to.to_ascii_lowercase()[..])
            };
            if matches {
                self.seek_thing_label(id, label);
            }
        }
    }

    /// Jump a thing's instruction pointer to `:label` and unpause it. On
    /// failure nothing changes (the thing may remain paused).
    pub fn seek_thing_label(&mut self, id: ThingId, label: &str) -> bool {
        let Some(pid) = self.thing(id).and_then(|t| t.program) else {
            return false;
        };
        match self.program(pid).seek_label(label) {
            Some(ip) => {
                if let Some(thing) = self.thing_mut(id) {
                    thing.script.ip = ip;
                    thing.script.paused = false;
                }
                true
            }
            None => false,
        }
    }

    // === Tick ===

    /// Run one simulation cycle: walk every cell, invoking the behavior of
    /// any thing found there (gated by its cycle rate), then advance the
    /// cycle counter, age the message line, and sweep deferred deletions.
    pub fn exec(&mut self, ctx: &mut TickContext) {
        for thing in self.things.iter_mut().flatten() {
            if !thing.dead {
                thing.can_exec = true;
            }
        }

        for index in 0..FIELD_LEN {
            let Some(id) = self.field[index].thing else {
                continue;
            };
            let gate = match self.thing(id) {
                Some(t) if !t.dead && t.can_exec && t.cycle_rate > 0 => {
                    self.cycle % t.cycle_rate as Tick == 0
                }
                _ => false,
            };
            if !gate {
                continue;
            }
            if let Some(t) = self.thing_mut(id) {
                t.can_exec = false;
            }
            thing::exec(self, id, ctx);
        }

        self.cycle += 1;
        if let Some(message) = &mut self.message {
            message.life = message.life.saturating_sub(1);
            if message.life == 0 {
                self.message = None;
            }
        }
        self.collect_garbage();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_support::with_test_ctx;

    #[test]
    fn out_of_range_reads_yield_the_edge_sentinel() {
        let board = Board::new();
        assert_eq!(board.entity_at(Position::new(-1, 0)).kind, EntityKind::EdgeOfBoard);
        assert_eq!(board.entity_at(Position::new(60, 24)).kind, EntityKind::EdgeOfBoard);
        assert_eq!(board.entity_at(Position::new(0, 0)).kind, EntityKind::Empty);
    }

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut board = Board::new();
        board.set_entity(Position::new(99, 99), *Entity::create(EntityKind::Solid, 0x0e));
        assert_eq!(board.entity_at(Position::new(59, 24)).kind, EntityKind::Empty);
    }

    #[test]
    fn spawn_records_under_entity_and_thing_ref() {
        let mut board = Board::new();
        let pos = Position::new(5, 5);
        board.set_entity(pos, *Entity::create(EntityKind::Fake, 0x07));
        let id = board.spawn(EntityKind::Lion, pos, 0x0c, ThingData::default_for(EntityKind::Lion));
        let id = id.unwrap();
        assert_eq!(board.entity_at(pos).thing, Some(id));
        assert_eq!(board.thing(id).unwrap().under.kind, EntityKind::Fake);
    }

    #[test]
    fn deletion_is_deferred_to_the_garbage_pass() {
        with_test_ctx(|board, ctx| {
            let pos = Position::new(3, 3);
            let id = board.spawn_kind(EntityKind::Lion, pos, 0x0c).unwrap();
            board.delete_thing(id);
            // Slot still reserved: the id resolves, the cell is restored.
            assert!(board.thing(id).is_some());
            assert!(!board.alive(id));
            assert_eq!(board.entity_at(pos).kind, EntityKind::Empty);
            board.exec(ctx);
            assert!(board.thing(id).is_none());
        });
    }

    #[test]
    fn cycle_rate_gates_execution() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(10, 10), 0x1f);
            let id = board
                .spawn_kind(EntityKind::Duplicator, Position::new(2, 2), 0x0f)
                .unwrap();
            if let Some(t) = board.thing_mut(id) {
                t.cycle_rate = 3;
                t.data = ThingData::Duplicator { rate: 9, phase: 0 };
            }
            let phase_of = |board: &Board| match board.thing(id).unwrap().data {
                ThingData::Duplicator { phase, .. } => phase,
                _ => unreachable!(),
            };
            board.exec(ctx); // cycle 0: runs
            assert_eq!(phase_of(board), 1);
            board.exec(ctx); // cycle 1: gated
            board.exec(ctx); // cycle 2: gated
            assert_eq!(phase_of(board), 1);
            board.exec(ctx); // cycle 3: runs
            assert_eq!(phase_of(board), 2);
        });
    }

    #[test]
    fn send_label_matches_all_others_and_names() {
        let mut board = Board::new();
        board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
        let text = "@alpha\n#end\n:hit\n#die\n";
        let a = board.spawn_kind(EntityKind::Object, Position::new(3, 3), 0x0e).unwrap();
        let pa = board.add_program(ProgramBuffer::from_text(text));
        board.attach_program(a, pa);
        let b = board.spawn_kind(EntityKind::Object, Position::new(4, 4), 0x0e).unwrap();
        let pb = board.add_program(ProgramBuffer::from_text("@beta\n#end\n:hit\n#die\n"));
        board.attach_program(b, pb);

        board.send_label("ALPHA", "hit", Some(b));
        assert_eq!(board.thing(a).unwrap().script.ip, 12);
        assert_eq!(board.thing(b).unwrap().script.ip, 0);

        board.send_label("others", "hit", Some(a));
        assert_eq!(board.thing(b).unwrap().script.ip, 11);
    }
}
