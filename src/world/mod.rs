//! World orchestration
//!
//! The world owns the board list, the shared player state, the RNG, and the
//! sound queue. Per-frame pacing lives here: `update` counts down the speed
//! setting and runs a full board tick when it expires. Board transitions
//! requested during a tick are deferred and applied at the start of the
//! next one, so no board is swapped out from under its own simulation.

pub mod visibility;

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::audio::SoundQueue;
use crate::board::{Board, TickContext, TickRequests};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{
    BoardId, Direction, KeyColor, Position, Step, BOARD_HEIGHT, BOARD_WIDTH,
};
use crate::entity::BLANK_GLYPH;
use crate::script::text::ScrollModel;

/// Player-owned state shared by every board.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub health: i16,
    pub ammo: i16,
    pub gems: i16,
    pub torches: i16,
    pub score: i32,
    pub time_elapsed: i16,
    /// Remaining ticks of torchlight; 0 means no torch is lit.
    pub torch_cycles: i16,
    /// Remaining ticks of energizer invulnerability.
    pub energizer_cycles: i16,
    pub keys: AHashSet<KeyColor>,
    /// Script-visible named flags.
    pub flags: AHashSet<String>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            health: 100,
            ammo: 0,
            gems: 0,
            torches: 0,
            score: 0,
            time_elapsed: 0,
            torch_cycles: 0,
            energizer_cycles: 0,
            keys: AHashSet::new(),
            flags: AHashSet::new(),
        }
    }
}

/// One frame's worth of buffered player input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    pub light_torch: bool,
}

impl InputState {
    /// The buffered movement step. When several directions are held the
    /// vertical axis wins, up before down.
    pub fn step(&self) -> Step {
        if self.up {
            Step::new(0, -1)
        } else if self.down {
            Step::new(0, 1)
        } else if self.left {
            Step::new(-1, 0)
        } else if self.right {
            Step::new(1, 0)
        } else {
            Step::IDLE
        }
    }

    pub fn clear(&mut self) {
        *self = InputState::default();
    }
}

/// The complete game: boards, shared state, pacing, audio.
pub struct World {
    boards: Vec<Board>,
    active: BoardId,
    pub state: WorldState,
    pub config: EngineConfig,
    pub input: InputState,
    pub audio: SoundQueue,
    rng: ChaCha8Rng,
    /// Frames until the next full tick.
    countdown: u8,
    /// Board switch deferred from the previous tick.
    pending_switch: Option<Direction>,
    /// Multi-line text waiting for the outer layer to display.
    scroll: Option<ScrollModel>,
}

impl World {
    pub fn new(config: EngineConfig) -> World {
        Self::with_seed(config, rand::random())
    }

    /// A world with a fixed RNG seed, for reproducible runs and tests.
    pub fn with_seed(config: EngineConfig, seed: u64) -> World {
        World {
            boards: vec![],
            active: BoardId(0),
            state: WorldState::default(),
            config,
            input: InputState::default(),
            audio: SoundQueue::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            countdown: 0,
            pending_switch: None,
            scroll: None,
        }
    }

    pub fn add_board(&mut self, board: Board) -> BoardId {
        self.boards.push(board);
        BoardId(self.boards.len() as u16 - 1)
    }

    pub fn board(&self) -> &Board {
        &self.boards[self.active.idx()]
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.boards[self.active.idx()]
    }

    pub fn board_at_mut(&mut self, id: BoardId) -> Option<&mut Board> {
        self.boards.get_mut(id.idx())
    }

    pub fn active_board(&self) -> BoardId {
        self.active
    }

    pub fn change_active_board(&mut self, id: BoardId) -> Result<()> {
        if id.idx() >= self.boards.len() {
            return Err(EngineError::BadBoardIndex(id.idx()));
        }
        self.active = id;
        Ok(())
    }

    pub fn game_over(&self) -> bool {
        self.state.health <= 0
    }

    /// Advance one frame. Returns true when a full tick ran.
    pub fn update(&mut self) -> bool {
        if self.countdown > 0 {
            self.countdown -= 1;
            return false;
        }
        self.countdown = self.config.speed;
        self.tick();
        true
    }

    /// Run one full simulation tick on the active board.
    pub fn tick(&mut self) {
        self.audio.begin_tick();

        if let Some(direction) = self.pending_switch.take() {
            self.apply_board_switch(direction);
        }

        if self.state.energizer_cycles > 0 {
            self.state.energizer_cycles -= 1;
        }
        if self.state.torch_cycles > 0 {
            self.state.torch_cycles -= 1;
            if self.state.torch_cycles == 0 {
                tracing::debug!("torch burned out");
            }
        }
        if self.input.light_torch {
            self.light_torch();
        }

        let mut requests = TickRequests::default();
        {
            let board = &mut self.boards[self.active.idx()];
            let mut ctx = TickContext {
                state: &mut self.state,
                input: self.input,
                config: &self.config,
                rng: &mut self.rng,
                audio: &self.audio,
                requests: &mut requests,
            };
            board.exec(&mut ctx);
        }

        // World-level requests are applied after the board's own tick has
        // fully settled.
        if let Some(direction) = requests.board_switch {
            self.pending_switch = Some(direction);
        }
        if let Some(scroll) = requests.scroll {
            self.scroll = Some(scroll);
        }

        self.state.time_elapsed = self.state.time_elapsed.saturating_add(1);
        self.input.clear();
        self.audio.end_tick();
    }

    fn light_torch(&mut self) {
        if self.state.torch_cycles > 0 {
            return;
        }
        if !self.board().dark {
            return;
        }
        if self.state.torches > 0 {
            self.state.torches -= 1;
            self.state.torch_cycles = self.config.torch_cycles;
        }
    }

    /// Move the player through a board exit. The player enters the target
    /// board at the mirrored coordinate, pushing obstructions aside; a
    /// blocked entry cancels the transition.
    fn apply_board_switch(&mut self, direction: Direction) {
        let Some(next) = self.board().exits[direction.index()] else {
            return;
        };
        if next.idx() >= self.boards.len() || next == self.active {
            return;
        }
        let here = self.board().player_pos();
        let entry = match direction {
            Direction::North => Position::new(here.x, BOARD_HEIGHT - 1),
            Direction::South => Position::new(here.x, 0),
            Direction::East => Position::new(0, here.y),
            Direction::West => Position::new(BOARD_WIDTH - 1, here.y),
        };
        let step = direction.to_step();

        let mut requests = TickRequests::default();
        let enterable = {
            let board = &mut self.boards[next.idx()];
            let mut ctx = TickContext {
                state: &mut self.state,
                input: self.input,
                config: &self.config,
                rng: &mut self.rng,
                audio: &self.audio,
                requests: &mut requests,
            };
            board.can_enter(entry, step, &mut ctx)
        };
        if !enterable {
            return;
        }
        let target = &mut self.boards[next.idx()];
        if !target.has_player() {
            tracing::warn!(board = next.0, "exit leads to a board without a player");
            return;
        }
        let player = target.player();
        target.relocate_thing(player, entry);
        self.active = next;
        tracing::debug!(board = next.0, x = entry.x, y = entry.y, "board switch");
    }

    /// Take the pending multi-line text model, if a script produced one.
    pub fn take_scroll(&mut self) -> Option<ScrollModel> {
        self.scroll.take()
    }

    /// The player picked a `!label` menu line from a displayed scroll.
    pub fn scroll_link_clicked(&mut self, scroll: &ScrollModel, label: &str) {
        let source = scroll.source;
        self.board_mut().seek_thing_label(source, label);
    }

    /// Render the active board to a glyph/color grid, applying darkness.
    /// The buffer is row-major, `BOARD_WIDTH * BOARD_HEIGHT` cells.
    pub fn paint(&self) -> Vec<(u8, u8)> {
        let board = self.board();
        let dark = board.dark;
        let torch_lit = self.state.torch_cycles > 0;
        let player = if board.has_player() {
            board.player_pos()
        } else {
            Position::default()
        };
        let mut cells = Vec::with_capacity((BOARD_WIDTH * BOARD_HEIGHT) as usize);
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                let pos = Position::new(x, y);
                let entity = board.entity_at(pos);
                let visible = !dark
                    || entity.kind.visible_in_dark()
                    || (torch_lit && visibility::lit(x - player.x, y - player.y));
                if visible {
                    cells.push(entity.visual());
                } else {
                    cells.push((BLANK_GLYPH, 0x07));
                }
            }
        }
        cells
    }
}

#[cfg(test)]
pub mod test_support {
    //! A board-with-context harness for unit tests outside this module.

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{InputState, WorldState};
    use crate::audio::SoundQueue;
    use crate::board::{Board, TickContext, TickRequests};
    use crate::core::config::EngineConfig;

    /// Run `f` with a fresh empty board and a default tick context.
    pub fn with_test_ctx(f: impl FnOnce(&mut Board, &mut TickContext)) {
        let mut state = WorldState::default();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let audio = SoundQueue::new();
        let mut requests = TickRequests::default();
        let mut board = Board::new();
        let mut ctx = TickContext {
            state: &mut state,
            input: InputState::default(),
            config: &config,
            rng: &mut rng,
            audio: &audio,
            requests: &mut requests,
        };
        f(&mut board, &mut ctx);
    }
}
