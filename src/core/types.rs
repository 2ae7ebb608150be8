//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Board width in cells.
pub const BOARD_WIDTH: i16 = 60;
/// Board height in cells.
pub const BOARD_HEIGHT: i16 = 25;
/// Total number of cells in a board field.
pub const FIELD_LEN: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Simulation tick counter.
pub type Tick = u64;

/// Index of a `Thing` in a board's thing arena.
///
/// Ids are stable for the lifetime of the thing; slots are only reused after
/// the end-of-tick garbage pass has freed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThingId(pub u32);

impl ThingId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Index of a program buffer in a board's program bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub u32);

impl ProgramId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Index of a board within the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardId(pub u16);

impl BoardId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A cell coordinate on a board. May be out of range; lookups coerce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// True if this position addresses a real cell.
    #[inline]
    pub fn in_range(self) -> bool {
        self.x >= 0 && self.x < BOARD_WIDTH && self.y >= 0 && self.y < BOARD_HEIGHT
    }

    /// Row-major field index. Only meaningful when `in_range`.
    #[inline]
    pub fn index(self) -> usize {
        self.y as usize * BOARD_WIDTH as usize + self.x as usize
    }

    #[inline]
    pub fn offset(self, step: Step) -> Position {
        Position::new(self.x + step.dx, self.y + step.dy)
    }
}

/// A movement delta. The movement protocol only accepts cardinal unit steps,
/// but scripts and AI state may hold any value (including zero for "idle").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub dx: i16,
    pub dy: i16,
}

impl Step {
    pub const IDLE: Step = Step { dx: 0, dy: 0 };

    pub fn new(dx: i16, dy: i16) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// True for exactly one cell of movement along one axis.
    #[inline]
    pub fn is_cardinal(self) -> bool {
        (self.dx.abs() == 1 && self.dy == 0) || (self.dx == 0 && self.dy.abs() == 1)
    }

    pub fn opposite(self) -> Step {
        Step::new(-self.dx, -self.dy)
    }

    /// Quarter turn clockwise (screen coordinates, y grows downward).
    pub fn clockwise(self) -> Step {
        Step::new(-self.dy, self.dx)
    }

    /// Quarter turn counter-clockwise.
    pub fn counterwise(self) -> Step {
        Step::new(self.dy, -self.dx)
    }
}

/// The four exits of a board, in the order they are stored on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn to_step(self) -> Step {
        match self {
            Direction::North => Step::new(0, -1),
            Direction::South => Step::new(0, 1),
            Direction::East => Step::new(1, 0),
            Direction::West => Step::new(-1, 0),
        }
    }

    /// The cardinal direction of a unit step, if it has one.
    pub fn from_step(step: Step) -> Option<Direction> {
        match (step.dx, step.dy) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The seven door-key colors, encoded in the low color nibble as 1..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    Blue,
    Green,
    Cyan,
    Red,
    Purple,
    Yellow,
    White,
}

impl KeyColor {
    /// Key color from a color nibble (1..=7). Out-of-range values coerce to
    /// the nearest valid color, matching the tolerant original format.
    pub fn from_nibble(nibble: u8) -> KeyColor {
        match nibble {
            0 | 1 => KeyColor::Blue,
            2 => KeyColor::Green,
            3 => KeyColor::Cyan,
            4 => KeyColor::Red,
            5 => KeyColor::Purple,
            6 => KeyColor::Yellow,
            _ => KeyColor::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyColor::Blue => "blue",
            KeyColor::Green => "green",
            KeyColor::Cyan => "cyan",
            KeyColor::Red => "red",
            KeyColor::Purple => "purple",
            KeyColor::Yellow => "yellow",
            KeyColor::White => "white",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_steps_are_recognized() {
        assert!(Step::new(1, 0).is_cardinal());
        assert!(Step::new(0, -1).is_cardinal());
        assert!(!Step::new(1, 1).is_cardinal());
        assert!(!Step::new(0, 0).is_cardinal());
        assert!(!Step::new(2, 0).is_cardinal());
    }

    #[test]
    fn rotations_cycle() {
        let east = Step::new(1, 0);
        assert_eq!(east.clockwise(), Step::new(0, 1));
        assert_eq!(east.clockwise().clockwise(), east.opposite());
        assert_eq!(east.counterwise(), Step::new(0, -1));
    }

    #[test]
    fn out_of_range_positions() {
        assert!(Position::new(0, 0).in_range());
        assert!(Position::new(59, 24).in_range());
        assert!(!Position::new(60, 0).in_range());
        assert!(!Position::new(0, -1).in_range());
    }
}
