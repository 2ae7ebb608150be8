//! Entity kinds and their static per-kind attributes
//!
//! The kind set is closed: movement eligibility, glyphs and scoring are
//! plain exhaustive matches rather than per-kind virtual dispatch.

use serde::{Deserialize, Serialize};

use crate::core::types::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Empty,
    /// Sentinel returned for any out-of-range coordinate query.
    EdgeOfBoard,
    Player,
    Ammo,
    Torch,
    Gem,
    Key,
    Door,
    Scroll,
    Energizer,
    Solid,
    Normal,
    Breakable,
    Boulder,
    SliderNS,
    SliderEW,
    Fake,
    Invisible,
    Water,
    Forest,
    Object,
    Bullet,
    Star,
    Lion,
    Tiger,
    Bear,
    Ruffian,
    Slime,
    Shark,
    SpinningGun,
    Pusher,
    CentipedeHead,
    CentipedeSegment,
    Duplicator,
    TextBlue,
    TextGreen,
    TextCyan,
    TextRed,
    TextPurple,
    TextYellow,
    TextWhite,
}

impl EntityKind {
    /// The canonical display glyph for this kind. Kinds with animated or
    /// parameterized glyphs (objects, pushers, guns) start from this value
    /// and mutate the cell's stored glyph afterwards.
    pub fn glyph(self) -> u8 {
        use EntityKind::*;
        match self {
            Empty => 32,
            EdgeOfBoard => 32,
            Player => 2,
            Ammo => 132,
            Torch => 157,
            Gem => 4,
            Key => 12,
            Door => 10,
            Scroll => 232,
            Energizer => 127,
            Solid => 219,
            Normal => 178,
            Breakable => 177,
            Boulder => 254,
            SliderNS => 18,
            SliderEW => 29,
            Fake => 178,
            Invisible => 176,
            Water => 176,
            Forest => 176,
            Object => 1,
            Bullet => 248,
            Star => 47,
            Lion => 234,
            Tiger => 227,
            Bear => 153,
            Ruffian => 5,
            Slime => 42,
            Shark => 94,
            SpinningGun => 24,
            Pusher => 16,
            CentipedeHead => 233,
            CentipedeSegment => 79,
            Duplicator => 250,
            // Text kinds display the character stored in their color byte;
            // the glyph field is unused.
            TextBlue | TextGreen | TextCyan | TextRed | TextPurple | TextYellow | TextWhite => 0,
        }
    }

    /// Things can stand on these.
    pub fn is_floor(self) -> bool {
        matches!(self, EntityKind::Empty | EntityKind::Fake)
    }

    /// Projectiles (and sharks) can pass through these.
    pub fn is_swimmable(self) -> bool {
        matches!(self, EntityKind::Water)
    }

    /// Whether this kind may be shifted one cell along `step` by a pusher.
    /// Sliders move along one axis only.
    pub fn is_pushable(self, step: Step) -> bool {
        use EntityKind::*;
        match self {
            Player | Boulder | Object => true,
            SliderNS => step.dy != 0,
            SliderEW => step.dx != 0,
            _ => false,
        }
    }

    /// Whether things of this kind shove pushable occupants out of their way
    /// when moving.
    pub fn is_pusher(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Pusher)
    }

    /// Enemies deal contact damage and die when they reach the player.
    pub fn is_enemy(self) -> bool {
        use EntityKind::*;
        matches!(
            self,
            Lion | Tiger | Bear | Ruffian | Slime | Shark | CentipedeHead | CentipedeSegment
        )
    }

    /// Score awarded for destroying this kind.
    pub fn points(self) -> i32 {
        use EntityKind::*;
        match self {
            Lion | Bear | CentipedeHead => 10,
            Tiger | Ruffian | Slime => 20,
            CentipedeSegment => 30,
            _ => 0,
        }
    }

    /// Kinds whose cells must be backed by a thing in the arena.
    pub fn needs_thing(self) -> bool {
        use EntityKind::*;
        matches!(
            self,
            Player
                | Object
                | Scroll
                | Bullet
                | Star
                | Lion
                | Tiger
                | Bear
                | Ruffian
                | Slime
                | Shark
                | SpinningGun
                | Pusher
                | CentipedeHead
                | CentipedeSegment
                | Duplicator
        )
    }

    /// Always painted even when the board is dark and unlit.
    pub fn visible_in_dark(self) -> bool {
        matches!(self, EntityKind::Player | EntityKind::Torch)
    }

    pub fn is_text(self) -> bool {
        use EntityKind::*;
        matches!(
            self,
            TextBlue | TextGreen | TextCyan | TextRed | TextPurple | TextYellow | TextWhite
        )
    }

    /// Fixed display color for text kinds: white foreground on the kind's
    /// background color.
    pub fn text_color(self) -> u8 {
        use EntityKind::*;
        match self {
            TextBlue => 0x1f,
            TextGreen => 0x2f,
            TextCyan => 0x3f,
            TextRed => 0x4f,
            TextPurple => 0x5f,
            TextYellow => 0x6f,
            TextWhite => 0x0f,
            _ => 0x0f,
        }
    }

    /// Parse a kind name as used by `#change`, `#put` and `#become`.
    pub fn parse(name: &str) -> Option<EntityKind> {
        use EntityKind::*;
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "empty" => Empty,
            "ammo" => Ammo,
            "torch" => Torch,
            "gem" => Gem,
            "key" => Key,
            "door" => Door,
            "scroll" => Scroll,
            "energizer" => Energizer,
            "solid" => Solid,
            "normal" => Normal,
            "breakable" => Breakable,
            "boulder" => Boulder,
            "sliderns" => SliderNS,
            "sliderew" => SliderEW,
            "fake" => Fake,
            "invisible" => Invisible,
            "water" => Water,
            "forest" => Forest,
            "object" => Object,
            "bullet" => Bullet,
            "star" => Star,
            "lion" => Lion,
            "tiger" => Tiger,
            "bear" => Bear,
            "ruffian" => Ruffian,
            "slime" => Slime,
            "shark" => Shark,
            "spinninggun" => SpinningGun,
            "pusher" => Pusher,
            "head" => CentipedeHead,
            "segment" => CentipedeSegment,
            "duplicator" => Duplicator,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliders_push_along_one_axis_only() {
        let ns = EntityKind::SliderNS;
        let ew = EntityKind::SliderEW;
        assert!(ns.is_pushable(Step::new(0, 1)));
        assert!(!ns.is_pushable(Step::new(1, 0)));
        assert!(ew.is_pushable(Step::new(-1, 0)));
        assert!(!ew.is_pushable(Step::new(0, -1)));
    }

    #[test]
    fn kind_names_round_trip_for_common_kinds() {
        assert_eq!(EntityKind::parse("Boulder"), Some(EntityKind::Boulder));
        assert_eq!(EntityKind::parse("LION"), Some(EntityKind::Lion));
        assert_eq!(EntityKind::parse("nonsense"), None);
    }
}
