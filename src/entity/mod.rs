//! Flyweight tile entities
//!
//! An `Entity` is the cheap, copyable descriptor of one board cell. Entities
//! with no behavioral backing are interned once per (kind, color) pair and
//! shared board-wide; entities that reference a thing are always fresh
//! values.

pub mod kind;

pub use kind::EntityKind;

use std::sync::{Mutex, OnceLock};

use ahash::AHashMap;

use crate::core::types::ThingId;

/// Glyph painted for empty cells regardless of their stored color.
pub const BLANK_GLYPH: u8 = 32;

/// One board cell's visual/semantic identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    /// Packed foreground/background color. Text kinds repurpose this field
    /// to hold the displayed character; their color is fixed per kind.
    pub color: u8,
    /// Display tile index.
    pub glyph: u8,
    /// Behavioral backing, if any. An index into the owning board's thing
    /// arena, never a raw reference.
    pub thing: Option<ThingId>,
}

static FLYWEIGHTS: OnceLock<Mutex<AHashMap<(EntityKind, u8), &'static Entity>>> = OnceLock::new();

static EDGE: Entity = Entity {
    kind: EntityKind::EdgeOfBoard,
    color: 0,
    glyph: 32,
    thing: None,
};

impl Entity {
    /// The canonical shared entity for a (kind, color) pair.
    ///
    /// Deterministic: the same pair always yields the same reference. Text
    /// kinds store the requested color byte as their displayed character and
    /// take the kind's fixed color instead.
    pub fn create(kind: EntityKind, color: u8) -> &'static Entity {
        let table = FLYWEIGHTS.get_or_init(|| Mutex::new(AHashMap::new()));
        // Single-threaded simulation; the lock only guards first-creation
        // races between independent worlds.
        let mut table = table.lock().expect("flyweight table poisoned");
        table.entry((kind, color)).or_insert_with(|| {
            let entity = if kind.is_text() {
                Entity {
                    kind,
                    color: kind.text_color(),
                    glyph: color,
                    thing: None,
                }
            } else {
                Entity {
                    kind,
                    color,
                    glyph: kind.glyph(),
                    thing: None,
                }
            };
            Box::leak(Box::new(entity))
        })
    }

    /// A fresh (never shared) entity backing the thing with the given id.
    pub fn with_thing(kind: EntityKind, color: u8, thing: ThingId) -> Entity {
        Entity {
            kind,
            color,
            glyph: kind.glyph(),
            thing: Some(thing),
        }
    }

    /// The shared edge-of-board sentinel. Never written through.
    pub fn edge() -> &'static Entity {
        &EDGE
    }

    /// The shared empty-space entity.
    pub fn empty() -> &'static Entity {
        Entity::create(EntityKind::Empty, 0x07)
    }

    /// The (glyph, color) pair for the renderer. Empty cells always paint a
    /// fixed blank glyph regardless of stored color; text cells paint the
    /// character held in their color byte.
    pub fn visual(&self) -> (u8, u8) {
        if self.kind == EntityKind::Empty {
            (BLANK_GLYPH, 0x0f)
        } else {
            (self.glyph, self.color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flyweights_are_shared_per_kind_and_color() {
        let a = Entity::create(EntityKind::Solid, 0x0e);
        let b = Entity::create(EntityKind::Solid, 0x0e);
        assert!(std::ptr::eq(a, b));

        let c = Entity::create(EntityKind::Solid, 0x0a);
        assert!(!std::ptr::eq(a, c));
    }

    #[test]
    fn thing_backed_entities_never_share() {
        let a = Entity::with_thing(EntityKind::Lion, 0x0c, ThingId(1));
        let b = Entity::with_thing(EntityKind::Lion, 0x0c, ThingId(2));
        assert_ne!(a.thing, b.thing);
        // Flyweight creation for the same kind/color is unaffected.
        let shared = Entity::create(EntityKind::Lion, 0x0c);
        assert_eq!(shared.thing, None);
    }

    #[test]
    fn text_kinds_store_glyph_in_color_slot() {
        let text = Entity::create(EntityKind::TextRed, b'H');
        assert_eq!(text.glyph, b'H');
        assert_eq!(text.color, 0x4f);
        assert_eq!(text.visual(), (b'H', 0x4f));
    }

    #[test]
    fn empty_paints_blank_regardless_of_color() {
        let empty = Entity::create(EntityKind::Empty, 0x34);
        assert_eq!(empty.visual().0, BLANK_GLYPH);
    }

    #[test]
    fn edge_sentinel_is_stable() {
        assert!(std::ptr::eq(Entity::edge(), Entity::edge()));
        assert_eq!(Entity::edge().kind, EntityKind::EdgeOfBoard);
    }
}
