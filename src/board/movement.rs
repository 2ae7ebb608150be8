//! Movement, pushing, and projectile spawning

use crate::audio::SoundEffect;
use crate::board::{Board, TickContext};
use crate::core::types::{Position, Step, ThingId, BOARD_HEIGHT, BOARD_WIDTH};
use crate::entity::{Entity, EntityKind};
use crate::thing::ThingData;

/// Whether a thing of `mover` may occupy a cell currently holding `dest`.
pub fn walkable_for(mover: EntityKind, dest: EntityKind) -> bool {
    match mover {
        EntityKind::Bullet | EntityKind::Star => dest.is_floor() || dest.is_swimmable(),
        EntityKind::Shark => dest.is_swimmable(),
        _ => dest.is_floor(),
    }
}

impl Board {
    /// Move a thing one cell along `step`, running the full interaction
    /// protocol.
    ///
    /// Only cardinal unit steps are valid; anything else is silently
    /// ignored. The target cell is touched first, so touch side effects
    /// (item pickup, door checks, board transitions) happen whether or not
    /// the move itself succeeds. Board edges clamp the step to a no-op in
    /// that axis. Pusher kinds shove pushable occupants ahead before the
    /// final walkability check.
    pub fn move_thing(&mut self, id: ThingId, step: Step, ctx: &mut TickContext) -> bool {
        if !step.is_cardinal() {
            return false;
        }
        let Some(thing) = self.thing(id) else {
            return false;
        };
        if thing.dead {
            return false;
        }
        let from = thing.pos;
        let kind = thing.kind;

        self.interact(from, step, id, ctx);
        // The touch may have consumed the mover (an enemy reaching the
        // player, a bullet collision).
        if !self.alive(id) {
            return false;
        }

        let mut step = step;
        let target = from.offset(step);
        if target.x < 0 || target.x >= BOARD_WIDTH {
            step.dx = 0;
        }
        if target.y < 0 || target.y >= BOARD_HEIGHT {
            step.dy = 0;
        }
        if step.is_idle() {
            return false;
        }
        let target = from.offset(step);

        if kind.is_pusher() && self.entity_at(target).kind.is_pushable(step) {
            self.push(target, step, ctx);
        }

        if walkable_for(kind, self.entity_at(target).kind) {
            self.relocate_thing(id, target);
            true
        } else {
            false
        }
    }

    /// Move without touching: scripted walk state, pulled centipede
    /// segments. Fails quietly when the destination isn't walkable.
    pub fn try_walk(&mut self, id: ThingId, step: Step) -> bool {
        if !step.is_cardinal() {
            return false;
        }
        let Some(thing) = self.thing(id) else {
            return false;
        };
        if thing.dead {
            return false;
        }
        let target = thing.pos.offset(step);
        if !target.in_range() {
            return false;
        }
        if walkable_for(thing.kind, self.entity_at(target).kind) {
            self.relocate_thing(id, target);
            true
        } else {
            false
        }
    }

    /// Physically relocate a thing: carry its cell entity to `to`, restore
    /// its under-entity at the old cell, and capture the new cell's entity
    /// as the new under. `to` must be in range.
    pub fn relocate_thing(&mut self, id: ThingId, to: Position) {
        let Some(from) = self.thing(id).map(|t| t.pos) else {
            return;
        };
        if from == to || !to.in_range() {
            return;
        }
        let cell = self.entity_at(from);
        let displaced = self.entity_at(to);
        let Some(thing) = self.thing_mut(id) else {
            return;
        };
        let under = thing.under;
        thing.under = displaced;
        thing.pos = to;
        self.set_entity(to, cell);
        self.set_entity(from, under);
    }

    /// Shift the chain of pushable entities starting at `origin` one cell
    /// along `step`.
    ///
    /// Walks forward accumulating pushables until a walkable cell or a
    /// non-pushable obstacle; an obstacle aborts the entire push (nothing
    /// moves). Otherwise the chain shifts outward from the far end toward
    /// the origin. Returns true if the origin cell was cleared.
    pub fn push(&mut self, origin: Position, step: Step, ctx: &mut TickContext) -> bool {
        let mut chain = vec![];
        let mut pos = origin;
        loop {
            if !pos.in_range() {
                return false;
            }
            let occupant = self.entity_at(pos);
            if occupant.kind.is_floor() {
                break;
            }
            if !occupant.kind.is_pushable(step) {
                return false;
            }
            chain.push(pos);
            pos = pos.offset(step);
        }
        if chain.is_empty() {
            return true;
        }
        for &cell in chain.iter().rev() {
            let entity = self.entity_at(cell);
            match entity.thing {
                Some(id) => self.relocate_thing(id, cell.offset(step)),
                None => {
                    self.set_entity(cell.offset(step), entity);
                    self.set_entity(cell, *Entity::empty());
                }
            }
        }
        ctx.audio.effect(SoundEffect::Push);
        true
    }

    /// Fire a projectile from the cell adjacent to `origin` along `step`.
    ///
    /// If the target cell can hold the projectile, a thing is spawned there
    /// and will take its first step this same tick. Otherwise the collision
    /// is simulated at that cell without spawning: bullets that can't exist
    /// still deal damage. Returns true if a projectile thing was created.
    pub fn make_bullet(
        &mut self,
        origin: Position,
        step: Step,
        star: bool,
        from_player: bool,
        ctx: &mut TickContext,
    ) -> bool {
        if !step.is_cardinal() {
            return false;
        }
        let target = origin.offset(step);
        let dest = self.entity_at(target).kind;
        let kind = if star { EntityKind::Star } else { EntityKind::Bullet };
        if dest.is_floor() || dest.is_swimmable() {
            let data = if star {
                ThingData::Star { life: 100 }
            } else {
                ThingData::Bullet { from_player }
            };
            let color = if star { 0x0a } else { 0x0f };
            if let Some(id) = self.spawn(kind, target, color, data) {
                if let Some(thing) = self.thing_mut(id) {
                    thing.step = step;
                }
            }
            true
        } else {
            self.bullet_hit(target, from_player, ctx);
            false
        }
    }

    /// Resolve a projectile collision at `target`.
    pub fn bullet_hit(&mut self, target: Position, from_player: bool, ctx: &mut TickContext) {
        let entity = self.entity_at(target);
        match entity.kind {
            kind if kind.is_enemy() => {
                if from_player {
                    ctx.state.score += kind.points();
                }
                match entity.thing {
                    Some(id) => self.delete_thing(id),
                    None => self.set_entity(target, *Entity::empty()),
                }
                ctx.audio.effect(SoundEffect::EnemyDown);
            }
            EntityKind::Breakable => {
                self.set_entity(target, *Entity::empty());
                ctx.audio.effect(SoundEffect::Shatter);
            }
            EntityKind::Player => {
                self.hurt_player(ctx);
            }
            EntityKind::Object => {
                if let Some(id) = entity.thing {
                    self.seek_thing_label(id, "shot");
                }
            }
            _ => {}
        }
    }

    /// Whether the player could occupy `entry` when arriving along `step`
    /// from another board. Simulates the push a normal move would perform
    /// but triggers no touch side effects.
    pub fn can_enter(&mut self, entry: Position, step: Step, ctx: &mut TickContext) -> bool {
        if !entry.in_range() {
            return false;
        }
        if self.entity_at(entry).kind.is_pushable(step) {
            self.push(entry, step, ctx);
        }
        self.entity_at(entry).kind.is_floor()
    }
}
