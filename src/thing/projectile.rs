//! Bullets and thrown stars.

use crate::board::{walkable_for, Board, TickContext};
use crate::core::types::ThingId;
use crate::entity::EntityKind;
use crate::thing::ThingData;

/// Star display rotation, advanced as the star ages.
const STAR_GLYPHS: [u8; 4] = [179, 47, 45, 92];

pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    match thing.data {
        ThingData::Bullet { from_player } => bullet(board, id, from_player, ctx),
        ThingData::Star { life } => star(board, id, life, ctx),
        _ => {}
    }
}

/// A bullet flies in a straight line until something stops it, then spends
/// itself on whatever it hit.
fn bullet(board: &mut Board, id: ThingId, from_player: bool, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    let target = thing.pos.offset(thing.step);
    if walkable_for(EntityKind::Bullet, board.entity_at(target).kind) {
        board.try_walk(id, thing.step);
    } else {
        board.bullet_hit(target, from_player, ctx);
        board.delete_thing(id);
    }
}

/// A star homes on the player for a fixed lifetime, waiting out obstacles
/// instead of dying on them.
fn star(board: &mut Board, id: ThingId, life: u8, ctx: &mut TickContext) {
    if life == 0 {
        board.delete_thing(id);
        return;
    }
    if let Some(thing) = board.thing_mut(id) {
        thing.data = ThingData::Star { life: life - 1 };
    }
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let seek = board.seek_step(pos, ctx);
    let target = pos.offset(seek);
    match board.entity_at(target).kind {
        EntityKind::Player => {
            board.hurt_player(ctx);
            board.delete_thing(id);
            return;
        }
        EntityKind::Breakable => {
            board.bullet_hit(target, false, ctx);
        }
        kind if walkable_for(EntityKind::Star, kind) => {
            board.try_walk(id, seek);
        }
        _ => {}
    }
    if let Some(pos) = board.thing(id).map(|t| t.pos) {
        board.set_glyph(pos, STAR_GLYPHS[(life % 4) as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Position, Step};
    use crate::entity::Entity;
    use crate::world::test_support::with_test_ctx;

    #[test]
    fn bullets_fly_straight() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let id = board.spawn_kind(EntityKind::Bullet, Position::new(5, 5), 0x0f).unwrap();
            board.thing_mut(id).unwrap().step = Step::new(1, 0);
            exec(board, id, ctx);
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(7, 5));
        });
    }

    #[test]
    fn bullets_die_on_solid_walls() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let id = board.spawn_kind(EntityKind::Bullet, Position::new(5, 5), 0x0f).unwrap();
            board.thing_mut(id).unwrap().step = Step::new(1, 0);
            board.set_entity(Position::new(6, 5), *Entity::create(EntityKind::Solid, 0x0e));
            exec(board, id, ctx);
            assert!(!board.alive(id));
            assert_eq!(board.entity_at(Position::new(5, 5)).kind, EntityKind::Empty);
        });
    }

    #[test]
    fn player_bullets_score_enemy_kills() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let lion = board.spawn_kind(EntityKind::Lion, Position::new(6, 5), 0x0c).unwrap();
            let id = board
                .spawn(
                    EntityKind::Bullet,
                    Position::new(5, 5),
                    0x0f,
                    ThingData::Bullet { from_player: true },
                )
                .unwrap();
            board.thing_mut(id).unwrap().step = Step::new(1, 0);
            exec(board, id, ctx);
            assert!(!board.alive(lion));
            assert!(!board.alive(id));
            assert_eq!(ctx.state.score, EntityKind::Lion.points());
        });
    }

    #[test]
    fn stars_expire_after_their_lifetime() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let id = board
                .spawn(EntityKind::Star, Position::new(5, 5), 0x0a, ThingData::Star { life: 1 })
                .unwrap();
            exec(board, id, ctx);
            assert!(board.alive(id));
            exec(board, id, ctx);
            assert!(!board.alive(id));
        });
    }

    #[test]
    fn stars_home_toward_the_player() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(10, 5), 0x1f);
            let id = board.spawn_kind(EntityKind::Star, Position::new(5, 5), 0x0a).unwrap();
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(6, 5));
        });
    }
}
