//! Centipede chains
//!
//! A centipede is a doubly linked chain of things: the head decides where to
//! go and every segment is pulled into the cell its leader vacated. The
//! chain structure itself is the interesting part: a fully surrounded head
//! reverses the whole chain (the tail becomes the head), and a segment that
//! loses its leader promotes itself.

use rand::Rng;

use crate::board::{walkable_for, Board, TickContext};
use crate::core::types::{Position, Step, ThingId};
use crate::entity::EntityKind;
use crate::thing::{random_step, ThingData};

pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    match thing.data {
        ThingData::CentipedeHead {
            intelligence,
            deviance,
        } => head(board, id, intelligence, deviance, ctx),
        ThingData::CentipedeSegment => segment(board, id),
        _ => {}
    }
}

fn head(board: &mut Board, id: ThingId, intelligence: u8, deviance: u8, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    let pos = thing.pos;
    let player = board.player_pos();

    let mut step = thing.step;
    if pos.x == player.x && ctx.rng.gen_range(0..10) < intelligence as u32 {
        step = Step::new(0, (player.y - pos.y).signum());
    } else if pos.y == player.y && ctx.rng.gen_range(0..10) < intelligence as u32 {
        step = Step::new((player.x - pos.x).signum(), 0);
    } else if ctx.rng.gen_range(0..40) < deviance as u32 {
        step = random_step(ctx.rng);
    }
    if step.is_idle() {
        step = random_step(ctx.rng);
    }

    let chosen = if open_for_head(board, pos.offset(step)) {
        Some(step)
    } else {
        // Preferred heading blocked: pick among the open neighbors.
        let open: Vec<Step> = [step.clockwise(), step.counterwise(), step.opposite()]
            .into_iter()
            .filter(|&s| open_for_head(board, pos.offset(s)))
            .collect();
        if open.is_empty() {
            None
        } else {
            Some(open[ctx.rng.gen_range(0..open.len())])
        }
    };

    let Some(step) = chosen else {
        // Boxed in on all four sides: the chain turns around.
        reverse_chain(board, id);
        return;
    };

    if let Some(t) = board.thing_mut(id) {
        t.step = step;
    }
    if board.entity_at(pos.offset(step)).kind == EntityKind::Player {
        board.move_thing(id, step, ctx);
        return;
    }
    if !board.try_walk(id, step) {
        return;
    }

    // Pull every segment into the cell its leader just left.
    let mut vacated = pos;
    let mut current = board.thing(id).and_then(|t| t.follower);
    while let Some(seg) = current {
        let Some(seg_pos) = board.thing(seg).map(|t| t.pos) else { break };
        board.relocate_thing(seg, vacated);
        vacated = seg_pos;
        current = board.thing(seg).and_then(|t| t.follower);
    }
}

fn open_for_head(board: &Board, target: Position) -> bool {
    let kind = board.entity_at(target).kind;
    kind == EntityKind::Player || walkable_for(EntityKind::CentipedeHead, kind)
}

/// A segment whose leader is gone promotes itself to a head. The promotion
/// takes one turn, during which the rest of the chain waits.
fn segment(board: &mut Board, id: ThingId) {
    let Some(thing) = board.thing(id) else { return };
    if thing.leader.is_some() {
        return;
    }
    let pos = thing.pos;
    board.set_kind(pos, EntityKind::CentipedeHead);
    if let Some(t) = board.thing_mut(id) {
        t.data = ThingData::default_for(EntityKind::CentipedeHead);
    }
}

/// Swap the chain end for end: the tail becomes the head (inheriting the
/// head's parameters) and every leader/follower link flips.
fn reverse_chain(board: &mut Board, head_id: ThingId) {
    let mut chain = vec![head_id];
    let mut current = head_id;
    while let Some(next) = board.thing(current).and_then(|t| t.follower) {
        chain.push(next);
        current = next;
    }
    if chain.len() == 1 {
        // No segments: just forget the heading and try again next turn.
        if let Some(t) = board.thing_mut(head_id) {
            t.step = t.step.opposite();
        }
        return;
    }

    let head_data = board.thing(head_id).map(|t| t.data);
    let old_head_pos = board.thing(head_id).map(|t| t.pos);
    let tail = *chain.last().unwrap_or(&head_id);
    let tail_pos = board.thing(tail).map(|t| t.pos);

    if let Some(pos) = old_head_pos {
        board.set_kind(pos, EntityKind::CentipedeSegment);
    }
    if let Some(pos) = tail_pos {
        board.set_kind(pos, EntityKind::CentipedeHead);
    }
    if let Some(t) = board.thing_mut(head_id) {
        t.data = ThingData::CentipedeSegment;
    }
    if let Some(t) = board.thing_mut(tail) {
        t.data = head_data.unwrap_or_else(|| ThingData::default_for(EntityKind::CentipedeHead));
        t.step = Step::IDLE;
    }

    let reversed: Vec<ThingId> = chain.iter().rev().copied().collect();
    for (i, &id) in reversed.iter().enumerate() {
        if let Some(t) = board.thing_mut(id) {
            t.leader = if i == 0 { None } else { Some(reversed[i - 1]) };
            t.follower = reversed.get(i + 1).copied();
        }
    }
}

/// Link `follower` behind `leader` in a chain. Used by world loaders and
/// tests to assemble centipedes.
pub fn link(board: &mut Board, leader: ThingId, follower: ThingId) {
    if let Some(t) = board.thing_mut(leader) {
        t.follower = Some(follower);
    }
    if let Some(t) = board.thing_mut(follower) {
        t.leader = Some(leader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::world::test_support::with_test_ctx;

    fn spawn_chain(board: &mut Board, cells: &[Position]) -> Vec<ThingId> {
        let mut ids = vec![];
        for (i, &pos) in cells.iter().enumerate() {
            let kind = if i == 0 {
                EntityKind::CentipedeHead
            } else {
                EntityKind::CentipedeSegment
            };
            ids.push(board.spawn_kind(kind, pos, 0x09).unwrap());
        }
        for pair in ids.windows(2) {
            link(board, pair[0], pair[1]);
        }
        ids
    }

    #[test]
    fn segments_follow_into_vacated_cells() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 5), 0x1f);
            let cells = [Position::new(7, 5), Position::new(6, 5), Position::new(5, 5)];
            let ids = spawn_chain(board, &cells);
            // Aligned with the player: a smart head always heads east.
            if let Some(t) = board.thing_mut(ids[0]) {
                t.data = ThingData::CentipedeHead { intelligence: 10, deviance: 0 };
            }
            exec(board, ids[0], ctx);
            assert_eq!(board.thing(ids[0]).unwrap().pos, Position::new(8, 5));
            assert_eq!(board.thing(ids[1]).unwrap().pos, Position::new(7, 5));
            assert_eq!(board.thing(ids[2]).unwrap().pos, Position::new(6, 5));
        });
    }

    #[test]
    fn surrounded_head_reverses_the_chain() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let head_pos = Position::new(1, 1);
            let cells = [head_pos, Position::new(2, 1), Position::new(3, 1)];
            let ids = spawn_chain(board, &cells);
            // Box the head in: edges on two sides, walls on the others.
            board.set_entity(Position::new(1, 0), *Entity::create(EntityKind::Solid, 0x0e));
            board.set_entity(Position::new(0, 1), *Entity::create(EntityKind::Solid, 0x0e));
            board.set_entity(Position::new(1, 2), *Entity::create(EntityKind::Solid, 0x0e));

            exec(board, ids[0], ctx);
            assert_eq!(board.thing(ids[0]).unwrap().kind, EntityKind::CentipedeSegment);
            assert_eq!(board.thing(ids[2]).unwrap().kind, EntityKind::CentipedeHead);
            assert_eq!(board.thing(ids[2]).unwrap().leader, None);
            assert_eq!(board.thing(ids[2]).unwrap().follower, Some(ids[1]));
            assert_eq!(board.thing(ids[0]).unwrap().leader, Some(ids[1]));
            assert_eq!(board.thing(ids[0]).unwrap().follower, None);
            assert_eq!(board.entity_at(head_pos).kind, EntityKind::CentipedeSegment);
        });
    }

    #[test]
    fn leaderless_segment_promotes_itself() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let pos = Position::new(5, 5);
            let id = board.spawn_kind(EntityKind::CentipedeSegment, pos, 0x09).unwrap();
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().kind, EntityKind::CentipedeHead);
            assert_eq!(board.entity_at(pos).kind, EntityKind::CentipedeHead);
            assert!(matches!(
                board.thing(id).unwrap().data,
                ThingData::CentipedeHead { .. }
            ));
        });
    }
}
