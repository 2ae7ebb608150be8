//! Stationary machinery: spinning guns, pushers, duplicators.

use rand::Rng;

use crate::board::{Board, TickContext};
use crate::core::types::{Step, ThingId};
use crate::entity::EntityKind;
use crate::thing::{random_step, ThingData};

/// Gun barrel rotation, one glyph per execution.
const GUN_GLYPHS: [u8; 4] = [24, 26, 25, 27];

/// Duplication progress glyphs, least to most complete.
const DUPLICATOR_GLYPHS: [u8; 5] = [250, 249, 248, 111, 79];

pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    match thing.data {
        ThingData::SpinningGun {
            intelligence,
            firing_rate,
            throws_stars,
        } => spinning_gun(board, id, intelligence, firing_rate, throws_stars, ctx),
        ThingData::Pusher => pusher(board, id, ctx),
        ThingData::Duplicator { rate, phase } => duplicator(board, id, rate, phase, ctx),
        _ => {}
    }
}

fn spinning_gun(
    board: &mut Board,
    id: ThingId,
    intelligence: u8,
    firing_rate: u8,
    throws_stars: bool,
    ctx: &mut TickContext,
) {
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let spin = (board.cycle % 4) as usize;
    board.set_glyph(pos, GUN_GLYPHS[spin]);

    if ctx.rng.gen_range(0..9) >= firing_rate as u32 {
        return;
    }
    let player = board.player_pos();
    let aligned = pos.x == player.x || pos.y == player.y;
    let step = if aligned && ctx.rng.gen_range(0..9) < intelligence as u32 {
        Step::new((player.x - pos.x).signum(), (player.y - pos.y).signum())
    } else {
        random_step(ctx.rng)
    };
    board.make_bullet(pos, step, throws_stars, false, ctx);
}

/// Pushers grind along their heading, shoving whatever yields.
fn pusher(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let Some(step) = board.thing(id).map(|t| t.step) else { return };
    if step.is_idle() {
        return;
    }
    board.move_thing(id, step, ctx);
}

/// Duplicators tick through a visible charge-up, then stamp a copy of the
/// entity on their source side onto the opposite side, pushing any
/// obstruction out of the way first.
fn duplicator(board: &mut Board, id: ThingId, rate: u8, phase: u8, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    let pos = thing.pos;
    let step = thing.step;

    let phase = phase + 1;
    if phase <= rate.max(1) {
        let charge = (phase as usize * (DUPLICATOR_GLYPHS.len() - 1)) / rate.max(1) as usize;
        board.set_glyph(pos, DUPLICATOR_GLYPHS[charge.min(DUPLICATOR_GLYPHS.len() - 1)]);
        if let Some(t) = board.thing_mut(id) {
            t.data = ThingData::Duplicator { rate, phase };
        }
        return;
    }
    if let Some(t) = board.thing_mut(id) {
        t.data = ThingData::Duplicator { rate, phase: 0 };
    }
    board.set_glyph(pos, DUPLICATOR_GLYPHS[0]);

    let source = pos.offset(step);
    let target = pos.offset(step.opposite());
    let original = board.entity_at(source);
    if !target.in_range()
        || matches!(original.kind, EntityKind::Empty | EntityKind::EdgeOfBoard | EntityKind::Player)
    {
        return;
    }
    if !board.entity_at(target).kind.is_floor() {
        board.push(target, step.opposite(), ctx);
    }
    if !board.entity_at(target).kind.is_floor() {
        return;
    }
    match original.thing {
        Some(src) => {
            let Some(src_thing) = board.thing(src) else { return };
            let data = src_thing.data;
            let program = src_thing.program;
            let kind = src_thing.kind;
            if let Some(copy) = board.spawn(kind, target, original.color, data) {
                if let Some(pid) = program {
                    board.attach_program(copy, pid);
                }
            }
        }
        None => board.set_entity(target, original),
    }
}
