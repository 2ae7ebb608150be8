//! Player behavior: translate buffered input into moves and shots.

use crate::audio::SoundEffect;
use crate::board::{Board, TickContext};
use crate::core::types::ThingId;

pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let step = ctx.input.step();
    if step.is_idle() {
        return;
    }
    if ctx.input.shoot {
        if ctx.state.ammo > 0 {
            ctx.state.ammo -= 1;
            if let Some(pos) = board.thing(id).map(|t| t.pos) {
                board.make_bullet(pos, step, false, true, ctx);
                ctx.audio.effect(SoundEffect::Shoot);
            }
        } else {
            board.show_message("You don't have any ammo!", ctx);
        }
    } else {
        board.move_thing(id, step, ctx);
    }
}
