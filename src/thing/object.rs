//! Scripted object behavior: walk state, then program execution.

use crate::board::{Board, TickContext};
use crate::core::types::ThingId;
use crate::script;

pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let step = board.thing(id).map(|t| t.step).unwrap_or_default();
    if !step.is_idle() && !board.move_thing(id, step, ctx) {
        // A blocked walker gets a chance to react.
        board.seek_thing_label(id, "thud");
    }
    if board.alive(id) {
        script::run(board, id, ctx.config.instruction_budget, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Position, Step};
    use crate::entity::{Entity, EntityKind};
    use crate::script::ProgramBuffer;
    use crate::world::test_support::with_test_ctx;

    fn scripted_object(board: &mut Board, pos: Position, text: &str) -> ThingId {
        let id = board.spawn_kind(EntityKind::Object, pos, 0x0e).unwrap();
        let pid = board.add_program(ProgramBuffer::from_text(text));
        board.attach_program(id, pid);
        id
    }

    #[test]
    fn walk_state_carries_the_object_each_turn() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n");
            board.thing_mut(id).unwrap().step = Step::new(1, 0);
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(6, 5));
        });
    }

    #[test]
    fn blocked_walkers_receive_thud() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n:thud\n#walk idle\n#end\n");
            board.thing_mut(id).unwrap().step = Step::new(1, 0);
            board.set_entity(Position::new(6, 5), *Entity::create(EntityKind::Solid, 0x0e));
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(5, 5));
            assert_eq!(board.thing(id).unwrap().step, Step::IDLE);
        });
    }

    #[test]
    fn program_runs_under_the_instruction_budget() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            // Ten no-op steps; a budget of 4 consumes exactly four.
            let text = "#idle\n".repeat(10);
            let id = scripted_object(board, Position::new(5, 5), &text);
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().script.ip, 4 * 6);
        });
    }
}
