//! Crunch command dispatch
//!
//! Every `#` line names a command; an unrecognized keyword is treated as an
//! implicit `#send`. Commands return how the instruction pointer should move,
//! or a `ScriptError` that pauses the thing.

use crate::audio::play::parse_play;
use crate::audio::SoundEffect;
use crate::board::{Board, TickContext};
use crate::core::error::ScriptError;
use crate::core::types::{Position, Step, ThingId, BOARD_WIDTH, FIELD_LEN};
use crate::entity::{Entity, EntityKind};
use crate::script::direction::{self, DirectionContext};
use crate::script::interpreter::Flow;
use crate::thing::ThingData;

pub fn exec(
    board: &mut Board,
    id: ThingId,
    text: &str,
    ctx: &mut TickContext,
) -> Result<Flow, ScriptError> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let Some(&keyword) = words.first() else {
        // A bare `#` line is a no-op step.
        return Ok(Flow::Advance);
    };
    let upper = keyword.to_ascii_uppercase();
    let args = &words[1..];

    match upper.as_str() {
        "BECOME" => become_entity(board, id, args),
        "BIND" => bind(board, id, args),
        "CHANGE" => change(board, args),
        "CHAR" => set_char(board, id, args),
        "CLEAR" => {
            let flag = require(args.first(), "clear")?;
            ctx.state.flags.remove(&flag.to_ascii_lowercase());
            Ok(Flow::Advance)
        }
        "CYCLE" => {
            let rate = parse_number(require(args.first(), "cycle")?)?.max(1);
            if let Some(thing) = board.thing_mut(id) {
                thing.cycle_rate = rate.min(u8::MAX as i16) as u8;
            }
            Ok(Flow::Advance)
        }
        "DIE" => {
            board.delete_thing(id);
            Ok(Flow::Halt)
        }
        "END" => {
            if let Some(thing) = board.thing_mut(id) {
                thing.script.ip = -1;
            }
            Ok(Flow::Halt)
        }
        "ENDGAME" => {
            ctx.state.health = 0;
            Ok(Flow::Advance)
        }
        "GIVE" => give_take(ctx, board, id, args, 1),
        "GO" => {
            let step = eval_direction(board, id, args, ctx)?.0;
            if step.is_idle() || board.move_thing(id, step, ctx) {
                Ok(Flow::Advance)
            } else {
                // Blocked: stay on this instruction and retry next tick.
                Ok(Flow::Retry)
            }
        }
        "IDLE" => Ok(Flow::Advance),
        "IF" => {
            let (truth, consumed) = eval_condition(board, id, args, ctx)?;
            if !truth || args.len() <= consumed {
                return Ok(Flow::Advance);
            }
            let rest = args[consumed..].join(" ");
            exec(board, id, &rest, ctx)
        }
        "LOCK" => {
            set_locked(board, id, true);
            Ok(Flow::Advance)
        }
        "UNLOCK" => {
            set_locked(board, id, false);
            Ok(Flow::Advance)
        }
        "PLAY" => {
            let notation = text.trim_start()[keyword.len()..].trim();
            ctx.audio.play(2, parse_play(notation));
            Ok(Flow::Advance)
        }
        "PUT" => put(board, id, args, ctx),
        "RESTART" => {
            if let Some(thing) = board.thing_mut(id) {
                thing.script.ip = 0;
            }
            Ok(Flow::Jumped)
        }
        "RESTORE" => {
            let label = require(args.first(), "restore")?.to_string();
            if let Some(pid) = board.thing(id).and_then(|t| t.program) {
                board.program_mut(pid).restore(&label);
            }
            Ok(Flow::Advance)
        }
        "SEND" => {
            let target = require(args.first(), "send")?;
            send(board, id, target);
            Ok(Flow::Advance)
        }
        "SET" => {
            let flag = require(args.first(), "set")?;
            ctx.state.flags.insert(flag.to_ascii_lowercase());
            Ok(Flow::Advance)
        }
        "SHOOT" => shoot(board, id, args, ctx, false),
        "THROWSTAR" => shoot(board, id, args, ctx, true),
        "TAKE" => give_take(ctx, board, id, args, -1),
        "TRY" => {
            let (step, consumed) = eval_direction(board, id, args, ctx)?;
            let moved = step.is_idle() || board.move_thing(id, step, ctx);
            if !moved && args.len() > consumed {
                let rest = args[consumed..].join(" ");
                return exec(board, id, &rest, ctx);
            }
            Ok(Flow::Advance)
        }
        "WALK" => {
            let step = eval_direction(board, id, args, ctx)?.0;
            if let Some(thing) = board.thing_mut(id) {
                thing.step = step;
            }
            Ok(Flow::Advance)
        }
        "ZAP" => {
            let label = require(args.first(), "zap")?.to_string();
            if let Some(pid) = board.thing(id).and_then(|t| t.program) {
                board.program_mut(pid).zap(&label);
            }
            Ok(Flow::Advance)
        }
        // Anything else is an implicit send target.
        _ => {
            send(board, id, keyword);
            Ok(Flow::Advance)
        }
    }
}

fn require<'a>(word: Option<&&'a str>, command: &str) -> Result<&'a str, ScriptError> {
    word.copied()
        .ok_or_else(|| ScriptError::MissingArgument(command.to_string()))
}

fn parse_number(word: &str) -> Result<i16, ScriptError> {
    word.parse()
        .map_err(|_| ScriptError::BadNumber(word.to_string()))
}

fn parse_kind(word: &str) -> Result<EntityKind, ScriptError> {
    EntityKind::parse(word).ok_or_else(|| ScriptError::UnknownKind(word.to_string()))
}

fn eval_direction(
    board: &Board,
    id: ThingId,
    words: &[&str],
    ctx: &mut TickContext,
) -> Result<(Step, usize), ScriptError> {
    let (pos, flow) = match board.thing(id) {
        Some(t) => (t.pos, t.step),
        None => (Position::default(), Step::IDLE),
    };
    let seek = board.seek_step(pos, ctx);
    let mut dctx = DirectionContext {
        seek,
        flow,
        rng: &mut *ctx.rng,
    };
    direction::eval(words, &mut dctx)
}

/// `label` or `name:label` addressing. A bare label is a self-send: a jump
/// when the label exists, a silent no-op when it doesn't.
fn send(board: &mut Board, id: ThingId, target: &str) {
    match target.split_once(':') {
        Some((to, label)) => board.send_label(to, label, Some(id)),
        None => {
            board.seek_thing_label(id, target);
        }
    }
}

fn set_locked(board: &mut Board, id: ThingId, value: bool) {
    if let Some(thing) = board.thing_mut(id) {
        if let ThingData::Object { locked } = &mut thing.data {
            *locked = value;
        }
    }
}

fn become_entity(board: &mut Board, id: ThingId, args: &[&str]) -> Result<Flow, ScriptError> {
    let kind = parse_kind(require(args.first(), "become")?)?;
    let color = match args.get(1) {
        Some(word) => parse_number(word)? as u8,
        None => board.thing(id).map(|t| board.entity_at(t.pos).color).unwrap_or(0x0f),
    };
    let Some(pos) = board.thing(id).map(|t| t.pos) else {
        return Ok(Flow::Halt);
    };
    // The old thing vanishes without restoring its under-entity; the new
    // kind takes the cell over.
    board.replace_thing_with_entity(id, *Entity::empty());
    board.spawn_kind(kind, pos, color);
    Ok(Flow::Halt)
}

/// Re-point this thing at the program of the named thing. Execution
/// continues from the top of the new program this same turn.
fn bind(board: &mut Board, id: ThingId, args: &[&str]) -> Result<Flow, ScriptError> {
    let name = require(args.first(), "bind")?.to_ascii_lowercase();
    let target = board
        .live_things()
        .into_iter()
        .find(|&other| other != id && board.thing_name(other).as_deref() == Some(&name[..]));
    if let Some(pid) = target.and_then(|t| board.thing(t).and_then(|t| t.program)) {
        board.attach_program(id, pid);
        Ok(Flow::Jumped)
    } else {
        Ok(Flow::Advance)
    }
}

fn change(board: &mut Board, args: &[&str]) -> Result<Flow, ScriptError> {
    let from = parse_kind(require(args.first(), "change")?)?;
    let to = parse_kind(require(args.get(1), "change")?)?;
    let color = args.get(2).map(|w| parse_number(w)).transpose()?;
    if from == EntityKind::Player || to == EntityKind::Player {
        return Ok(Flow::Advance);
    }
    let width = BOARD_WIDTH as usize;
    let matches: Vec<Position> = (0..FIELD_LEN)
        .map(|index| Position::new((index % width) as i16, (index / width) as i16))
        .filter(|&pos| board.entity_at(pos).kind == from)
        .collect();
    for pos in matches {
        let cell = board.entity_at(pos);
        let color = color.map(|c| c as u8).unwrap_or(cell.color);
        if let Some(old) = cell.thing {
            board.replace_thing_with_entity(old, *Entity::empty());
        }
        board.spawn_kind(to, pos, color);
    }
    Ok(Flow::Advance)
}

fn set_char(board: &mut Board, id: ThingId, args: &[&str]) -> Result<Flow, ScriptError> {
    let glyph = parse_number(require(args.first(), "char")?)?;
    if let Some(pos) = board.thing(id).map(|t| t.pos) {
        board.set_glyph(pos, glyph as u8);
    }
    Ok(Flow::Advance)
}

fn shoot(
    board: &mut Board,
    id: ThingId,
    args: &[&str],
    ctx: &mut TickContext,
    star: bool,
) -> Result<Flow, ScriptError> {
    let step = eval_direction(board, id, args, ctx)?.0;
    if step.is_idle() {
        return Ok(Flow::Advance);
    }
    if let Some(pos) = board.thing(id).map(|t| t.pos) {
        if board.make_bullet(pos, step, star, false, ctx) && !star {
            ctx.audio.effect(SoundEffect::Shoot);
        }
    }
    Ok(Flow::Advance)
}

fn put(
    board: &mut Board,
    id: ThingId,
    args: &[&str],
    ctx: &mut TickContext,
) -> Result<Flow, ScriptError> {
    let (step, consumed) = eval_direction(board, id, args, ctx)?;
    let kind = parse_kind(require(args.get(consumed), "put")?)?;
    let color = match args.get(consumed + 1) {
        Some(word) => parse_number(word)? as u8,
        None => 0x0f,
    };
    if step.is_idle() {
        return Ok(Flow::Advance);
    }
    let Some(pos) = board.thing(id).map(|t| t.pos) else {
        return Ok(Flow::Advance);
    };
    let target = pos.offset(step);
    if !target.in_range() {
        return Ok(Flow::Advance);
    }
    if board.entity_at(target).kind.is_pushable(step) {
        board.push(target, step, ctx);
    }
    let dest = board.entity_at(target);
    if dest.kind.is_floor() {
        if let Some(old) = dest.thing {
            board.replace_thing_with_entity(old, *Entity::empty());
        }
        board.spawn_kind(kind, target, color);
    }
    Ok(Flow::Advance)
}

fn give_take(
    ctx: &mut TickContext,
    board: &mut Board,
    id: ThingId,
    args: &[&str],
    sign: i32,
) -> Result<Flow, ScriptError> {
    let command = if sign > 0 { "give" } else { "take" };
    let counter = require(args.first(), command)?.to_ascii_uppercase();
    let amount = parse_number(require(args.get(1), command)?)?.max(0) as i32;
    let applied = adjust_counter(ctx, &counter, sign * amount)?;
    if !applied && args.len() > 2 {
        // `#take` with an insufficient counter runs its fallback command.
        let rest = args[2..].join(" ");
        return exec(board, id, &rest, ctx);
    }
    Ok(Flow::Advance)
}

/// Apply a signed delta to a named world counter. Returns false when a
/// negative delta would drive the counter below zero (nothing is taken).
fn adjust_counter(ctx: &mut TickContext, name: &str, delta: i32) -> Result<bool, ScriptError> {
    fn apply16(slot: &mut i16, delta: i32) -> bool {
        let next = *slot as i32 + delta;
        if next < 0 {
            return false;
        }
        *slot = next.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        true
    }
    match name {
        "AMMO" => Ok(apply16(&mut ctx.state.ammo, delta)),
        "GEMS" => Ok(apply16(&mut ctx.state.gems, delta)),
        "TORCHES" => Ok(apply16(&mut ctx.state.torches, delta)),
        "HEALTH" => Ok(apply16(&mut ctx.state.health, delta)),
        "TIME" => Ok(apply16(&mut ctx.state.time_elapsed, delta)),
        "SCORE" => {
            let next = ctx.state.score + delta;
            if next < 0 {
                return Ok(false);
            }
            ctx.state.score = next;
            Ok(true)
        }
        _ => Err(ScriptError::UnknownCounter(name.to_string())),
    }
}

/// Evaluate a `#if` condition at the front of `args`. Returns the truth
/// value and how many words were consumed.
fn eval_condition(
    board: &Board,
    id: ThingId,
    args: &[&str],
    ctx: &mut TickContext,
) -> Result<(bool, usize), ScriptError> {
    let first = require(args.first(), "if")?;
    let upper = first.to_ascii_uppercase();
    let pos = board.thing(id).map(|t| t.pos).unwrap_or_default();
    match upper.as_str() {
        "NOT" => {
            let (value, consumed) = eval_condition(board, id, &args[1..], ctx)?;
            Ok((!value, consumed + 1))
        }
        "BLOCKED" => {
            let (step, consumed) = eval_direction(board, id, &args[1..], ctx)?;
            let blocked = !board.entity_at(pos.offset(step)).kind.is_floor();
            Ok((blocked, consumed + 1))
        }
        // Both spellings are accepted in scripts.
        "ALLIGNED" | "ALIGNED" => {
            let player = board.player_pos();
            Ok((pos.x == player.x || pos.y == player.y, 1))
        }
        "CONTACT" => {
            let player = board.player_pos();
            let adjacent = (pos.x - player.x).abs() + (pos.y - player.y).abs() == 1;
            Ok((adjacent, 1))
        }
        "ENERGIZED" => Ok((ctx.state.energizer_cycles > 0, 1)),
        "ANY" => {
            let kind = parse_kind(require(args.get(1), "if any")?)?;
            let width = BOARD_WIDTH as usize;
            let found = (0..FIELD_LEN).any(|index| {
                board
                    .entity_at(Position::new((index % width) as i16, (index / width) as i16))
                    .kind
                    == kind
            });
            Ok((found, 2))
        }
        _ => Ok((ctx.state.flags.contains(&first.to_ascii_lowercase()), 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;
    use crate::script::ProgramBuffer;
    use crate::world::test_support::with_test_ctx;

    fn scripted_object(board: &mut Board, pos: Position, text: &str) -> ThingId {
        let id = board.spawn_kind(EntityKind::Object, pos, 0x0e).unwrap();
        let pid = board.add_program(ProgramBuffer::from_text(text));
        board.attach_program(id, pid);
        id
    }

    #[test]
    fn give_and_take_adjust_counters() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n");
            assert_eq!(exec(board, id, "give ammo 5", ctx), Ok(Flow::Advance));
            assert_eq!(ctx.state.ammo, 5);
            assert_eq!(exec(board, id, "take ammo 3", ctx), Ok(Flow::Advance));
            assert_eq!(ctx.state.ammo, 2);
        });
    }

    #[test]
    fn take_below_zero_leaves_counter_and_runs_fallback() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n:broke\n#end\n");
            ctx.state.gems = 2;
            exec(board, id, "take gems 5 broke", ctx).unwrap();
            assert_eq!(ctx.state.gems, 2);
            // The fallback was an implicit self-send.
            assert_eq!(board.thing(id).unwrap().script.ip, 5);
        });
    }

    #[test]
    fn unknown_counter_is_an_error() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n");
            assert_eq!(
                exec(board, id, "give mana 5", ctx),
                Err(ScriptError::UnknownCounter("MANA".to_string()))
            );
        });
    }

    #[test]
    fn become_replaces_the_thing_in_place() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let pos = Position::new(5, 5);
            let id = scripted_object(board, pos, "#end\n");
            assert_eq!(exec(board, id, "become lion", ctx), Ok(Flow::Halt));
            assert_eq!(board.entity_at(pos).kind, EntityKind::Lion);
            assert!(!board.alive(id));
        });
    }

    #[test]
    fn change_sweeps_the_whole_field() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n");
            for x in 10..13 {
                board.set_entity(Position::new(x, 7), *Entity::create(EntityKind::Breakable, 0x0e));
            }
            exec(board, id, "change breakable solid", ctx).unwrap();
            for x in 10..13 {
                assert_eq!(board.entity_at(Position::new(x, 7)).kind, EntityKind::Solid);
            }
        });
    }

    #[test]
    fn if_blocked_reads_the_adjacent_cell() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n:yes\n#end\n");
            board.set_entity(Position::new(6, 5), *Entity::create(EntityKind::Solid, 0x0e));
            exec(board, id, "if blocked e yes", ctx).unwrap();
            assert_eq!(board.thing(id).unwrap().script.ip, 5);

            // Nothing east of this one: the condition is false, no jump.
            let other = scripted_object(board, Position::new(20, 20), "#end\n:yes\n#end\n");
            exec(board, other, "if blocked e yes", ctx).unwrap();
            assert_eq!(board.thing(other).unwrap().script.ip, 0);
        });
    }

    #[test]
    fn if_not_inverts_flags() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n:dark\n#end\n");
            exec(board, id, "if not lamplit dark", ctx).unwrap();
            assert_eq!(board.thing(id).unwrap().script.ip, 5);

            ctx.state.flags.insert("lamplit".to_string());
            board.thing_mut(id).unwrap().script.ip = 0;
            exec(board, id, "if not lamplit dark", ctx).unwrap();
            assert_eq!(board.thing(id).unwrap().script.ip, 0);
        });
    }

    #[test]
    fn put_places_beyond_the_adjacent_cell() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "#end\n");
            exec(board, id, "put e boulder", ctx).unwrap();
            assert_eq!(board.entity_at(Position::new(6, 5)).kind, EntityKind::Boulder);
        });
    }

    #[test]
    fn lock_blocks_external_labels_until_unlock() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(1, 1), 0x1f);
            let id = scripted_object(board, Position::new(5, 5), "@gate\n#end\n:open\n#end\n");
            exec(board, id, "lock", ctx).unwrap();
            board.send_label("gate", "open", None);
            assert_eq!(board.thing(id).unwrap().script.ip, 0);
            exec(board, id, "unlock", ctx).unwrap();
            board.send_label("gate", "open", None);
            assert_eq!(board.thing(id).unwrap().script.ip, 11);
        });
    }
}
