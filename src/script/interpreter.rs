//! Incremental program execution
//!
//! `run` pumps one thing's program for a bounded instruction budget. Only
//! discrete "step" instructions (crunch commands, moves, single text lines)
//! consume budget; control-only lines (names, labels, comments) are free and
//! simply advance the pointer. Execution stops early at end-of-program, on
//! `#end`/pause, when a forced move is blocked, or when a multi-line text
//! model is produced.

use crate::board::{Board, TickContext};
use crate::core::error::ScriptError;
use crate::core::types::ThingId;
use crate::script::commands;
use crate::script::direction::{self, DirectionContext};
use crate::script::program::{
    SIGIL_COMMAND, SIGIL_COMMENT, SIGIL_LABEL, SIGIL_MOVE, SIGIL_NAME, SIGIL_TRY_MOVE,
};
use crate::script::text::{ScrollLine, ScrollModel};

/// What a command did with the instruction pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Move to the next instruction.
    Advance,
    /// The command set the pointer itself (jump, restart, bind).
    Jumped,
    /// Stop executing this tick; the pointer is already where it belongs.
    Halt,
    /// Stay on this instruction and retry next tick (blocked forced move).
    Retry,
}

/// Execute up to `cycles` discrete instructions of the thing's program.
pub fn run(board: &mut Board, id: ThingId, cycles: i32, ctx: &mut TickContext) {
    let mut budget = cycles;
    loop {
        let Some(thing) = board.thing(id) else { return };
        if thing.dead || thing.script.paused {
            return;
        }
        let ip = thing.script.ip;
        if ip < 0 {
            return;
        }
        let Some(pid) = thing.program else { return };
        let program = board.program(pid);
        let Some(line) = program.line_at(ip) else {
            // End of program.
            return;
        };
        let line = line.to_vec();
        let next = program.next_line(ip);

        match line.first().copied() {
            // Control-only lines are free.
            None | Some(SIGIL_NAME) | Some(SIGIL_LABEL) | Some(SIGIL_COMMENT) => {
                set_ip(board, id, next);
            }
            Some(SIGIL_COMMAND) => {
                if budget <= 0 {
                    return;
                }
                budget -= 1;
                let text = String::from_utf8_lossy(&line[1..]).to_string();
                match commands::exec(board, id, &text, ctx) {
                    Ok(Flow::Advance) => set_ip(board, id, next),
                    Ok(Flow::Jumped) => {}
                    Ok(Flow::Halt) => return,
                    Ok(Flow::Retry) => return,
                    Err(err) => {
                        fault(board, id, ip, &text, err);
                        return;
                    }
                }
            }
            Some(sigil) if sigil == SIGIL_MOVE || sigil == SIGIL_TRY_MOVE => {
                if budget <= 0 {
                    return;
                }
                budget -= 1;
                // Movement tokens pack several to a line (`/n/n/e`); the
                // pointer advances token by token.
                let token_end = line[1..]
                    .iter()
                    .position(|&b| b == SIGIL_MOVE || b == SIGIL_TRY_MOVE)
                    .map(|p| p + 1)
                    .unwrap_or(line.len());
                let token = String::from_utf8_lossy(&line[1..token_end]).to_string();
                let words: Vec<&str> = token.split_whitespace().collect();
                let step = {
                    let (pos, flow) = match board.thing(id) {
                        Some(t) => (t.pos, t.step),
                        None => return,
                    };
                    let seek = board.seek_step(pos, ctx);
                    let mut dctx = DirectionContext {
                        seek,
                        flow,
                        rng: &mut *ctx.rng,
                    };
                    match direction::eval(&words, &mut dctx) {
                        Ok((step, _)) => step,
                        Err(err) => {
                            fault(board, id, ip, &token, err);
                            return;
                        }
                    }
                };
                let after_token = if token_end == line.len() {
                    next
                } else {
                    ip + token_end as i16
                };
                let moved = step.is_idle() || board.move_thing(id, step, ctx);
                if moved || sigil == SIGIL_TRY_MOVE {
                    set_ip(board, id, after_token);
                } else {
                    // Forced move stays put and retries next tick.
                    return;
                }
            }
            _ => {
                if budget <= 0 {
                    return;
                }
                // Contiguous run of text/menu lines.
                let mut lines = vec![];
                let mut scan = ip;
                loop {
                    match board.program(pid).line_at(scan) {
                        Some(l) if is_text_line(l) => {
                            lines.push(String::from_utf8_lossy(l).to_string());
                            scan = board.program(pid).next_line(scan);
                        }
                        _ => break,
                    }
                }
                if lines.len() == 1 {
                    budget -= 1;
                    let line = ScrollLine::parse(&lines[0]);
                    if !line.text.is_empty() {
                        board.show_message(line.text, ctx);
                    }
                    set_ip(board, id, scan);
                } else {
                    // A scrollable model ends this thing's turn; the outer
                    // layer takes over the display.
                    let title = board
                        .thing_name(id)
                        .unwrap_or_else(|| "Interaction".to_string());
                    ctx.requests.scroll = Some(ScrollModel {
                        title,
                        lines: lines.iter().map(|l| ScrollLine::parse(l)).collect(),
                        source: id,
                    });
                    set_ip(board, id, scan);
                    return;
                }
            }
        }
    }
}

fn is_text_line(line: &[u8]) -> bool {
    !matches!(
        line.first().copied(),
        Some(SIGIL_NAME)
            | Some(SIGIL_LABEL)
            | Some(SIGIL_COMMENT)
            | Some(SIGIL_COMMAND)
            | Some(SIGIL_MOVE)
            | Some(SIGIL_TRY_MOVE)
    )
}

fn set_ip(board: &mut Board, id: ThingId, ip: i16) {
    if let Some(thing) = board.thing_mut(id) {
        thing.script.ip = ip;
    }
}

/// A malformed line pauses the offending thing; the simulation continues
/// for everyone else.
fn fault(board: &mut Board, id: ThingId, ip: i16, text: &str, err: ScriptError) {
    tracing::warn!(thing = id.0, ip, line = text, error = %err, "script fault; pausing thing");
    if let Some(thing) = board.thing_mut(id) {
        thing.script.paused = true;
    }
}
