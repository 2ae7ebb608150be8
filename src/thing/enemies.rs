//! Roaming enemy behaviors.
//!
//! Each enemy rolls its intelligence (or an equivalent parameter) against a
//! fixed die to decide between hunting the player and acting randomly.
//! Contact resolution itself lives in the board's interaction dispatch: an
//! enemy stepping onto the player is the same exchange as the player
//! stepping onto the enemy.

use rand::Rng;

use crate::audio::SoundEffect;
use crate::board::{Board, TickContext};
use crate::core::types::{Direction, Position, Step, ThingId};
use crate::entity::{Entity, EntityKind};
use crate::thing::{random_step, ThingData};

pub fn exec(board: &mut Board, id: ThingId, ctx: &mut TickContext) {
    let Some(thing) = board.thing(id) else { return };
    if thing.dead {
        return;
    }
    match thing.data {
        ThingData::Lion { intelligence } => lion(board, id, intelligence, ctx),
        ThingData::Tiger {
            intelligence,
            firing_rate,
        } => tiger(board, id, intelligence, firing_rate, ctx),
        ThingData::Bear { sensitivity } => bear(board, id, sensitivity, ctx),
        ThingData::Ruffian {
            intelligence,
            rest_rate,
        } => ruffian(board, id, intelligence, rest_rate, ctx),
        ThingData::Slime {
            spread_rate,
            countdown,
        } => slime(board, id, spread_rate, countdown, ctx),
        ThingData::Shark { intelligence } => shark(board, id, intelligence, ctx),
        _ => {}
    }
}

fn hunt_or_wander(board: &Board, pos: Position, intelligence: u8, ctx: &mut TickContext) -> Step {
    if ctx.rng.gen_range(0..10) < intelligence as u32 {
        board.seek_step(pos, ctx)
    } else {
        random_step(ctx.rng)
    }
}

fn lion(board: &mut Board, id: ThingId, intelligence: u8, ctx: &mut TickContext) {
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let step = hunt_or_wander(board, pos, intelligence, ctx);
    board.move_thing(id, step, ctx);
}

/// A lion that also shoots when it shares a row or column with the player.
fn tiger(board: &mut Board, id: ThingId, intelligence: u8, firing_rate: u8, ctx: &mut TickContext) {
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let player = board.player_pos();
    let aligned = pos.x == player.x || pos.y == player.y;
    if aligned && ctx.rng.gen_range(0..20) < firing_rate as u32 {
        let aim = Step::new(
            (player.x - pos.x).signum(),
            (player.y - pos.y).signum(),
        );
        board.make_bullet(pos, aim, false, false, ctx);
    }
    let step = hunt_or_wander(board, pos, intelligence, ctx);
    board.move_thing(id, step, ctx);
}

/// Bears sit still until the player strays near their row or column, then
/// lumber straight at them. Walking into a breakable wall destroys both.
fn bear(board: &mut Board, id: ThingId, sensitivity: u8, ctx: &mut TickContext) {
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let player = board.player_pos();
    let reach = 8i16.saturating_sub(sensitivity as i16);
    let step = if (pos.y - player.y).abs() <= reach {
        Step::new((player.x - pos.x).signum(), 0)
    } else if (pos.x - player.x).abs() <= reach {
        Step::new(0, (player.y - pos.y).signum())
    } else {
        Step::IDLE
    };
    if step.is_idle() {
        return;
    }
    let target = pos.offset(step);
    if board.entity_at(target).kind == EntityKind::Breakable {
        board.set_entity(target, *Entity::empty());
        board.delete_thing(id);
        ctx.audio.effect(SoundEffect::Shatter);
        return;
    }
    board.move_thing(id, step, ctx);
}

/// Ruffians alternate rests and dashes, picking a fresh heading each time
/// they set off and stopping early when blocked or when the rest roll hits.
fn ruffian(
    board: &mut Board,
    id: ThingId,
    intelligence: u8,
    rest_rate: u8,
    ctx: &mut TickContext,
) {
    let Some(thing) = board.thing(id) else { return };
    let pos = thing.pos;
    let step = thing.step;
    if step.is_idle() {
        if ctx.rng.gen_range(0..17) <= rest_rate as u32 {
            let heading = hunt_or_wander(board, pos, intelligence, ctx);
            if let Some(t) = board.thing_mut(id) {
                t.step = heading;
            }
        }
        return;
    }
    let player = board.player_pos();
    let aligned = pos.x == player.x || pos.y == player.y;
    if aligned && ctx.rng.gen_range(0..10) < intelligence as u32 {
        let seek = board.seek_step(pos, ctx);
        if let Some(t) = board.thing_mut(id) {
            t.step = seek;
        }
    }
    let step = board.thing(id).map(|t| t.step).unwrap_or_default();
    let moved = board.move_thing(id, step, ctx);
    if !board.alive(id) {
        return;
    }
    if !moved || ctx.rng.gen_range(0..17) <= rest_rate as u32 {
        if let Some(t) = board.thing_mut(id) {
            t.step = Step::IDLE;
        }
    }
}

/// Slime oozes outward on a countdown, hardening into a breakable wall
/// behind the new growths.
fn slime(board: &mut Board, id: ThingId, spread_rate: u8, countdown: u8, _ctx: &mut TickContext) {
    if countdown < spread_rate {
        if let Some(thing) = board.thing_mut(id) {
            thing.data = ThingData::Slime {
                spread_rate,
                countdown: countdown + 1,
            };
        }
        return;
    }
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let color = board.entity_at(pos).color;
    let mut spread = false;
    for direction in Direction::ALL {
        let target = pos.offset(direction.to_step());
        if target.in_range() && board.entity_at(target).kind.is_floor() {
            board.spawn_kind(EntityKind::Slime, target, color);
            spread = true;
        }
    }
    if spread {
        board.replace_thing_with_entity(id, *Entity::create(EntityKind::Breakable, color));
    } else if let Some(thing) = board.thing_mut(id) {
        thing.data = ThingData::Slime {
            spread_rate,
            countdown: 0,
        };
    }
}

/// Sharks swim only through water, invisible to everything on land.
fn shark(board: &mut Board, id: ThingId, intelligence: u8, ctx: &mut TickContext) {
    let Some(pos) = board.thing(id).map(|t| t.pos) else { return };
    let step = hunt_or_wander(board, pos, intelligence, ctx);
    board.move_thing(id, step, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_support::with_test_ctx;

    #[test]
    fn smart_lions_close_in_on_the_player() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(10, 5), 0x1f);
            let id = board
                .spawn(
                    EntityKind::Lion,
                    Position::new(5, 5),
                    0x0c,
                    ThingData::Lion { intelligence: 10 },
                )
                .unwrap();
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(6, 5));
        });
    }

    #[test]
    fn lion_reaching_the_player_deals_contact_damage_and_dies() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(6, 5), 0x1f);
            let id = board
                .spawn(
                    EntityKind::Lion,
                    Position::new(5, 5),
                    0x0c,
                    ThingData::Lion { intelligence: 10 },
                )
                .unwrap();
            exec(board, id, ctx);
            assert!(!board.alive(id));
            assert_eq!(ctx.state.health, 90);
        });
    }

    #[test]
    fn bears_charge_along_their_row() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(10, 5), 0x1f);
            let id = board
                .spawn(
                    EntityKind::Bear,
                    Position::new(5, 5),
                    0x06,
                    ThingData::Bear { sensitivity: 4 },
                )
                .unwrap();
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(6, 5));
        });
    }

    #[test]
    fn distant_bears_stay_put() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(50, 20), 0x1f);
            let id = board
                .spawn(
                    EntityKind::Bear,
                    Position::new(5, 5),
                    0x06,
                    ThingData::Bear { sensitivity: 8 },
                )
                .unwrap();
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(5, 5));
        });
    }

    #[test]
    fn bears_trade_themselves_for_breakable_walls() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(10, 5), 0x1f);
            let wall = Position::new(6, 5);
            board.set_entity(wall, *Entity::create(EntityKind::Breakable, 0x0e));
            let id = board
                .spawn(
                    EntityKind::Bear,
                    Position::new(5, 5),
                    0x06,
                    ThingData::Bear { sensitivity: 4 },
                )
                .unwrap();
            exec(board, id, ctx);
            assert!(!board.alive(id));
            assert_eq!(board.entity_at(wall).kind, EntityKind::Empty);
        });
    }

    #[test]
    fn slime_spreads_then_hardens() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(20, 20), 0x1f);
            let pos = Position::new(5, 5);
            let id = board
                .spawn(
                    EntityKind::Slime,
                    pos,
                    0x0a,
                    ThingData::Slime {
                        spread_rate: 0,
                        countdown: 0,
                    },
                )
                .unwrap();
            exec(board, id, ctx);
            assert!(!board.alive(id));
            assert_eq!(board.entity_at(pos).kind, EntityKind::Breakable);
            for direction in Direction::ALL {
                let target = pos.offset(direction.to_step());
                assert_eq!(board.entity_at(target).kind, EntityKind::Slime);
            }
        });
    }

    #[test]
    fn sharks_never_leave_the_water() {
        with_test_ctx(|board, ctx| {
            board.spawn_kind(EntityKind::Player, Position::new(10, 5), 0x1f);
            let pos = Position::new(5, 5);
            board.set_entity(pos, *Entity::create(EntityKind::Water, 0x1f));
            let id = board
                .spawn(
                    EntityKind::Shark,
                    pos,
                    0x17,
                    ThingData::Shark { intelligence: 10 },
                )
                .unwrap();
            // Dry land all around: the shark stays where it is.
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, pos);

            board.set_entity(Position::new(6, 5), *Entity::create(EntityKind::Water, 0x1f));
            exec(board, id, ctx);
            assert_eq!(board.thing(id).unwrap().pos, Position::new(6, 5));
        });
    }
}
