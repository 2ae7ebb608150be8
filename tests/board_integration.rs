//! Board and world integration tests
//!
//! End-to-end scenarios driven through `World::tick`: item pickup, pushing,
//! doors, energizers, and board transitions.

use gridquest::board::Board;
use gridquest::core::config::EngineConfig;
use gridquest::core::types::{BoardId, Direction, KeyColor, Position};
use gridquest::entity::{Entity, EntityKind};
use gridquest::world::World;

fn world_with(player: Position) -> World {
    let mut world = World::with_seed(EngineConfig::default(), 42);
    let mut board = Board::new();
    board.spawn_kind(EntityKind::Player, player, 0x1f);
    world.add_board(board);
    world
}

#[test]
fn walking_over_a_gem_collects_it() {
    let mut world = world_with(Position::new(5, 5));
    world
        .board_mut()
        .set_entity(Position::new(6, 5), *Entity::create(EntityKind::Gem, 0x0b));

    world.input.right = true;
    world.tick();

    assert_eq!(world.state.gems, 1);
    assert_eq!(world.state.health, 101);
    assert_eq!(world.state.score, 10);
    // The touch consumed the gem and the move followed through.
    assert_eq!(world.board().player_pos(), Position::new(6, 5));
}

#[test]
fn doors_need_the_matching_key() {
    let mut world = world_with(Position::new(5, 5));
    // Red door: high nibble 4.
    world
        .board_mut()
        .set_entity(Position::new(6, 5), *Entity::create(EntityKind::Door, 0x4f));

    world.input.right = true;
    world.tick();
    assert_eq!(world.board().player_pos(), Position::new(5, 5));
    assert_eq!(world.board().entity_at(Position::new(6, 5)).kind, EntityKind::Door);

    world.state.keys.insert(KeyColor::Red);
    world.input.right = true;
    world.tick();
    // The touch opened the door; the player is still in place.
    assert_eq!(world.board().entity_at(Position::new(6, 5)).kind, EntityKind::Empty);
    assert!(world.state.keys.is_empty());

    world.input.right = true;
    world.tick();
    assert_eq!(world.board().player_pos(), Position::new(6, 5));
}

#[test]
fn pushing_a_boulder_row_into_a_wall_fails_atomically() {
    let mut world = world_with(Position::new(2, 5));
    for x in 3..6 {
        world
            .board_mut()
            .set_entity(Position::new(x, 5), *Entity::create(EntityKind::Boulder, 0x0e));
    }
    world
        .board_mut()
        .set_entity(Position::new(6, 5), *Entity::create(EntityKind::Solid, 0x0e));

    world.input.right = true;
    world.tick();

    assert_eq!(world.board().player_pos(), Position::new(2, 5));
    for x in 3..6 {
        assert_eq!(world.board().entity_at(Position::new(x, 5)).kind, EntityKind::Boulder);
    }
}

#[test]
fn energized_contact_scores_instead_of_hurting() {
    let mut world = world_with(Position::new(5, 5));
    world.board_mut().spawn_kind(EntityKind::Lion, Position::new(6, 5), 0x0c);
    world.state.energizer_cycles = 10;

    world.input.right = true;
    world.tick();

    assert_eq!(world.state.health, 100);
    assert_eq!(world.state.score, EntityKind::Lion.points());
    // The lion's cell was vacated by the kill and the move followed through.
    assert_eq!(world.board().player_pos(), Position::new(6, 5));
}

#[test]
fn player_bullets_cross_the_board_and_kill() {
    let mut world = world_with(Position::new(5, 5));
    // Corridor walls so the lion can only meet the bullet head-on.
    for x in 5..11 {
        world
            .board_mut()
            .set_entity(Position::new(x, 4), *Entity::create(EntityKind::Solid, 0x0e));
        world
            .board_mut()
            .set_entity(Position::new(x, 6), *Entity::create(EntityKind::Solid, 0x0e));
    }
    world
        .board_mut()
        .set_entity(Position::new(10, 5), *Entity::create(EntityKind::Solid, 0x0e));
    world.board_mut().spawn_kind(EntityKind::Lion, Position::new(9, 5), 0x0c);
    world.state.ammo = 1;

    world.input.right = true;
    world.input.shoot = true;
    for _ in 0..5 {
        world.tick();
    }

    assert_eq!(world.state.ammo, 0);
    assert_eq!(world.state.score, EntityKind::Lion.points());
    assert_eq!(world.state.health, 100);
}

#[test]
fn board_switch_carries_the_row_across() {
    let mut world = World::with_seed(EngineConfig::default(), 7);
    let mut west = Board::new();
    west.spawn_kind(EntityKind::Player, Position::new(59, 9), 0x1f);
    let mut east = Board::new();
    east.spawn_kind(EntityKind::Player, Position::new(30, 12), 0x1f);

    let a = world.add_board(west);
    let b = world.add_board(east);
    if let Some(board) = world.board_at_mut(a) {
        board.exits[Direction::East.index()] = Some(b);
    }

    world.input.right = true;
    world.tick(); // raises the request
    world.tick(); // applies it
    assert_eq!(world.active_board(), b);
    assert_eq!(world.board().player_pos(), Position::new(0, 9));
}

#[test]
fn bad_board_index_is_rejected() {
    let mut world = world_with(Position::new(5, 5));
    assert!(world.change_active_board(BoardId(3)).is_err());
    assert!(world.change_active_board(BoardId(0)).is_ok());
}

#[test]
fn contact_damage_can_end_the_game() {
    let mut world = world_with(Position::new(5, 5));
    world.state.health = 10;
    world.board_mut().spawn_kind(EntityKind::Lion, Position::new(6, 5), 0x0c);

    world.input.right = true;
    world.tick();

    assert_eq!(world.state.health, 0);
    assert!(world.game_over());
}
