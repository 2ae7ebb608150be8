//! Gridquest - runtime simulation core for a tile-based adventure game
//!
//! A 60x25 board of flyweight tile entities, optionally backed by behavioral
//! "things" (the player, enemies, projectiles, scripted objects), driven by a
//! cooperative per-cycle tick and an embedded line-oriented scripting language.

pub mod audio;
pub mod board;
pub mod core;
pub mod entity;
pub mod render;
pub mod script;
pub mod thing;
pub mod world;
