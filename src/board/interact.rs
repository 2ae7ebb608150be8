//! Touch interaction dispatch
//!
//! `interact` is called with the origin and step of every attempted move,
//! before the move itself resolves. It looks up the target entity and
//! dispatches by kind. Handlers irrelevant to the toucher's subtype are
//! no-ops: only the player collects items and opens doors, only projectiles
//! shatter breakables, and so on.

use crate::audio::SoundEffect;
use crate::board::{Board, TickContext};
use crate::core::types::{Direction, KeyColor, Position, Step, ThingId};
use crate::entity::{Entity, EntityKind};
use crate::script;

impl Board {
    /// Touch the cell at `origin + step` on behalf of `toucher`.
    pub fn interact(&mut self, origin: Position, step: Step, toucher: ThingId, ctx: &mut TickContext) {
        let target = origin.offset(step);
        let entity = self.entity_at(target);
        let Some(toucher_kind) = self.thing(toucher).map(|t| t.kind) else {
            return;
        };
        let is_player = toucher_kind == EntityKind::Player;

        match entity.kind {
            EntityKind::EdgeOfBoard => {
                if is_player {
                    if let Some(direction) = Direction::from_step(step) {
                        ctx.requests.board_switch = Some(direction);
                    }
                }
            }
            EntityKind::Forest => {
                if is_player {
                    self.set_entity(target, *Entity::empty());
                    ctx.audio.effect(SoundEffect::Forest);
                    self.show_message("A path is cleared through the forest.", ctx);
                }
            }
            EntityKind::Water => {
                if is_player {
                    ctx.audio.effect(SoundEffect::Water);
                    self.show_message("Your way is blocked by water.", ctx);
                }
            }
            EntityKind::Breakable => {
                if matches!(toucher_kind, EntityKind::Bullet | EntityKind::Star) {
                    self.set_entity(target, *Entity::empty());
                    ctx.audio.effect(SoundEffect::Shatter);
                }
            }
            EntityKind::Invisible => {
                if is_player {
                    self.set_entity(target, *Entity::create(EntityKind::Normal, entity.color));
                    self.show_message("You are blocked by an invisible wall.", ctx);
                }
            }
            EntityKind::Ammo => {
                if is_player {
                    ctx.state.ammo += ctx.config.ammo_per_pickup;
                    self.set_entity(target, *Entity::empty());
                    ctx.audio.effect(SoundEffect::Ammo);
                }
            }
            EntityKind::Torch => {
                if is_player {
                    ctx.state.torches += 1;
                    self.set_entity(target, *Entity::empty());
                    ctx.audio.effect(SoundEffect::Torch);
                }
            }
            EntityKind::Gem => {
                if is_player {
                    ctx.state.gems += 1;
                    ctx.state.health += 1;
                    ctx.state.score += ctx.config.gem_score;
                    self.set_entity(target, *Entity::empty());
                    ctx.audio.effect(SoundEffect::Gem);
                }
            }
            EntityKind::Energizer => {
                if is_player {
                    ctx.state.energizer_cycles = ctx.config.energizer_cycles;
                    self.set_entity(target, *Entity::empty());
                    ctx.audio.effect(SoundEffect::Energizer);
                    self.send_label("all", "energize", None);
                }
            }
            EntityKind::Key => {
                if is_player {
                    let color = KeyColor::from_nibble(entity.color & 0x07);
                    if ctx.state.keys.contains(&color) {
                        self.show_message(format!("You already have a {} key!", color.name()), ctx);
                    } else {
                        ctx.state.keys.insert(color);
                        self.set_entity(target, *Entity::empty());
                        ctx.audio.effect(SoundEffect::Key);
                        self.show_message(format!("You now have the {} key.", color.name()), ctx);
                    }
                }
            }
            EntityKind::Door => {
                if is_player {
                    let color = KeyColor::from_nibble((entity.color >> 4) & 0x07);
                    if ctx.state.keys.remove(&color) {
                        self.set_entity(target, *Entity::empty());
                        ctx.audio.effect(SoundEffect::DoorOpen);
                        self.show_message(format!("The {} door is now open.", color.name()), ctx);
                    } else {
                        ctx.audio.effect(SoundEffect::DoorLocked);
                        self.show_message(format!("The {} door is locked!", color.name()), ctx);
                    }
                }
            }
            EntityKind::Scroll => {
                if is_player {
                    if let Some(id) = entity.thing {
                        ctx.audio.effect(SoundEffect::Scroll);
                        // One-shot display of the scroll's text, then gone.
                        script::run(self, id, 1, ctx);
                        self.delete_thing(id);
                    }
                }
            }
            EntityKind::Object => {
                if is_player {
                    if let Some(id) = entity.thing {
                        self.seek_thing_label(id, "touch");
                    }
                }
            }
            EntityKind::Player => {
                // An enemy or projectile reached the player.
                if toucher_kind.is_enemy() {
                    self.attack_player(toucher, ctx);
                } else if matches!(toucher_kind, EntityKind::Bullet | EntityKind::Star) {
                    let from_player = match self.thing(toucher).map(|t| t.data) {
                        Some(crate::thing::ThingData::Bullet { from_player }) => from_player,
                        _ => false,
                    };
                    if !from_player {
                        self.hurt_player(ctx);
                    }
                    self.delete_thing(toucher);
                }
            }
            kind if kind.is_enemy() => {
                // The player walked into an enemy: same exchange as the
                // enemy reaching the player.
                if is_player {
                    if let Some(enemy) = entity.thing {
                        self.attack_player(enemy, ctx);
                    }
                }
            }
            EntityKind::Star => {
                if is_player {
                    if let Some(star) = entity.thing {
                        self.hurt_player(ctx);
                        self.delete_thing(star);
                    }
                }
            }
            _ => {}
        }
    }

    /// Resolve contact between `attacker` and the player. While energized
    /// the attacker dies for points; otherwise it dies dealing damage.
    pub fn attack_player(&mut self, attacker: ThingId, ctx: &mut TickContext) {
        let kind = match self.thing(attacker) {
            Some(t) => t.kind,
            None => return,
        };
        if ctx.state.energizer_cycles > 0 {
            ctx.state.score += kind.points();
            ctx.audio.effect(SoundEffect::EnemyDown);
        } else {
            self.hurt_player(ctx);
        }
        self.delete_thing(attacker);
    }

    /// Apply contact damage to the player.
    pub fn hurt_player(&mut self, ctx: &mut TickContext) {
        if ctx.state.energizer_cycles > 0 {
            return;
        }
        ctx.state.health -= ctx.config.contact_damage;
        ctx.audio.effect(SoundEffect::Ouch);
        self.show_message("Ouch!", ctx);
    }
}
