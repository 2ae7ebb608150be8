//! Direction expressions
//!
//! Movement and shooting commands accept a small grammar: zero or more
//! transform words followed by a base word, e.g. `OPP CW SEEK`. Transforms
//! are applied right-to-left, so the transform nearest the base applies
//! first.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::ScriptError;
use crate::core::types::Step;

/// Ambient values a direction expression can refer to.
pub struct DirectionContext<'a> {
    /// Unit step toward the player (already inverted while energized).
    pub seek: Step,
    /// The evaluating thing's current walk step.
    pub flow: Step,
    pub rng: &'a mut ChaCha8Rng,
}

/// Evaluate a direction expression at the front of `words`.
/// Returns the resulting step and how many words were consumed.
pub fn eval(words: &[&str], ctx: &mut DirectionContext) -> Result<(Step, usize), ScriptError> {
    let mut transforms = vec![];
    for (i, word) in words.iter().enumerate() {
        if let Some(base) = parse_base(word, ctx) {
            let mut step = base;
            for transform in transforms.into_iter().rev() {
                step = apply_transform(transform, step, ctx);
            }
            return Ok((step, i + 1));
        }
        if let Some(transform) = parse_transform(word) {
            transforms.push(transform);
        } else {
            return Err(ScriptError::BadDirection(word.to_string()));
        }
    }
    Err(ScriptError::BadDirection(words.join(" ")))
}

#[derive(Debug, Clone, Copy)]
enum Transform {
    Clockwise,
    Counterwise,
    Opposite,
    RandomPerpendicular,
}

fn parse_base(word: &str, ctx: &mut DirectionContext) -> Option<Step> {
    let upper = word.to_ascii_uppercase();
    Some(match upper.as_str() {
        "N" | "NORTH" => Step::new(0, -1),
        "S" | "SOUTH" => Step::new(0, 1),
        "E" | "EAST" => Step::new(1, 0),
        "W" | "WEST" => Step::new(-1, 0),
        "I" | "IDLE" => Step::IDLE,
        "SEEK" => ctx.seek,
        "FLOW" => ctx.flow,
        "RND" => {
            let all = [Step::new(0, -1), Step::new(0, 1), Step::new(1, 0), Step::new(-1, 0)];
            all[ctx.rng.gen_range(0..4)]
        }
        "RNDNS" => {
            if ctx.rng.gen() {
                Step::new(0, -1)
            } else {
                Step::new(0, 1)
            }
        }
        "RNDNE" => {
            if ctx.rng.gen() {
                Step::new(0, -1)
            } else {
                Step::new(1, 0)
            }
        }
        _ => return None,
    })
}

fn parse_transform(word: &str) -> Option<Transform> {
    let upper = word.to_ascii_uppercase();
    Some(match upper.as_str() {
        "CW" | "CLOCKWISE" => Transform::Clockwise,
        "CCW" | "COUNTERWISE" => Transform::Counterwise,
        "OPP" | "OPPOSITE" => Transform::Opposite,
        "RNDP" => Transform::RandomPerpendicular,
        _ => return None,
    })
}

fn apply_transform(transform: Transform, step: Step, ctx: &mut DirectionContext) -> Step {
    match transform {
        Transform::Clockwise => step.clockwise(),
        Transform::Counterwise => step.counterwise(),
        Transform::Opposite => step.opposite(),
        Transform::RandomPerpendicular => {
            if ctx.rng.gen() {
                step.clockwise()
            } else {
                step.counterwise()
            }
        }
    }
}
