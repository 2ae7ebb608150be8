//! Audio boundary
//!
//! The simulation never synthesizes sound. It queues discrete note/effect
//! events onto a `SoundQueue` that the host's audio callback drains on its
//! own thread. The queue's mutex is the only cross-boundary shared resource:
//! every mutation acquires and releases it for just the duration of the
//! mutation, never across a full tick.

pub mod play;

pub use play::{parse_play, NoteEvent};

use std::sync::{Arc, Mutex};

/// Discrete sound effects produced by gameplay. Each maps to a fixed note
/// pattern; scripts can also queue arbitrary patterns via `#play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Gem,
    Ammo,
    Torch,
    Energizer,
    Key,
    DoorOpen,
    DoorLocked,
    Push,
    Shoot,
    Ouch,
    Forest,
    Water,
    Shatter,
    EnemyDown,
    Scroll,
    TimeLow,
}

impl SoundEffect {
    /// (priority, pattern) for this effect. Higher priority interrupts.
    fn pattern(self) -> (u8, &'static str) {
        match self {
            SoundEffect::Gem => (2, "t+c-gec"),
            SoundEffect::Ammo => (2, "tcc#d"),
            SoundEffect::Torch => (2, "tcase"),
            SoundEffect::Energizer => (9, "s.-cd#e+f#gd#efd#bga#bga#"),
            SoundEffect::Key => (2, "t+cegcegceg+sc"),
            SoundEffect::DoorOpen => (3, "tcgbcgb+ic"),
            SoundEffect::DoorLocked => (3, "t--gc"),
            SoundEffect::Push => (2, "t--f"),
            SoundEffect::Shoot => (2, "t+f#b"),
            SoundEffect::Ouch => (4, "t--ct+cd#"),
            SoundEffect::Forest => (3, "ta"),
            SoundEffect::Water => (3, "t+c+c"),
            SoundEffect::Shatter => (2, "t-c"),
            SoundEffect::EnemyDown => (2, "sc--c"),
            SoundEffect::Scroll => (2, "tcegc#fg#df#ad#ga#eg#+c"),
            SoundEffect::TimeLow => (5, "i.+cfc-f+cfq.c"),
        }
    }
}

/// One queued effect: what happened plus the notes to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfxEvent {
    pub effect: Option<SoundEffect>,
    pub priority: u8,
    pub notes: Vec<NoteEvent>,
}

#[derive(Debug, Default)]
struct QueueInner {
    events: Vec<SfxEvent>,
    current_priority: u8,
}

/// The note queue shared with the host audio subsystem.
///
/// Cloning shares the underlying queue.
#[derive(Debug, Clone, Default)]
pub struct SoundQueue {
    inner: Arc<Mutex<QueueInner>>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a built-in effect.
    pub fn effect(&self, effect: SoundEffect) {
        let (priority, pattern) = effect.pattern();
        self.push(SfxEvent {
            effect: Some(effect),
            priority,
            notes: parse_play(pattern),
        });
    }

    /// Queue an arbitrary `#play` pattern.
    pub fn play(&self, priority: u8, notes: Vec<NoteEvent>) {
        self.push(SfxEvent {
            effect: None,
            priority,
            notes,
        });
    }

    fn push(&self, event: SfxEvent) {
        let mut inner = self.inner.lock().expect("audio queue poisoned");
        // A louder effect interrupts whatever is queued; quieter ones are
        // dropped rather than delaying it.
        if event.priority >= inner.current_priority {
            inner.current_priority = event.priority;
            inner.events.push(event);
        }
    }

    /// Called by the world at the start of a tick.
    pub fn begin_tick(&self) {
        // Nothing queued yet this tick outranks anything.
        let mut inner = self.inner.lock().expect("audio queue poisoned");
        inner.current_priority = 0;
    }

    /// Called by the world at the end of a tick. The host may drain at any
    /// point afterwards.
    pub fn end_tick(&self) {}

    /// Take everything queued so far. Called from the host audio callback.
    pub fn drain(&self) -> Vec<SfxEvent> {
        let mut inner = self.inner.lock().expect("audio queue poisoned");
        inner.current_priority = 0;
        std::mem::take(&mut inner.events)
    }

    #[cfg(test)]
    pub fn queued_effects(&self) -> Vec<SoundEffect> {
        let inner = self.inner.lock().expect("audio queue poisoned");
        inner.events.iter().filter_map(|e| e.effect).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_priority_is_dropped_within_a_tick() {
        let queue = SoundQueue::new();
        queue.begin_tick();
        queue.effect(SoundEffect::Energizer); // priority 9
        queue.effect(SoundEffect::Gem); // priority 2, dropped
        queue.end_tick();
        assert_eq!(queue.queued_effects(), vec![SoundEffect::Energizer]);
    }

    #[test]
    fn drain_resets_the_queue() {
        let queue = SoundQueue::new();
        queue.begin_tick();
        queue.effect(SoundEffect::Shoot);
        assert_eq!(queue.drain().len(), 1);
        assert!(queue.drain().is_empty());
    }
}
