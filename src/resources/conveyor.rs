//! Conveyor chains.
//!
//! A [`SlotChain`] is a fixed line of slots. Slot `0` is the spawn slot where
//! new entities enter; slot `len - 1` is the front slot whose successor is the
//! exit. Entities move one slot toward the front per board beat.
//!
//! ```text
//!  spawn                            front
//!  [ 0 ] -> [ 1 ] -> ... -> [len-1] -> exit
//! ```

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotChain {
    len: usize,
    /// Rest position of the spawn slot.
    origin: Vec2,
    /// Distance between consecutive slots.
    spacing: Vec2,
}

impl SlotChain {
    pub fn new(len: usize, origin: Vec2, spacing: Vec2) -> Self {
        debug_assert!(len >= 2, "a conveyor needs a spawn slot and a front slot");
        Self {
            len,
            origin,
            spacing,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn spawn_slot(&self) -> SlotId {
        SlotId(0)
    }

    pub fn front_slot(&self) -> SlotId {
        SlotId(self.len - 1)
    }

    /// The slot after `slot`, or `None` when `slot` is the front slot.
    pub fn next(&self, slot: SlotId) -> Option<SlotId> {
        (slot.0 + 1 < self.len).then_some(SlotId(slot.0 + 1))
    }

    /// Rest position of `slot` in conveyor space.
    pub fn position(&self, slot: SlotId) -> Vec2 {
        self.origin + self.spacing * slot.0 as f32
    }

    /// Slots from the front back to (not including) the spawn slot.
    pub fn fill_order(&self) -> impl Iterator<Item = SlotId> {
        (1..self.len).rev().map(SlotId)
    }
}

/// Anything that owns a [`SlotChain`].
pub trait Belt: Resource {
    fn chain(&self) -> &SlotChain;
}

/// Conveyor carrying the actor's upcoming commands.
#[derive(Resource, Debug, Clone)]
pub struct CommandConveyor {
    pub chain: SlotChain,
    /// Whether the most recently inserted command was a turn.
    pub last_was_turn: bool,
}

impl CommandConveyor {
    pub fn new(slots: usize) -> Self {
        Self {
            chain: SlotChain::new(slots, Vec2::ZERO, Vec2::new(0.0, 1.0)),
            last_was_turn: false,
        }
    }
}

impl Belt for CommandConveyor {
    fn chain(&self) -> &SlotChain {
        &self.chain
    }
}

/// Conveyor carrying clickable item icons.
#[derive(Resource, Debug, Clone)]
pub struct IconConveyor {
    pub chain: SlotChain,
}

impl IconConveyor {
    pub fn new(slots: usize) -> Self {
        Self {
            chain: SlotChain::new(slots, Vec2::ZERO, Vec2::new(1.0, 0.0)),
        }
    }
}

impl Belt for IconConveyor {
    fn chain(&self) -> &SlotChain {
        &self.chain
    }
}
