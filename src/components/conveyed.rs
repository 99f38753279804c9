//! Slot occupancy of an entity riding a conveyor chain.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::resources::conveyor::SlotId;

/// Where a conveyed entity sits and how far it is drawn from its slot.
///
/// Shared by commands and item icons. The rendered position is the slot's
/// rest position plus `offset`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Conveyed {
    /// Occupied slot, `None` while pooled.
    pub slot: Option<SlotId>,
    /// Local offset from the slot's rest position.
    pub offset: Vec2,
    /// Set once this entity has seen `FallStarted`; the next beat ends its run.
    pub fall_observed: bool,
}

impl Conveyed {
    /// Occupy `slot` at rest.
    pub fn park(&mut self, slot: SlotId) {
        self.slot = Some(slot);
        self.offset = Vec2::ZERO;
        self.fall_observed = false;
    }

    pub fn detach(&mut self) {
        self.slot = None;
        self.offset = Vec2::ZERO;
    }
}
