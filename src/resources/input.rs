//! Per-tick pointer input resource.
//!
//! The input adapter owns hit-testing. Before each tick it writes whether the
//! primary button went down or up this tick and where the pointer ray meets
//! the board plane, then the placement system consumes it.
use bevy_ecs::prelude::*;
use glam::Vec3;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// The primary button went down this tick.
    pub pressed: bool,
    /// The primary button went up this tick.
    pub released: bool,
    /// Board-plane hit of the pointer ray, if it hits the board at all.
    pub world_hit: Option<Vec3>,
}

impl PointerInput {
    /// Clear edge flags once they have been consumed. The hit point persists.
    pub fn clear_edges(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}
