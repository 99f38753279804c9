//! World-space pose of a grid-walking entity.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Position and heading yaw consumed by the render adapter.
///
/// `yaw` is in degrees, clockwise from north (+z).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}
