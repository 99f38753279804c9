//! Follow camera rig.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Camera placement read by the render adapter.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Desired position relative to the followed actor.
    pub offset: Vec3,
    /// Lower bound of the fly speed, in units per second.
    pub min_fly_speed: f32,
}

impl CameraRig {
    pub fn new(offset: Vec3, min_fly_speed: f32) -> Self {
        Self {
            position: offset,
            look_at: Vec3::ZERO,
            offset,
            min_fly_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    FollowActor,
}
