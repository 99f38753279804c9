//! Follow camera.
//!
//! The camera chases the actor's pose in frame time, not beat time: it
//! flies a fraction of the remaining distance each tick, proportional to
//! that distance, and snaps once it is within one tick of minimum speed.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::actor::Actor;
use crate::components::camera::{CameraRig, CameraState};
use crate::components::pose::Pose;
use crate::components::scenetag::SceneTag;
use crate::components::statemachine::{FsmState, StateMachine};
use crate::resources::worldtime::WorldTime;
use crate::systems::statemachine::drive_all;

fn actor_focus(world: &mut World) -> Option<Vec3> {
    world
        .query_filtered::<&Pose, With<Actor>>()
        .iter(world)
        .next()
        .map(|pose| pose.position)
}

/// Move `from` toward `to` by at most `max_step`.
fn move_towards(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        to
    } else {
        from + delta / distance * max_step
    }
}

impl FsmState for CameraState {
    fn start(&mut self, world: &mut World, entity: Entity) {
        let Some(focus) = actor_focus(world) else {
            return;
        };
        if let Some(mut rig) = world.get_mut::<CameraRig>(entity) {
            rig.position = focus + rig.offset;
            rig.look_at = focus;
        }
    }

    fn update(&mut self, world: &mut World, entity: Entity) -> Option<Self> {
        let dt = world.resource::<WorldTime>().delta;
        let focus = actor_focus(world)?;
        let mut rig = world.get_mut::<CameraRig>(entity)?;
        let target = focus + rig.offset;
        let distance = rig.position.distance(target);
        rig.position = if distance <= rig.min_fly_speed * dt {
            target
        } else {
            move_towards(rig.position, target, distance * dt * rig.min_fly_speed)
        };
        rig.look_at = focus;
        None
    }
}

pub fn spawn_camera(world: &mut World, offset: Vec3, min_fly_speed: f32) -> Entity {
    world
        .spawn((
            CameraRig::new(offset, min_fly_speed),
            StateMachine::new(CameraState::FollowActor),
            SceneTag::Game,
        ))
        .id()
}

pub fn drive_camera(world: &mut World) {
    drive_all::<CameraState>(world);
}
