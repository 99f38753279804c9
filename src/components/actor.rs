//! Grid-walking actor.
//!
//! The [`Actor`] component holds the logical grid cell and heading. The
//! visual [`Pose`](crate::components::pose::Pose) is derived from it only in
//! state `start` hooks (snaps) and interpolated in between.
//!
//! The behaviour lives in [`ActorState`], driven by
//! [`drive_actor`](crate::systems::actor::drive_actor).

use bevy_ecs::prelude::Component;
use glam::{IVec2, Vec3};
use serde::Serialize;

/// Cardinal heading on the grid. North is +z, east is +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

impl Heading {
    pub fn turn_left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::East => Heading::North,
            Heading::South => Heading::East,
            Heading::West => Heading::South,
        }
    }

    pub fn turn_right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// Pose yaw in degrees.
    pub fn yaw(self) -> f32 {
        match self {
            Heading::North => 0.0,
            Heading::East => 90.0,
            Heading::South => 180.0,
            Heading::West => 270.0,
        }
    }

    /// One-cell step as `(dx, dz)`.
    pub fn delta(self) -> IVec2 {
        match self {
            Heading::North => IVec2::new(0, 1),
            Heading::East => IVec2::new(1, 0),
            Heading::South => IVec2::new(0, -1),
            Heading::West => IVec2::new(-1, 0),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub x: i32,
    pub z: i32,
    pub heading: Heading,
}

impl Actor {
    pub fn new(x: i32, z: i32, heading: Heading) -> Self {
        Self { x, z, heading }
    }

    /// Move `cells` along the current heading.
    pub fn step(&mut self, cells: i32) {
        let d = self.heading.delta() * cells;
        self.x += d.x;
        self.z += d.y;
    }

    /// Rest position of the current cell.
    pub fn cell_position(&self) -> Vec3 {
        Vec3::new(self.x as f32, 0.0, self.z as f32)
    }
}

/// The actor's behaviour states.
///
/// ```text
/// Intro ──BoardMove──▶ Idle ──ActorMove──▶ dispatch(head command)
///   └────ActorMove──▶ dispatch
/// dispatch: GoStraight ▶ WalkForward, TurnLeft ▶ TurnLeft, TurnRight ▶ TurnRight
/// WalkForward ──BoardMove──▶ step 1: Fall | LeftTurnTable | Spring | Idle
/// TurnLeft/TurnRight ──BoardMove──▶ rotate: LeftTurnTable | Idle
/// LeftTurnTable ──ActorMove──▶ rotate left, dispatch
/// Spring ──ActorMove──▶ step 2: Fall | dispatch
/// Fall ──any beat──▶ Fallen (absorbing)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActorState {
    Intro,
    Idle,
    WalkForward,
    TurnLeft,
    TurnRight,
    LeftTurnTable,
    Spring,
    Fall,
    Fallen,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    #[test]
    fn turns_are_inverse_permutations() {
        for h in ALL {
            assert_eq!(h.turn_left().turn_right(), h);
            assert_eq!(h.turn_left().turn_left().turn_left().turn_left(), h);
        }
        assert_eq!(Heading::North.turn_left(), Heading::West);
        assert_eq!(Heading::North.turn_right(), Heading::East);
    }

    #[test]
    fn step_follows_heading() {
        let mut actor = Actor::new(0, 0, Heading::North);
        actor.step(1);
        assert_eq!((actor.x, actor.z), (0, 1));
        actor.heading = Heading::West;
        actor.step(2);
        assert_eq!((actor.x, actor.z), (-2, 1));
    }

    #[test]
    fn yaw_matches_heading() {
        let yaws: Vec<f32> = ALL.iter().map(|h| h.yaw()).collect();
        assert_eq!(yaws, vec![0.0, 90.0, 180.0, 270.0]);
    }
}
