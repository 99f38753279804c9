//! Actor controller.
//!
//! Implements [`ActorState`]: the actor commits to the head command on the
//! actor beat and lands on the board beat. Grid position and heading change
//! inside signal handling (they decide the next state); the visual pose only
//! snaps when the next state starts.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::actor::{Actor, ActorState, Heading};
use crate::components::animationcue::AnimationCue;
use crate::components::command::CommandKind;
use crate::components::pose::Pose;
use crate::components::scenetag::SceneTag;
use crate::components::statemachine::{FsmState, StateMachine};
use crate::components::tile::TileKind;
use crate::events::signal::{Signal, SignalKind};
use crate::resources::beatclock::{Beat, BeatClock};
use crate::resources::signalbus::{GameBus, publish};
use crate::systems::command::head_command;
use crate::systems::statemachine::{drive_all, listen, unlisten};
use crate::systems::tile::tile_kind_at;

const ACTOR_SIGNALS: [SignalKind; 1] = [SignalKind::BeatStarted];

impl ActorState {
    fn clip(self) -> &'static str {
        match self {
            ActorState::Intro | ActorState::Idle => "Idle",
            ActorState::WalkForward => "WalkForward",
            ActorState::TurnLeft => "TurnLeft",
            ActorState::TurnRight => "TurnRight",
            ActorState::LeftTurnTable => "LeftTurnTable",
            ActorState::Spring => "Spring",
            ActorState::Fall => "Fall",
            ActorState::Fallen => "Fallen",
        }
    }

    fn listens(self) -> bool {
        !matches!(self, ActorState::Fallen)
    }
}

/// Next state for the head command.
fn dispatch(world: &World) -> Option<ActorState> {
    match head_command(world) {
        Some(CommandKind::GoStraight) => Some(ActorState::WalkForward),
        Some(CommandKind::TurnLeft) => Some(ActorState::TurnLeft),
        Some(CommandKind::TurnRight) => Some(ActorState::TurnRight),
        None => {
            error!("actor: no command in the front slot");
            debug_assert!(false, "the front slot must hold a command on every actor beat");
            None
        }
    }
}

fn wrong_beat(state: ActorState, beat: Beat) -> Option<ActorState> {
    error!("actor: unexpected {:?} beat in {:?}", beat, state);
    debug_assert!(false, "{state:?} does not expect a {beat:?} beat");
    None
}

/// Move `cells` ahead and pick the landing state.
fn land(world: &mut World, entity: Entity, cells: i32) -> Option<Actor> {
    let mut actor = world.get_mut::<Actor>(entity)?;
    actor.step(cells);
    Some(*actor)
}

fn turn(world: &mut World, entity: Entity, rotate: fn(Heading) -> Heading) -> Option<Actor> {
    let mut actor = world.get_mut::<Actor>(entity)?;
    actor.heading = rotate(actor.heading);
    Some(*actor)
}

fn snap(world: &mut World, entity: Entity, with_yaw: bool) {
    let Some(actor) = world.get::<Actor>(entity).copied() else {
        return;
    };
    if let Some(mut pose) = world.get_mut::<Pose>(entity) {
        pose.position = actor.cell_position();
        if with_yaw {
            pose.yaw = actor.heading.yaw();
        }
    }
}

impl FsmState for ActorState {
    fn start(&mut self, world: &mut World, entity: Entity) {
        match self {
            ActorState::Intro => {}
            ActorState::Fall => {
                snap(world, entity, false);
                info!("actor: falling");
                publish::<GameBus>(world, Signal::FallStarted);
            }
            ActorState::Fallen => {
                snap(world, entity, false);
                publish::<GameBus>(world, Signal::FallFinished);
            }
            _ => snap(world, entity, true),
        }
        if self.listens() {
            listen::<GameBus, ActorState>(world, entity, &ACTOR_SIGNALS);
        }
    }

    fn update(&mut self, world: &mut World, entity: Entity) -> Option<Self> {
        let progress = world.resource::<BeatClock>().progress();
        if let Some(mut cue) = world.get_mut::<AnimationCue>(entity) {
            cue.set(self.clip(), progress);
        }
        None
    }

    fn end(&mut self, world: &mut World, entity: Entity) {
        if self.listens() {
            unlisten::<GameBus>(world, entity, &ACTOR_SIGNALS);
        }
    }

    fn on_signal(&self, world: &mut World, entity: Entity, signal: &Signal) -> Option<Self> {
        let beat = signal.beat()?;
        match (*self, beat) {
            (ActorState::Intro, Beat::BoardMove) => Some(ActorState::Idle),
            (ActorState::Intro | ActorState::Idle, Beat::ActorMove) => dispatch(world),
            (ActorState::WalkForward, Beat::BoardMove) => {
                let actor = land(world, entity, 1)?;
                Some(match tile_kind_at(world, actor.x, actor.z) {
                    None => ActorState::Fall,
                    Some(TileKind::TurnTable) => ActorState::LeftTurnTable,
                    Some(TileKind::SpringBoard) => ActorState::Spring,
                    Some(TileKind::Basic) => ActorState::Idle,
                })
            }
            (ActorState::TurnLeft | ActorState::TurnRight, Beat::BoardMove) => {
                let rotate = if *self == ActorState::TurnLeft {
                    Heading::turn_left
                } else {
                    Heading::turn_right
                };
                let actor = turn(world, entity, rotate)?;
                Some(match tile_kind_at(world, actor.x, actor.z) {
                    Some(TileKind::TurnTable) => ActorState::LeftTurnTable,
                    _ => ActorState::Idle,
                })
            }
            (ActorState::LeftTurnTable, Beat::ActorMove) => {
                turn(world, entity, Heading::turn_left)?;
                dispatch(world)
            }
            (ActorState::Spring, Beat::ActorMove) => {
                let actor = land(world, entity, 2)?;
                match tile_kind_at(world, actor.x, actor.z) {
                    None => Some(ActorState::Fall),
                    Some(_) => dispatch(world),
                }
            }
            (ActorState::Fall, _) => Some(ActorState::Fallen),
            (ActorState::Fallen, _) => None,
            (state, beat) => wrong_beat(state, beat),
        }
    }
}

/// Spawn the actor at `(x, z)` in its intro state.
pub fn spawn_actor(world: &mut World, x: i32, z: i32, heading: Heading) -> Entity {
    let actor = Actor::new(x, z, heading);
    world
        .spawn((
            actor,
            Pose::new(actor.cell_position(), heading.yaw()),
            AnimationCue::new("Idle"),
            StateMachine::new(ActorState::Intro),
            SceneTag::Game,
        ))
        .id()
}

pub fn drive_actor(world: &mut World) {
    drive_all::<ActorState>(world);
}
