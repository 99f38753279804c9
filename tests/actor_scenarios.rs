//! Actor scenarios driven through the beat clock and the real drive loops.

use bevy_ecs::prelude::*;
use glam::Vec3;

use tempobot::components::actor::{Actor, ActorState, Heading};
use tempobot::components::animationcue::AnimationCue;
use tempobot::components::command::{BeltState, CommandKind, CommandState};
use tempobot::components::pose::Pose;
use tempobot::components::statemachine::StateMachine;
use tempobot::components::tile::TileKind;
use tempobot::events::signal::{Signal, SignalKind};
use tempobot::resources::beatclock::BeatClock;
use tempobot::resources::conveyor::CommandConveyor;
use tempobot::resources::pool::{self, Pool, PoolEntry};
use tempobot::resources::rng::GameRng;
use tempobot::resources::signalbus::{GameBus, SignalBus, subscribe};
use tempobot::resources::tilegrid::TileGrid;
use tempobot::resources::worldtime::WorldTime;
use tempobot::systems::actor::{drive_actor, spawn_actor};
use tempobot::systems::beatclock::{advance_beat_clock, on_clock_signal};
use tempobot::systems::command::{drive_commands, fill_command_conveyor};
use tempobot::systems::tile::{drive_tiles, spawn_tile};
use tempobot::systems::time::update_world_time;

const EPSILON: f32 = 1e-6;
/// One beat is four ticks.
const DT: f32 = 0.25;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Resource, Default)]
struct Recorded(Vec<Signal>);

fn record(world: &mut World, _: Entity, signal: &Signal) {
    world.resource_mut::<Recorded>().0.push(*signal);
}

fn command(species: CommandKind, weight: u32) -> PoolEntry<CommandKind> {
    PoolEntry {
        species,
        weight,
        seed: 3,
    }
}

/// A game world with only go-straight commands and basic tiles at `cells`.
fn make_world(cells: &[(i32, i32)]) -> World {
    make_world_with(cells, vec![command(CommandKind::GoStraight, 1)])
}

/// Every draw picks `turn`; go-straight only follows as the forced command
/// after it, so the head alternates `turn`, go-straight, `turn`, ...
fn make_turning_world(cells: &[(i32, i32)], turn: CommandKind) -> World {
    make_world_with(
        cells,
        vec![command(CommandKind::GoStraight, 0), command(turn, 1)],
    )
}

fn make_world_with(cells: &[(i32, i32)], commands: Vec<PoolEntry<CommandKind>>) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(SignalBus::<GameBus>::new());
    world.insert_resource(BeatClock::new(1.0));
    world.insert_resource(TileGrid::new());
    world.insert_resource(GameRng::new(Some(1)));
    world.insert_resource(CommandConveyor::new(3));
    world.insert_resource(Pool::new(commands));
    world.init_resource::<Recorded>();

    let clock = world.spawn_empty().id();
    subscribe::<GameBus>(&mut world, SignalKind::FallStarted, clock, on_clock_signal);
    let recorder = world.spawn_empty().id();
    for kind in [SignalKind::FallStarted, SignalKind::FallFinished] {
        subscribe::<GameBus>(&mut world, kind, recorder, record);
    }

    for (x, z) in cells {
        spawn_tile(&mut world, *x, *z, TileKind::Basic);
    }
    pool::seed::<CommandKind>(&mut world);
    fill_command_conveyor(&mut world);
    world
}

fn tick(world: &mut World) {
    update_world_time(world, DT);
    let mut schedule = Schedule::default();
    schedule.add_systems((advance_beat_clock, drive_actor, drive_commands, drive_tiles).chain());
    schedule.run(world);
}

fn run_beats(world: &mut World, beats: u32) {
    for _ in 0..beats * 4 {
        tick(world);
    }
}

fn actor_state(world: &World, actor: Entity) -> ActorState {
    world
        .get::<StateMachine<ActorState>>(actor)
        .map(|m| m.current)
        .unwrap()
}

fn actor(world: &World, actor: Entity) -> Actor {
    *world.get::<Actor>(actor).unwrap()
}

fn count(world: &World, kind: SignalKind) -> usize {
    world
        .resource::<Recorded>()
        .0
        .iter()
        .filter(|s| s.kind() == kind)
        .count()
}

#[test]
fn walks_one_cell_forward() {
    let mut world = make_world(&[(0, 0), (0, 1)]);
    let actor = spawn_actor(&mut world, 0, 0, Heading::North);
    tick(&mut world);
    assert_eq!(actor_state(&world, actor), ActorState::Intro);

    // Intro -> ActorMove: the head command is go-straight.
    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, actor), ActorState::WalkForward);
    assert_eq!(world.get::<AnimationCue>(actor).unwrap().clip, "WalkForward");

    // BoardMove: land on (0, 1).
    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, actor), ActorState::Idle);
    let a = *world.get::<Actor>(actor).unwrap();
    assert_eq!((a.x, a.z, a.heading), (0, 1, Heading::North));

    let pose = world.get::<Pose>(actor).unwrap();
    assert_eq!(pose.position, Vec3::new(0.0, 0.0, 1.0));
    assert!(approx_eq(pose.yaw, 0.0));
    assert_eq!(count(&world, SignalKind::FallStarted), 0);
}

#[test]
fn stepping_off_the_board_falls_once() {
    let mut world = make_world(&[(0, 0)]);
    let actor = spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 2);
    assert_eq!(actor_state(&world, actor), ActorState::Fall);
    assert_eq!(count(&world, SignalKind::FallStarted), 1);
    assert_eq!(count(&world, SignalKind::FallFinished), 0);
    assert!(world.resource::<BeatClock>().is_game_over());

    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, actor), ActorState::Fallen);
    assert_eq!(count(&world, SignalKind::FallFinished), 1);

    // Fallen is absorbing and stays silent.
    run_beats(&mut world, 4);
    assert_eq!(actor_state(&world, actor), ActorState::Fallen);
    assert_eq!(count(&world, SignalKind::FallStarted), 1);
    assert_eq!(count(&world, SignalKind::FallFinished), 1);
}

#[test]
fn moves_stop_counting_after_the_fall() {
    let mut world = make_world(&[(0, 0)]);
    spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 2);
    let moves = world.resource::<BeatClock>().moves_completed();
    assert_eq!(moves, 1);
    run_beats(&mut world, 6);
    assert_eq!(world.resource::<BeatClock>().moves_completed(), moves);
}

#[test]
fn commands_freeze_after_the_fall() {
    let mut world = make_world(&[(0, 0)]);
    spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 4);
    let mut states = world.query::<&StateMachine<CommandState>>();
    let frozen = states
        .iter(&world)
        .filter(|m| m.current == CommandState(BeltState::GameOver))
        .count();
    assert!(frozen > 0);
}

#[test]
fn springboard_jumps_two_cells() {
    let mut world = make_world(&[(0, 0), (0, 2), (0, 3)]);
    spawn_tile(&mut world, 0, 1, TileKind::SpringBoard);
    let actor = spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 2);
    assert_eq!(actor_state(&world, actor), ActorState::Spring);

    // The jump lands on the actor beat and dispatches the next command.
    run_beats(&mut world, 1);
    let a = *world.get::<Actor>(actor).unwrap();
    assert_eq!((a.x, a.z), (0, 3));
    assert_eq!(actor_state(&world, actor), ActorState::WalkForward);
}

#[test]
fn turn_left_rotates_in_place_on_the_board_beat() {
    let mut world = make_turning_world(&[(0, 0)], CommandKind::TurnLeft);
    let entity = spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, entity), ActorState::TurnLeft);
    assert_eq!(actor(&world, entity).heading, Heading::North);

    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, entity), ActorState::Idle);
    let a = actor(&world, entity);
    assert_eq!((a.x, a.z, a.heading), (0, 0, Heading::West));
    assert!(approx_eq(world.get::<Pose>(entity).unwrap().yaw, 270.0));

    // The forced go-straight follows the turn.
    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, entity), ActorState::WalkForward);
}

#[test]
fn turn_right_onto_a_turn_table_gets_an_extra_left_turn() {
    let mut world = make_turning_world(&[], CommandKind::TurnRight);
    spawn_tile(&mut world, 0, 0, TileKind::TurnTable);
    let entity = spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, entity), ActorState::TurnRight);

    run_beats(&mut world, 1);
    assert_eq!(actor_state(&world, entity), ActorState::LeftTurnTable);
    assert_eq!(actor(&world, entity).heading, Heading::East);

    // The table turns the actor back left before the next command.
    run_beats(&mut world, 1);
    assert_eq!(actor(&world, entity).heading, Heading::North);
    assert_eq!(actor_state(&world, entity), ActorState::WalkForward);
    assert_eq!(count(&world, SignalKind::FallStarted), 0);
}

#[test]
fn walking_onto_a_turn_table_turns_left() {
    let mut world = make_world(&[(0, 0)]);
    spawn_tile(&mut world, 0, 1, TileKind::TurnTable);
    let entity = spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 2);
    assert_eq!(actor_state(&world, entity), ActorState::LeftTurnTable);
    let a = actor(&world, entity);
    assert_eq!((a.x, a.z, a.heading), (0, 1, Heading::North));

    run_beats(&mut world, 1);
    let a = actor(&world, entity);
    assert_eq!((a.x, a.z, a.heading), (0, 1, Heading::West));
    assert_eq!(actor_state(&world, entity), ActorState::WalkForward);
}

#[test]
fn springboard_without_a_landing_cell_falls() {
    let mut world = make_world(&[(0, 0), (0, 2)]);
    spawn_tile(&mut world, 0, 1, TileKind::SpringBoard);
    let entity = spawn_actor(&mut world, 0, 0, Heading::North);

    run_beats(&mut world, 2);
    assert_eq!(actor_state(&world, entity), ActorState::Spring);

    run_beats(&mut world, 1);
    let a = actor(&world, entity);
    assert_eq!((a.x, a.z), (0, 3));
    assert_eq!(actor_state(&world, entity), ActorState::Fall);
    assert_eq!(count(&world, SignalKind::FallStarted), 1);
    assert!(world.resource::<BeatClock>().is_game_over());
}
