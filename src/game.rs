//! Runtime facade: one [`World`] plus the per-tick [`Schedule`].
//!
//! Adapters drive the game through [`GameRuntime`]: write pointer input, call
//! the UI actions, then [`tick`](GameRuntime::tick) with the frame delta.
//!
//! Tick order:
//!
//! 1. world time
//! 2. global flow (scene loads happen here)
//! 3. boot loader
//! 4. beat clock, which publishes `BeatStarted`
//! 5. placement input
//! 6. drive loops: actor, commands, item icons, tiles, camera
//!
//! A long frame is split into sub-steps of half a beat, so every entity sees
//! each beat in its own pass of the drive loops.

use bevy_ecs::prelude::*;
use log::warn;
use serde::Serialize;

use crate::components::actor::{Actor, ActorState, Heading};
use crate::components::command::CommandKind;
use crate::components::flow::{FlowState, Loader};
use crate::components::itemicon::ItemKind;
use crate::components::statemachine::StateMachine;
use crate::resources::beatclock::{Beat, BeatClock};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::PointerInput;
use crate::resources::scoreboard::Scoreboard;
use crate::resources::signalbus::{AppBus, SignalBus};
use crate::resources::tilegrid::TileGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::actor::drive_actor;
use crate::systems::beatclock::advance_beat_clock;
use crate::systems::camera::drive_camera;
use crate::systems::command::{conveyor_commands, drive_commands};
use crate::systems::flow::{drive_flow, flow_state, press_start, spawn_flow};
use crate::systems::itemicon::{click_icon, conveyor_icons, drive_item_icons};
use crate::systems::loader::run_loader;
use crate::systems::placement::update_placement;
use crate::systems::scoreboard::back_to_menu;
use crate::systems::tile::drive_tiles;
use crate::systems::time::update_world_time;

/// Snapshot of a running session, for logs and the CLI report.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub flow: Option<FlowState>,
    pub ticks: u64,
    pub elapsed: f32,
    pub beat: Option<Beat>,
    pub moves: u32,
    pub comment: &'static str,
    pub game_over: bool,
    pub actor: Option<ActorReport>,
    pub tiles: usize,
    pub commands: Vec<CommandKind>,
    pub icons: Vec<ItemKind>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActorReport {
    pub x: i32,
    pub z: i32,
    pub heading: Heading,
    pub state: ActorState,
}

pub struct GameRuntime {
    world: World,
    schedule: Schedule,
}

impl GameRuntime {
    pub fn new(config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(config);
        world.insert_resource(PointerInput::default());
        world.insert_resource(SignalBus::<AppBus>::new());
        spawn_flow(&mut world);
        world.spawn(Loader::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                drive_flow,
                run_loader,
                advance_beat_clock,
                update_placement,
                drive_actor,
                drive_commands,
                drive_item_icons,
                drive_tiles,
                drive_camera,
            )
                .chain(),
        );

        Self { world, schedule }
    }

    /// Advance the game by `dt` seconds.
    ///
    /// Runs the schedule once per sub-step; `WorldTime::ticks` counts
    /// sub-steps.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() {
            warn!("runtime: ignoring non-finite frame delta {dt}");
            return;
        }
        let max_step = self.max_step();
        let mut remaining = dt;
        while remaining > max_step {
            self.step(max_step);
            remaining -= max_step;
        }
        self.step(remaining);
    }

    fn step(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
    }

    /// Longest sub-step that crosses at most one beat boundary.
    fn max_step(&self) -> f32 {
        let period = match self.world.get_resource::<BeatClock>() {
            Some(clock) => clock.period(),
            None => self
                .world
                .get_resource::<GameConfig>()
                .map_or(0.0, |config| config.seconds_per_beat),
        };
        if period > 0.0 {
            period * 0.5
        } else {
            f32::INFINITY
        }
    }

    /// Pointer state for the next tick.
    pub fn set_pointer(&mut self, input: PointerInput) {
        self.world.insert_resource(input);
    }

    pub fn press_start(&mut self) {
        press_start(&mut self.world);
    }

    pub fn click_icon(&mut self, icon: Entity) {
        click_icon(&mut self.world, icon);
    }

    pub fn back_to_menu(&mut self) {
        back_to_menu(&mut self.world);
    }

    pub fn flow_state(&mut self) -> Option<FlowState> {
        flow_state(&mut self.world)
    }

    /// Item icons on the conveyor, for the input adapter to hit-test.
    pub fn icons(&self) -> Vec<(Entity, ItemKind)> {
        conveyor_icons(&self.world)
    }

    /// The actor has finished falling and the scoreboard is showing.
    pub fn run_finished(&self) -> bool {
        self.world
            .get_resource::<Scoreboard>()
            .is_some_and(|board| board.visible)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn report(&mut self) -> SessionReport {
        let flow = self.flow_state();
        let actor = self
            .world
            .query::<(&Actor, &StateMachine<ActorState>)>()
            .iter(&self.world)
            .next()
            .map(|(actor, machine)| ActorReport {
                x: actor.x,
                z: actor.z,
                heading: actor.heading,
                state: machine.current,
            });
        let time = *self.world.resource::<WorldTime>();
        let clock = self.world.get_resource::<BeatClock>();
        let board = self
            .world
            .get_resource::<Scoreboard>()
            .cloned()
            .unwrap_or_default();

        SessionReport {
            flow,
            ticks: time.ticks,
            elapsed: time.elapsed,
            beat: clock.map(BeatClock::current),
            moves: board.moves,
            comment: board.comment,
            game_over: clock.is_some_and(BeatClock::is_game_over),
            actor,
            tiles: self.world.get_resource::<TileGrid>().map_or(0, TileGrid::len),
            commands: conveyor_commands(&self.world)
                .into_iter()
                .map(|(_, kind)| kind)
                .collect(),
            icons: self.icons().into_iter().map(|(_, item)| item).collect(),
        }
    }
}
