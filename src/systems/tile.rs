//! Tile systems.
//!
//! - [`TileState`] behaviour for every tile kind
//! - [`spawn_tile`] / [`place`] – grid mutation
//! - [`tile_kind_at`] – what the actor lands on
//! - [`on_grid_signal`] – grid service: applies confirmed placements
//! - [`drive_tiles`] – per-tick drive
//!
//! Replacing a tile never despawns it directly. The old tile is taken off the
//! grid and flagged `pending_destroy`; every tile state polls that flag in
//! `update` and moves to `Destroy`, whose start despawns the entity.

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::animationcue::AnimationCue;
use crate::components::scenetag::SceneTag;
use crate::components::statemachine::{FsmState, StateMachine};
use crate::components::tile::{Tile, TileKind, TileState};
use crate::events::signal::{Signal, SignalKind};
use crate::resources::beatclock::{Beat, BeatClock};
use crate::resources::signalbus::GameBus;
use crate::resources::tilegrid::TileGrid;
use crate::systems::statemachine::{drive_all, listen, unlisten};

const TILE_SIGNALS: [SignalKind; 1] = [SignalKind::BeatStarted];

/// Degrees a turn table rotates per board beat.
const TABLE_TURN: f32 = 90.0;

fn tile(world: &World, entity: Entity) -> Option<Tile> {
    world.get::<Tile>(entity).copied()
}

fn poll_destroy(world: &World, entity: Entity) -> Option<TileState> {
    tile(world, entity)
        .filter(|t| t.pending_destroy)
        .map(|_| TileState::Destroy)
}

fn cue(world: &mut World, entity: Entity, clip: &'static str) {
    let progress = world
        .get_resource::<BeatClock>()
        .map_or(0.0, BeatClock::progress);
    if let Some(mut cue) = world.get_mut::<AnimationCue>(entity) {
        cue.set(clip, progress);
    }
}

fn listens(kind: TileKind, state: &TileState) -> bool {
    match state {
        TileState::Idle => kind != TileKind::Basic,
        TileState::Spin { .. } | TileState::Spring => true,
        TileState::Destroy => false,
    }
}

impl FsmState for TileState {
    fn start(&mut self, world: &mut World, entity: Entity) {
        let Some(t) = tile(world, entity) else {
            return;
        };
        match self {
            TileState::Spin { start_yaw } => *start_yaw = t.table_yaw,
            TileState::Destroy => {
                debug!("tile ({}, {}): destroyed", t.x, t.z);
                world.despawn(entity);
                return;
            }
            TileState::Idle | TileState::Spring => {}
        }
        if listens(t.kind, self) {
            listen::<GameBus, TileState>(world, entity, &TILE_SIGNALS);
        }
    }

    fn update(&mut self, world: &mut World, entity: Entity) -> Option<Self> {
        match self {
            TileState::Spin { start_yaw } => {
                let progress = world.resource::<BeatClock>().progress();
                if let Some(mut t) = world.get_mut::<Tile>(entity) {
                    t.table_yaw = *start_yaw - TABLE_TURN * progress;
                }
            }
            TileState::Spring => cue(world, entity, "SpringBoardSpring"),
            TileState::Idle => cue(world, entity, "SpringBoardIdle"),
            TileState::Destroy => return None,
        }
        poll_destroy(world, entity)
    }

    fn end(&mut self, world: &mut World, entity: Entity) {
        let Some(t) = tile(world, entity) else {
            return;
        };
        if let TileState::Spin { start_yaw } = self
            && let Some(mut t) = world.get_mut::<Tile>(entity)
        {
            t.table_yaw = (*start_yaw - TABLE_TURN).rem_euclid(360.0);
        }
        if listens(t.kind, self) {
            unlisten::<GameBus>(world, entity, &TILE_SIGNALS);
        }
    }

    fn on_signal(&self, world: &mut World, entity: Entity, signal: &Signal) -> Option<Self> {
        let beat = signal.beat()?;
        let kind = tile(world, entity)?.kind;
        match (self, kind, beat) {
            (TileState::Idle, TileKind::TurnTable, Beat::BoardMove) => {
                Some(TileState::Spin { start_yaw: 0.0 })
            }
            (TileState::Idle, TileKind::SpringBoard, Beat::BoardMove) => Some(TileState::Spring),
            (TileState::Spin { .. } | TileState::Spring, _, _) => Some(TileState::Idle),
            _ => None,
        }
    }
}

/// Spawn a tile at `(x, z)` and store it in the grid.
///
/// Any tile already stored there is displaced without being destroyed; use
/// [`place`] for player placements.
pub fn spawn_tile(world: &mut World, x: i32, z: i32, kind: TileKind) -> Entity {
    let mut entity = world.spawn((
        Tile::new(x, z, kind),
        StateMachine::new(TileState::Idle),
        SceneTag::Game,
    ));
    if kind == TileKind::SpringBoard {
        entity.insert(AnimationCue::new("SpringBoardIdle"));
    }
    let entity = entity.id();
    world.resource_mut::<TileGrid>().insert(x, z, entity);
    entity
}

/// Put a new tile of `kind` at `(x, z)`, retiring whatever was there.
pub fn place(world: &mut World, x: i32, z: i32, kind: TileKind) -> Entity {
    if let Some(old) = world.resource_mut::<TileGrid>().remove(x, z)
        && let Some(mut t) = world.get_mut::<Tile>(old)
    {
        t.pending_destroy = true;
    }
    let entity = spawn_tile(world, x, z, kind);
    info!("placed {:?} at ({}, {})", kind, x, z);
    entity
}

pub fn tile_kind_at(world: &World, x: i32, z: i32) -> Option<TileKind> {
    let entity = world.get_resource::<TileGrid>()?.get(x, z)?;
    world.get::<Tile>(entity).map(|t| t.kind)
}

/// Grid service listener.
pub fn on_grid_signal(world: &mut World, _service: Entity, signal: &Signal) {
    if let Signal::ItemLocationSelected { item, x, z } = *signal {
        place(world, x, z, item.into());
    }
}

pub fn drive_tiles(world: &mut World) {
    drive_all::<TileState>(world);
}
