//! Belt lifecycle shared by commands and item icons.
//!
//! Both ride a [`SlotChain`](crate::resources::conveyor::SlotChain) and are
//! pooled, so their states differ only in which chain resource and which pool
//! they use, plus extra signals icons react to. The functions here implement
//! the common [`BeltState`] hooks; the per-species `FsmState` impls in
//! [`crate::systems::command`] and [`crate::systems::itemicon`] delegate to
//! them.
//!
//! ```text
//! Idle ──BoardMove, has successor──▶ Slide ──ActorMove──▶ Idle
//!  └───BoardMove, front slot──▶ Pooled
//! any listening state ──beat after FallStarted──▶ GameOver
//! ```

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::error;

use crate::components::command::BeltState;
use crate::components::conveyed::Conveyed;
use crate::components::statemachine::FsmState;
use crate::events::signal::{Signal, SignalKind};
use crate::resources::beatclock::{Beat, BeatClock};
use crate::resources::conveyor::{Belt, SlotId};
use crate::resources::pool::{Pool, Species};
use crate::resources::signalbus::GameBus;
use crate::systems::statemachine::{drive, listen, restart, unlisten};

/// Signals every listening belt state subscribes to.
pub const BELT_SIGNALS: [SignalKind; 2] = [SignalKind::BeatStarted, SignalKind::FallStarted];

pub fn belt_start<B: Belt, K: Species, S: FsmState>(
    state: &mut BeltState,
    world: &mut World,
    entity: Entity,
    extra: &[SignalKind],
) {
    match state {
        BeltState::Idle => {
            if let Some(mut conveyed) = world.get_mut::<Conveyed>(entity) {
                conveyed.offset = Vec2::ZERO;
            }
            listen::<GameBus, S>(world, entity, &BELT_SIGNALS);
            listen::<GameBus, S>(world, entity, extra);
        }
        BeltState::Slide { start } => {
            let chain = *world.resource::<B>().chain();
            let Some(mut conveyed) = world.get_mut::<Conveyed>(entity) else {
                return;
            };
            let Some(next) = conveyed.slot.and_then(|slot| chain.next(slot)) else {
                error!(
                    "belt {:?}: cannot slide from {:?}, no successor",
                    entity, conveyed.slot
                );
                debug_assert!(false, "slide started without a successor slot");
                return;
            };
            let previous = conveyed.slot.unwrap_or(SlotId(0));
            *start = chain.position(previous) + conveyed.offset - chain.position(next);
            conveyed.slot = Some(next);
            conveyed.offset = *start;
            listen::<GameBus, S>(world, entity, &BELT_SIGNALS);
            listen::<GameBus, S>(world, entity, extra);
        }
        BeltState::Pooled => {
            if let Err(e) = world.resource_mut::<Pool<K>>().release(entity) {
                error!("belt {:?}: {}", entity, e);
                debug_assert!(false, "{e}");
            }
            if let Some(mut conveyed) = world.get_mut::<Conveyed>(entity) {
                conveyed.detach();
            }
        }
        BeltState::GameOver => {}
    }
}

pub fn belt_update(state: &BeltState, world: &mut World, entity: Entity) {
    if let BeltState::Slide { start } = state {
        let progress = world.resource::<BeatClock>().progress();
        if let Some(mut conveyed) = world.get_mut::<Conveyed>(entity) {
            conveyed.offset = start.lerp(Vec2::ZERO, progress);
        }
    }
}

pub fn belt_end(state: &BeltState, world: &mut World, entity: Entity, extra: &[SignalKind]) {
    if matches!(state, BeltState::Idle | BeltState::Slide { .. }) {
        unlisten::<GameBus>(world, entity, &BELT_SIGNALS);
        unlisten::<GameBus>(world, entity, extra);
    }
}

/// Beat and fall handling common to every listening belt state.
pub fn belt_on_signal<B: Belt>(
    state: &BeltState,
    world: &mut World,
    entity: Entity,
    signal: &Signal,
) -> Option<BeltState> {
    match signal {
        Signal::FallStarted => {
            if let Some(mut conveyed) = world.get_mut::<Conveyed>(entity) {
                conveyed.fall_observed = true;
            }
            None
        }
        Signal::BeatStarted(beat) => {
            let conveyed = *world.get::<Conveyed>(entity)?;
            if conveyed.fall_observed {
                return Some(BeltState::GameOver);
            }
            match (state, beat) {
                (BeltState::Idle, Beat::BoardMove) => {
                    let chain = world.resource::<B>().chain();
                    match conveyed.slot.and_then(|slot| chain.next(slot)) {
                        Some(_) => Some(BeltState::Slide { start: Vec2::ZERO }),
                        None => Some(BeltState::Pooled),
                    }
                }
                (BeltState::Slide { .. }, Beat::ActorMove) => Some(BeltState::Idle),
                (BeltState::Slide { .. }, other) => {
                    error!("belt {:?}: {:?} while sliding", entity, other);
                    debug_assert!(false, "slide expects to end on an actor move beat");
                    None
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Put a freshly acquired entity into `slot` and restart it idle.
pub fn activate<S: FsmState>(world: &mut World, entity: Entity, slot: SlotId, idle: S) {
    if let Some(mut conveyed) = world.get_mut::<Conveyed>(entity) {
        conveyed.park(slot);
    }
    restart(world, entity, idle);
}

/// Drive every currently active member of `Pool<K>`.
pub fn drive_belt<K: Species, S: FsmState>(world: &mut World) {
    let Some(pool) = world.get_resource::<Pool<K>>() else {
        return;
    };
    let active: Vec<Entity> = pool.active().to_vec();
    for entity in active {
        drive::<S>(world, entity);
    }
}

/// Active member of `Pool<K>` resting in or sliding into `slot`.
pub fn occupant<K: Species>(world: &World, slot: SlotId) -> Option<Entity> {
    let pool = world.get_resource::<Pool<K>>()?;
    pool.find_active_where(|e| world.get::<Conveyed>(e).and_then(|c| c.slot) == Some(slot))
}
