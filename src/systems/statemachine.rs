//! Drive loop and signal plumbing for [`StateMachine`] components.
//!
//! - [`drive`] – advance one entity's machine by one tick
//! - [`drive_all`] – drive every entity carrying a `StateMachine<S>`
//! - [`deliver_to_state`] – generic bus callback that forwards a signal to the
//!   current state's `on_signal` and stores the result as pending
//! - [`listen`] / [`unlisten`] – (un)subscribe an entity's machine on a bus
//! - [`restart`] – put a (pooled) entity back into a fresh initial state
//!
//! # Drive order within one tick
//!
//! 1. never started → run `start` of the current state
//! 2. a transition is pending → `end` old, replace, `start` new
//! 3. always run `update`; a returned state becomes pending for next tick

use bevy_ecs::prelude::{Entity, With, World};
use log::{debug, warn};

use crate::components::statemachine::{FsmState, StateMachine};
use crate::events::signal::{Signal, SignalKind};
use crate::resources::signalbus::{self, BusScope};

fn current_of<S: FsmState>(world: &World, entity: Entity) -> Option<S> {
    world
        .get::<StateMachine<S>>(entity)
        .map(|m| m.current.clone())
}

fn store_current<S: FsmState>(world: &mut World, entity: Entity, state: S) {
    if let Some(mut machine) = world.get_mut::<StateMachine<S>>(entity) {
        machine.current = state;
    }
}

fn run_start<S: FsmState>(world: &mut World, entity: Entity, mut state: S) {
    debug!("fsm {:?}: start {:?}", entity, state);
    state.start(world, entity);
    store_current(world, entity, state);
}

fn run_end<S: FsmState>(world: &mut World, entity: Entity, mut state: S) {
    debug!("fsm {:?}: end {:?}", entity, state);
    state.end(world, entity);
}

/// Advance the machine of `entity` by one tick.
///
/// Does nothing if the entity is gone or has no `StateMachine<S>`. A hook
/// that despawns its own entity ends the tick for that entity.
pub fn drive<S: FsmState>(world: &mut World, entity: Entity) {
    let Some(mut machine) = world.get_mut::<StateMachine<S>>(entity) else {
        return;
    };
    if !machine.started {
        machine.started = true;
        let state = machine.current.clone();
        run_start(world, entity, state);
    }

    let pending = match world.get_mut::<StateMachine<S>>(entity) {
        Some(mut machine) => machine.next.take(),
        None => return,
    };
    if let Some(next) = pending {
        let Some(previous) = current_of::<S>(world, entity) else {
            return;
        };
        run_end(world, entity, previous);
        store_current(world, entity, next.clone());
        run_start(world, entity, next);
    }

    let Some(mut state) = current_of::<S>(world, entity) else {
        return;
    };
    let requested = state.update(world, entity);
    if let Some(mut machine) = world.get_mut::<StateMachine<S>>(entity) {
        machine.current = state;
        if let Some(next) = requested {
            machine.next = Some(next);
        }
    }
}

/// Drive every entity carrying a `StateMachine<S>`.
///
/// The entity list is collected up front; entities spawned by a hook are first
/// driven on the following tick.
pub fn drive_all<S: FsmState>(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<StateMachine<S>>>()
        .iter(world)
        .collect();
    for entity in entities {
        drive::<S>(world, entity);
    }
}

/// Bus callback forwarding `signal` to the listening entity's current state.
pub fn deliver_to_state<S: FsmState>(world: &mut World, entity: Entity, signal: &Signal) {
    let Some(state) = current_of::<S>(world, entity) else {
        warn!("fsm {:?}: got {:?} without a state machine", entity, signal);
        return;
    };
    if let Some(next) = state.on_signal(world, entity, signal)
        && let Some(mut machine) = world.get_mut::<StateMachine<S>>(entity)
    {
        machine.transition_to(next);
    }
}

/// Subscribe `entity`'s machine to every kind in `kinds` on bus `B`.
pub fn listen<B: BusScope, S: FsmState>(world: &mut World, entity: Entity, kinds: &[SignalKind]) {
    for kind in kinds {
        signalbus::subscribe::<B>(world, *kind, entity, deliver_to_state::<S>);
    }
}

/// Unsubscribe `entity` from every kind in `kinds` on bus `B`.
pub fn unlisten<B: BusScope>(world: &mut World, entity: Entity, kinds: &[SignalKind]) {
    for kind in kinds {
        signalbus::unsubscribe::<B>(world, *kind, entity);
    }
}

/// Replace the state of `entity` with `state` as if freshly spawned.
///
/// The old state's `end` runs first when it had started. The new state's
/// `start` runs on the next drive.
pub fn restart<S: FsmState>(world: &mut World, entity: Entity, state: S) {
    let Some(machine) = world.get::<StateMachine<S>>(entity) else {
        warn!("fsm {:?}: cannot restart without a state machine", entity);
        return;
    };
    if machine.started {
        let previous = machine.current.clone();
        run_end(world, entity, previous);
    }
    if let Some(mut machine) = world.get_mut::<StateMachine<S>>(entity) {
        *machine = StateMachine::new(state);
    }
}
