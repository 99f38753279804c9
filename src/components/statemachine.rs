//! Generic per-entity finite state machine.
//!
//! Every behaving entity (actor, command, item icon, tile, camera, global
//! flow) carries exactly one [`StateMachine<S>`] where `S` is a closed enum of
//! the states that entity can be in. The state enum implements [`FsmState`],
//! whose four hooks are the only place observable effects happen.
//!
//! # Lifecycle
//!
//! - `start` – runs once when the state becomes current. Registers signal
//!   subscriptions and snaps one-time values (pose, slot).
//! - `update` – runs every tick while current. Interpolates, and may request a
//!   transition for polled conditions.
//! - `end` – runs once when the state is replaced. Unregisters subscriptions.
//! - `on_signal` – runs when a subscribed signal is delivered. It never
//!   changes the current state itself; it returns the state to switch to and
//!   the machine stores it in `next`.
//!
//! The pending `next` is consumed by
//! [`drive`](crate::systems::statemachine::drive) once per tick, so `end` of
//! the old state always runs before `start` of the new one and both run
//! outside of signal delivery.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug, Clone)]
//! enum Lamp { Off, On }
//!
//! impl FsmState for Lamp {
//!     fn start(&mut self, world: &mut World, entity: Entity) {
//!         listen::<GameBus, Lamp>(world, entity, &[SignalKind::BeatStarted]);
//!     }
//!     fn end(&mut self, world: &mut World, entity: Entity) {
//!         unlisten::<GameBus>(world, entity, &[SignalKind::BeatStarted]);
//!     }
//!     fn on_signal(&self, _: &mut World, _: Entity, _: &Signal) -> Option<Self> {
//!         Some(match self { Lamp::Off => Lamp::On, Lamp::On => Lamp::Off })
//!     }
//! }
//!
//! world.spawn(StateMachine::new(Lamp::Off));
//! ```

use bevy_ecs::prelude::{Component, Entity, World};
use std::fmt;

use crate::events::signal::Signal;

/// Hooks of one state of an entity's machine.
///
/// All hooks receive the full world, so they can read scene resources and
/// other entities. Hooks run on a clone of the stored state; whatever the hook
/// leaves in `self` is written back if the entity still exists.
pub trait FsmState: Clone + fmt::Debug + Send + Sync + 'static {
    fn start(&mut self, _world: &mut World, _entity: Entity) {}

    /// Per-tick behaviour. Returning `Some` requests a transition that will
    /// be processed on the next tick.
    fn update(&mut self, _world: &mut World, _entity: Entity) -> Option<Self> {
        None
    }

    fn end(&mut self, _world: &mut World, _entity: Entity) {}

    /// React to a delivered signal by optionally naming the next state.
    fn on_signal(&self, _world: &mut World, _entity: Entity, _signal: &Signal) -> Option<Self> {
        None
    }
}

/// The current state of an entity plus a pending transition request.
#[derive(Component, Debug, Clone)]
pub struct StateMachine<S: FsmState> {
    /// The active state.
    pub current: S,
    /// Requested next state. Cleared when the drive loop consumes it.
    pub next: Option<S>,
    /// Whether `current.start` has already run.
    pub started: bool,
}

impl<S: FsmState> StateMachine<S> {
    /// A machine that will run `initial.start` on its first drive.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            next: None,
            started: false,
        }
    }

    /// Request a transition; a later request before the next drive wins.
    pub fn transition_to(&mut self, next: S) {
        self.next = Some(next);
    }

    pub fn has_pending(&self) -> bool {
        self.next.is_some()
    }
}
