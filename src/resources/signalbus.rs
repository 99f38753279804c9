//! Scene-scoped publish/subscribe signal bus.
//!
//! The [`SignalBus`] resource maps each [`SignalKind`] to the ordered list of
//! [`Listener`]s subscribed to it. Three independent buses exist, one per
//! lifecycle scope, distinguished by a marker type:
//!
//! - [`AppBus`] – lives for the whole process (global flow, loader)
//! - [`MenuBus`] – inserted when the menu scene loads, removed on unload
//! - [`GameBus`] – inserted when the game scene loads, removed on unload
//!
//! A signal published on one bus is never visible on another.
//!
//! # Delivery
//!
//! [`publish`] snapshots the listener list for the signal's kind and then calls
//! every callback in subscription order with `&mut World`. Because the
//! snapshot is taken first, callbacks may subscribe, unsubscribe or publish
//! further signals without corrupting the registry. A listener added during
//! delivery does not receive the signal currently being delivered.
//!
//! # Listener identity
//!
//! A listener is identified by the entity it was registered for. Each entity
//! subscribes at most once per kind; subscribing twice is a caller error that
//! results in duplicate delivery. Entities that are not game objects (the beat
//! clock, the grid, the spawners) subscribe through scene service entities,
//! see [`Service`](crate::components::service::Service).

use bevy_ecs::prelude::{Entity, Resource, World};
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;

use crate::events::signal::{Signal, SignalKind};

/// Marker trait for the lifecycle scope a bus belongs to.
pub trait BusScope: Send + Sync + 'static {
    /// Short name used in log lines.
    const NAME: &'static str;
}

/// Process-wide bus used by the global flow.
pub struct AppBus;
/// Bus owned by the menu scene.
pub struct MenuBus;
/// Bus owned by the game scene.
pub struct GameBus;

impl BusScope for AppBus {
    const NAME: &'static str = "app";
}
impl BusScope for MenuBus {
    const NAME: &'static str = "menu";
}
impl BusScope for GameBus {
    const NAME: &'static str = "game";
}

/// Function pointer invoked for every delivered signal.
///
/// # Parameters
///
/// - `&mut World` – full world access, including the bus itself
/// - `Entity` – the entity the listener was registered for
/// - `&Signal` – the signal being delivered
pub type SignalCallback = fn(&mut World, Entity, &Signal);

/// One subscription: who listens and what to call.
#[derive(Clone, Copy)]
pub struct Listener {
    pub entity: Entity,
    pub callback: SignalCallback,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

/// Listener registry for one scope.
#[derive(Resource)]
pub struct SignalBus<S: BusScope> {
    listeners: FxHashMap<SignalKind, Vec<Listener>>,
    _scope: PhantomData<fn() -> S>,
}

impl<S: BusScope> Default for SignalBus<S> {
    fn default() -> Self {
        Self {
            listeners: FxHashMap::default(),
            _scope: PhantomData,
        }
    }
}

impl<S: BusScope> fmt::Debug for SignalBus<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus")
            .field("scope", &S::NAME)
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<S: BusScope> SignalBus<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `kind`.
    pub fn subscribe(&mut self, kind: SignalKind, entity: Entity, callback: SignalCallback) {
        let listeners = self.listeners.entry(kind).or_default();
        if listeners.iter().any(|l| l.entity == entity) {
            warn!(
                "{} bus: {:?} subscribed twice to {:?}, it will be invoked twice",
                S::NAME,
                entity,
                kind
            );
        }
        listeners.push(Listener { entity, callback });
    }

    /// Remove the listener registered for `entity` under `kind`.
    ///
    /// Returns `false` (and logs a warning) when there was nothing to remove.
    /// When the last listener of a kind is removed the kind entry itself is
    /// dropped.
    pub fn unsubscribe(&mut self, kind: SignalKind, entity: Entity) -> bool {
        let Some(listeners) = self.listeners.get_mut(&kind) else {
            warn!(
                "{} bus: {:?} unsubscribed from {:?} without a subscription",
                S::NAME,
                entity,
                kind
            );
            return false;
        };
        let Some(index) = listeners.iter().position(|l| l.entity == entity) else {
            warn!(
                "{} bus: {:?} is not subscribed to {:?}",
                S::NAME,
                entity,
                kind
            );
            return false;
        };
        listeners.remove(index);
        if listeners.is_empty() {
            self.listeners.remove(&kind);
        }
        true
    }

    /// Listeners for `kind` in subscription order.
    pub fn listeners(&self, kind: SignalKind) -> &[Listener] {
        self.listeners.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Whether `entity` currently listens to `kind`.
    pub fn is_subscribed(&self, kind: SignalKind, entity: Entity) -> bool {
        self.listeners(kind).iter().any(|l| l.entity == entity)
    }

    /// Whether any listener exists for `kind`.
    pub fn has_kind(&self, kind: SignalKind) -> bool {
        self.listeners.contains_key(&kind)
    }

    /// Total number of subscriptions across all kinds.
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Subscribe `entity` on the `S` bus, if that bus is live.
pub fn subscribe<S: BusScope>(
    world: &mut World,
    kind: SignalKind,
    entity: Entity,
    callback: SignalCallback,
) {
    match world.get_resource_mut::<SignalBus<S>>() {
        Some(mut bus) => bus.subscribe(kind, entity, callback),
        None => warn!(
            "{} bus is not live, {:?} cannot subscribe to {:?}",
            S::NAME,
            entity,
            kind
        ),
    }
}

/// Unsubscribe `entity` from the `S` bus. A missing bus counts as a no-op.
pub fn unsubscribe<S: BusScope>(world: &mut World, kind: SignalKind, entity: Entity) -> bool {
    match world.get_resource_mut::<SignalBus<S>>() {
        Some(mut bus) => bus.unsubscribe(kind, entity),
        None => {
            warn!(
                "{} bus is not live, {:?} cannot unsubscribe from {:?}",
                S::NAME,
                entity,
                kind
            );
            false
        }
    }
}

/// Deliver `signal` synchronously to every `S` listener of its kind.
///
/// Silent no-op when the bus is not live or nobody listens.
pub fn publish<S: BusScope>(world: &mut World, signal: Signal) {
    let kind = signal.kind();
    let snapshot: SmallVec<[Listener; 8]> = match world.get_resource::<SignalBus<S>>() {
        Some(bus) => bus.listeners(kind).iter().copied().collect(),
        None => {
            trace!("{} bus is not live, dropping {:?}", S::NAME, signal);
            return;
        }
    };
    debug!(
        "{} bus: {:?} -> {} listener(s)",
        S::NAME,
        signal,
        snapshot.len()
    );
    for listener in snapshot {
        (listener.callback)(world, listener.entity, &signal);
    }
}
