//! Signal types exchanged over the scene-scoped signal buses.
//!
//! Signals are the only way state machines learn about each other: the beat
//! clock, the actor, the conveyors and the global flow never call into one
//! another directly, they publish a [`signal::Signal`] on a
//! [`SignalBus`](crate::resources::signalbus::SignalBus) and whoever
//! subscribed reacts.
//!
//! Submodules:
//! - [`signal`] – the signal enum and its payload-free kind tag
pub mod signal;
