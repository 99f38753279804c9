//! Beat clock systems.
//!
//! - [`advance_beat_clock`] – feeds the tick delta into the [`BeatClock`] and
//!   publishes one `BeatStarted` per phase boundary crossed
//! - [`on_clock_signal`] – clock service callback; `FallStarted` ends move
//!   counting

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::events::signal::Signal;
use crate::resources::beatclock::BeatClock;
use crate::resources::signalbus::{GameBus, publish};
use crate::resources::worldtime::WorldTime;

/// Advance the clock by this tick's delta.
///
/// Several boundaries may be crossed in one call; each produces its own
/// `BeatStarted`, in order, and listeners see the clock already in that phase.
/// Does nothing outside the game scene.
pub fn advance_beat_clock(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    match world.get_resource_mut::<BeatClock>() {
        Some(mut clock) => clock.accumulate(dt),
        None => return,
    }
    loop {
        let beat = match world.get_resource_mut::<BeatClock>() {
            Some(mut clock) => clock.next_beat(),
            None => None,
        };
        let Some(beat) = beat else {
            break;
        };
        debug!("beat clock: {:?}", beat);
        publish::<GameBus>(world, Signal::BeatStarted(beat));
    }
}

/// Clock service listener.
pub fn on_clock_signal(world: &mut World, _service: Entity, signal: &Signal) {
    if let Signal::FallStarted = signal
        && let Some(mut clock) = world.get_resource_mut::<BeatClock>()
    {
        info!(
            "beat clock: game over after {} moves",
            clock.moves_completed()
        );
        clock.set_game_over();
    }
}
