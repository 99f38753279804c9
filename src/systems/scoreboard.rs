//! Scoreboard service and the back-to-menu action.

use bevy_ecs::prelude::*;
use log::info;

use crate::events::signal::Signal;
use crate::resources::beatclock::BeatClock;
use crate::resources::scoreboard::Scoreboard;
use crate::resources::signalbus::{GameBus, publish};

/// Scoreboard service listener.
///
/// Every beat copies the clock's move counter; `FallFinished` reveals the
/// board.
pub fn on_scoreboard_signal(world: &mut World, _service: Entity, signal: &Signal) {
    match signal {
        Signal::BeatStarted(_) => {
            let moves = world.resource::<BeatClock>().moves_completed();
            world.resource_mut::<Scoreboard>().record(moves);
        }
        Signal::FallFinished => {
            let mut board = world.resource_mut::<Scoreboard>();
            board.visible = true;
            info!("scoreboard: {} moves, {}", board.moves, board.comment);
        }
        _ => {}
    }
}

/// The player asked to leave the game scene.
pub fn back_to_menu(world: &mut World) {
    publish::<GameBus>(world, Signal::GameOver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::signal::SignalKind;
    use crate::resources::signalbus::{SignalBus, subscribe};

    #[test]
    fn tracks_moves_and_reveals_on_fall_finished() {
        let mut world = World::new();
        world.insert_resource(SignalBus::<GameBus>::new());
        world.insert_resource(BeatClock::new(0.5));
        world.init_resource::<Scoreboard>();
        let service = world.spawn_empty().id();
        for kind in [SignalKind::BeatStarted, SignalKind::FallFinished] {
            subscribe::<GameBus>(&mut world, kind, service, on_scoreboard_signal);
        }

        world.resource_mut::<BeatClock>().accumulate(0.5 * 23.0);
        loop {
            let next = world.resource_mut::<BeatClock>().next_beat();
            let Some(beat) = next else { break };
            publish::<GameBus>(&mut world, Signal::BeatStarted(beat));
        }
        assert_eq!(world.resource::<Scoreboard>().moves, 12);
        assert_eq!(world.resource::<Scoreboard>().comment, "Not Bad");
        assert!(!world.resource::<Scoreboard>().visible);

        publish::<GameBus>(&mut world, Signal::FallFinished);
        assert!(world.resource::<Scoreboard>().visible);
    }
}
