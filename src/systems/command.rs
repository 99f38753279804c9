//! Command conveyor systems.
//!
//! - [`CommandState`] behaviour, delegating to the shared belt hooks
//! - [`on_command_spawner_signal`] – spawner service: one command per board beat
//! - [`fill_command_conveyor`] – initial fill at scene load
//! - [`head_command`] – what the actor should do next
//! - [`drive_commands`] – per-tick drive of active commands

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::components::command::{BeltState, Command, CommandKind, CommandState};
use crate::components::conveyed::Conveyed;
use crate::components::scenetag::SceneTag;
use crate::components::statemachine::{FsmState, StateMachine};
use crate::events::signal::Signal;
use crate::resources::beatclock::{Beat, BeatClock};
use crate::resources::conveyor::{CommandConveyor, SlotId};
use crate::resources::pool::{Pool, Species, acquire, acquire_weighted};
use crate::systems::conveyor::{
    activate, belt_end, belt_on_signal, belt_start, belt_update, drive_belt, occupant,
};

impl Species for CommandKind {
    fn spawn_instance(self, world: &mut World) -> Entity {
        world
            .spawn((
                Command { kind: self },
                Conveyed::default(),
                StateMachine::new(CommandState(BeltState::Pooled)),
                SceneTag::Game,
            ))
            .id()
    }
}

impl FsmState for CommandState {
    fn start(&mut self, world: &mut World, entity: Entity) {
        belt_start::<CommandConveyor, CommandKind, CommandState>(&mut self.0, world, entity, &[]);
    }

    fn update(&mut self, world: &mut World, entity: Entity) -> Option<Self> {
        belt_update(&self.0, world, entity);
        None
    }

    fn end(&mut self, world: &mut World, entity: Entity) {
        belt_end(&self.0, world, entity, &[]);
    }

    fn on_signal(&self, world: &mut World, entity: Entity, signal: &Signal) -> Option<Self> {
        belt_on_signal::<CommandConveyor>(&self.0, world, entity, signal).map(CommandState)
    }
}

/// Pick the next command kind and insert it into `slot`.
///
/// After a turn the next command is always `GoStraight`, so no two turns are
/// ever adjacent on the conveyor.
fn insert_command(world: &mut World, slot: SlotId) -> Option<CommandKind> {
    let last_was_turn = world.resource::<CommandConveyor>().last_was_turn;
    let acquired = if last_was_turn {
        acquire(world, CommandKind::GoStraight).map(|e| (e, CommandKind::GoStraight))
    } else {
        acquire_weighted::<CommandKind>(world)
    };
    let (entity, kind) = match acquired {
        Ok(pair) => pair,
        Err(e) => {
            error!("command spawner: {}", e);
            debug_assert!(false, "{e}");
            return None;
        }
    };
    world.resource_mut::<CommandConveyor>().last_was_turn = kind.is_turn();
    activate(world, entity, slot, CommandState(BeltState::Idle));
    debug!("command spawner: {:?} into {:?}", kind, slot);
    Some(kind)
}

/// Command spawner service listener.
pub fn on_command_spawner_signal(world: &mut World, _service: Entity, signal: &Signal) {
    if signal.beat() != Some(Beat::BoardMove) {
        return;
    }
    if world.resource::<BeatClock>().is_game_over() {
        return;
    }
    let spawn = world.resource::<CommandConveyor>().chain.spawn_slot();
    insert_command(world, spawn);
}

/// Fill every slot but the spawn slot, front first.
pub fn fill_command_conveyor(world: &mut World) {
    let slots: Vec<SlotId> = world
        .resource::<CommandConveyor>()
        .chain
        .fill_order()
        .collect();
    for slot in slots {
        insert_command(world, slot);
    }
}

/// Kind of the command in the front slot.
pub fn head_command(world: &World) -> Option<CommandKind> {
    let front = world.get_resource::<CommandConveyor>()?.chain.front_slot();
    let entity = occupant::<CommandKind>(world, front)?;
    world.get::<Command>(entity).map(|c| c.kind)
}

/// Commands currently on the conveyor, ordered from spawn slot to front.
pub fn conveyor_commands(world: &World) -> Vec<(SlotId, CommandKind)> {
    let Some(pool) = world.get_resource::<Pool<CommandKind>>() else {
        return Vec::new();
    };
    let mut commands: Vec<(SlotId, CommandKind)> = pool
        .active()
        .iter()
        .filter_map(|e| {
            let slot = world.get::<Conveyed>(*e)?.slot?;
            let kind = world.get::<Command>(*e)?.kind;
            Some((slot, kind))
        })
        .collect();
    commands.sort_by_key(|(slot, _)| *slot);
    commands
}

pub fn drive_commands(world: &mut World) {
    drive_belt::<CommandKind, CommandState>(world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::pool::PoolEntry;
    use crate::resources::rng::GameRng;
    use crate::resources::signalbus::{GameBus, SignalBus, publish};

    fn make_world(weights: [u32; 3], slots: usize) -> World {
        let mut world = World::new();
        world.insert_resource(SignalBus::<GameBus>::new());
        world.insert_resource(BeatClock::new(0.5));
        world.insert_resource(GameRng::new(Some(11)));
        world.insert_resource(CommandConveyor::new(slots));
        world.insert_resource(Pool::new(
            CommandKind::ALL
                .iter()
                .zip(weights)
                .map(|(kind, weight)| PoolEntry {
                    species: *kind,
                    weight,
                    seed: 1,
                })
                .collect(),
        ));
        crate::resources::pool::seed::<CommandKind>(&mut world);
        world
    }

    fn beat(world: &mut World, beat: Beat) {
        publish::<GameBus>(world, Signal::BeatStarted(beat));
        drive_commands(world);
    }

    #[test]
    fn fill_alternates_after_turns() {
        let mut world = make_world([0, 1, 1], 5);
        fill_command_conveyor(&mut world);
        drive_commands(&mut world);
        let kinds: Vec<CommandKind> = conveyor_commands(&world)
            .into_iter()
            .map(|(_, k)| k)
            .collect();
        assert_eq!(kinds.len(), 4);
        // Filled front first (turn, straight, turn, straight), listed back first.
        assert_eq!(kinds[0], CommandKind::GoStraight);
        assert_eq!(kinds[2], CommandKind::GoStraight);
        assert!(kinds[1].is_turn() && kinds[3].is_turn());
    }

    fn subscribe_spawner(world: &mut World) {
        let service = world.spawn_empty().id();
        crate::resources::signalbus::subscribe::<GameBus>(
            world,
            crate::events::signal::SignalKind::BeatStarted,
            service,
            on_command_spawner_signal,
        );
    }

    #[test]
    fn board_move_shifts_commands_and_recycles_front() {
        let mut world = make_world([1, 0, 0], 3);
        fill_command_conveyor(&mut world);
        drive_commands(&mut world);
        subscribe_spawner(&mut world);
        let front = occupant::<CommandKind>(&world, SlotId(2)).unwrap();
        let middle = occupant::<CommandKind>(&world, SlotId(1)).unwrap();

        beat(&mut world, Beat::ActorMove);
        beat(&mut world, Beat::BoardMove);

        let pool = world.resource::<Pool<CommandKind>>();
        assert!(pool.is_inactive(front));
        assert_eq!(world.get::<Conveyed>(front).unwrap().slot, None);
        assert_eq!(world.get::<Conveyed>(middle).unwrap().slot, Some(SlotId(2)));
        assert_eq!(
            world
                .get::<StateMachine<CommandState>>(middle)
                .unwrap()
                .current,
            CommandState(BeltState::Slide {
                start: glam::Vec2::new(0.0, -1.0)
            })
        );
        assert!(occupant::<CommandKind>(&world, SlotId(0)).is_some());
        assert_eq!(head_command(&world), Some(CommandKind::GoStraight));
    }

    #[test]
    fn slide_interpolates_back_to_rest_with_progress() {
        let mut world = make_world([1, 0, 0], 3);
        fill_command_conveyor(&mut world);
        drive_commands(&mut world);
        let middle = occupant::<CommandKind>(&world, SlotId(1)).unwrap();
        beat(&mut world, Beat::BoardMove);

        world.resource_mut::<BeatClock>().accumulate(0.25);
        drive_commands(&mut world);
        let offset = world.get::<Conveyed>(middle).unwrap().offset;
        assert!((offset.y + 0.5).abs() < 1e-6);

        beat(&mut world, Beat::ActorMove);
        let conveyed = world.get::<Conveyed>(middle).unwrap();
        assert_eq!(conveyed.offset, glam::Vec2::ZERO);
        assert_eq!(conveyed.slot, Some(SlotId(2)));
    }

    #[test]
    fn spawner_stops_and_commands_freeze_after_fall() {
        let mut world = make_world([1, 0, 0], 3);
        fill_command_conveyor(&mut world);
        drive_commands(&mut world);
        subscribe_spawner(&mut world);

        publish::<GameBus>(&mut world, Signal::FallStarted);
        world.resource_mut::<BeatClock>().set_game_over();
        let active_before = world.resource::<Pool<CommandKind>>().active().len();
        beat(&mut world, Beat::BoardMove);

        let pool = world.resource::<Pool<CommandKind>>();
        assert_eq!(pool.active().len(), active_before);
        for entity in pool.active().to_vec() {
            assert_eq!(
                world
                    .get::<StateMachine<CommandState>>(entity)
                    .unwrap()
                    .current,
                CommandState(BeltState::GameOver)
            );
        }
        assert!(world.resource::<SignalBus<GameBus>>().listeners(
            crate::events::signal::SignalKind::FallStarted
        ).is_empty());
    }
}
