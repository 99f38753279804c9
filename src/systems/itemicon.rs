//! Item icon conveyor systems.
//!
//! Icons follow the same belt lifecycle as commands, on their own chain and
//! pool. On top of that an icon that gets clicked leaves the conveyor at
//! once, and the icon spawner inserts on the actor beat rather than the board
//! beat.

use bevy_ecs::prelude::*;
use log::{debug, error, info};

use crate::components::command::BeltState;
use crate::components::conveyed::Conveyed;
use crate::components::itemicon::{ItemIcon, ItemIconState, ItemKind};
use crate::components::scenetag::SceneTag;
use crate::components::statemachine::{FsmState, StateMachine};
use crate::events::signal::{Signal, SignalKind};
use crate::resources::beatclock::{Beat, BeatClock};
use crate::resources::conveyor::IconConveyor;
use crate::resources::placement::PlacementState;
use crate::resources::pool::{Pool, Species, acquire_weighted};
use crate::resources::signalbus::{GameBus, publish};
use crate::systems::conveyor::{
    activate, belt_end, belt_on_signal, belt_start, belt_update, drive_belt,
};

const ICON_SIGNALS: [SignalKind; 1] = [SignalKind::ItemIconClicked];

impl Species for ItemKind {
    fn spawn_instance(self, world: &mut World) -> Entity {
        world
            .spawn((
                ItemIcon { item: self },
                Conveyed::default(),
                StateMachine::new(ItemIconState(BeltState::Pooled)),
                SceneTag::Game,
            ))
            .id()
    }
}

impl FsmState for ItemIconState {
    fn start(&mut self, world: &mut World, entity: Entity) {
        belt_start::<IconConveyor, ItemKind, ItemIconState>(
            &mut self.0,
            world,
            entity,
            &ICON_SIGNALS,
        );
    }

    fn update(&mut self, world: &mut World, entity: Entity) -> Option<Self> {
        belt_update(&self.0, world, entity);
        None
    }

    fn end(&mut self, world: &mut World, entity: Entity) {
        belt_end(&self.0, world, entity, &ICON_SIGNALS);
    }

    fn on_signal(&self, world: &mut World, entity: Entity, signal: &Signal) -> Option<Self> {
        if let Signal::ItemIconClicked(clicked) = signal {
            return (*clicked == entity).then_some(ItemIconState(BeltState::Pooled));
        }
        belt_on_signal::<IconConveyor>(&self.0, world, entity, signal).map(ItemIconState)
    }
}

/// Icon spawner service listener.
pub fn on_icon_spawner_signal(world: &mut World, _service: Entity, signal: &Signal) {
    if signal.beat() != Some(Beat::ActorMove) {
        return;
    }
    if world.resource::<BeatClock>().is_game_over() {
        return;
    }
    match acquire_weighted::<ItemKind>(world) {
        Ok((entity, item)) => {
            let spawn = world.resource::<IconConveyor>().chain.spawn_slot();
            activate(world, entity, spawn, ItemIconState(BeltState::Idle));
            debug!("icon spawner: {:?} into {:?}", item, spawn);
        }
        Err(e) => {
            error!("icon spawner: {}", e);
            debug_assert!(false, "{e}");
        }
    }
}

/// The player clicked `icon`.
///
/// Ignored while another placement is in progress or when `icon` is not an
/// icon currently on the conveyor.
pub fn click_icon(world: &mut World, icon: Entity) {
    if world
        .get_resource::<PlacementState>()
        .is_some_and(PlacementState::in_progress)
    {
        info!("icon {:?} clicked during a placement, ignored", icon);
        return;
    }
    let on_conveyor = world
        .get_resource::<Pool<ItemKind>>()
        .is_some_and(|pool| pool.is_active(icon));
    if !on_conveyor {
        info!("icon {:?} is not on the conveyor, click ignored", icon);
        return;
    }
    publish::<GameBus>(world, Signal::ItemIconClicked(icon));
}

/// Icons currently on the conveyor as `(entity, item)`, in activation order.
pub fn conveyor_icons(world: &World) -> Vec<(Entity, ItemKind)> {
    let Some(pool) = world.get_resource::<Pool<ItemKind>>() else {
        return Vec::new();
    };
    pool.active()
        .iter()
        .filter_map(|e| Some((*e, world.get::<ItemIcon>(*e)?.item)))
        .collect()
}

pub fn drive_item_icons(world: &mut World) {
    drive_belt::<ItemKind, ItemIconState>(world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::conveyor::SlotId;
    use crate::resources::pool::PoolEntry;
    use crate::resources::rng::GameRng;
    use crate::resources::signalbus::{SignalBus, subscribe};

    fn make_world() -> World {
        let mut world = World::new();
        world.insert_resource(SignalBus::<GameBus>::new());
        world.insert_resource(BeatClock::new(0.5));
        world.insert_resource(GameRng::new(Some(5)));
        world.insert_resource(IconConveyor::new(3));
        world.insert_resource(PlacementState::default());
        world.insert_resource(Pool::new(vec![PoolEntry {
            species: ItemKind::TurnTable,
            weight: 1,
            seed: 2,
        }]));
        crate::resources::pool::seed::<ItemKind>(&mut world);
        let service = world.spawn_empty().id();
        subscribe::<GameBus>(
            &mut world,
            SignalKind::BeatStarted,
            service,
            on_icon_spawner_signal,
        );
        world
    }

    fn beat(world: &mut World, beat: Beat) {
        publish::<GameBus>(world, Signal::BeatStarted(beat));
        drive_item_icons(world);
    }

    #[test]
    fn one_icon_per_actor_beat_moving_on_board_beats() {
        let mut world = make_world();
        beat(&mut world, Beat::ActorMove);
        let first = conveyor_icons(&world)[0].0;
        assert_eq!(world.get::<Conveyed>(first).unwrap().slot, Some(SlotId(0)));

        beat(&mut world, Beat::BoardMove);
        beat(&mut world, Beat::ActorMove);
        assert_eq!(conveyor_icons(&world).len(), 2);
        assert_eq!(world.get::<Conveyed>(first).unwrap().slot, Some(SlotId(1)));
    }

    #[test]
    fn clicked_icon_returns_to_pool() {
        let mut world = make_world();
        beat(&mut world, Beat::ActorMove);
        beat(&mut world, Beat::BoardMove);
        beat(&mut world, Beat::ActorMove);
        let icons = conveyor_icons(&world);
        let (clicked, other) = (icons[0].0, icons[1].0);

        click_icon(&mut world, clicked);
        drive_item_icons(&mut world);

        let pool = world.resource::<Pool<ItemKind>>();
        assert!(pool.is_inactive(clicked));
        assert!(pool.is_active(other));
        assert_eq!(world.get::<Conveyed>(clicked).unwrap().slot, None);
    }

    #[test]
    fn clicks_during_placement_are_ignored() {
        let mut world = make_world();
        beat(&mut world, Beat::ActorMove);
        let icon = conveyor_icons(&world)[0].0;
        world
            .resource_mut::<PlacementState>()
            .open(ItemKind::Floor, glam::Vec2::ZERO);

        click_icon(&mut world, icon);
        drive_item_icons(&mut world);

        assert!(world.resource::<Pool<ItemKind>>().is_active(icon));
    }
}
