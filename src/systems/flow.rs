//! Global flow state machine.
//!
//! Scene loading happens in `start` and unloading in `end`, after the flow
//! entity has dropped its own subscription on the scene bus.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::flow::{FlowState, GlobalFlow};
use crate::components::statemachine::{FsmState, StateMachine};
use crate::events::signal::{Signal, SignalKind};
use crate::resources::signalbus::{AppBus, GameBus, MenuBus, SignalBus, publish};
use crate::systems::scene::{load_game_scene, load_menu_scene, unload_game_scene, unload_menu_scene};
use crate::systems::statemachine::{drive_all, listen, unlisten};

const LOAD_SIGNALS: [SignalKind; 1] = [SignalKind::FinishedLoading];
const MENU_SIGNALS: [SignalKind; 1] = [SignalKind::StartPressed];
const GAME_SIGNALS: [SignalKind; 1] = [SignalKind::GameOver];

impl FsmState for FlowState {
    fn start(&mut self, world: &mut World, entity: Entity) {
        info!("flow: entering {:?}", self);
        match self {
            FlowState::Load => listen::<AppBus, FlowState>(world, entity, &LOAD_SIGNALS),
            FlowState::Menu => {
                load_menu_scene(world);
                listen::<MenuBus, FlowState>(world, entity, &MENU_SIGNALS);
            }
            FlowState::Game => {
                load_game_scene(world);
                listen::<GameBus, FlowState>(world, entity, &GAME_SIGNALS);
            }
        }
    }

    fn end(&mut self, world: &mut World, entity: Entity) {
        match self {
            FlowState::Load => unlisten::<AppBus>(world, entity, &LOAD_SIGNALS),
            FlowState::Menu => {
                unlisten::<MenuBus>(world, entity, &MENU_SIGNALS);
                unload_menu_scene(world);
            }
            FlowState::Game => {
                unlisten::<GameBus>(world, entity, &GAME_SIGNALS);
                unload_game_scene(world);
            }
        }
    }

    fn on_signal(&self, _world: &mut World, _entity: Entity, signal: &Signal) -> Option<Self> {
        match (self, signal) {
            (FlowState::Load, Signal::FinishedLoading) => Some(FlowState::Menu),
            (FlowState::Menu, Signal::StartPressed) => Some(FlowState::Game),
            (FlowState::Game, Signal::GameOver) => Some(FlowState::Menu),
            _ => None,
        }
    }
}

pub fn spawn_flow(world: &mut World) -> Entity {
    world
        .spawn((GlobalFlow, StateMachine::new(FlowState::Load)))
        .id()
}

/// Current global flow state, if the flow entity exists.
pub fn flow_state(world: &mut World) -> Option<FlowState> {
    world
        .query_filtered::<&StateMachine<FlowState>, With<GlobalFlow>>()
        .iter(world)
        .next()
        .map(|m| m.current)
}

/// The menu's start button was pressed. Ignored outside the menu.
pub fn press_start(world: &mut World) {
    if !world.contains_resource::<SignalBus<MenuBus>>() {
        info!("start pressed outside the menu, ignored");
        return;
    }
    publish::<MenuBus>(world, Signal::StartPressed);
}

pub fn drive_flow(world: &mut World) {
    drive_all::<FlowState>(world);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_world() -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(SignalBus::<AppBus>::new());
        let flow = spawn_flow(&mut world);
        drive_flow(&mut world);
        (world, flow)
    }

    #[test]
    fn finished_loading_enters_menu() {
        let (mut world, _) = make_world();
        publish::<AppBus>(&mut world, Signal::FinishedLoading);
        drive_flow(&mut world);

        assert_eq!(flow_state(&mut world), Some(FlowState::Menu));
        assert!(world.resource::<SignalBus<AppBus>>().is_empty());
        assert!(world.contains_resource::<SignalBus<MenuBus>>());
    }

    #[test]
    fn start_outside_menu_is_ignored() {
        let (mut world, _) = make_world();
        press_start(&mut world);
        drive_flow(&mut world);
        assert_eq!(flow_state(&mut world), Some(FlowState::Load));
    }

    #[test]
    fn leaving_menu_unloads_it() {
        let (mut world, _) = make_world();
        publish::<AppBus>(&mut world, Signal::FinishedLoading);
        drive_flow(&mut world);
        press_start(&mut world);
        drive_flow(&mut world);

        assert_eq!(flow_state(&mut world), Some(FlowState::Game));
        assert!(!world.contains_resource::<SignalBus<MenuBus>>());
        assert!(world.contains_resource::<SignalBus<GameBus>>());
    }
}
